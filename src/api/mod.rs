//! Backend API module.
//!
//! `client` speaks the raw HTTP protocol; `gateway` layers offline-first
//! caching and fallback on top. Application code goes through the gateway.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::{ApiClient, ChatListResponse, MembersResponse, UserContext};
pub use error::ApiError;
pub use gateway::Gateway;
