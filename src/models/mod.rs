//! Data models for backend entities.
//!
//! - `Chat`, `ChatType`, `ChatStats`: chats the bot administers
//! - `Member`, `MemberStatus`: per-chat roster entries
//! - `ChatSortColumn`: sortable columns for the chat table

pub mod chat;
pub mod member;

pub use chat::{Chat, ChatSortColumn, ChatStats, ChatType};
pub use member::{Member, MemberStatus};
