//! Local caching module for offline data access.
//!
//! Provides the `CacheStore`, a key/value TTL cache over JSON files.
//! The chat list is cached for 10 minutes, per-chat member rosters for
//! 30 minutes; entries expire lazily on read.

pub mod store;

pub use store::CacheStore;
