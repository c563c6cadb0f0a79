use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

/// One cached value with its write time and per-entry time-to-live.
/// Expiry is evaluated lazily on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub ttl_ms: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
            ttl_ms: ttl.num_milliseconds(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let age = Utc::now() - self.timestamp;
        age.num_milliseconds() > self.ttl_ms
    }

    /// Human-readable age for the status bar.
    pub fn age_display(&self) -> String {
        let minutes = (Utc::now() - self.timestamp).num_minutes();
        if minutes < 1 {
            // Negative age means clock skew; treat it as fresh
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// Key/value TTL cache over JSON files in the app cache directory.
///
/// Every failure mode (unwritable directory, quota, corrupt file) degrades
/// to a cache miss with a log line. Callers never see a storage error.
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_dir: PathBuf,
    enabled: bool,
}

impl CacheStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        let enabled = match std::fs::create_dir_all(&cache_dir) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, dir = %cache_dir.display(), "Cache directory unavailable, running without cache");
                false
            }
        };
        Self { cache_dir, enabled }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Store a value under `key` with the given time-to-live.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.enabled {
            return;
        }
        let entry = CacheEntry {
            data: value,
            timestamp: Utc::now(),
            ttl_ms: ttl.num_milliseconds(),
        };
        let path = self.entry_path(key);
        let result = serde_json::to_string(&entry)
            .map_err(std::io::Error::other)
            .and_then(|contents| std::fs::write(&path, contents));
        if let Err(e) = result {
            warn!(key, error = %e, "Failed to write cache entry");
        }
    }

    /// Read a value, returning `None` when the entry is absent, unparsable
    /// or past its TTL. Expired and corrupt files are removed on the way out.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        if !self.enabled {
            return None;
        }
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(key, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&contents) {
            Ok(e) => e,
            Err(e) => {
                debug!(key, error = %e, "Discarding unparsable cache entry");
                self.remove(key);
                return None;
            }
        };

        if entry.is_expired() {
            debug!(key, "Cache entry expired");
            self.remove(key);
            return None;
        }

        Some(entry)
    }

    /// Remove one entry, or every entry in the store when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        if !self.enabled {
            return;
        }
        match key {
            Some(key) => self.remove(key),
            None => {
                let entries = match std::fs::read_dir(&self.cache_dir) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(error = %e, "Failed to list cache directory");
                        return;
                    }
                };
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        if let Err(e) = std::fs::remove_file(&path) {
                            warn!(path = %path.display(), error = %e, "Failed to remove cache file");
                        }
                    }
                }
            }
        }
    }

    fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key, error = %e, "Failed to remove cache entry");
            }
        }
    }

    /// Age of an entry for display, ignoring expiry.
    pub fn age(&self, key: &str) -> Option<String> {
        self.get::<serde_json::Value>(key).map(|e| e.age_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(name: &str) -> CacheStore {
        let dir = std::env::temp_dir()
            .join("chatroster-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        CacheStore::new(dir)
    }

    #[test]
    fn test_put_get_round_trip() {
        let store = test_store("round-trip");
        store.put("chats", &vec![1, 2, 3], Duration::minutes(10));
        let entry = store.get::<Vec<i32>>("chats").expect("cache miss after put");
        assert_eq!(entry.data, vec![1, 2, 3]);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_get_expired_entry_removed() {
        let store = test_store("expired");
        // Write an entry whose timestamp is already past the TTL
        let stale = CacheEntry {
            data: vec![1],
            timestamp: Utc::now() - Duration::minutes(11),
            ttl_ms: Duration::minutes(10).num_milliseconds(),
        };
        let path = store.entry_path("chats");
        std::fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

        assert!(store.get::<Vec<i32>>("chats").is_none());
        assert!(!path.exists(), "expired entry should be removed on read");
    }

    #[test]
    fn test_get_unparsable_entry_is_miss() {
        let store = test_store("corrupt");
        std::fs::write(store.entry_path("chats"), "not json at all").unwrap();
        assert!(store.get::<Vec<i32>>("chats").is_none());
    }

    #[test]
    fn test_clear_single_key() {
        let store = test_store("clear-one");
        store.put("chats", &1, Duration::minutes(10));
        store.put("members_42", &2, Duration::minutes(10));
        store.clear(Some("chats"));
        assert!(store.get::<i32>("chats").is_none());
        assert!(store.get::<i32>("members_42").is_some());
    }

    #[test]
    fn test_clear_all() {
        let store = test_store("clear-all");
        store.put("chats", &1, Duration::minutes(10));
        store.put("members_42", &2, Duration::minutes(10));
        store.clear(None);
        assert!(store.get::<i32>("chats").is_none());
        assert!(store.get::<i32>("members_42").is_none());
    }

    #[test]
    fn test_entry_age_display() {
        let fresh = CacheEntry::new(1, Duration::minutes(10));
        assert_eq!(fresh.age_display(), "just now");

        let mut old = CacheEntry::new(1, Duration::days(7));
        old.timestamp = Utc::now() - Duration::minutes(90);
        assert_eq!(old.age_display(), "1h ago");
    }
}
