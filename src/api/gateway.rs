//! Offline-first fetch pipeline: cache check, network fetch, cache fallback.
//!
//! Policy: a failed fetch falls back to the cached copy unless the caller
//! asked for an explicit force refresh - a forced refresh that silently
//! served stale data would be indistinguishable from a working one.

use chrono::Duration;
use tracing::{debug, warn};

use crate::cache::CacheStore;

use super::client::{ApiClient, ChatListResponse, MembersResponse, UserContext};
use super::ApiError;

/// Chat list cache lifetime. The backend refreshes chat info on demand,
/// so ten minutes keeps the list current without hammering it.
const CHAT_LIST_TTL_MINUTES: i64 = 10;

/// Member rosters change less often than the chat list itself.
const MEMBERS_TTL_MINUTES: i64 = 30;

const CHAT_LIST_KEY: &str = "chats";

fn members_key(chat_id: i64) -> String {
    format!("members_{}", chat_id)
}

/// API gateway pairing the HTTP client with the TTL cache.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: ApiClient,
    cache: CacheStore,
}

impl Gateway {
    pub fn new(client: ApiClient, cache: CacheStore) -> Self {
        Self { client, cache }
    }

    /// Fetch the chat list.
    ///
    /// In offline mode a cache hit is returned tagged `cached=true` without
    /// any network I/O; a miss is `ApiError::Offline`. Online, a successful
    /// response is cached; failures fall back per the module policy.
    pub async fn chat_list(
        &self,
        ctx: &UserContext,
        force_refresh: bool,
        offline: bool,
    ) -> Result<ChatListResponse, ApiError> {
        if offline && !force_refresh {
            debug!("Offline mode, serving chat list from cache");
            return self.cached_chat_list().ok_or(ApiError::Offline);
        }

        match self.client.chat_list(ctx, force_refresh).await {
            Ok(resp) if resp.success && resp.error.is_none() => {
                self.cache.put(
                    CHAT_LIST_KEY,
                    &resp,
                    Duration::minutes(CHAT_LIST_TTL_MINUTES),
                );
                Ok(resp)
            }
            Ok(resp) => {
                let message = resp
                    .error
                    .unwrap_or_else(|| "Backend reported failure".to_string());
                self.chat_list_fallback(force_refresh, ApiError::Application(message))
            }
            Err(err) => self.chat_list_fallback(force_refresh, err),
        }
    }

    fn cached_chat_list(&self) -> Option<ChatListResponse> {
        self.cache
            .get::<ChatListResponse>(CHAT_LIST_KEY)
            .map(|entry| {
                let age = entry.age_display();
                let mut resp = entry.data;
                resp.cached = true;
                resp.warning = Some(format!("Showing cached chat list from {}", age));
                resp
            })
    }

    fn chat_list_fallback(
        &self,
        force_refresh: bool,
        err: ApiError,
    ) -> Result<ChatListResponse, ApiError> {
        if force_refresh {
            return Err(err);
        }
        match self.cached_chat_list() {
            Some(resp) => {
                warn!(error = %err, "Chat list fetch failed, serving cached copy");
                Ok(resp)
            }
            None => Err(err),
        }
    }

    /// Fetch the member roster for one chat.
    ///
    /// The backend authorizes the request against the user identity, so a
    /// missing identity fails fast instead of round-tripping a 4xx.
    pub async fn members(
        &self,
        chat_id: i64,
        ctx: &UserContext,
        force_refresh: bool,
        offline: bool,
    ) -> Result<MembersResponse, ApiError> {
        if ctx.user_id < 1 {
            return Err(ApiError::NotAuthenticated);
        }

        let key = members_key(chat_id);

        if offline && !force_refresh {
            debug!(chat_id, "Offline mode, serving members from cache");
            return self.cached_members(&key).ok_or(ApiError::Offline);
        }

        match self.client.members(chat_id, ctx).await {
            Ok(resp) if resp.success && resp.error.is_none() => {
                self.cache
                    .put(&key, &resp, Duration::minutes(MEMBERS_TTL_MINUTES));
                Ok(resp)
            }
            Ok(resp) => {
                let message = resp
                    .error
                    .unwrap_or_else(|| "Backend reported failure".to_string());
                self.members_fallback(&key, force_refresh, ApiError::Application(message))
            }
            Err(err) => self.members_fallback(&key, force_refresh, err),
        }
    }

    fn cached_members(&self, key: &str) -> Option<MembersResponse> {
        self.cache.get::<MembersResponse>(key).map(|entry| {
            let age = entry.age_display();
            let mut resp = entry.data;
            resp.cached = true;
            resp.warning = Some(format!("Showing cached roster from {}", age));
            resp
        })
    }

    fn members_fallback(
        &self,
        key: &str,
        force_refresh: bool,
        err: ApiError,
    ) -> Result<MembersResponse, ApiError> {
        if force_refresh {
            return Err(err);
        }
        match self.cached_members(key) {
            Some(resp) => {
                warn!(error = %err, "Members fetch failed, serving cached copy");
                Ok(resp)
            }
            None => Err(err),
        }
    }

    /// Deregister a chat. On success the chat list cache entry is dropped
    /// so a later cache-served list cannot resurrect the deleted chat.
    pub async fn delete_chat(&self, chat_id: i64, ctx: &UserContext) -> Result<(), ApiError> {
        if ctx.user_id < 1 {
            return Err(ApiError::NotAuthenticated);
        }

        let resp = self.client.delete_chat(chat_id, ctx).await?;
        if resp.success {
            self.cache.clear(Some(CHAT_LIST_KEY));
            self.cache.clear(Some(&members_key(chat_id)));
            Ok(())
        } else {
            Err(ApiError::Application(
                resp.error.unwrap_or_else(|| "Delete failed".to_string()),
            ))
        }
    }

    /// Age of the cached chat list for the status bar.
    pub fn chat_list_age(&self) -> Option<String> {
        self.cache.age(CHAT_LIST_KEY)
    }
}
