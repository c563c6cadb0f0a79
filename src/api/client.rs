//! Raw HTTP client for the bot admin backend.
//!
//! This module talks the wire protocol only; offline handling and cache
//! fallback live in [`super::gateway`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Chat, ChatStats, Member};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Telegram identity forwarded to the backend with every request.
/// The backend validates `init_data` and authorizes against `user_id`;
/// the client itself never interprets either.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: i64,
    pub init_data: String,
}

#[derive(Serialize)]
struct ChatListRequest<'a> {
    init_data: &'a str,
    user_id: i64,
    force_refresh: bool,
}

#[derive(Serialize)]
struct MembersRequest<'a> {
    init_data: &'a str,
    user_id: i64,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    init_data: &'a str,
    user_id: i64,
}

/// Response from `POST /api/chats`.
/// Serialize is derived because successful responses are written to the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListResponse {
    pub success: bool,
    #[serde(default)]
    pub chats: Vec<Chat>,
    #[serde(default)]
    pub stats: Option<ChatStats>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `POST /api/chats/{id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    pub success: bool,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `DELETE /api/chats/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// HTTP client for the backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if a response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch the list of chats the bot administers.
    pub async fn chat_list(
        &self,
        ctx: &UserContext,
        force_refresh: bool,
    ) -> Result<ChatListResponse, ApiError> {
        let body = ChatListRequest {
            init_data: &ctx.init_data,
            user_id: ctx.user_id,
            force_refresh,
        };
        let response = self
            .client
            .post(self.url("/api/chats"))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the member roster for one chat.
    pub async fn members(
        &self,
        chat_id: i64,
        ctx: &UserContext,
    ) -> Result<MembersResponse, ApiError> {
        let body = MembersRequest {
            init_data: &ctx.init_data,
            user_id: ctx.user_id,
        };
        let response = self
            .client
            .post(self.url(&format!("/api/chats/{}/members", chat_id)))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Deregister a chat from the backend.
    pub async fn delete_chat(
        &self,
        chat_id: i64,
        ctx: &UserContext,
    ) -> Result<DeleteResponse, ApiError> {
        let body = DeleteRequest {
            init_data: &ctx.init_data,
            user_id: ctx.user_id,
        };
        let response = self
            .client
            .delete(self.url(&format!("/api/chats/{}", chat_id)))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatType;

    #[test]
    fn test_parse_chat_list_response() {
        let json = r#"{
            "success": true,
            "chats": [
                {"id": -100123, "title": "Rust Devs", "type": "supergroup", "members_count": 42},
                {"id": -456, "title": "Family", "type": "group"}
            ],
            "stats": {"total": 2, "groups": 1, "supergroups": 1}
        }"#;
        let resp: ChatListResponse =
            serde_json::from_str(json).expect("Failed to parse chat list test JSON");
        assert!(resp.success);
        assert_eq!(resp.chats.len(), 2);
        assert_eq!(resp.chats[0].chat_type, ChatType::Supergroup);
        assert_eq!(resp.stats.unwrap().total, 2);
        assert!(!resp.cached);
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_parse_application_error_response() {
        let json = r#"{"success": false, "error": "Чаты не найдены", "chats": []}"#;
        let resp: ChatListResponse =
            serde_json::from_str(json).expect("Failed to parse error response");
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Чаты не найдены"));
        assert!(resp.chats.is_empty());
    }

    #[test]
    fn test_parse_members_response() {
        let json = r#"{
            "success": true,
            "members": [
                {"id": 1, "first_name": "Ada", "status": "creator", "is_bot": false},
                {"id": 2, "first_name": "Helper", "status": "administrator", "is_bot": true}
            ]
        }"#;
        let resp: MembersResponse =
            serde_json::from_str(json).expect("Failed to parse members test JSON");
        assert!(resp.success);
        assert_eq!(resp.members.len(), 2);
        assert!(resp.members[1].is_bot);
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = ApiClient::new("http://localhost:8080/".to_string()).unwrap();
        assert_eq!(client.url("/api/chats"), "http://localhost:8080/api/chats");
    }
}
