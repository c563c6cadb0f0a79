use thiserror::Error;

/// Errors surfaced by the API gateway after cache fallback has been tried.
/// None of these are fatal; the controller renders them with a retry hint.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated - no Telegram user identity available")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{0}")]
    Application(String),

    #[error("Offline and no cached data available")]
    Offline,
}

/// Maximum length for error response bodies kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data around.
    /// The cut is walked back to a char boundary; backend error text is
    /// not ASCII.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Http {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// Short message suitable for the status bar and error screens.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotAuthenticated => {
                "Not authenticated. Set CHATROSTER_USER_ID and CHATROSTER_INIT_DATA.".to_string()
            }
            ApiError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::Network(e) if e.is_connect() => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            ApiError::Network(_) => "Network error. Check your connection.".to_string(),
            ApiError::Http { status, .. } => format!("Server error ({})", status),
            ApiError::Application(msg) => msg.clone(),
            ApiError::Offline => "Offline - no cached data available yet.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(body.len() < 600);
                assert!(body.contains("truncated"));
            }
            _ => panic!("expected Http variant"),
        }
    }

    #[test]
    fn test_from_status_cuts_multibyte_bodies_on_char_boundary() {
        // Two-byte chars put a boundary inside byte index 500
        let body = format!("a{}", "д".repeat(300));
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::Http { body, .. } => {
                assert!(body.contains("truncated"));
                assert!(body.starts_with("aд"));
            }
            _ => panic!("expected Http variant"),
        }
    }

    #[test]
    fn test_user_messages_are_short() {
        let err = ApiError::Application("Чаты не найдены".to_string());
        assert_eq!(err.user_message(), "Чаты не найдены");
        assert!(ApiError::Offline.user_message().contains("Offline"));
    }
}
