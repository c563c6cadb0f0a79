use std::fmt;

use serde::{Deserialize, Serialize};

/// Membership status within a chat.
/// Only the three ranks the backend reports; restricted/left members
/// are filtered out server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
}

impl MemberStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Creator => "creator",
            MemberStatus::Administrator => "admin",
            MemberStatus::Member => "member",
        }
    }

    /// Order for the roster display: creator first, plain members last.
    pub fn rank(&self) -> u8 {
        match self {
            MemberStatus::Creator => 0,
            MemberStatus::Administrator => 1,
            MemberStatus::Member => 2,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A chat member, as returned by `/api/chats/{id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub status: MemberStatus,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

impl Member {
    pub fn display_name(&self) -> String {
        match self.last_name {
            Some(ref last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    pub fn username_str(&self) -> String {
        match self.username {
            Some(ref u) if !u.is_empty() => format!("@{}", u),
            _ => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member_json() {
        let json = r#"{"id": 12345, "first_name": "Ada", "last_name": "Lovelace",
                       "username": "ada", "status": "administrator", "is_bot": false}"#;
        let parsed: Member = serde_json::from_str(json).expect("Failed to parse member JSON");
        assert_eq!(parsed.display_name(), "Ada Lovelace");
        assert_eq!(parsed.username_str(), "@ada");
        assert_eq!(parsed.status, MemberStatus::Administrator);
        assert!(!parsed.is_bot);
    }

    #[test]
    fn test_display_name_without_last_name() {
        let json = r#"{"id": 1, "first_name": "Bot", "status": "member", "is_bot": true}"#;
        let parsed: Member = serde_json::from_str(json).expect("Failed to parse minimal member");
        assert_eq!(parsed.display_name(), "Bot");
        assert_eq!(parsed.username_str(), "-");
        assert!(parsed.is_bot);
    }

    #[test]
    fn test_status_rank_ordering() {
        assert!(MemberStatus::Creator.rank() < MemberStatus::Administrator.rank());
        assert!(MemberStatus::Administrator.rank() < MemberStatus::Member.rank());
    }
}
