use std::fmt;

use serde::{Deserialize, Serialize};

/// Telegram chat kind as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Group,
    Supergroup,
    Private,
    Channel,
}

impl ChatType {
    /// Stable label used for sorting and display.
    pub fn label(&self) -> &'static str {
        match self {
            ChatType::Group => "group",
            ChatType::Supergroup => "supergroup",
            ChatType::Private => "private",
            ChatType::Channel => "channel",
        }
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A chat the bot administers, as returned by `/api/chats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub members_count: Option<i64>,
}

impl Chat {
    /// Member count for sorting and display; unknown counts read as 0.
    pub fn members_count_or_zero(&self) -> i64 {
        self.members_count.unwrap_or(0)
    }

    pub fn members_count_str(&self) -> String {
        match self.members_count {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        }
    }
}

/// Counters shown in the stats panel. Always derived from the chats
/// currently displayed, not the full list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStats {
    pub total: usize,
    pub groups: usize,
    pub supergroups: usize,
}

impl ChatStats {
    pub fn from_chats<'a, I>(chats: I) -> Self
    where
        I: IntoIterator<Item = &'a Chat>,
    {
        let mut stats = Self::default();
        for chat in chats {
            stats.total += 1;
            match chat.chat_type {
                ChatType::Group => stats.groups += 1,
                ChatType::Supergroup => stats.supergroups += 1,
                _ => {}
            }
        }
        stats
    }
}

/// Sortable columns in the chat table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSortColumn {
    Title,
    MembersCount,
    Type,
}
