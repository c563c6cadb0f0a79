//! Pure filter/sort pipeline for the chat list.
//!
//! `derive_view` never mutates its input; the controller keeps the full
//! fetched list and re-derives the view on every search or sort change.

use std::cmp::Ordering;

use crate::models::{Chat, ChatSortColumn, ChatStats, ChatType};
use crate::utils::{cmp_ignore_case, contains_ignore_case};

/// Chat type predicate selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Group,
    Supergroup,
}

impl TypeFilter {
    pub fn matches(&self, chat_type: ChatType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Group => chat_type == ChatType::Group,
            TypeFilter::Supergroup => chat_type == ChatType::Supergroup,
        }
    }

    /// Cycle through the filters (bound to a single key in the UI)
    pub fn next(&self) -> Self {
        match self {
            TypeFilter::All => TypeFilter::Group,
            TypeFilter::Group => TypeFilter::Supergroup,
            TypeFilter::Supergroup => TypeFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Group => "groups",
            TypeFilter::Supergroup => "supergroups",
        }
    }
}

/// Current search/filter/sort selection.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub search: String,
    pub type_filter: TypeFilter,
    pub sort_by: ChatSortColumn,
    pub ascending: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            type_filter: TypeFilter::All,
            sort_by: ChatSortColumn::Title,
            ascending: true,
        }
    }
}

impl FilterState {
    /// Toggle direction when re-selecting the current column, otherwise
    /// switch to the new column ascending.
    pub fn select_column(&mut self, column: ChatSortColumn) {
        if self.sort_by == column {
            self.ascending = !self.ascending;
        } else {
            self.sort_by = column;
            self.ascending = true;
        }
    }
}

fn compare(a: &Chat, b: &Chat, sort_by: ChatSortColumn) -> Ordering {
    match sort_by {
        ChatSortColumn::Title => cmp_ignore_case(&a.title, &b.title),
        ChatSortColumn::MembersCount => a.members_count_or_zero().cmp(&b.members_count_or_zero()),
        ChatSortColumn::Type => cmp_ignore_case(a.chat_type.label(), b.chat_type.label()),
    }
}

/// Apply type filter, text filter and a stable sort to the full chat list.
///
/// Equal keys keep their original relative order, so re-running the same
/// state against the same source always yields the same view.
pub fn derive_view<'a>(chats: &'a [Chat], state: &FilterState) -> Vec<&'a Chat> {
    let needle = state.search.trim();

    let mut view: Vec<&Chat> = chats
        .iter()
        .filter(|chat| state.type_filter.matches(chat.chat_type))
        .filter(|chat| contains_ignore_case(&chat.title, needle))
        .collect();

    // Vec::sort_by is stable; reversing the comparator preserves that
    view.sort_by(|a, b| {
        let ord = compare(a, b, state.sort_by);
        if state.ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    view
}

/// Stats for the panel, always computed from the filtered view so the
/// numbers match what is on screen.
pub fn view_stats(view: &[&Chat]) -> ChatStats {
    ChatStats::from_chats(view.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(id: i64, title: &str, chat_type: ChatType, members_count: Option<i64>) -> Chat {
        Chat {
            id,
            title: title.to_string(),
            chat_type,
            username: None,
            photo_url: None,
            members_count,
        }
    }

    fn titles(view: &[&Chat]) -> Vec<String> {
        view.iter().map(|c| c.title.clone()).collect()
    }

    #[test]
    fn test_identity_filter_is_permutation() {
        let chats = vec![
            chat(1, "Zeta", ChatType::Group, None),
            chat(2, "alpha", ChatType::Supergroup, Some(5)),
            chat(3, "Mid", ChatType::Channel, Some(1)),
        ];
        let view = derive_view(&chats, &FilterState::default());
        assert_eq!(view.len(), chats.len());
        let mut ids: Vec<i64> = view.iter().map(|c| c.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_derive_view_is_idempotent() {
        let chats = vec![
            chat(1, "Beta", ChatType::Group, Some(2)),
            chat(2, "alpha", ChatType::Supergroup, Some(9)),
            chat(3, "Gamma", ChatType::Group, None),
        ];
        let state = FilterState {
            search: "a".to_string(),
            sort_by: ChatSortColumn::MembersCount,
            ..Default::default()
        };
        let once: Vec<Chat> = derive_view(&chats, &state).into_iter().cloned().collect();
        let twice = derive_view(&once, &state);
        assert_eq!(
            once.iter().map(|c| c.id).collect::<Vec<_>>(),
            twice.iter().map(|c| c.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        let chats = vec![
            chat(1, "Beta", ChatType::Group, None),
            chat(2, "alpha", ChatType::Supergroup, None),
        ];
        let view = derive_view(&chats, &FilterState::default());
        assert_eq!(titles(&view), vec!["alpha", "Beta"]);
    }

    #[test]
    fn test_missing_members_count_sorts_as_zero() {
        let chats = vec![
            chat(1, "five", ChatType::Group, Some(5)),
            chat(2, "none", ChatType::Group, None),
            chat(3, "two", ChatType::Group, Some(2)),
        ];
        let state = FilterState {
            sort_by: ChatSortColumn::MembersCount,
            ..Default::default()
        };
        let view = derive_view(&chats, &state);
        assert_eq!(titles(&view), vec!["none", "two", "five"]);
    }

    #[test]
    fn test_descending_reverses_order() {
        let chats = vec![
            chat(1, "five", ChatType::Group, Some(5)),
            chat(2, "two", ChatType::Group, Some(2)),
        ];
        let state = FilterState {
            sort_by: ChatSortColumn::MembersCount,
            ascending: false,
            ..Default::default()
        };
        assert_eq!(titles(&derive_view(&chats, &state)), vec!["five", "two"]);
    }

    #[test]
    fn test_equal_keys_keep_source_order() {
        // Same title everywhere; relative order must survive the sort
        let chats = vec![
            chat(10, "Same", ChatType::Group, None),
            chat(20, "Same", ChatType::Group, None),
            chat(30, "Same", ChatType::Group, None),
        ];
        let view = derive_view(&chats, &FilterState::default());
        let ids: Vec<i64> = view.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);

        let state = FilterState {
            ascending: false,
            ..Default::default()
        };
        let ids: Vec<i64> = derive_view(&chats, &state).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_type_and_text_filters_compose() {
        let chats = vec![
            chat(1, "Rust Devs", ChatType::Supergroup, None),
            chat(2, "Rust Jobs", ChatType::Group, None),
            chat(3, "Cooking", ChatType::Supergroup, None),
        ];
        let state = FilterState {
            search: "  rust ".to_string(),
            type_filter: TypeFilter::Supergroup,
            ..Default::default()
        };
        assert_eq!(titles(&derive_view(&chats, &state)), vec!["Rust Devs"]);
    }

    #[test]
    fn test_stats_follow_filtered_view() {
        let chats = vec![
            chat(1, "Rust Devs", ChatType::Supergroup, None),
            chat(2, "Rust Jobs", ChatType::Group, None),
            chat(3, "Cooking", ChatType::Group, None),
        ];
        let state = FilterState {
            search: "rust".to_string(),
            ..Default::default()
        };
        let view = derive_view(&chats, &state);
        let stats = view_stats(&view);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.supergroups, 1);
    }
}
