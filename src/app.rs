//! Application state management.
//!
//! The `App` struct owns the single source of truth for the session: the
//! unfiltered chat list, the roster for the currently opened chat, and the
//! per-view load state machine (`Loading -> {Loaded, Errored}`). Fetches run
//! in background tasks and report over an mpsc channel; every fetch carries
//! a monotonically increasing token and results with a stale token are
//! dropped, so an earlier slow response can never overwrite a later one.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, ChatListResponse, Gateway, MembersResponse, UserContext};
use crate::cache::CacheStore;
use crate::config::{Config, Theme};
use crate::filter::{derive_view, view_stats, FilterState};
use crate::models::{Chat, ChatStats, Member};

/// Buffer size for the fetch result channel.
/// One chat-list and one roster fetch in flight is the normal case; 16
/// leaves headroom for rapid refreshes.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of rows to scroll on page up/down
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Load state of the view currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Errored(String),
}

/// Which page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chats,
    Members,
}

/// Modal state layered over the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Results sent from background fetch tasks back to the main loop.
/// Errors arrive pre-formatted for the status bar.
enum FetchResult {
    ChatList {
        token: u64,
        result: Result<ChatListResponse, String>,
    },
    Members {
        token: u64,
        chat_id: i64,
        result: Result<MembersResponse, String>,
    },
    Deleted {
        chat_id: i64,
        result: Result<(), String>,
    },
}

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    identity: Option<UserContext>,
    gateway: Gateway,

    // Navigation
    pub state: AppState,
    pub view: View,
    pub load: LoadState,

    // Session data: the full fetched list, never mutated by filters
    pub chats: Vec<Chat>,
    pub filter: FilterState,
    /// Warning attached to cache-served data ("Showing cached ...")
    pub data_note: Option<String>,

    // Member roster for the opened chat
    pub members: Vec<Member>,
    pub current_chat: Option<Chat>,

    // Selection indices
    pub chat_selection: usize,
    pub member_selection: usize,

    // Delete flow
    pub pending_delete: Option<Chat>,

    pub theme: Theme,
    pub offline_mode: bool,
    pub status_message: Option<String>,
    pub last_updated: Option<String>,

    // Background fetch plumbing
    fetch_tx: mpsc::Sender<FetchResult>,
    fetch_rx: mpsc::Receiver<FetchResult>,
    next_token: u64,
    latest_chat_token: u64,
    latest_members_token: u64,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let identity = config.identity();
        debug!(has_identity = identity.is_some(), "Identity resolved");

        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("./cache"));
        let cache = CacheStore::new(cache_dir);
        let client = ApiClient::new(config.api_base_url())?;
        let gateway = Gateway::new(client, cache);

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let theme = config.theme;
        let offline_mode = config.offline_mode;
        let last_updated = gateway.chat_list_age();

        Ok(Self {
            config,
            identity,
            gateway,

            state: AppState::Normal,
            view: View::Chats,
            load: LoadState::Loading,

            chats: Vec::new(),
            filter: FilterState::default(),
            data_note: None,

            members: Vec::new(),
            current_chat: None,

            chat_selection: 0,
            member_selection: 0,

            pending_delete: None,

            theme,
            offline_mode,
            status_message: None,
            last_updated,

            fetch_tx: tx,
            fetch_rx: rx,
            next_token: 0,
            latest_chat_token: 0,
            latest_members_token: 0,
        })
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Filtered/sorted chats for display. The source list stays untouched.
    pub fn visible_chats(&self) -> Vec<&Chat> {
        derive_view(&self.chats, &self.filter)
    }

    /// Counters for the stats panel, derived from the filtered view.
    pub fn stats(&self) -> ChatStats {
        view_stats(&self.visible_chats())
    }

    pub fn selected_chat(&self) -> Option<Chat> {
        self.visible_chats().get(self.chat_selection).copied().cloned()
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    fn bump_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Start a chat list fetch. `force` bypasses the cache entirely and
    /// never falls back to it on failure.
    pub fn refresh_chats(&mut self, force: bool) {
        let Some(ctx) = self.identity.clone() else {
            self.load = LoadState::Errored(ApiError::NotAuthenticated.user_message());
            return;
        };

        self.load = LoadState::Loading;
        let token = self.bump_token();
        self.latest_chat_token = token;

        let gateway = self.gateway.clone();
        let offline = self.offline_mode;
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = gateway
                .chat_list(&ctx, force, offline)
                .await
                .map_err(|e| e.user_message());
            Self::send_result(&tx, FetchResult::ChatList { token, result }).await;
        });
    }

    /// Open the selected chat's roster view and fetch its members.
    pub fn open_selected_chat(&mut self) {
        let Some(chat) = self.selected_chat() else {
            return;
        };
        info!(chat_id = chat.id, title = %chat.title, "Opening member roster");

        self.view = View::Members;
        self.members.clear();
        self.member_selection = 0;
        self.current_chat = Some(chat.clone());
        self.fetch_members(chat.id, false);
    }

    fn fetch_members(&mut self, chat_id: i64, force: bool) {
        let Some(ctx) = self.identity.clone() else {
            self.load = LoadState::Errored(ApiError::NotAuthenticated.user_message());
            return;
        };

        self.load = LoadState::Loading;
        let token = self.bump_token();
        self.latest_members_token = token;

        let gateway = self.gateway.clone();
        let offline = self.offline_mode;
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = gateway
                .members(chat_id, &ctx, force, offline)
                .await
                .map_err(|e| e.user_message());
            Self::send_result(
                &tx,
                FetchResult::Members {
                    token,
                    chat_id,
                    result,
                },
            )
            .await;
        });
    }

    /// Refresh whatever is on screen. Bound to both the cache-friendly
    /// update key and the force-refresh key.
    pub fn refresh_current_view(&mut self, force: bool) {
        match self.view {
            View::Chats => self.refresh_chats(force),
            View::Members => {
                if let Some(chat_id) = self.current_chat.as_ref().map(|c| c.id) {
                    self.fetch_members(chat_id, force);
                }
            }
        }
    }

    /// Retry after an error; same fetch as the failed one minus the force flag.
    pub fn retry(&mut self) {
        self.refresh_current_view(false);
    }

    /// Leave the roster and return to the chat list.
    pub fn back_to_chats(&mut self) {
        self.view = View::Chats;
        self.current_chat = None;
        self.members.clear();
        // The chat list is still in memory; no refetch needed
        self.load = if self.chats.is_empty() {
            LoadState::Loading
        } else {
            LoadState::Loaded
        };
        if self.chats.is_empty() {
            self.refresh_chats(false);
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Ask for confirmation before deregistering the selected chat.
    pub fn request_delete_selected(&mut self) {
        if let Some(chat) = self.selected_chat() {
            self.pending_delete = Some(chat);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    /// Fire the delete request for the chat confirmed in the overlay.
    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(chat) = self.pending_delete.take() else {
            return;
        };
        let Some(ctx) = self.identity.clone() else {
            self.status_message = Some(ApiError::NotAuthenticated.user_message());
            return;
        };

        self.status_message = Some(format!("Removing \"{}\"...", chat.title));

        let gateway = self.gateway.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = gateway
                .delete_chat(chat.id, &ctx)
                .await
                .map_err(|e| e.user_message());
            Self::send_result(
                &tx,
                FetchResult::Deleted {
                    chat_id: chat.id,
                    result,
                },
            )
            .await;
        });
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.config.theme = self.theme;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to persist theme");
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline_mode = !self.offline_mode;
        self.config.offline_mode = self.offline_mode;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to persist offline mode");
        }
        let mode = if self.offline_mode { "offline" } else { "online" };
        info!(mode, "Switched mode");
        self.status_message = Some(format!("Now {}", mode));
        self.refresh_current_view(false);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn move_selection(&mut self, delta: isize) {
        let len = match self.view {
            View::Chats => self.visible_chats().len(),
            View::Members => self.members.len(),
        };
        let selection = match self.view {
            View::Chats => &mut self.chat_selection,
            View::Members => &mut self.member_selection,
        };
        if len == 0 {
            *selection = 0;
            return;
        }
        let new = selection.saturating_add_signed(delta);
        *selection = new.min(len - 1);
    }

    /// Keep selections inside the (possibly re-filtered) lists
    pub fn clamp_selection(&mut self) {
        let visible = self.visible_chats().len();
        if self.chat_selection >= visible {
            self.chat_selection = visible.saturating_sub(1);
        }
        if self.member_selection >= self.members.len() {
            self.member_selection = self.members.len().saturating_sub(1);
        }
    }

    // =========================================================================
    // Background results
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send fetch result - channel closed");
        }
    }

    /// Drain completed fetches. Called once per event-loop tick.
    pub fn check_fetch_results(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_result(result);
        }
    }

    fn process_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::ChatList { token, result } => {
                if token != self.latest_chat_token {
                    debug!(token, "Dropping stale chat list result");
                    return;
                }
                match result {
                    Ok(resp) => self.apply_chat_list(resp),
                    Err(message) => {
                        error!(error = %message, "Chat list fetch failed");
                        if self.view == View::Chats {
                            self.load = LoadState::Errored(message);
                        } else {
                            self.status_message = Some(message);
                        }
                    }
                }
            }
            FetchResult::Members {
                token,
                chat_id,
                result,
            } => {
                if token != self.latest_members_token {
                    debug!(token, "Dropping stale members result");
                    return;
                }
                // The user may have navigated back already
                if self.view != View::Members
                    || self.current_chat.as_ref().map(|c| c.id) != Some(chat_id)
                {
                    debug!(chat_id, "Dropping members result for closed view");
                    return;
                }
                match result {
                    Ok(resp) => self.apply_members(resp),
                    Err(message) => {
                        error!(error = %message, chat_id, "Members fetch failed");
                        self.load = LoadState::Errored(message);
                    }
                }
            }
            FetchResult::Deleted { chat_id, result } => match result {
                Ok(()) => {
                    // Remove exactly the one id; stats re-derive from the view
                    self.chats.retain(|c| c.id != chat_id);
                    self.clamp_selection();
                    self.status_message = Some("Chat removed".to_string());
                    info!(chat_id, "Chat deregistered");
                }
                Err(message) => {
                    // The list is still valid; show a transient notice only
                    warn!(error = %message, chat_id, "Delete failed");
                    self.status_message = Some(format!("Delete failed: {}", message));
                }
            },
        }
    }

    fn apply_chat_list(&mut self, resp: ChatListResponse) {
        info!(count = resp.chats.len(), cached = resp.cached, "Chat list loaded");
        self.chats = resp.chats;
        self.data_note = if resp.cached { resp.warning } else { None };
        self.last_updated = self.gateway.chat_list_age();
        self.clamp_selection();
        if self.view == View::Chats {
            self.load = LoadState::Loaded;
        }
    }

    fn apply_members(&mut self, resp: MembersResponse) {
        info!(count = resp.members.len(), cached = resp.cached, "Roster loaded");
        let mut members = resp.members;
        // Creator first, then admins, then members; stable within a rank
        members.sort_by_key(|m| m.status.rank());
        self.members = members;
        self.data_note = if resp.cached { resp.warning } else { None };
        self.clamp_selection();
        self.load = LoadState::Loaded;
    }
}

#[cfg(test)]
impl App {
    /// Bare instance for tests. `App::new` touches the real config and
    /// cache directories; this one uses a temp-dir cache and a gateway
    /// pointed at a closed local port so nothing leaves the process.
    pub(crate) fn bare() -> Self {
        let cache = CacheStore::new(
            std::env::temp_dir()
                .join("chatroster-tests")
                .join(format!("app-{}", std::process::id())),
        );
        let client = ApiClient::new("http://127.0.0.1:9".to_string()).unwrap();
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        App {
            config: Config::default(),
            identity: Some(UserContext {
                user_id: 42,
                init_data: "user=42".to_string(),
            }),
            gateway: Gateway::new(client, cache),
            state: AppState::Normal,
            view: View::Chats,
            load: LoadState::Loaded,
            chats: Vec::new(),
            filter: FilterState::default(),
            data_note: None,
            members: Vec::new(),
            current_chat: None,
            chat_selection: 0,
            member_selection: 0,
            pending_delete: None,
            theme: Theme::Dark,
            offline_mode: false,
            status_message: None,
            last_updated: None,
            fetch_tx: tx,
            fetch_rx: rx,
            next_token: 0,
            latest_chat_token: 0,
            latest_members_token: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatType, MemberStatus};

    fn chat(id: i64, title: &str, chat_type: ChatType) -> Chat {
        Chat {
            id,
            title: title.to_string(),
            chat_type,
            username: None,
            photo_url: None,
            members_count: Some(2),
        }
    }

    fn test_app() -> App {
        let mut app = App::bare();
        app.chats = vec![
            chat(1, "Alpha", ChatType::Group),
            chat(2, "Beta", ChatType::Supergroup),
            chat(3, "Gamma", ChatType::Group),
        ];
        app
    }

    #[test]
    fn test_delete_result_removes_exactly_one_chat() {
        let mut app = test_app();
        app.process_result(FetchResult::Deleted {
            chat_id: 2,
            result: Ok(()),
        });
        let ids: Vec<i64> = app.chats.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let stats = app.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.supergroups, 0);
        assert_eq!(stats.groups, 2);
    }

    #[test]
    fn test_delete_failure_leaves_list_intact() {
        let mut app = test_app();
        app.process_result(FetchResult::Deleted {
            chat_id: 2,
            result: Err("Server error (500)".to_string()),
        });
        assert_eq!(app.chats.len(), 3);
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Delete failed"));
    }

    #[test]
    fn test_stale_chat_list_result_is_dropped() {
        let mut app = test_app();
        app.latest_chat_token = 5;

        let stale = ChatListResponse {
            success: true,
            chats: vec![chat(9, "Stale", ChatType::Group)],
            stats: None,
            cached: false,
            warning: None,
            error: None,
        };
        app.process_result(FetchResult::ChatList {
            token: 4,
            result: Ok(stale),
        });
        // Still the original three chats
        assert_eq!(app.chats.len(), 3);
    }

    #[test]
    fn test_latest_chat_list_result_applies() {
        let mut app = test_app();
        app.latest_chat_token = 5;
        app.load = LoadState::Loading;

        let fresh = ChatListResponse {
            success: true,
            chats: vec![chat(9, "Fresh", ChatType::Group)],
            stats: None,
            cached: true,
            warning: Some("Showing cached chat list from 2m ago".to_string()),
            error: None,
        };
        app.process_result(FetchResult::ChatList {
            token: 5,
            result: Ok(fresh),
        });
        assert_eq!(app.chats.len(), 1);
        assert_eq!(app.load, LoadState::Loaded);
        assert!(app.data_note.as_deref().unwrap().contains("cached"));
    }

    #[test]
    fn test_members_result_for_closed_view_is_dropped() {
        let mut app = test_app();
        app.latest_members_token = 7;
        // view is Chats, so the roster result must be ignored
        app.process_result(FetchResult::Members {
            token: 7,
            chat_id: 1,
            result: Ok(MembersResponse {
                success: true,
                members: vec![],
                cached: false,
                warning: None,
                error: None,
            }),
        });
        assert!(app.members.is_empty());
        assert_eq!(app.load, LoadState::Loaded);
    }

    #[test]
    fn test_members_sorted_by_status_rank() {
        let mut app = test_app();
        app.view = View::Members;
        app.current_chat = Some(chat(1, "Alpha", ChatType::Group));
        app.latest_members_token = 1;

        let member = |id: i64, status: MemberStatus| Member {
            id,
            first_name: format!("m{}", id),
            last_name: None,
            username: None,
            status,
            is_bot: false,
            profile_photo_url: None,
        };
        app.process_result(FetchResult::Members {
            token: 1,
            chat_id: 1,
            result: Ok(MembersResponse {
                success: true,
                members: vec![
                    member(1, MemberStatus::Member),
                    member(2, MemberStatus::Creator),
                    member(3, MemberStatus::Administrator),
                ],
                cached: false,
                warning: None,
                error: None,
            }),
        });
        let ids: Vec<i64> = app.members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_selection_clamped_after_filter_change() {
        let mut app = test_app();
        app.chat_selection = 2;
        app.filter.search = "Alpha".to_string();
        app.clamp_selection();
        assert_eq!(app.chat_selection, 0);
    }
}
