//! Application state and core logic for the TUI
//!
//! The App struct owns the raw record list, the view parameters, and the
//! reconciled snapshot derived from them. All mutation goes through
//! `handle_input` and `handle_data`; every change to records or view
//! parameters is followed by one reconciliation pass so the pagination
//! state can never go stale.

mod state;

pub use state::{ClipboardFeedback, FeedbackState, ModalState, RegionMenuState};

use std::time::Instant;

use tokio::sync::mpsc;

use crate::models::{LobbyConfig, LobbyRecord};
use crate::tui::event::{DataEvent, EventResult, InputEvent, KeyAction};
use crate::tui::runtime::AutoRefresh;
use crate::tui::theme::Theme;
use crate::view::{reconcile, region_options, SortOrder, ViewQuery, ViewSnapshot};

/// Main application state
pub struct App {
    // Lifecycle
    pub running: bool,

    // Data: the raw record set, replaced wholesale on every successful fetch
    pub items: Vec<LobbyRecord>,
    /// Set when the last refresh failed. The record set is kept but the
    /// rendered list goes blank until the next successful refresh.
    pub list_blanked: bool,
    /// Distinct region values discovered in the record set
    pub regions: Vec<String>,

    // View State
    pub query: ViewQuery,
    pub page: usize,
    pub snapshot: ViewSnapshot,
    /// Cursor position within the current page slice
    pub selected: usize,

    // Modal State
    pub modal: ModalState,

    // Feedback
    pub feedback: FeedbackState,

    // Timing
    pub last_refresh: Option<Instant>,

    // Configuration
    pub config: LobbyConfig,
    pub theme: Theme,

    // Communication
    pub auto_refresh: AutoRefresh,
    refresh_tx: mpsc::Sender<()>,
}

impl App {
    /// Create a new App instance.
    ///
    /// The auto-refresh timer is constructed disabled; the caller enables it
    /// after setup if the config asks for it, so no task spawns during
    /// construction.
    pub fn new(
        config: LobbyConfig,
        config_warnings: Vec<String>,
        refresh_tx: mpsc::Sender<()>,
        auto_refresh: AutoRefresh,
    ) -> Self {
        let query = ViewQuery {
            sort: SortOrder::from_key(&config.display.default_sort),
            ..Default::default()
        };
        let theme = Theme::from_name(&config.display.theme);

        let mut app = Self {
            running: true,
            items: Vec::new(),
            list_blanked: false,
            regions: Vec::new(),
            query,
            page: 1,
            snapshot: ViewSnapshot::default(),
            selected: 0,
            modal: ModalState::None,
            feedback: FeedbackState::new(config_warnings),
            last_refresh: None,
            config,
            theme,
            auto_refresh,
            refresh_tx,
        };
        app.reconcile_now();
        app
    }

    /// Re-derive the snapshot from the current records and view parameters.
    ///
    /// Writes the clamped page back so the next navigation starts from a
    /// valid page, and keeps the cursor inside the page slice.
    pub fn reconcile_now(&mut self) {
        let items: &[LobbyRecord] = if self.list_blanked { &[] } else { &self.items };
        self.snapshot = reconcile(items, &self.query, self.page, self.config.display.page_size);
        self.page = self.snapshot.page;

        let len = self.snapshot.page_slice().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// The record under the cursor, if any
    #[must_use]
    pub fn selected_record(&self) -> Option<&LobbyRecord> {
        if self.list_blanked {
            return None;
        }
        self.snapshot
            .page_slice()
            .get(self.selected)
            .map(|&i| &self.items[i])
    }

    /// Handle an input event
    pub fn handle_input(&mut self, event: InputEvent) -> EventResult {
        match event {
            InputEvent::Key(key_event) => {
                let in_search = self.modal.is_editing_search();
                let action = KeyAction::from_key_event(key_event, in_search);
                self.handle_action(action)
            }
            InputEvent::Resize(_, _) => EventResult::Continue,
        }
    }

    /// Handle a data event from the fetcher task
    pub fn handle_data(&mut self, event: DataEvent) -> EventResult {
        match event {
            DataEvent::LobbiesUpdated(records) => {
                self.items = records;
                self.list_blanked = false;
                self.last_refresh = Some(Instant::now());

                // Rebuild the region list; a filter whose region vanished
                // from the data falls back to "all regions".
                let (regions, selected) =
                    region_options(&self.items, self.query.region.as_deref());
                self.regions = regions;
                self.query.region = selected;

                self.reconcile_now();
                EventResult::Continue
            }
            DataEvent::FetchError { error } => {
                self.feedback
                    .set_error(format!("Failed to load lobbies: {error}"));
                // Keep the records so filters and regions survive a flaky
                // endpoint, but stop showing them until data is trustworthy
                // again.
                self.list_blanked = true;
                self.reconcile_now();
                EventResult::Continue
            }
        }
    }

    /// Handle a key action
    fn handle_action(&mut self, action: KeyAction) -> EventResult {
        // Help overlay takes priority
        if matches!(self.modal, ModalState::Help) {
            return match action {
                KeyAction::Escape | KeyAction::ShowHelp | KeyAction::Quit => {
                    self.modal = ModalState::None;
                    EventResult::Continue
                }
                _ => EventResult::Unchanged,
            };
        }

        // Modal modes take priority over normal navigation
        match &self.modal {
            ModalState::Search { .. } => return self.handle_search_action(action),
            ModalState::Regions { .. } => return self.handle_region_action(action),
            ModalState::Detail => return self.handle_detail_action(action),
            _ => {}
        }

        match action {
            KeyAction::Quit => {
                self.running = false;
                EventResult::Quit
            }

            // Cursor movement within the page
            KeyAction::MoveDown => {
                let len = self.snapshot.page_slice().len();
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            KeyAction::MoveUp => {
                if self.selected > 0 {
                    self.selected -= 1;
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            KeyAction::MoveToTop => {
                self.selected = 0;
                EventResult::Continue
            }
            KeyAction::MoveToBottom => {
                let len = self.snapshot.page_slice().len();
                self.selected = len.saturating_sub(1);
                EventResult::Continue
            }

            // Pagination
            KeyAction::PrevPage => {
                if self.snapshot.has_prev() {
                    self.page -= 1;
                    self.selected = 0;
                    self.reconcile_now();
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            KeyAction::NextPage => {
                if self.snapshot.has_next() {
                    self.page += 1;
                    self.selected = 0;
                    self.reconcile_now();
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }

            // Actions
            KeyAction::Refresh => {
                self.request_refresh();
                EventResult::Unchanged
            }
            KeyAction::ToggleAutoRefresh => {
                let enabled = self.auto_refresh.toggle();
                if enabled {
                    // Refresh right away; the ticker fires after one interval
                    self.request_refresh();
                }
                let message = if enabled {
                    format!(
                        "Auto-refresh on ({} ms)",
                        self.auto_refresh.interval().as_millis()
                    )
                } else {
                    "Auto-refresh off".to_string()
                };
                self.feedback
                    .set_clipboard_feedback(ClipboardFeedback::success(message));
                EventResult::Continue
            }
            KeyAction::CycleSort => {
                // Sorting reorders in place; the page is kept and re-clamped
                self.query.sort = self.query.sort.cycle();
                self.reconcile_now();
                EventResult::Continue
            }
            KeyAction::OpenRegionMenu => {
                self.modal = ModalState::Regions {
                    menu: RegionMenuState::new(
                        self.regions.clone(),
                        self.query.region.as_deref(),
                    ),
                };
                EventResult::Continue
            }
            KeyAction::QuickSearch => {
                let current = self.query.search.clone();
                self.modal = ModalState::Search {
                    cursor: current.chars().count(),
                    edit_buffer: current.clone(),
                    previous: current,
                };
                EventResult::Continue
            }
            KeyAction::Select => {
                if self.selected_record().is_some() {
                    self.modal = ModalState::Detail;
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            KeyAction::YankSteamId => {
                self.yank_selected_steam_id();
                EventResult::Continue
            }

            KeyAction::ShowHelp => {
                self.modal = ModalState::Help;
                EventResult::Continue
            }
            KeyAction::Escape => {
                if !self.query.search.is_empty() {
                    self.query.search.clear();
                    self.page = 1;
                    self.reconcile_now();
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }

            _ => EventResult::Unchanged,
        }
    }

    /// Search edits apply live; Escape restores the text from before the
    /// modal was opened.
    fn handle_search_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape => {
                if let ModalState::Search { previous, .. } = &self.modal {
                    self.query.search = previous.clone();
                }
                self.modal = ModalState::None;
                self.page = 1;
                self.reconcile_now();
                EventResult::Continue
            }
            KeyAction::Select => {
                // The buffer is already applied; just leave editing mode
                self.modal = ModalState::None;
                EventResult::Continue
            }
            KeyAction::SearchChar(c) => {
                if let ModalState::Search {
                    edit_buffer,
                    cursor,
                    ..
                } = &mut self.modal
                {
                    edit_buffer.push(c);
                    *cursor += 1;
                }
                self.apply_search_edit();
                EventResult::Continue
            }
            KeyAction::SearchBackspace => {
                if let ModalState::Search {
                    edit_buffer,
                    cursor,
                    ..
                } = &mut self.modal
                {
                    if edit_buffer.pop().is_some() {
                        *cursor = cursor.saturating_sub(1);
                    }
                }
                self.apply_search_edit();
                EventResult::Continue
            }
            KeyAction::SearchClear => {
                if let ModalState::Search {
                    edit_buffer,
                    cursor,
                    ..
                } = &mut self.modal
                {
                    edit_buffer.clear();
                    *cursor = 0;
                }
                self.apply_search_edit();
                EventResult::Continue
            }
            _ => EventResult::Unchanged,
        }
    }

    fn apply_search_edit(&mut self) {
        if let ModalState::Search { edit_buffer, .. } = &self.modal {
            self.query.search = edit_buffer.clone();
        }
        // Any filter change restarts from the first page
        self.page = 1;
        self.reconcile_now();
    }

    fn handle_region_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape | KeyAction::OpenRegionMenu => {
                self.modal = ModalState::None;
                EventResult::Continue
            }
            KeyAction::MoveUp => {
                if let Some(menu) = self.modal.region_menu_mut() {
                    menu.move_up();
                }
                EventResult::Continue
            }
            KeyAction::MoveDown => {
                if let Some(menu) = self.modal.region_menu_mut() {
                    menu.move_down();
                }
                EventResult::Continue
            }
            KeyAction::Select => {
                if let Some(menu) = self.modal.region_menu() {
                    self.query.region = menu.selected_region().map(String::from);
                }
                self.modal = ModalState::None;
                self.page = 1;
                self.reconcile_now();
                EventResult::Continue
            }
            KeyAction::Quit => {
                self.running = false;
                EventResult::Quit
            }
            _ => EventResult::Unchanged,
        }
    }

    fn handle_detail_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape | KeyAction::Select => {
                self.modal = ModalState::None;
                EventResult::Continue
            }
            KeyAction::YankSteamId => {
                self.yank_selected_steam_id();
                EventResult::Continue
            }
            KeyAction::Quit => {
                self.running = false;
                EventResult::Quit
            }
            _ => EventResult::Unchanged,
        }
    }

    /// Queue a fetch with the fetcher task. A full channel means a refresh
    /// is already pending, which is as good as sending another.
    fn request_refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// Copy the selected lobby's Steam ID to the clipboard, with a manual
    /// fallback message when no clipboard tool is available.
    fn yank_selected_steam_id(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };

        if !record.has_steam_id() {
            self.feedback.set_clipboard_feedback(ClipboardFeedback::failure(
                "No Steam ID available for this lobby.".to_string(),
            ));
            return;
        }

        let steam_id = record.steam_id.clone();
        let copied = self.config.behavior.copy_to_clipboard && copy_to_clipboard(&steam_id);

        self.feedback.set_clipboard_feedback(if copied {
            ClipboardFeedback::success(format!("Copied: {steam_id}"))
        } else {
            // The ID is still useful; show it so the user can copy by hand
            ClipboardFeedback::failure(format!("Copy manually: {steam_id}"))
        });
    }
}

/// Attempt to copy text to system clipboard
fn copy_to_clipboard(text: &str) -> bool {
    use std::io::Write;

    // Try multiple clipboard tools in order of preference
    let clipboard_commands = [
        ("xclip", vec!["-selection", "clipboard"]),
        ("xsel", vec!["--clipboard", "--input"]),
        ("pbcopy", vec![]),  // macOS
        ("wl-copy", vec![]), // Wayland
    ];

    for (cmd, args) in clipboard_commands {
        let spawned = std::process::Command::new(cmd)
            .args(&args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(_) => continue,
        };

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.wait();
            continue;
        };

        if stdin.write_all(text.as_bytes()).is_ok() {
            drop(stdin);
            if matches!(child.wait(), Ok(status) if status.success()) {
                return true;
            }
        } else {
            let _ = child.wait();
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn record(ip: &str, players: u32, region: &str, steam_id: &str) -> LobbyRecord {
        LobbyRecord {
            lobby_id: format!("lobby-{ip}"),
            ip: ip.to_string(),
            port: "27015".to_string(),
            players,
            max_players: 16,
            region: region.to_string(),
            steam_id: steam_id.to_string(),
            version: "1.0".to_string(),
        }
    }

    fn fleet(n: usize) -> Vec<LobbyRecord> {
        (0..n)
            .map(|i| record(&format!("10.0.0.{i}"), i as u32, "eu", &format!("765{i}")))
            .collect()
    }

    fn test_app() -> (App, mpsc::Receiver<()>) {
        let (refresh_tx, refresh_rx) = mpsc::channel(4);
        let auto_refresh = AutoRefresh::new(
            Duration::from_millis(5000),
            refresh_tx.clone(),
            CancellationToken::new(),
        );
        let app = App::new(LobbyConfig::default(), Vec::new(), refresh_tx, auto_refresh);
        (app, refresh_rx)
    }

    #[test]
    fn test_fetch_error_blanks_list_but_keeps_records() {
        let (mut app, _rx) = test_app();

        app.handle_data(DataEvent::LobbiesUpdated(fleet(3)));
        assert_eq!(app.snapshot.filtered_count(), 3);
        assert!(app.selected_record().is_some());

        app.handle_data(DataEvent::FetchError {
            error: "Network error 500".to_string(),
        });

        assert_eq!(app.items.len(), 3, "records survive a failed refresh");
        assert!(app.list_blanked);
        assert_eq!(app.snapshot.filtered_count(), 0);
        assert!(app.selected_record().is_none());
        assert!(app.feedback.current_error().unwrap().contains("500"));

        // The next successful refresh restores the display
        app.handle_data(DataEvent::LobbiesUpdated(fleet(2)));
        assert!(!app.list_blanked);
        assert_eq!(app.snapshot.filtered_count(), 2);
    }

    #[test]
    fn test_pagination_stops_at_bounds() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(fleet(15)));
        assert_eq!(app.snapshot.total_pages, 2);

        assert_eq!(app.handle_action(KeyAction::PrevPage), EventResult::Unchanged);
        assert_eq!(app.page, 1);

        assert_eq!(app.handle_action(KeyAction::NextPage), EventResult::Continue);
        assert_eq!(app.page, 2);
        assert_eq!(app.selected, 0);

        assert_eq!(app.handle_action(KeyAction::NextPage), EventResult::Unchanged);
        assert_eq!(app.page, 2);
    }

    #[test]
    fn test_search_edit_applies_live_and_resets_page() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(fleet(15)));
        app.handle_action(KeyAction::NextPage);
        assert_eq!(app.page, 2);

        app.handle_action(KeyAction::QuickSearch);
        assert!(app.modal.is_editing_search());

        app.handle_action(KeyAction::SearchChar('1'));
        app.handle_action(KeyAction::SearchChar('4'));
        assert_eq!(app.query.search, "14");
        assert_eq!(app.page, 1);
        assert_eq!(app.snapshot.filtered_count(), 1);

        app.handle_action(KeyAction::Select);
        assert!(!app.modal.is_active());
        assert_eq!(app.query.search, "14");
    }

    #[test]
    fn test_search_escape_restores_previous_text() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(fleet(5)));

        app.handle_action(KeyAction::QuickSearch);
        app.handle_action(KeyAction::SearchChar('x'));
        assert_eq!(app.snapshot.filtered_count(), 0);

        app.handle_action(KeyAction::Escape);
        assert!(!app.modal.is_active());
        assert_eq!(app.query.search, "");
        assert_eq!(app.snapshot.filtered_count(), 5);
    }

    #[test]
    fn test_escape_in_normal_mode_clears_search() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(fleet(5)));

        app.handle_action(KeyAction::QuickSearch);
        app.handle_action(KeyAction::SearchChar('3'));
        app.handle_action(KeyAction::Select);
        assert_eq!(app.snapshot.filtered_count(), 1);

        assert_eq!(app.handle_action(KeyAction::Escape), EventResult::Continue);
        assert_eq!(app.query.search, "");
        assert_eq!(app.snapshot.filtered_count(), 5);

        // A second Escape has nothing left to clear
        assert_eq!(app.handle_action(KeyAction::Escape), EventResult::Unchanged);
    }

    #[test]
    fn test_region_menu_select_filters_and_resets_page() {
        let (mut app, _rx) = test_app();
        let mut items = fleet(14);
        items.push(record("10.0.1.1", 3, "us", "765100"));
        app.handle_data(DataEvent::LobbiesUpdated(items));
        app.handle_action(KeyAction::NextPage);

        app.handle_action(KeyAction::OpenRegionMenu);
        assert!(app.modal.region_menu().is_some());

        // Head entry is "All regions"; move to "eu" then "us"
        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::Select);

        assert!(!app.modal.is_active());
        assert_eq!(app.query.region.as_deref(), Some("us"));
        assert_eq!(app.page, 1);
        assert_eq!(app.snapshot.filtered_count(), 1);
    }

    #[test]
    fn test_region_filter_dropped_when_region_vanishes() {
        let (mut app, _rx) = test_app();
        let mut items = fleet(3);
        items.push(record("10.0.1.1", 3, "us", "765100"));
        app.handle_data(DataEvent::LobbiesUpdated(items));

        app.query.region = Some("us".to_string());
        app.reconcile_now();
        assert_eq!(app.snapshot.filtered_count(), 1);

        // Next refresh has no "us" lobbies left
        app.handle_data(DataEvent::LobbiesUpdated(fleet(3)));
        assert_eq!(app.query.region, None);
        assert_eq!(app.snapshot.filtered_count(), 3);
    }

    #[test]
    fn test_cycle_sort_keeps_page() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(fleet(15)));
        app.handle_action(KeyAction::NextPage);
        assert_eq!(app.page, 2);

        app.handle_action(KeyAction::CycleSort);
        assert_eq!(app.query.sort, SortOrder::PlayersAsc);
        assert_eq!(app.page, 2);
    }

    #[test]
    fn test_yank_without_steam_id_reports_failure() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(vec![record(
            "10.0.0.1", 2, "eu", "unknown",
        )]));

        app.handle_action(KeyAction::YankSteamId);

        let feedback = app.feedback.current_clipboard_feedback().unwrap();
        assert!(!feedback.success);
        assert!(feedback.message.contains("No Steam ID"));
    }

    #[test]
    fn test_select_opens_detail_only_with_records() {
        let (mut app, _rx) = test_app();
        assert_eq!(app.handle_action(KeyAction::Select), EventResult::Unchanged);
        assert!(!app.modal.is_active());

        app.handle_data(DataEvent::LobbiesUpdated(fleet(2)));
        app.handle_action(KeyAction::Select);
        assert!(matches!(app.modal, ModalState::Detail));

        app.handle_action(KeyAction::Escape);
        assert!(!app.modal.is_active());
    }

    #[tokio::test]
    async fn test_toggle_auto_refresh_requests_immediate_fetch() {
        let (mut app, mut rx) = test_app();

        app.handle_action(KeyAction::ToggleAutoRefresh);
        assert!(app.auto_refresh.is_enabled());
        assert!(rx.try_recv().is_ok(), "enabling triggers a fetch right away");

        app.handle_action(KeyAction::ToggleAutoRefresh);
        assert!(!app.auto_refresh.is_enabled());
    }

    #[test]
    fn test_manual_refresh_queues_request() {
        let (mut app, mut rx) = test_app();
        app.handle_action(KeyAction::Refresh);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_cursor_clamped_after_shrinking_refresh() {
        let (mut app, _rx) = test_app();
        app.handle_data(DataEvent::LobbiesUpdated(fleet(10)));
        app.handle_action(KeyAction::MoveToBottom);
        assert_eq!(app.selected, 9);

        app.handle_data(DataEvent::LobbiesUpdated(fleet(3)));
        assert_eq!(app.selected, 2);
    }
}
