//! Application state types for the TUI
//!
//! - Modal states (help, search editing, region menu, record detail)
//! - Region menu selection state
//! - Feedback state for errors and transient toasts

use std::time::{Duration, Instant};

// ============================================================================
// Region Menu State
// ============================================================================

/// Region filter menu. The first entry is always the synthetic
/// "All regions" option; the rest are the discovered region values.
#[derive(Debug, Default)]
pub struct RegionMenuState {
    pub selected: usize,
    pub regions: Vec<String>,
}

impl RegionMenuState {
    /// Build the menu from the discovered regions, positioning the cursor on
    /// the currently active filter if it is still present.
    pub fn new(regions: Vec<String>, current: Option<&str>) -> Self {
        let selected = current
            .and_then(|cur| {
                regions
                    .iter()
                    .position(|r| r.eq_ignore_ascii_case(cur))
                    .map(|i| i + 1)
            })
            .unwrap_or(0);

        Self { selected, regions }
    }

    /// Total entries including the "All regions" head
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len() + 1
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.len() {
            self.selected += 1;
        }
    }

    /// The region the cursor points at; `None` means "All regions"
    #[must_use]
    pub fn selected_region(&self) -> Option<&str> {
        if self.selected == 0 {
            None
        } else {
            self.regions.get(self.selected - 1).map(String::as_str)
        }
    }
}

// ============================================================================
// Clipboard Feedback
// ============================================================================

/// Clipboard operation result for visual feedback
#[derive(Debug, Clone)]
pub struct ClipboardFeedback {
    pub message: String,
    pub success: bool,
    pub timestamp: Instant,
}

impl ClipboardFeedback {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
            timestamp: Instant::now(),
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
            timestamp: Instant::now(),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.timestamp.elapsed() < Duration::from_secs(3)
    }
}

// ============================================================================
// Modal State
// ============================================================================

/// Modal overlay state - only one modal can be active at a time.
///
/// NOTE: Search's edit_buffer is the draft being typed; it is applied live
/// to the view query, and `previous` restores the query if editing is
/// cancelled with Escape.
#[derive(Debug, Default)]
pub enum ModalState {
    #[default]
    None,
    Help,
    /// Incremental search editing
    Search {
        edit_buffer: String,
        cursor: usize,
        previous: String,
    },
    /// Region filter picker
    Regions {
        menu: RegionMenuState,
    },
    /// Detail popup for the selected lobby
    Detail,
}

impl ModalState {
    /// Check if any modal is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, ModalState::None)
    }

    /// Check if currently in search editing mode
    #[must_use]
    pub fn is_editing_search(&self) -> bool {
        matches!(self, ModalState::Search { .. })
    }

    /// Get the region menu if in region picking mode
    #[must_use]
    pub fn region_menu(&self) -> Option<&RegionMenuState> {
        match self {
            ModalState::Regions { menu } => Some(menu),
            _ => None,
        }
    }

    /// Get mutable reference to the region menu
    #[must_use]
    pub fn region_menu_mut(&mut self) -> Option<&mut RegionMenuState> {
        match self {
            ModalState::Regions { menu } => Some(menu),
            _ => None,
        }
    }
}

// ============================================================================
// Feedback State
// ============================================================================

/// Unified feedback state for errors, warnings, and transient messages
#[derive(Debug)]
pub struct FeedbackState {
    last_error: Option<(String, Instant)>,
    error_display_duration: Duration,
    pub config_warnings: Vec<String>,
    clipboard_feedback: Option<ClipboardFeedback>,
}

impl FeedbackState {
    /// Create a new FeedbackState with config warnings
    pub fn new(config_warnings: Vec<String>) -> Self {
        Self {
            last_error: None,
            error_display_duration: Duration::from_secs(8),
            config_warnings,
            clipboard_feedback: None,
        }
    }

    /// Set an error message to display
    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some((msg, Instant::now()));
    }

    /// Get the current error message if it should still be shown
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        self.last_error
            .as_ref()
            .filter(|(_, t)| t.elapsed() < self.error_display_duration)
            .map(|(msg, _)| msg.as_str())
    }

    /// Set clipboard operation feedback
    pub fn set_clipboard_feedback(&mut self, feedback: ClipboardFeedback) {
        self.clipboard_feedback = Some(feedback);
    }

    /// Get current clipboard feedback if visible
    #[must_use]
    pub fn current_clipboard_feedback(&self) -> Option<&ClipboardFeedback> {
        self.clipboard_feedback.as_ref().filter(|f| f.is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_menu_navigation() {
        let mut menu = RegionMenuState::new(vec!["ap".to_string(), "eu".to_string()], None);
        assert_eq!(menu.selected, 0);
        assert_eq!(menu.selected_region(), None);

        menu.move_down();
        assert_eq!(menu.selected_region(), Some("ap"));

        menu.move_down();
        menu.move_down(); // already at the last entry
        assert_eq!(menu.selected_region(), Some("eu"));

        menu.move_up();
        menu.move_up();
        menu.move_up(); // already at the head
        assert_eq!(menu.selected_region(), None);
    }

    #[test]
    fn test_region_menu_opens_on_active_filter() {
        let menu = RegionMenuState::new(
            vec!["ap".to_string(), "eu".to_string(), "us".to_string()],
            Some("EU"),
        );
        assert_eq!(menu.selected_region(), Some("eu"));
    }

    #[test]
    fn test_region_menu_missing_filter_selects_all() {
        let menu = RegionMenuState::new(vec!["eu".to_string()], Some("us"));
        assert_eq!(menu.selected_region(), None);
    }

    #[test]
    fn test_feedback_error_visible() {
        let mut feedback = FeedbackState::new(Vec::new());
        assert!(feedback.current_error().is_none());

        feedback.set_error("Failed to load lobbies: Network error 503".to_string());
        assert!(feedback.current_error().unwrap().contains("503"));
    }

    #[test]
    fn test_modal_state_helpers() {
        let mut modal = ModalState::Regions {
            menu: RegionMenuState::new(vec!["eu".to_string()], None),
        };
        assert!(modal.is_active());
        assert!(!modal.is_editing_search());
        assert!(modal.region_menu().is_some());
        assert!(modal.region_menu_mut().is_some());

        let modal = ModalState::Search {
            edit_buffer: String::new(),
            cursor: 0,
            previous: String::new(),
        };
        assert!(modal.is_editing_search());
    }
}
