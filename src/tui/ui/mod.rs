//! UI rendering for the TUI
//!
//! All rendering is done with ratatui and is event-driven - a frame is drawn
//! only when an event changed the state, not at a fixed frame rate.

mod lobbies;
mod overlays;
mod widgets;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ModalState};
use crate::tui::theme::Theme;

use lobbies::render_lobbies_view;
use overlays::{
    render_clipboard_toast, render_detail_popup, render_help_overlay, render_region_menu,
    render_search_overlay,
};

/// Render the entire TUI
pub fn render(app: &App, frame: &mut Frame) {
    let theme = &app.theme;
    let area = frame.area();

    // Main layout: header, info, content, footer
    let layout = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Stats bar
        Constraint::Min(0),    // Lobby list
        Constraint::Length(2), // Status bar
    ])
    .split(area);

    render_title_bar(app, frame, layout[0], theme);
    render_stats_bar(app, frame, layout[1], theme);
    render_lobbies_view(app, frame, layout[2], theme);
    render_status_bar(app, frame, layout[3], theme);

    // Overlays (render in order of z-index)
    match &app.modal {
        ModalState::Help => render_help_overlay(frame, area, theme),
        ModalState::Search { .. } => render_search_overlay(app, frame, area, theme),
        ModalState::Regions { .. } => render_region_menu(app, frame, area, theme),
        ModalState::Detail => render_detail_popup(app, frame, area, theme),
        ModalState::None => {}
    }

    // Clipboard feedback toast (always on top)
    if let Some(feedback) = app.feedback.current_clipboard_feedback() {
        render_clipboard_toast(feedback, frame, area, theme);
    }
}

fn render_title_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let auto = if app.auto_refresh.is_enabled() {
        format!("auto {}ms", app.auto_refresh.interval().as_millis())
    } else {
        "manual".to_string()
    };

    let title = Line::from(vec![
        Span::styled(" lobbymon ", Style::default().fg(theme.accent).bold()),
        Span::styled(
            format!("| sort: {} | refresh: {} ", app.query.sort.label(), auto),
            Style::default().fg(theme.border),
        ),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

fn render_stats_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let mut info = format!(" {}", app.snapshot.stats_line());

    if let Some(region) = app.query.region.as_deref() {
        info.push_str(&format!(" | Region: {region}"));
    }
    if !app.query.search.is_empty() {
        info.push_str(&format!(" | Search: {}", app.query.search));
    }

    let para = Paragraph::new(info).style(Style::default().fg(theme.border));
    frame.render_widget(para, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    // Keybindings line
    let keybinds = if app.modal.is_editing_search() {
        " type to filter  Enter:apply  Esc:cancel  Ctrl+u:clear "
    } else {
        " j/k:move  h/l:page  Enter:detail  /:search  f:region  s:sort  r:refresh  a:auto  ?:help  q:quit "
    };
    let keybinds_para = Paragraph::new(keybinds).style(Style::default().fg(theme.border));
    frame.render_widget(keybinds_para, layout[0]);

    // Status line
    let mut status_parts = Vec::new();

    status_parts.push(Span::styled(
        format!(" {}", app.snapshot.page_label()),
        Style::default().fg(theme.fg),
    ));
    if app.snapshot.has_prev() || app.snapshot.has_next() {
        let hint = match (app.snapshot.has_prev(), app.snapshot.has_next()) {
            (true, true) => " (h:prev l:next)",
            (false, true) => " (l:next)",
            (true, false) => " (h:prev)",
            (false, false) => "",
        };
        status_parts.push(Span::styled(hint, Style::default().fg(theme.border)));
    }

    // Last update time
    status_parts.push(Span::raw(" | "));
    if let Some(last) = app.last_refresh {
        let age_secs = last.elapsed().as_secs();
        let age_str = if age_secs < 60 {
            format!("{age_secs}s")
        } else {
            format!("{}m", age_secs / 60)
        };
        status_parts.push(Span::styled(
            format!("Updated: {age_str}"),
            Style::default().fg(theme.border),
        ));
    } else {
        status_parts.push(Span::styled(
            "Loading...",
            Style::default().fg(theme.stale_indicator),
        ));
    }

    // Config warnings display (persistent until fixed)
    if !app.feedback.config_warnings.is_empty() {
        let warning_text = if app.feedback.config_warnings.len() == 1 {
            format!(" | WARN: {}", app.feedback.config_warnings[0])
        } else {
            format!(
                " | WARN: {} (+{} more)",
                app.feedback.config_warnings[0],
                app.feedback.config_warnings.len() - 1
            )
        };
        status_parts.push(Span::styled(
            warning_text,
            Style::default().fg(theme.stale_indicator),
        ));
    }

    // Error display (temporary, auto-dismisses)
    if let Some(error) = app.feedback.current_error() {
        status_parts.push(Span::styled(
            format!(" | ERROR: {error} "),
            Style::default().fg(theme.error),
        ));
    }

    let status_para = Paragraph::new(Line::from(status_parts));
    frame.render_widget(status_para, layout[1]);
}
