//! Overlay and popup rendering
//!
//! Handles rendering of help, search input, region menu, detail popup, and
//! toast notifications.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, ClipboardFeedback, ModalState};
use crate::tui::theme::Theme;

use super::widgets::{centered_rect, detail_row};

pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(60, 75, area);

    // Clear the area first
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "lobbymon - Keyboard Shortcuts",
            Style::default().bold(),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Navigation",
            Style::default().fg(theme.accent).bold(),
        )]),
        Line::from("  j / Down       Move selection down"),
        Line::from("  k / Up         Move selection up"),
        Line::from("  g / Home       Jump to top of page"),
        Line::from("  G / End        Jump to bottom of page"),
        Line::from("  h / Left       Previous page"),
        Line::from("  l / Right      Next page"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Filtering & Sorting",
            Style::default().fg(theme.accent).bold(),
        )]),
        Line::from("  /              Search by ip, port, or Steam ID"),
        Line::from("  f              Region filter menu"),
        Line::from("  s              Cycle sort order"),
        Line::from("  Esc            Clear search / close overlay"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Actions",
            Style::default().fg(theme.accent).bold(),
        )]),
        Line::from("  Enter          Lobby details"),
        Line::from("  y              Copy Steam ID to clipboard"),
        Line::from("  r              Refresh now"),
        Line::from("  a              Toggle auto-refresh"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "General",
            Style::default().fg(theme.accent).bold(),
        )]),
        Line::from("  ?/F1           Show this help"),
        Line::from("  q              Quit application"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press ? or Esc to close this help",
            Style::default().fg(theme.border),
        )]),
    ];

    let help_para = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" Help "),
        )
        .style(Style::default().fg(theme.fg));

    frame.render_widget(help_para, popup_area);
}

pub fn render_search_overlay(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let (search_input, cursor_pos) = match &app.modal {
        ModalState::Search {
            edit_buffer,
            cursor,
            ..
        } => (edit_buffer.as_str(), *cursor),
        _ => return,
    };

    let popup_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4).min(50),
        height: 3,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Search ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let para =
        Paragraph::new(format!("/{search_input}")).style(Style::default().fg(theme.fg));
    frame.render_widget(para, inner);

    // Show cursor (the "/" prefix is one cell wide)
    frame.set_cursor_position((inner.x + 1 + cursor_pos as u16, inner.y));
}

pub fn render_region_menu(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let Some(menu) = app.modal.region_menu() else {
        return;
    };

    let popup_area = centered_rect(30, 50, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(" Region ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![Line::from("")];

    for i in 0..menu.len() {
        let label = if i == 0 {
            "All regions"
        } else {
            menu.regions[i - 1].as_str()
        };

        let is_cursor = i == menu.selected;
        let is_active = match (i, app.query.region.as_deref()) {
            (0, None) => true,
            (0, Some(_)) => false,
            (_, Some(current)) => menu.regions[i - 1].eq_ignore_ascii_case(current),
            (_, None) => false,
        };

        let prefix = if is_cursor { "> " } else { "  " };
        let suffix = if is_active { " [active]" } else { "" };

        let style = if is_cursor {
            Style::default().fg(theme.selected_fg).bg(theme.selected_bg)
        } else if is_active {
            Style::default().fg(theme.accent)
        } else {
            Style::default()
        };

        lines.push(Line::from(Span::styled(
            format!("{prefix}{label}{suffix}"),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter:apply  Esc:cancel",
        Style::default().fg(theme.border),
    )));

    let para = Paragraph::new(lines).style(Style::default().fg(theme.fg));
    frame.render_widget(para, inner);
}

/// Render the lobby detail popup
pub fn render_detail_popup(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let Some(record) = app.selected_record() else {
        return;
    };

    let popup_area = centered_rect(55, 55, area);
    frame.render_widget(Clear, popup_area);

    let title = format!(" Lobby {} ", record.lobby_id);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(title);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let pop_color = theme.population_color(record.players, record.max_players);

    let lines = vec![
        Line::from(""),
        detail_row("  Address:    ", &record.address()),
        Line::from(vec![
            Span::styled("  Players:    ", Style::default().bold()),
            Span::styled(
                format!("{}/{}", record.players, record.max_players),
                Style::default().fg(pop_color),
            ),
        ]),
        detail_row("  Region:     ", &record.region),
        detail_row("  Steam ID:   ", &record.steam_id),
        detail_row("  Version:    ", &record.version),
        Line::from(""),
        Line::from(Span::styled(
            "  y:copy Steam ID  Esc:close",
            Style::default().fg(theme.border),
        )),
    ];

    let para = Paragraph::new(lines).style(Style::default().fg(theme.fg));
    frame.render_widget(para, inner);
}

/// Render clipboard feedback toast notification
pub fn render_clipboard_toast(
    feedback: &ClipboardFeedback,
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
) {
    // Position toast at bottom-right
    let toast_width = (feedback.message.len() + 4).min(44) as u16;
    let toast_area = Rect {
        x: area.width.saturating_sub(toast_width + 2),
        y: area.height.saturating_sub(4),
        width: toast_width,
        height: 3,
    };

    frame.render_widget(Clear, toast_area);

    let border_color = if feedback.success {
        theme.success
    } else {
        theme.error
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let para = Paragraph::new(format!(" {} ", feedback.message))
        .block(block)
        .style(Style::default().fg(theme.fg))
        .alignment(Alignment::Center);

    frame.render_widget(para, toast_area);
}
