//! Lobby list rendering

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::models::LobbyRecord;
use crate::tui::app::App;
use crate::tui::theme::Theme;

use super::widgets::create_table_header;

pub fn render_lobbies_view(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(" Lobbies ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.list_blanked {
        let para = Paragraph::new("Lobby list unavailable - waiting for a successful refresh")
            .style(Style::default().fg(theme.error))
            .alignment(Alignment::Center);
        frame.render_widget(para, inner);
        return;
    }

    if app.snapshot.page_slice().is_empty() {
        let msg = if app.last_refresh.is_none() {
            "Loading lobbies..."
        } else if app.items.is_empty() {
            "No lobbies online"
        } else {
            "No lobbies match the current filters"
        };
        let para = Paragraph::new(msg)
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(para, inner);
        return;
    }

    let header = create_table_header(
        &["ADDRESS", "PLAYERS", "REGION", "STEAM ID", "VERSION"],
        theme,
    );

    let rows: Vec<Row> = app
        .snapshot
        .page_slice()
        .iter()
        .enumerate()
        .map(|(display_idx, &i)| {
            let record = &app.items[i];
            let is_selected = display_idx == app.selected;
            lobby_to_row(record, is_selected, theme)
        })
        .collect();

    let widths = [
        Constraint::Length(22), // ip:port
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Min(18),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, inner);
}

fn lobby_to_row<'a>(record: &'a LobbyRecord, is_selected: bool, theme: &Theme) -> Row<'a> {
    let pop_color = theme.population_color(record.players, record.max_players);

    let base_style = if is_selected {
        Style::default().bg(theme.selected_bg).fg(theme.selected_fg)
    } else {
        Style::default().fg(theme.fg)
    };

    Row::new(vec![
        Cell::from(record.address()),
        Cell::from(format!("{}/{}", record.players, record.max_players))
            .style(base_style.fg(pop_color)),
        Cell::from(record.region.as_str()),
        Cell::from(record.steam_id.as_str()),
        Cell::from(record.version.as_str()),
    ])
    .style(base_style)
}
