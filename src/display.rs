//! Display and formatting functions for one-shot CLI output.

use owo_colors::OwoColorize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::models::LobbyRecord;
use crate::view::ViewSnapshot;

#[derive(Tabled)]
struct LobbyRow {
    #[tabled(rename = "ADDRESS")]
    address: String,
    #[tabled(rename = "PLAYERS")]
    players: String,
    #[tabled(rename = "REGION")]
    region: String,
    #[tabled(rename = "STEAM ID")]
    steam_id: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "LOBBY ID")]
    lobby_id: String,
}

/// Format player occupancy with a color cue for how full the lobby is.
pub fn format_population(players: u32, max_players: u32) -> String {
    let text = format!("{}/{}", players, max_players);

    if max_players == 0 {
        return text.bright_black().to_string();
    }

    let fill = players as f64 / max_players as f64;
    if fill >= 0.9 {
        text.bright_red().to_string()
    } else if fill >= 0.5 {
        text.yellow().to_string()
    } else if players > 0 {
        text.green().to_string()
    } else {
        text.bright_black().to_string()
    }
}

/// Format the current page of lobbies as a table with stats and page info.
pub fn format_lobbies(items: &[LobbyRecord], snapshot: &ViewSnapshot) -> String {
    let mut output = String::new();

    output.push_str(&snapshot.stats_line());
    output.push('\n');

    if snapshot.page_slice().is_empty() {
        output.push_str("\nNo lobbies match the current filters.\n");
        output.push('\n');
        output.push_str(&snapshot.page_label());
        return output;
    }

    let rows: Vec<LobbyRow> = snapshot
        .page_slice()
        .iter()
        .map(|&i| {
            let record = &items[i];
            LobbyRow {
                address: record.address(),
                players: format_population(record.players, record.max_players),
                region: record.region.clone(),
                steam_id: record.steam_id.clone(),
                version: record.version.clone(),
                lobby_id: record.lobby_id.clone(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()));

    output.push('\n');
    output.push_str(&table.to_string());
    output.push('\n');
    output.push('\n');
    output.push_str(&snapshot.page_label());

    output
}

/// Format the known region values, one per line, with the no-filter entry first.
pub fn format_regions(regions: &[String]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} region(s) discovered\n\n", regions.len()));
    output.push_str("  (all regions)\n");
    for region in regions {
        output.push_str(&format!("  {}\n", region));
    }
    output
}
