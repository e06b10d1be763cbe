//! View-state reconciliation for lobby listings.
//!
//! This module derives the displayed subset, order, and page of lobby records
//! from the raw record list and the current view parameters. It is pure and
//! total: no network or timer access, no failure modes. Both the TUI and the
//! one-shot CLI commands run their output through `reconcile`.
//!
//! The pipeline order is fixed: region filter, then text filter, then sort,
//! then page-count/clamp/slice. Invoking it twice with identical inputs
//! yields identical output, and `1 <= page <= total_pages` always holds
//! afterwards.

use crate::models::LobbyRecord;

/// Sort order for the lobby list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Descending by player count (default)
    #[default]
    PlayersDesc,
    /// Ascending by player count
    PlayersAsc,
    /// Keep the order the filters produced
    Unordered,
}

impl SortOrder {
    /// Parse a sort key. Unrecognized keys mean "no reordering".
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "players_desc" => SortOrder::PlayersDesc,
            "players_asc" => SortOrder::PlayersAsc,
            _ => SortOrder::Unordered,
        }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::PlayersDesc => "players_desc",
            SortOrder::PlayersAsc => "players_asc",
            SortOrder::Unordered => "unordered",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::PlayersDesc => "players ↓",
            SortOrder::PlayersAsc => "players ↑",
            SortOrder::Unordered => "unordered",
        }
    }

    /// Next order in the cycle desc -> asc -> unordered -> desc.
    #[must_use]
    pub fn cycle(&self) -> Self {
        match self {
            SortOrder::PlayersDesc => SortOrder::PlayersAsc,
            SortOrder::PlayersAsc => SortOrder::Unordered,
            SortOrder::Unordered => SortOrder::PlayersDesc,
        }
    }
}

/// User-controlled view parameters.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    /// Free-text search over ip, port, and steam id
    pub search: String,
    /// Region filter; `None` means all regions
    pub region: Option<String>,
    pub sort: SortOrder,
}

/// Result of one reconciliation pass: the ordered filtered subset (as indices
/// into the input slice) plus coherent pagination state.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// Filtered, ordered indices into the record list
    pub indices: Vec<usize>,
    /// Total records before filtering
    pub total_count: usize,
    /// Current page, clamped to `[1, total_pages]`
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}

impl ViewSnapshot {
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.indices.len()
    }

    /// Indices for the current page, inclusive of a partial trailing page.
    #[must_use]
    pub fn page_slice(&self) -> &[usize] {
        let start = self.page.saturating_sub(1) * self.page_size;
        let end = (start + self.page_size).min(self.indices.len());
        if start >= self.indices.len() {
            &[]
        } else {
            &self.indices[start..end]
        }
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Stats line in the shape the original UI used.
    #[must_use]
    pub fn stats_line(&self) -> String {
        format!(
            "Showing {} server(s). Total discovered: {}. Page {}.",
            self.filtered_count(),
            self.total_count,
            self.page
        )
    }

    #[must_use]
    pub fn page_label(&self) -> String {
        format!("Page {} / {}", self.page, self.total_pages)
    }
}

/// Derive display state from the record list and view parameters.
///
/// `requested_page` is 1-based and may be out of range; it is clamped after
/// the page count is recomputed, so callers can navigate blindly.
#[must_use]
pub fn reconcile(
    items: &[LobbyRecord],
    query: &ViewQuery,
    requested_page: usize,
    page_size: usize,
) -> ViewSnapshot {
    let page_size = page_size.max(1);

    let mut indices: Vec<usize> = (0..items.len()).collect();

    if let Some(region) = query.region.as_deref() {
        if !region.is_empty() {
            indices.retain(|&i| items[i].region.eq_ignore_ascii_case(region));
        }
    }

    let needle = query.search.trim().to_lowercase();
    if !needle.is_empty() {
        indices.retain(|&i| {
            let record = &items[i];
            record.ip.to_lowercase().contains(&needle)
                || record.port.contains(&needle)
                || record.steam_id.to_lowercase().contains(&needle)
        });
    }

    // Stable sorts so ties keep their relative order from the filter passes.
    match query.sort {
        SortOrder::PlayersDesc => {
            indices.sort_by(|&a, &b| items[b].players.cmp(&items[a].players));
        }
        SortOrder::PlayersAsc => {
            indices.sort_by(|&a, &b| items[a].players.cmp(&items[b].players));
        }
        SortOrder::Unordered => {}
    }

    let total_pages = indices.len().div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages);

    ViewSnapshot {
        indices,
        total_count: items.len(),
        page,
        total_pages,
        page_size,
    }
}

/// Distinct region values present in `items` (missing regions already default
/// to "global" at the read boundary), sorted lexically ascending. The head of
/// the returned list is conceptually the "All regions" entry, represented by
/// the `None` selection.
///
/// The second element of the pair is the selection to keep: the current one
/// if a matching region still exists (compared case-insensitively), otherwise
/// `None` (no filter).
#[must_use]
pub fn region_options(
    items: &[LobbyRecord],
    current: Option<&str>,
) -> (Vec<String>, Option<String>) {
    let mut regions: Vec<String> = Vec::new();
    for record in items {
        if !regions.contains(&record.region) {
            regions.push(record.region.clone());
        }
    }
    regions.sort();

    let selected = current.and_then(|cur| {
        regions
            .iter()
            .find(|r| r.eq_ignore_ascii_case(cur))
            .map(|_| cur.to_string())
    });

    (regions, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LobbyRecord, RawLobby};

    fn record(ip: &str, port: &str, players: u32, region: &str, steam_id: &str) -> LobbyRecord {
        LobbyRecord {
            lobby_id: format!("lobby-{ip}"),
            ip: ip.to_string(),
            port: port.to_string(),
            players,
            max_players: 16,
            region: region.to_string(),
            steam_id: steam_id.to_string(),
            version: "1.0".to_string(),
        }
    }

    /// 15 eu records with sequential player counts 0..14.
    fn eu_fleet() -> Vec<LobbyRecord> {
        (0..15)
            .map(|i| {
                record(
                    &format!("10.0.0.{i}"),
                    "27015",
                    i as u32,
                    "eu",
                    &format!("7656119{i}"),
                )
            })
            .collect()
    }

    #[test]
    fn test_scenario_a_first_page_descending() {
        let items = eu_fleet();
        let query = ViewQuery {
            sort: SortOrder::PlayersDesc,
            ..Default::default()
        };

        let snap = reconcile(&items, &query, 1, 12);

        assert_eq!(snap.total_pages, 2);
        assert!(!snap.has_prev());
        assert!(snap.has_next());

        let slice = snap.page_slice();
        assert_eq!(slice.len(), 12);
        let players: Vec<u32> = slice.iter().map(|&i| items[i].players).collect();
        let expected: Vec<u32> = (3..15).rev().map(|p| p as u32).collect();
        assert_eq!(players, expected);
    }

    #[test]
    fn test_scenario_b_second_page_remainder() {
        let items = eu_fleet();
        let query = ViewQuery {
            sort: SortOrder::PlayersDesc,
            ..Default::default()
        };

        let snap = reconcile(&items, &query, 2, 12);

        assert_eq!(snap.page, 2);
        assert_eq!(snap.page_slice().len(), 3);
        assert!(snap.has_prev());
        assert!(!snap.has_next());
    }

    #[test]
    fn test_scenario_c_port_search_ignores_sort_and_region() {
        let mut items = eu_fleet();
        items.push(record("10.0.1.1", "203", 5, "us", "765000"));

        for sort in [SortOrder::PlayersDesc, SortOrder::PlayersAsc, SortOrder::Unordered] {
            let query = ViewQuery {
                search: "203".to_string(),
                sort,
                ..Default::default()
            };
            let snap = reconcile(&items, &query, 1, 12);
            assert_eq!(snap.filtered_count(), 1);
            assert_eq!(items[snap.page_slice()[0]].port, "203");
        }
    }

    #[test]
    fn test_scenario_e_empty_region_match() {
        let items = eu_fleet();
        let query = ViewQuery {
            region: Some("ap-southeast".to_string()),
            ..Default::default()
        };

        let snap = reconcile(&items, &query, 7, 12);

        assert_eq!(snap.filtered_count(), 0);
        assert_eq!(snap.page, 1);
        assert_eq!(snap.total_pages, 1);
        assert!(!snap.has_prev());
        assert!(!snap.has_next());
        assert!(snap.page_slice().is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let items = eu_fleet();
        let query = ViewQuery {
            search: "10.0".to_string(),
            region: Some("EU".to_string()),
            sort: SortOrder::PlayersAsc,
        };

        let first = reconcile(&items, &query, 2, 12);
        let second = reconcile(&items, &query, first.page, 12);

        assert_eq!(first.indices, second.indices);
        assert_eq!(first.page, second.page);
        assert_eq!(first.total_pages, second.total_pages);
        assert_eq!(first.page_slice(), second.page_slice());
    }

    #[test]
    fn test_region_filter_case_insensitive() {
        let items = eu_fleet();
        let upper = reconcile(
            &items,
            &ViewQuery { region: Some("EU".to_string()), ..Default::default() },
            1,
            12,
        );
        let lower = reconcile(
            &items,
            &ViewQuery { region: Some("eu".to_string()), ..Default::default() },
            1,
            12,
        );
        assert_eq!(upper.indices, lower.indices);
        assert_eq!(upper.filtered_count(), 15);
    }

    #[test]
    fn test_sort_directions_reverse_without_ties() {
        let items = eu_fleet();
        let desc = reconcile(
            &items,
            &ViewQuery { sort: SortOrder::PlayersDesc, ..Default::default() },
            1,
            100,
        );
        let asc = reconcile(
            &items,
            &ViewQuery { sort: SortOrder::PlayersAsc, ..Default::default() },
            1,
            100,
        );

        let mut reversed = desc.indices.clone();
        reversed.reverse();
        assert_eq!(reversed, asc.indices);
    }

    #[test]
    fn test_sort_ties_are_stable_in_both_directions() {
        let items = vec![
            record("a", "1", 5, "eu", "s1"),
            record("b", "2", 5, "eu", "s2"),
            record("c", "3", 5, "eu", "s3"),
        ];

        for sort in [SortOrder::PlayersDesc, SortOrder::PlayersAsc] {
            let snap = reconcile(&items, &ViewQuery { sort, ..Default::default() }, 1, 12);
            assert_eq!(snap.indices, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_unordered_is_passthrough() {
        let items = vec![
            record("a", "1", 1, "eu", "s1"),
            record("b", "2", 9, "eu", "s2"),
            record("c", "3", 4, "eu", "s3"),
        ];
        let snap = reconcile(
            &items,
            &ViewQuery { sort: SortOrder::Unordered, ..Default::default() },
            1,
            12,
        );
        assert_eq!(snap.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_fields_default_before_reconcile() {
        // A record with no players sorts as 0; no region matches "global".
        let bare = LobbyRecord::from_raw(RawLobby::default());
        let items = vec![record("a", "1", 3, "eu", "s1"), bare];

        let snap = reconcile(
            &items,
            &ViewQuery { region: Some("global".to_string()), ..Default::default() },
            1,
            12,
        );
        assert_eq!(snap.filtered_count(), 1);
        assert_eq!(items[snap.page_slice()[0]].players, 0);

        let sorted = reconcile(
            &items,
            &ViewQuery { sort: SortOrder::PlayersAsc, ..Default::default() },
            1,
            12,
        );
        assert_eq!(items[sorted.indices[0]].players, 0);
    }

    #[test]
    fn test_search_matches_steam_id_case_insensitive() {
        let items = vec![
            record("a", "1", 1, "eu", "STEAM_A100"),
            record("b", "2", 2, "eu", "steam_b200"),
        ];
        let snap = reconcile(
            &items,
            &ViewQuery { search: "  A100 ".to_string(), ..Default::default() },
            1,
            12,
        );
        assert_eq!(snap.filtered_count(), 1);
    }

    #[test]
    fn test_page_clamp_bounds() {
        let items = eu_fleet();
        let query = ViewQuery::default();

        let over = reconcile(&items, &query, 99, 12);
        assert_eq!(over.page, over.total_pages);

        let under = reconcile(&items, &query, 0, 12);
        assert_eq!(under.page, 1);
    }

    #[test]
    fn test_empty_items_single_page() {
        let snap = reconcile(&[], &ViewQuery::default(), 5, 12);
        assert_eq!(snap.total_pages, 1);
        assert_eq!(snap.page, 1);
        assert_eq!(snap.filtered_count(), 0);
        assert_eq!(snap.stats_line(), "Showing 0 server(s). Total discovered: 0. Page 1.");
    }

    #[test]
    fn test_page_count_matches_ceiling() {
        for n in [0usize, 1, 11, 12, 13, 24, 25] {
            let items: Vec<LobbyRecord> = (0..n)
                .map(|i| record(&format!("ip{i}"), "1", 0, "eu", "s"))
                .collect();
            let snap = reconcile(&items, &ViewQuery::default(), 1, 12);
            assert_eq!(snap.total_pages, n.div_ceil(12).max(1));
        }
    }

    #[test]
    fn test_region_options_sorted_with_selection_preserved() {
        let items = vec![
            record("a", "1", 1, "us-west", "s1"),
            record("b", "2", 2, "eu", "s2"),
            record("c", "3", 3, "ap", "s3"),
            record("d", "4", 4, "eu", "s4"),
        ];

        let (regions, selected) = region_options(&items, Some("EU"));
        assert_eq!(regions, vec!["ap", "eu", "us-west"]);
        assert_eq!(selected.as_deref(), Some("EU"));
    }

    #[test]
    fn test_region_options_drop_vanished_selection() {
        let items = vec![record("a", "1", 1, "eu", "s1")];
        let (_, selected) = region_options(&items, Some("us-east"));
        assert_eq!(selected, None);
    }

    #[test]
    fn test_sort_key_roundtrip_and_unknown() {
        assert_eq!(SortOrder::from_key("players_desc"), SortOrder::PlayersDesc);
        assert_eq!(SortOrder::from_key("players_asc"), SortOrder::PlayersAsc);
        assert_eq!(SortOrder::from_key("alphabetical"), SortOrder::Unordered);
        assert_eq!(SortOrder::from_key(SortOrder::PlayersAsc.key()), SortOrder::PlayersAsc);
    }
}
