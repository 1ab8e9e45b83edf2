//! Read-only derivations the pages display: partitions, filters, rankings

use std::cmp::Ordering;

use crate::app::state::AppState;
use crate::models::{LeaderboardEntry, Peer, Transfer, TransferStatus};

// ============================================================================
// Peers
// ============================================================================

/// Peers split for display. Blocked wins over the online flag.
#[derive(Debug, Default, PartialEq)]
pub struct PeerPartitions<'a> {
    pub online: Vec<&'a Peer>,
    pub offline: Vec<&'a Peer>,
    pub blocked: Vec<&'a Peer>,
}

impl<'a> PeerPartitions<'a> {
    pub fn of(peers: &'a [Peer]) -> Self {
        let mut parts = PeerPartitions::default();
        for peer in peers {
            if peer.is_blocked {
                parts.blocked.push(peer);
            } else if peer.is_online {
                parts.online.push(peer);
            } else {
                parts.offline.push(peer);
            }
        }
        parts
    }

    /// Online, then offline, then blocked
    pub fn ordered(&self) -> Vec<&'a Peer> {
        self.online
            .iter()
            .chain(&self.offline)
            .chain(&self.blocked)
            .copied()
            .collect()
    }
}

// ============================================================================
// Transfer history
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    Size,
    Progress,
    Speed,
    #[default]
    Date,
}

impl SortField {
    pub fn next(&self) -> SortField {
        match self {
            SortField::Date => SortField::Name,
            SortField::Name => SortField::Size,
            SortField::Size => SortField::Progress,
            SortField::Progress => SortField::Speed,
            SortField::Speed => SortField::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Size => "size",
            SortField::Progress => "progress",
            SortField::Speed => "speed",
            SortField::Date => "date",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Search, status filter and sort applied to the transfer history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransferQuery {
    pub search: String,
    /// `None` shows every status
    pub status: Option<TransferStatus>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl TransferQuery {
    /// Cycle all -> pending -> ... -> failed -> all
    pub fn cycle_status(&mut self) {
        let all = TransferStatus::ALL;
        self.status = match self.status {
            None => Some(all[0]),
            Some(current) => all
                .iter()
                .position(|s| *s == current)
                .and_then(|i| all.get(i + 1))
                .copied(),
        };
    }

    /// Selecting the active field flips the order; a new field starts descending
    pub fn sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.order = self.order.flipped();
        } else {
            self.sort_by = field;
            self.order = SortOrder::Desc;
        }
    }

    fn matches(&self, transfer: &Transfer) -> bool {
        if let Some(status) = self.status {
            if transfer.status != status {
                return false;
            }
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        transfer.name.to_lowercase().contains(&needle)
            || transfer.media_type.to_lowercase().contains(&needle)
    }

    fn compare(&self, a: &Transfer, b: &Transfer) -> Ordering {
        let ordering = match self.sort_by {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Size => a.size.cmp(&b.size),
            SortField::Progress => a.progress.total_cmp(&b.progress),
            SortField::Speed => a.speed.cmp(&b.speed),
            SortField::Date => a.created_at.cmp(&b.created_at),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    pub fn apply<'a>(&self, transfers: &'a [Transfer]) -> Vec<&'a Transfer> {
        let mut rows: Vec<&Transfer> = transfers.iter().filter(|t| self.matches(t)).collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    Badges,
    Trust,
    Shared,
}

impl Category {
    pub fn next(&self) -> Category {
        match self {
            Category::Badges => Category::Trust,
            Category::Trust => Category::Shared,
            Category::Shared => Category::Badges,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Badges => "Most Badges",
            Category::Trust => "Highest Trust",
            Category::Shared => "Most Shared",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeaderboardQuery {
    pub search: String,
    pub category: Category,
}

impl LeaderboardQuery {
    /// Filtered and sorted rows, ranked from 1 in display order
    pub fn apply(&self, entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<LeaderboardEntry> = entries
            .iter()
            .filter(|e| needle.is_empty() || e.username.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        match self.category {
            Category::Badges => rows.sort_by(|a, b| b.badge_count.cmp(&a.badge_count)),
            Category::Trust => rows.sort_by(|a, b| b.trust_score.cmp(&a.trust_score)),
            Category::Shared => rows.sort_by(|a, b| b.total_shared.cmp(&a.total_shared)),
        }
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i + 1;
        }
        rows
    }
}

/// 1-based position of `username` among `rows`
pub fn position_of(rows: &[LeaderboardEntry], username: &str) -> Option<usize> {
    rows.iter().position(|r| r.username == username).map(|i| i + 1)
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_uploads: usize,
    pub active_downloads: usize,
    pub online_peers: usize,
    pub total_shared: u64,
    pub total_downloaded: u64,
    pub trust_score: u8,
}

impl DashboardStats {
    pub fn of(state: &AppState) -> Self {
        let count = |status| state.transfers.iter().filter(|t| t.status == status).count();
        DashboardStats {
            active_uploads: count(TransferStatus::Uploading),
            active_downloads: count(TransferStatus::Downloading),
            online_peers: PeerPartitions::of(&state.peers).online.len(),
            total_shared: state.user.total_shared,
            total_downloaded: state.user.total_downloaded,
            trust_score: state.user.trust_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::actions::Action;
    use crate::mock;
    use chrono::Utc;

    #[test]
    fn test_blocked_peer_leaves_online_partition() {
        let peer = Peer {
            id: String::from("p1"),
            username: String::from("Alice"),
            trust_score: 70,
            last_seen: Utc::now(),
            is_online: true,
            is_blocked: false,
        };
        let state = AppState::empty(mock::user()).reduce(&Action::AddPeer(peer));
        assert_eq!(PeerPartitions::of(&state.peers).online.len(), 1);

        let state = state.reduce(&Action::BlockPeer(String::from("p1")));
        let parts = PeerPartitions::of(&state.peers);
        assert!(state.peer("p1").unwrap().is_online);
        assert!(parts.online.is_empty());
        assert!(parts.offline.is_empty());
        assert_eq!(parts.blocked.len(), 1);
    }

    #[test]
    fn test_mock_partitions() {
        let peers = mock::peers();
        let parts = PeerPartitions::of(&peers);
        assert_eq!(parts.online.len(), 3);
        assert_eq!(parts.offline.len(), 1);
        assert_eq!(parts.blocked.len(), 1);
        assert_eq!(parts.ordered().last().unwrap().id, "peer5");
    }

    #[test]
    fn test_history_defaults_to_newest_first() {
        let transfers = mock::transfers();
        let rows = TransferQuery::default().apply(&transfers);
        let ids: Vec<_> = rows.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "4", "1", "5"]);
    }

    #[test]
    fn test_history_search_matches_name_or_type() {
        let transfers = mock::transfers();
        let query = TransferQuery {
            search: String::from("ARCHIVE"),
            ..Default::default()
        };
        assert_eq!(query.apply(&transfers).len(), 2);

        let query = TransferQuery {
            search: String::from("ubuntu"),
            ..Default::default()
        };
        assert_eq!(query.apply(&transfers)[0].id, "1");
    }

    #[test]
    fn test_history_status_filter_cycles() {
        let transfers = mock::transfers();
        let mut query = TransferQuery::default();
        query.cycle_status();
        assert_eq!(query.status, Some(TransferStatus::Pending));
        assert!(query.apply(&transfers).is_empty());
        for _ in 0..4 {
            query.cycle_status();
        }
        assert_eq!(query.status, Some(TransferStatus::Completed));
        assert_eq!(query.apply(&transfers).len(), 2);
        query.cycle_status();
        query.cycle_status();
        assert_eq!(query.status, None);
    }

    #[test]
    fn test_sort_same_field_flips_order() {
        let transfers = mock::transfers();
        let mut query = TransferQuery::default();
        query.sort(SortField::Size);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.apply(&transfers)[0].id, "1");
        query.sort(SortField::Size);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.apply(&transfers)[0].id, "3");
    }

    #[test]
    fn test_leaderboard_reranks() {
        let entries = mock::leaderboard();
        let query = LeaderboardQuery {
            search: String::new(),
            category: Category::Trust,
        };
        let rows = query.apply(&entries);
        assert_eq!(rows[0].username, "UltraSeeder");
        assert_eq!(position_of(&rows, "TechNinja42"), Some(5));

        let query = LeaderboardQuery {
            search: String::from("s"),
            category: Category::Shared,
        };
        let rows = query.apply(&entries);
        let ranks: Vec<_> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=rows.len()).collect::<Vec<_>>());
        assert!(rows.iter().all(|r| r.username.to_lowercase().contains('s')));
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = DashboardStats::of(&AppState::new());
        assert_eq!(stats.active_uploads, 1);
        assert_eq!(stats.active_downloads, 1);
        assert_eq!(stats.online_peers, 3);
        assert_eq!(stats.trust_score, 87);
    }
}
