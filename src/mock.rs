//! Seed data shown before the user has done anything.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{LeaderboardEntry, Peer, Transfer, TransferKind, TransferStatus, User};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Every badge a user can earn
pub const BADGES: [&str; 15] = [
    "Early Adopter",
    "Speed Demon",
    "Trusted Seeder",
    "Community Helper",
    "File Wizard",
    "Data Guardian",
    "Network Pioneer",
    "Upload Champion",
    "Download Master",
    "Peer Connector",
    "Torrent Expert",
    "Sharing Enthusiast",
    "Tech Savvy",
    "Reliability King",
    "Bandwidth Hero",
];

pub fn user() -> User {
    User {
        username: String::from("TechNinja42"),
        peer_id: String::from("TR-A8F3E2D9C1B6H5K7"),
        trust_score: 87,
        total_shared: 156,
        total_downloaded: 89,
        badges: BADGES[..5].iter().map(|b| b.to_string()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn transfer(
    id: &str,
    name: &str,
    size: u64,
    media_type: &str,
    kind: TransferKind,
    status: TransferStatus,
    progress: f64,
    speed: u64,
    created_at: DateTime<Utc>,
    fingerprint: &str,
    (seeds, peers): (u32, u32),
) -> Transfer {
    Transfer {
        id: id.to_string(),
        name: name.to_string(),
        size,
        media_type: media_type.to_string(),
        kind,
        status,
        progress,
        speed,
        created_at,
        fingerprint: fingerprint.to_string(),
        seeds,
        peers,
    }
}

pub fn transfers() -> Vec<Transfer> {
    vec![
        transfer(
            "1",
            "Ubuntu 22.04.3 Desktop.iso",
            4_698_415_104,
            "ISO Image",
            TransferKind::Download,
            TransferStatus::Completed,
            100.0,
            0,
            at(2024, 1, 15, 10, 30),
            "sha256:a8b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091",
            (45, 12),
        ),
        transfer(
            "2",
            "VS Code Extensions Pack.zip",
            524_288_000,
            "Archive",
            TransferKind::Download,
            TransferStatus::Downloading,
            67.0,
            15_728_640,
            at(2024, 1, 16, 14, 22),
            "sha256:b9c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2",
            (6, 40),
        ),
        transfer(
            "3",
            "React Documentation.pdf",
            8_388_608,
            "Document",
            TransferKind::Upload,
            TransferStatus::Uploading,
            34.0,
            2_097_152,
            at(2024, 1, 16, 16, 45),
            "sha256:c0d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3",
            (3, 9),
        ),
        transfer(
            "4",
            "Design Assets Collection.zip",
            1_073_741_824,
            "Archive",
            TransferKind::Download,
            TransferStatus::Failed,
            23.0,
            0,
            at(2024, 1, 16, 12, 15),
            "sha256:d1e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4",
            (1, 25),
        ),
        transfer(
            "5",
            "Node.js v20 LTS.msi",
            33_554_432,
            "Installer",
            TransferKind::Download,
            TransferStatus::Completed,
            100.0,
            0,
            at(2024, 1, 14, 9, 12),
            "sha256:e2f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5",
            (20, 30),
        ),
    ]
}

fn peer(
    id: &str,
    username: &str,
    trust_score: u8,
    last_seen: DateTime<Utc>,
    is_online: bool,
    is_blocked: bool,
) -> Peer {
    Peer {
        id: id.to_string(),
        username: username.to_string(),
        trust_score,
        last_seen,
        is_online,
        is_blocked,
    }
}

pub fn peers() -> Vec<Peer> {
    vec![
        peer("peer1", "CodeMaster88", 92, at(2024, 1, 16, 17, 30), true, false),
        peer("peer2", "DataHoarder", 76, at(2024, 1, 16, 16, 45), true, false),
        peer("peer3", "SpeedSeeder", 95, at(2024, 1, 16, 15, 20), false, false),
        peer("peer4", "TorrentKing", 68, at(2024, 1, 16, 14, 10), true, false),
        peer("peer5", "FileSharingPro", 84, at(2024, 1, 15, 22, 30), false, true),
    ]
}

fn entry(id: &str, username: &str, badge_count: u32, trust_score: u8, total_shared: u64, rank: usize) -> LeaderboardEntry {
    LeaderboardEntry {
        id: id.to_string(),
        username: username.to_string(),
        badge_count,
        trust_score,
        total_shared,
        rank,
    }
}

pub fn leaderboard() -> Vec<LeaderboardEntry> {
    vec![
        entry("lead1", "UltraSeeder", 15, 98, 500, 1),
        entry("lead2", "SpeedDemon", 12, 95, 387, 2),
        entry("lead3", "DataVault", 11, 94, 356, 3),
        entry("lead4", "ShareMaster", 10, 92, 289, 4),
        entry("lead5", "TechNinja42", 5, 87, 156, 5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let transfer_ids: HashSet<_> = transfers().into_iter().map(|t| t.id).collect();
        assert_eq!(transfer_ids.len(), transfers().len());
        let peer_ids: HashSet<_> = peers().into_iter().map(|p| p.id).collect();
        assert_eq!(peer_ids.len(), peers().len());
    }

    #[test]
    fn test_completed_seed_transfers_are_full() {
        for t in transfers() {
            if t.status == TransferStatus::Completed {
                assert_eq!(t.progress, 100.0);
            }
        }
    }
}
