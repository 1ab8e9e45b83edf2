use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The local user's profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub peer_id: String,
    pub trust_score: u8,
    pub total_shared: u64,
    pub total_downloaded: u64,
    #[serde(default)]
    pub badges: BTreeSet<String>,
}

/// Lifecycle of a simulated transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Downloading,
    Uploading,
    Paused,
    Completed,
    Failed,
}

impl TransferStatus {
    pub const ALL: [TransferStatus; 6] = [
        TransferStatus::Pending,
        TransferStatus::Downloading,
        TransferStatus::Uploading,
        TransferStatus::Paused,
        TransferStatus::Completed,
        TransferStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Downloading => "downloading",
            TransferStatus::Uploading => "uploading",
            TransferStatus::Paused => "paused",
            TransferStatus::Completed => "completed",
            TransferStatus::Failed => "failed",
        }
    }

    /// Whether the transfer is currently moving bytes
    pub fn is_active(&self) -> bool {
        matches!(self, TransferStatus::Downloading | TransferStatus::Uploading)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a transfer, fixed when it is created
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    #[default]
    Download,
    Upload,
}

impl TransferKind {
    /// Status of the transfer while it is moving bytes
    pub fn running_status(&self) -> TransferStatus {
        match self {
            TransferKind::Download => TransferStatus::Downloading,
            TransferKind::Upload => TransferStatus::Uploading,
        }
    }
}

/// Swarm health of a download, from its seed to peer ratio
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Health {
    Excellent,
    Good,
    Poor,
}

impl Health {
    pub fn of(seeds: u32, peers: u32) -> Health {
        let ratio = seeds as f64 / peers.max(1) as f64;
        if ratio > 0.3 {
            Health::Excellent
        } else if ratio > 0.1 {
            Health::Good
        } else {
            Health::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Excellent => "Excellent",
            Health::Good => "Good",
            Health::Poor => "Poor",
        }
    }
}

/// A simulated upload or download
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub media_type: String,
    #[serde(default)]
    pub kind: TransferKind,
    pub status: TransferStatus,
    /// Percentage in `0.0..=100.0`
    pub progress: f64,
    /// Bytes per second
    pub speed: u64,
    pub created_at: DateTime<Utc>,
    pub fingerprint: String,
    /// Swarm members seeding the file
    #[serde(default)]
    pub seeds: u32,
    /// Swarm members still fetching the file
    #[serde(default)]
    pub peers: u32,
}

impl Transfer {
    /// Clamps a progress value into the valid percentage range
    pub fn clamp_progress(progress: f64) -> f64 {
        if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 100.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 100.0
    }

    pub fn health(&self) -> Health {
        Health::of(self.seeds, self.peers)
    }
}

/// A simulated network participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub id: String,
    pub username: String,
    pub trust_score: u8,
    pub last_seen: DateTime<Utc>,
    pub is_online: bool,
    pub is_blocked: bool,
}

/// Severity tag of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// Identifier of a notification, derived from its creation time in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transient status message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Colour scheme selected by the user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// A row of the community leaderboard
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub badge_count: u32,
    pub trust_score: u8,
    pub total_shared: u64,
    pub rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_progress() {
        assert_eq!(Transfer::clamp_progress(-5.0), 0.0);
        assert_eq!(Transfer::clamp_progress(150.0), 100.0);
        assert_eq!(Transfer::clamp_progress(42.5), 42.5);
        assert_eq!(Transfer::clamp_progress(f64::NAN), 0.0);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TransferStatus::Downloading).unwrap();
        assert_eq!(json, "\"downloading\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn test_health_from_seed_ratio() {
        assert_eq!(Health::of(10, 20), Health::Excellent);
        assert_eq!(Health::of(3, 20), Health::Good);
        assert_eq!(Health::of(1, 20), Health::Poor);
        // No peers counts as one
        assert_eq!(Health::of(1, 0), Health::Excellent);
        assert_eq!(Health::of(0, 0), Health::Poor);
    }

    #[test]
    fn test_kind_defaults_to_download() {
        assert_eq!(TransferKind::default(), TransferKind::Download);
        assert_eq!(TransferKind::Upload.running_status(), TransferStatus::Uploading);
    }
}
