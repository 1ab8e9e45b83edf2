//! Store actions - the closed vocabulary every view uses to change state

use crate::models::{Notification, NotificationId, Peer, Theme, Transfer, TransferStatus, User};

/// A typed change to the user's profile
#[derive(Debug, Clone, PartialEq)]
pub enum UserUpdate {
    Username(String),
    TrustScore(u8),
    TotalShared(u64),
    TotalDownloaded(u64),
    AddShared(u64),
    AddDownloaded(u64),
    AwardBadge(String),
    /// Replace the whole profile (used when restoring from the cache)
    Replace(User),
}

/// A typed change to one transfer
#[derive(Debug, Clone, PartialEq)]
pub enum TransferUpdate {
    Status(TransferStatus),
    /// Clamped into `0..=100`
    Progress(f64),
    Speed(u64),
    Name(String),
}

/// A typed change to one peer
#[derive(Debug, Clone, PartialEq)]
pub enum PeerUpdate {
    Username(String),
    TrustScore(u8),
    Online(bool),
    Blocked(bool),
    Seen(chrono::DateTime<chrono::Utc>),
}

/// Messages accepted by the store's reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UpdateUser(Vec<UserUpdate>),
    AddTransfer(Transfer),
    UpdateTransfer {
        id: String,
        changes: Vec<TransferUpdate>,
    },
    DeleteTransfer(String),
    AddPeer(Peer),
    UpdatePeer {
        id: String,
        changes: Vec<PeerUpdate>,
    },
    BlockPeer(String),
    UnblockPeer(String),
    AddNotification(Notification),
    RemoveNotification(NotificationId),
    SetTheme(Theme),
}

impl Action {
    /// Shorthand for a single-field transfer update
    pub fn update_transfer(id: impl Into<String>, change: TransferUpdate) -> Self {
        Action::UpdateTransfer {
            id: id.into(),
            changes: vec![change],
        }
    }

    /// Short label used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Action::UpdateUser(_) => "update-user",
            Action::AddTransfer(_) => "add-transfer",
            Action::UpdateTransfer { .. } => "update-transfer",
            Action::DeleteTransfer(_) => "delete-transfer",
            Action::AddPeer(_) => "add-peer",
            Action::UpdatePeer { .. } => "update-peer",
            Action::BlockPeer(_) => "block-peer",
            Action::UnblockPeer(_) => "unblock-peer",
            Action::AddNotification(_) => "add-notification",
            Action::RemoveNotification(_) => "remove-notification",
            Action::SetTheme(_) => "set-theme",
        }
    }
}
