//! App state - the immutable snapshot and its reducer, no I/O logic

use crate::constants::MAX_TRUST_SCORE;
use crate::messages::actions::{Action, PeerUpdate, TransferUpdate, UserUpdate};
use crate::mock;
use crate::models::{Notification, Peer, Theme, Transfer, TransferStatus, User};

/// Snapshot of everything the views render
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub user: User,
    pub transfers: Vec<Transfer>,
    pub peers: Vec<Peer>,
    pub notifications: Vec<Notification>,
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State seeded with the mock profile, transfers and peers
    pub fn new() -> Self {
        AppState {
            user: mock::user(),
            transfers: mock::transfers(),
            peers: mock::peers(),
            notifications: Vec::new(),
            theme: Theme::default(),
        }
    }

    /// State with the given user and nothing else
    pub fn empty(user: User) -> Self {
        AppState {
            user,
            transfers: Vec::new(),
            peers: Vec::new(),
            notifications: Vec::new(),
            theme: Theme::default(),
        }
    }

    pub fn transfer(&self, id: &str) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.id == id)
    }

    pub fn peer(&self, id: &str) -> Option<&Peer> {
        self.peers.iter().find(|p| p.id == id)
    }

    /// Compute the next snapshot. Actions addressing unknown ids yield an
    /// unchanged copy.
    pub fn reduce(&self, action: &Action) -> AppState {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    fn apply(&mut self, action: &Action) {
        match action {
            Action::UpdateUser(changes) => {
                for change in changes {
                    apply_user_update(&mut self.user, change);
                }
            }
            Action::AddTransfer(transfer) => {
                if self.transfer(&transfer.id).is_some() {
                    tracing::debug!(id = %transfer.id, "Ignoring transfer with duplicate id");
                    return;
                }
                let mut transfer = transfer.clone();
                normalize_transfer(&mut transfer);
                self.transfers.insert(0, transfer);
            }
            Action::UpdateTransfer { id, changes } => {
                if let Some(transfer) = self.transfers.iter_mut().find(|t| &t.id == id) {
                    for change in changes {
                        apply_transfer_update(transfer, change);
                    }
                    normalize_transfer(transfer);
                }
            }
            Action::DeleteTransfer(id) => self.transfers.retain(|t| &t.id != id),
            Action::AddPeer(peer) => {
                if self.peer(&peer.id).is_some() {
                    tracing::debug!(id = %peer.id, "Ignoring peer with duplicate id");
                    return;
                }
                let mut peer = peer.clone();
                peer.trust_score = peer.trust_score.min(MAX_TRUST_SCORE);
                self.peers.insert(0, peer);
            }
            Action::UpdatePeer { id, changes } => {
                if let Some(peer) = self.peers.iter_mut().find(|p| &p.id == id) {
                    for change in changes {
                        apply_peer_update(peer, change);
                    }
                }
            }
            Action::BlockPeer(id) => self.set_blocked(id, true),
            Action::UnblockPeer(id) => self.set_blocked(id, false),
            Action::AddNotification(notification) => {
                self.notifications.push(notification.clone());
            }
            Action::RemoveNotification(id) => self.notifications.retain(|n| &n.id != id),
            Action::SetTheme(theme) => self.theme = *theme,
        }
    }

    fn set_blocked(&mut self, id: &str, blocked: bool) {
        if let Some(peer) = self.peers.iter_mut().find(|p| p.id == id) {
            peer.is_blocked = blocked;
        }
    }
}

fn apply_user_update(user: &mut User, change: &UserUpdate) {
    match change {
        UserUpdate::Username(name) => user.username = name.clone(),
        UserUpdate::TrustScore(score) => user.trust_score = (*score).min(MAX_TRUST_SCORE),
        UserUpdate::TotalShared(n) => user.total_shared = *n,
        UserUpdate::TotalDownloaded(n) => user.total_downloaded = *n,
        UserUpdate::AddShared(n) => user.total_shared = user.total_shared.saturating_add(*n),
        UserUpdate::AddDownloaded(n) => {
            user.total_downloaded = user.total_downloaded.saturating_add(*n)
        }
        UserUpdate::AwardBadge(badge) => {
            user.badges.insert(badge.clone());
        }
        UserUpdate::Replace(replacement) => {
            *user = replacement.clone();
            user.trust_score = user.trust_score.min(MAX_TRUST_SCORE);
        }
    }
}

fn apply_transfer_update(transfer: &mut Transfer, change: &TransferUpdate) {
    match change {
        TransferUpdate::Status(status) => transfer.status = *status,
        TransferUpdate::Progress(progress) => transfer.progress = *progress,
        TransferUpdate::Speed(speed) => transfer.speed = *speed,
        TransferUpdate::Name(name) => transfer.name = name.clone(),
    }
}

fn apply_peer_update(peer: &mut Peer, change: &PeerUpdate) {
    match change {
        PeerUpdate::Username(name) => peer.username = name.clone(),
        PeerUpdate::TrustScore(score) => peer.trust_score = (*score).min(MAX_TRUST_SCORE),
        PeerUpdate::Online(online) => peer.is_online = *online,
        PeerUpdate::Blocked(blocked) => peer.is_blocked = *blocked,
        PeerUpdate::Seen(at) => peer.last_seen = *at,
    }
}

/// Progress stays in range and a completed transfer is always full.
fn normalize_transfer(transfer: &mut Transfer) {
    transfer.progress = Transfer::clamp_progress(transfer.progress);
    if transfer.status == TransferStatus::Completed {
        transfer.progress = 100.0;
    }
}
