//! User-facing commands - validate input, dispatch actions, report the outcome

use chrono::Utc;

use crate::app::actor::StoreHandle;
use crate::messages::actions::{Action, TransferUpdate, UserUpdate};
use crate::models::{Severity, Theme, TransferStatus};
use crate::simulate::{self, FileMeta};

impl StoreHandle {
    // ========================================================================
    // Profile
    // ========================================================================

    /// Rename the user. Blank names are rejected with an error notification.
    pub fn save_username(&self, username: &str) -> bool {
        let username = username.trim();
        if username.is_empty() {
            self.notify("Username cannot be empty", Severity::Error);
            return false;
        }
        tracing::info!(username, "Updating profile");
        self.dispatch(Action::UpdateUser(vec![UserUpdate::Username(
            username.to_string(),
        )]));
        self.notify("Profile updated successfully", Severity::Success);
        true
    }

    // ========================================================================
    // Private network
    // ========================================================================

    /// Create a code other users can redeem to join the network
    pub fn generate_invite_code(&self) -> String {
        let code = simulate::share_code(&mut rand::thread_rng());
        self.notify("Invite code generated successfully", Severity::Success);
        code
    }

    /// Add the peer an invite code points at. Returns the new peer's id.
    pub fn redeem_invite_code(&self, code: &str) -> Option<String> {
        if code.trim().is_empty() {
            self.notify("Please enter an invite code", Severity::Error);
            return None;
        }
        let id = self.next_peer_id();
        let peer = simulate::peer_from_invite(&mut rand::thread_rng(), code, id.clone(), Utc::now());
        let message = format!("Successfully added {} to your network", peer.username);
        tracing::info!(peer = %id, "Redeemed invite code");
        self.dispatch(Action::AddPeer(peer));
        self.notify(message, Severity::Success);
        Some(id)
    }

    pub fn block_peer(&self, id: &str) {
        let Some(peer) = self.snapshot().peer(id).cloned() else {
            return;
        };
        self.dispatch(Action::BlockPeer(id.to_string()));
        self.notify(format!("Blocked {}", peer.username), Severity::Warning);
    }

    pub fn unblock_peer(&self, id: &str) {
        let Some(peer) = self.snapshot().peer(id).cloned() else {
            return;
        };
        self.dispatch(Action::UnblockPeer(id.to_string()));
        self.notify(format!("Unblocked {}", peer.username), Severity::Success);
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Start downloading from a `.torrent` file. Returns the transfer id.
    pub fn start_download(&self, file_name: &str) -> Option<String> {
        let file_name = file_name.trim();
        if !simulate::is_torrent_file(file_name) {
            self.notify("Invalid File: Please upload a .torrent file", Severity::Error);
            return None;
        }
        let state = self.snapshot();
        let transfer = simulate::torrent_transfer(
            &mut rand::thread_rng(),
            file_name,
            &state.transfers,
            Utc::now(),
        );
        let id = transfer.id.clone();
        let message = format!("Started downloading {}", transfer.name);
        tracing::info!(transfer = %id, name = %transfer.name, "Starting download");
        self.dispatch(Action::AddTransfer(transfer));
        self.notify(message, Severity::Success);
        Some(id)
    }

    /// Put a local file on the upload queue as a pending transfer
    pub fn queue_upload(&self, file: &FileMeta) -> String {
        let state = self.snapshot();
        let transfer =
            simulate::upload_transfer(&mut rand::thread_rng(), file, &state.transfers, Utc::now());
        let id = transfer.id.clone();
        self.dispatch(Action::AddTransfer(transfer));
        self.notify(
            format!("Added {} to upload queue", file.name),
            Severity::Success,
        );
        id
    }

    /// Drop a file from the upload queue. Only pending uploads can be removed.
    pub fn remove_queued_upload(&self, id: &str) -> bool {
        let Some(transfer) = self.snapshot().transfer(id).cloned() else {
            return false;
        };
        if transfer.status != TransferStatus::Pending {
            return false;
        }
        self.dispatch(Action::DeleteTransfer(id.to_string()));
        self.notify(
            format!("Removed {} from upload queue", transfer.name),
            Severity::Info,
        );
        true
    }

    /// Start every pending upload. Returns how many were started.
    pub fn upload_pending(&self) -> usize {
        let state = self.snapshot();
        let pending: Vec<_> = state
            .transfers
            .iter()
            .filter(|t| t.status == TransferStatus::Pending)
            .collect();
        for transfer in &pending {
            self.dispatch(Action::UpdateTransfer {
                id: transfer.id.clone(),
                changes: vec![
                    TransferUpdate::Status(TransferStatus::Uploading),
                    TransferUpdate::Progress(0.0),
                ],
            });
        }
        if pending.is_empty() {
            self.notify("No files waiting in the upload queue", Severity::Info);
        } else {
            self.notify(
                format!("Uploading {} file(s)", pending.len()),
                Severity::Info,
            );
        }
        pending.len()
    }

    /// Pause a running transfer or resume a paused one
    pub fn toggle_transfer(&self, id: &str) {
        let Some(transfer) = self.snapshot().transfer(id).cloned() else {
            return;
        };
        match transfer.status {
            TransferStatus::Downloading | TransferStatus::Uploading => {
                self.dispatch(Action::update_transfer(
                    id,
                    TransferUpdate::Status(TransferStatus::Paused),
                ));
                self.notify(format!("Paused {}", transfer.name), Severity::Info);
            }
            TransferStatus::Paused => {
                let resumed = transfer.kind.running_status();
                self.dispatch(Action::update_transfer(id, TransferUpdate::Status(resumed)));
                self.notify(format!("Resumed {}", transfer.name), Severity::Info);
            }
            _ => {}
        }
    }

    /// Restart a transfer from scratch in its original direction
    pub fn retry_transfer(&self, id: &str) {
        let Some(transfer) = self.snapshot().transfer(id).cloned() else {
            return;
        };
        self.dispatch(Action::UpdateTransfer {
            id: id.to_string(),
            changes: vec![
                TransferUpdate::Status(transfer.kind.running_status()),
                TransferUpdate::Progress(0.0),
            ],
        });
        self.notify(format!("Retrying {}", transfer.name), Severity::Info);
    }

    pub fn delete_transfer(&self, id: &str) {
        let Some(transfer) = self.snapshot().transfer(id).cloned() else {
            return;
        };
        self.dispatch(Action::DeleteTransfer(id.to_string()));
        self.notify(
            format!("Removed {} from history", transfer.name),
            Severity::Success,
        );
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn set_theme(&self, theme: Theme) {
        self.dispatch(Action::SetTheme(theme));
    }

    pub fn toggle_theme(&self) {
        let theme = self.snapshot().theme.toggled();
        self.set_theme(theme);
        self.notify(format!("Switched to {} theme", theme.as_str()), Severity::Info);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::actor::{ActorSettings, StoreActor, StoreHandle};
    use crate::app::state::AppState;
    use crate::app::store::Store;
    use crate::constants::NOTIFICATION_TTL;
    use crate::models::{Severity, Theme, TransferStatus};
    use crate::simulate::FileMeta;
    use std::time::Duration;

    fn spawn() -> StoreHandle {
        let settings = ActorSettings {
            notification_ttl: NOTIFICATION_TTL,
            simulation_tick: None,
        };
        StoreActor::spawn(Store::new(AppState::new(), None), settings).0
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_username_is_rejected() {
        let handle = spawn();
        let before = handle.snapshot().user.clone();
        assert!(!handle.save_username("   "));
        settle().await;

        let state = handle.snapshot();
        assert_eq!(state.user, before);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].severity, Severity::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_username_is_trimmed_and_saved() {
        let handle = spawn();
        assert!(handle.save_username("  Neo "));
        settle().await;
        assert_eq!(handle.snapshot().user.username, "Neo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_redeem_invite_code() {
        let handle = spawn();
        assert!(handle.redeem_invite_code("").is_none());
        let id = handle.redeem_invite_code("QWER-TYUI").unwrap();
        settle().await;

        let state = handle.snapshot();
        assert_eq!(state.peers[0].id, id);
        assert_eq!(state.peers[0].username, "User_QWER");
        let severities: Vec<_> = state.notifications.iter().map(|n| n.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Success]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_invites_add_two_peers() {
        let handle = spawn();
        let before = handle.snapshot().peers.len();
        let a = handle.redeem_invite_code("AAAA-1111").unwrap();
        let b = handle.redeem_invite_code("BBBB-2222").unwrap();
        assert_ne!(a, b);
        settle().await;

        let state = handle.snapshot();
        assert_eq!(state.peers.len(), before + 2);
        assert_eq!(state.peer(&a).unwrap().username, "User_AAAA");
        assert_eq!(state.peer(&b).unwrap().username, "User_BBBB");
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_and_unblock_peer() {
        let handle = spawn();
        handle.block_peer("peer1");
        settle().await;
        assert!(handle.snapshot().peer("peer1").unwrap().is_blocked);
        handle.unblock_peer("peer1");
        settle().await;
        assert!(!handle.snapshot().peer("peer1").unwrap().is_blocked);

        let notes = handle.snapshot().notifications.len();
        handle.block_peer("ghost");
        settle().await;
        assert_eq!(handle.snapshot().notifications.len(), notes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_download_requires_torrent() {
        let handle = spawn();
        assert!(handle.start_download("movie.mkv").is_none());
        let id = handle.start_download("movie.mkv.torrent").unwrap();
        settle().await;

        let state = handle.snapshot();
        let t = state.transfer(&id).unwrap();
        assert_eq!(t.name, "movie.mkv");
        assert_eq!(t.status, TransferStatus::Downloading);
        assert_eq!(state.transfers[0].id, id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_queue_flow() {
        let handle = spawn();
        let file = FileMeta {
            name: String::from("song.mp3"),
            size: 4_000_000,
            media_type: String::from("Audio"),
        };
        let id = handle.queue_upload(&file);
        settle().await;
        assert_eq!(handle.snapshot().transfer(&id).unwrap().status, TransferStatus::Pending);

        assert_eq!(handle.upload_pending(), 1);
        settle().await;
        assert_eq!(handle.snapshot().transfer(&id).unwrap().status, TransferStatus::Uploading);
        assert_eq!(handle.upload_pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_pause_and_resume() {
        let handle = spawn();
        // "2" is downloading at 67%
        handle.toggle_transfer("2");
        settle().await;
        assert_eq!(handle.snapshot().transfer("2").unwrap().status, TransferStatus::Paused);
        handle.toggle_transfer("2");
        settle().await;
        assert_eq!(handle.snapshot().transfer("2").unwrap().status, TransferStatus::Downloading);

        // Completed transfers are left alone
        handle.toggle_transfer("1");
        settle().await;
        assert_eq!(handle.snapshot().transfer("1").unwrap().status, TransferStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_upload_resumes_as_upload() {
        let handle = spawn();
        // "3" is uploading at 34%
        handle.toggle_transfer("3");
        settle().await;
        assert_eq!(handle.snapshot().transfer("3").unwrap().status, TransferStatus::Paused);
        handle.toggle_transfer("3");
        settle().await;
        assert_eq!(handle.snapshot().transfer("3").unwrap().status, TransferStatus::Uploading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_queued_upload_only_touches_pending() {
        let handle = spawn();
        let file = FileMeta {
            name: String::from("notes.txt"),
            size: 10,
            media_type: String::from("Document"),
        };
        let id = handle.queue_upload(&file);
        settle().await;

        assert!(!handle.remove_queued_upload("3"));
        assert!(handle.remove_queued_upload(&id));
        settle().await;
        let state = handle.snapshot();
        assert!(state.transfer(&id).is_none());
        assert!(state.transfer("3").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_and_delete() {
        let handle = spawn();
        handle.retry_transfer("4");
        settle().await;
        let t = handle.snapshot().transfer("4").cloned().unwrap();
        assert_eq!(t.status, TransferStatus::Downloading);
        assert_eq!(t.progress, 0.0);

        handle.delete_transfer("4");
        settle().await;
        assert!(handle.snapshot().transfer("4").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_theme() {
        let handle = spawn();
        handle.toggle_theme();
        settle().await;
        assert_eq!(handle.snapshot().theme, Theme::Light);
    }
}
