//! View controller - local UI state and the mapping from UI events to store commands

use std::collections::BTreeSet;
use std::path::Path;

use crate::app::{AppState, StoreHandle};
use crate::messages::ui_events::{InputMode, Page, UiEvent};
use crate::models::{Peer, Severity, Transfer, TransferKind, TransferStatus};
use crate::query::{LeaderboardQuery, PeerPartitions, TransferQuery};
use crate::simulate::FileMeta;

/// State that belongs to the terminal session rather than the store
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ViewState {
    pub page: Page,
    pub input_mode: InputMode,
    pub input: String,
    /// Highlighted row of the current page's list
    pub selected: usize,
    pub history: TransferQuery,
    pub leaderboard: LeaderboardQuery,
    /// Last invite code generated on the network page
    pub invite_code: Option<String>,
    /// Finished uploads hidden from the upload page; history still lists them
    pub cleared_uploads: BTreeSet<String>,
    pub show_help: bool,
}

impl ViewState {
    /// Apply one UI event. Returns `false` once the user asked to quit.
    pub fn handle(&mut self, event: UiEvent, store: &StoreHandle) -> bool {
        let state = store.snapshot();
        match event {
            UiEvent::Quit => return false,

            // Navigation
            UiEvent::SwitchPage(page) => self.switch_to(page),
            UiEvent::NextPage => self.switch_to(self.page.next()),
            UiEvent::PrevPage => self.switch_to(self.page.prev()),
            UiEvent::SelectNext => {
                let rows = self.row_count(&state);
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
            }
            UiEvent::SelectPrev => self.selected = self.selected.saturating_sub(1),

            // Text input
            UiEvent::StartInput => {
                self.input = match self.page {
                    Page::Profile => state.user.username.clone(),
                    Page::History => self.history.search.clone(),
                    Page::Leaderboard => self.leaderboard.search.clone(),
                    _ => String::new(),
                };
                self.input_mode = InputMode::Editing;
            }
            UiEvent::CharInput(c) => {
                self.input.push(c);
                self.sync_search();
            }
            UiEvent::Backspace => {
                self.input.pop();
                self.sync_search();
            }
            UiEvent::SubmitInput => self.submit(store),
            UiEvent::CancelInput => {
                self.input.clear();
                self.sync_search();
                self.input_mode = InputMode::Normal;
            }

            // Transfers
            UiEvent::ToggleTransfer => {
                if let Some(id) = self.selected_transfer(&state).map(|t| t.id.clone()) {
                    store.toggle_transfer(&id);
                }
            }
            UiEvent::RetryTransfer => {
                if let Some(t) = self.selected_transfer(&state) {
                    if t.status == TransferStatus::Failed {
                        store.retry_transfer(&t.id);
                    }
                }
            }
            UiEvent::DeleteTransfer => {
                if let Some(id) = self.selected_transfer(&state).map(|t| t.id.clone()) {
                    let removed = if self.page == Page::Upload {
                        store.remove_queued_upload(&id)
                    } else {
                        store.delete_transfer(&id);
                        true
                    };
                    if removed {
                        self.selected = self.selected.saturating_sub(1);
                    }
                }
            }
            UiEvent::UploadAll => {
                store.upload_pending();
            }
            UiEvent::ClearFinished => {
                let finished: Vec<String> = self
                    .transfer_rows(&state)
                    .iter()
                    .filter(|t| t.kind == TransferKind::Upload && t.is_finished())
                    .map(|t| t.id.clone())
                    .collect();
                if !finished.is_empty() {
                    store.notify(
                        format!("Cleared {} finished upload(s)", finished.len()),
                        Severity::Info,
                    );
                }
                self.cleared_uploads.extend(finished);
                self.selected = 0;
            }

            // Peers
            UiEvent::GenerateInvite => self.invite_code = Some(store.generate_invite_code()),
            UiEvent::ToggleBlock => {
                if let Some(peer) = self.selected_peer(&state) {
                    if peer.is_blocked {
                        store.unblock_peer(&peer.id);
                    } else {
                        store.block_peer(&peer.id);
                    }
                }
            }

            // Filters
            UiEvent::CycleFilter => {
                match self.page {
                    Page::History => self.history.cycle_status(),
                    Page::Leaderboard => {
                        self.leaderboard.category = self.leaderboard.category.next()
                    }
                    _ => {}
                }
                self.selected = 0;
            }
            UiEvent::CycleSort => {
                let field = self.history.sort_by.next();
                self.history.sort(field);
            }
            UiEvent::ToggleSortOrder => self.history.order = self.history.order.flipped(),

            UiEvent::DismissNotification => {
                if let Some(note) = state.notifications.last() {
                    store.dismiss(note.id);
                }
            }
            UiEvent::ToggleTheme => store.toggle_theme(),

            UiEvent::ToggleHelp => self.show_help = !self.show_help,
            UiEvent::CloseHelp => self.show_help = false,
        }
        true
    }

    fn switch_to(&mut self, page: Page) {
        if self.page != page {
            tracing::debug!(?page, "Switching page");
        }
        self.page = page;
        self.selected = 0;
        self.input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Search pages filter live while typing
    fn sync_search(&mut self) {
        match self.page {
            Page::History => self.history.search = self.input.clone(),
            Page::Leaderboard => self.leaderboard.search = self.input.clone(),
            _ => {}
        }
    }

    fn submit(&mut self, store: &StoreHandle) {
        let accepted = match self.page {
            Page::Download => store.start_download(&self.input).is_some(),
            Page::Upload => self.queue_file(store),
            Page::Network => store.redeem_invite_code(&self.input).is_some(),
            Page::Profile => store.save_username(&self.input),
            Page::History | Page::Leaderboard => {
                self.input_mode = InputMode::Normal;
                self.selected = 0;
                return;
            }
            Page::Home => true,
        };
        // Rejected input stays in the field so it can be corrected
        if accepted {
            self.input.clear();
            self.input_mode = InputMode::Normal;
        }
    }

    fn queue_file(&self, store: &StoreHandle) -> bool {
        let path = self.input.trim();
        if path.is_empty() {
            store.notify("Please enter a file path", Severity::Error);
            return false;
        }
        match FileMeta::from_path(Path::new(path)) {
            Ok(file) => {
                store.queue_upload(&file);
                true
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Cannot queue upload");
                store.notify(format!("Could not add file: {e}"), Severity::Error);
                false
            }
        }
    }

    /// Transfers listed on the current page, in display order
    pub fn transfer_rows<'a>(&self, state: &'a AppState) -> Vec<&'a Transfer> {
        match self.page {
            Page::Download => state
                .transfers
                .iter()
                .filter(|t| {
                    t.kind == TransferKind::Download
                        && matches!(t.status, TransferStatus::Downloading | TransferStatus::Paused)
                })
                .collect(),
            Page::Upload => state
                .transfers
                .iter()
                .filter(|t| {
                    t.kind == TransferKind::Upload
                        && matches!(
                            t.status,
                            TransferStatus::Pending | TransferStatus::Uploading | TransferStatus::Paused
                        )
                        && !self.cleared_uploads.contains(&t.id)
                })
                .collect(),
            Page::History => self.history.apply(&state.transfers),
            _ => Vec::new(),
        }
    }

    /// Peers listed on the network page: online, offline, then blocked
    pub fn peer_rows<'a>(&self, state: &'a AppState) -> Vec<&'a Peer> {
        PeerPartitions::of(&state.peers).ordered()
    }

    fn row_count(&self, state: &AppState) -> usize {
        match self.page {
            Page::Network => state.peers.len(),
            Page::Leaderboard => self.leaderboard.apply(&crate::mock::leaderboard()).len(),
            _ => self.transfer_rows(state).len(),
        }
    }

    fn selected_transfer<'a>(&self, state: &'a AppState) -> Option<&'a Transfer> {
        self.transfer_rows(state).get(self.selected).copied()
    }

    fn selected_peer<'a>(&self, state: &'a AppState) -> Option<&'a Peer> {
        if self.page != Page::Network {
            return None;
        }
        self.peer_rows(state).get(self.selected).copied()
    }
}
