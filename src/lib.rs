//! # Torrentium TUI
//!
//! A terminal front-end for a simulated peer-to-peer file sharing network.
//!
//! ## Features
//! - Shared app state with a pure reducer
//! - Auto-expiring toast notifications
//! - Simulated downloads and uploads with live progress
//! - Private network invites and peer blocking
//! - Transfer history with search, filters and sorting
//! - Leaderboard and profile pages
//! - Light and dark themes
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous rendering of store snapshots
//! - Store Actor (Tokio) - reducer, notification timers, progress ticker
//! - Preference cache - user profile persisted as JSON

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod mock;
pub mod models;
pub mod query;
pub mod simulate;
pub mod storage;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use app::{ActorSettings, AppState, Store, StoreActor, StoreHandle};
pub use config::Config;
pub use messages::{Action, StoreCommand, UiEvent};
pub use models::{Notification, NotificationId, Peer, Severity, Theme, Transfer, TransferStatus, User};
pub use storage::PreferenceCache;
pub use view::ViewState;
