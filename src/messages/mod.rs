//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI layer and the store actor.

pub mod actions;
pub mod store;
pub mod ui_events;

pub use actions::{Action, PeerUpdate, TransferUpdate, UserUpdate};
pub use store::StoreCommand;
pub use ui_events::UiEvent;
