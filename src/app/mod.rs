//! App layer - central state management and command processing
//!
//! The store actor receives actions and notifications from the views,
//! runs them through the reducer and broadcasts the resulting snapshot.

pub mod state;
pub mod store;
pub mod actor;
pub mod commands;

pub use state::AppState;
pub use store::Store;
pub use actor::{ActorSettings, StoreActor, StoreHandle};
