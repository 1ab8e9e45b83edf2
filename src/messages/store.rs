//! Store commands - communication between the UI layer and the store actor

use crate::messages::actions::Action;
use crate::models::{NotificationId, Severity};

/// Commands sent from the UI layer to the store actor
#[derive(Debug, Clone)]
pub enum StoreCommand {
    /// Run an action through the reducer
    Dispatch(Action),
    /// Show a notification and arm its expiry timer
    Notify {
        id: NotificationId,
        message: String,
        severity: Severity,
    },
    /// Remove a notification before it expires, cancelling its timer
    Dismiss(NotificationId),
    /// Cancel all timers and stop the actor
    Shutdown,
}

/// Fired by an expiry timer back into the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub id: NotificationId,
    pub generation: u64,
}
