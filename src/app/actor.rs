//! Store actor - serialises every state change and owns the notification timers

use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::app::state::AppState;
use crate::app::store::Store;
use crate::constants::{NOTIFICATION_TTL, SIMULATION_TICK};
use crate::messages::actions::{Action, TransferUpdate, UserUpdate};
use crate::messages::store::{Expired, StoreCommand};
use crate::models::{Notification, NotificationId, Severity, TransferKind};
use crate::simulate::{self, Advance};

/// Allocates ids from the wall clock in milliseconds, bumped so they never repeat
#[derive(Debug, Default)]
pub struct ClockIds {
    last: AtomicU64,
}

impl ClockIds {
    pub fn next(&self) -> u64 {
        self.next_at(Utc::now().timestamp_millis().max(0) as u64)
    }

    /// Id for something created at `now_ms`
    pub fn next_at(&self, now_ms: u64) -> u64 {
        let mut issued = now_ms;
        let _ = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = now_ms.max(last + 1);
                Some(issued)
            });
        issued
    }
}

/// Timing knobs of the actor
#[derive(Debug, Clone, Copy)]
pub struct ActorSettings {
    pub notification_ttl: Duration,
    /// `None` disables the transfer progress simulation
    pub simulation_tick: Option<Duration>,
}

impl Default for ActorSettings {
    fn default() -> Self {
        ActorSettings {
            notification_ttl: NOTIFICATION_TTL,
            simulation_tick: Some(SIMULATION_TICK),
        }
    }
}

/// Pending expiry of one notification
struct ExpiryTimer {
    generation: u64,
    cancel_tx: oneshot::Sender<()>,
}

/// Actor owning the store. All dispatches go through its message loop.
pub struct StoreActor {
    store: Store,
    settings: ActorSettings,
    timers: HashMap<NotificationId, ExpiryTimer>,
    next_generation: u64,
    ids: Arc<ClockIds>,
    expired_tx: mpsc::UnboundedSender<Expired>,
    expired_rx: mpsc::UnboundedReceiver<Expired>,
}

/// Cloneable entry point handed to the views
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
    snapshot_rx: watch::Receiver<Arc<AppState>>,
    ids: Arc<ClockIds>,
    peer_ids: Arc<ClockIds>,
}

impl StoreActor {
    pub fn new(store: Store, settings: ActorSettings) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        StoreActor {
            store,
            settings,
            timers: HashMap::new(),
            next_generation: 0,
            ids: Arc::new(ClockIds::default()),
            expired_tx,
            expired_rx,
        }
    }

    /// Start the actor on the current runtime
    pub fn spawn(store: Store, settings: ActorSettings) -> (StoreHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot_rx = store.subscribe();
        let actor = StoreActor::new(store, settings);
        let handle = StoreHandle {
            tx,
            snapshot_rx,
            ids: actor.ids.clone(),
            peer_ids: Arc::new(ClockIds::default()),
        };
        let task = tokio::spawn(actor.run(rx));
        (handle, task)
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<StoreCommand>) {
        let period = self.settings.simulation_tick.unwrap_or(Duration::from_secs(3600));
        let simulate = self.settings.simulation_tick.is_some();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(StoreCommand::Dispatch(action)) => self.dispatch(action),
                        Some(StoreCommand::Notify { id, message, severity }) => {
                            self.notify(id, message, severity)
                        }
                        Some(StoreCommand::Dismiss(id)) => {
                            self.dispatch(Action::RemoveNotification(id))
                        }
                        Some(StoreCommand::Shutdown) | None => {
                            for (_, timer) in self.timers.drain() {
                                let _ = timer.cancel_tx.send(());
                            }
                            tracing::info!("Store actor stopped");
                            break;
                        }
                    }
                }

                Some(expired) = self.expired_rx.recv() => self.expire(expired),

                _ = ticker.tick(), if simulate => self.advance_transfers(period),
            }
        }
    }

    /// Notifications added here get an expiry timer, removals cancel theirs
    fn dispatch(&mut self, action: Action) {
        let added = match &action {
            Action::AddNotification(notification) => Some(notification.id),
            Action::RemoveNotification(id) => {
                self.cancel_timer(*id);
                None
            }
            _ => None,
        };
        tracing::debug!(action = action.name(), "Dispatching");
        self.store.dispatch(action);
        if let Some(id) = added {
            self.arm_timer(id);
        }
    }

    fn notify(&mut self, id: NotificationId, message: String, severity: Severity) {
        tracing::info!(%id, ?severity, %message, "Notification");
        self.dispatch(Action::AddNotification(Notification {
            id,
            message,
            severity,
            created_at: Utc::now(),
        }));
    }

    /// Schedule removal of `id` after the TTL, replacing any earlier timer
    fn arm_timer(&mut self, id: NotificationId) {
        self.cancel_timer(id);
        self.next_generation += 1;
        let generation = self.next_generation;
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let expired_tx = self.expired_tx.clone();
        let ttl = self.settings.notification_ttl;

        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(ttl) => {
                    let _ = expired_tx.send(Expired { id, generation });
                }
                _ = cancel_rx => {}
            }
        });
        self.timers.insert(
            id,
            ExpiryTimer {
                generation,
                cancel_tx,
            },
        );
    }

    fn cancel_timer(&mut self, id: NotificationId) {
        if let Some(timer) = self.timers.remove(&id) {
            tracing::debug!(%id, "Cancelling notification timer");
            let _ = timer.cancel_tx.send(());
        }
    }

    fn expire(&mut self, expired: Expired) {
        match self.timers.get(&expired.id) {
            Some(timer) if timer.generation == expired.generation => {
                self.timers.remove(&expired.id);
                self.store.dispatch(Action::RemoveNotification(expired.id));
            }
            _ => tracing::debug!(id = %expired.id, "Dropping stale expiry"),
        }
    }

    /// One step of the progress simulation
    fn advance_transfers(&mut self, elapsed: Duration) {
        let state = self.store.state();
        for transfer in &state.transfers {
            match simulate::advance(transfer, elapsed) {
                Some(Advance::Progress(progress)) => {
                    self.store.dispatch(Action::update_transfer(
                        transfer.id.clone(),
                        TransferUpdate::Progress(progress),
                    ));
                }
                Some(Advance::Finished) => {
                    self.store.dispatch(Action::UpdateTransfer {
                        id: transfer.id.clone(),
                        changes: simulate::finish_changes(transfer),
                    });
                    let (counter, message) = if transfer.kind == TransferKind::Download {
                        (UserUpdate::AddDownloaded(1), format!("Finished downloading {}", transfer.name))
                    } else {
                        (UserUpdate::AddShared(1), format!("Successfully uploaded {}", transfer.name))
                    };
                    self.store.dispatch(Action::UpdateUser(vec![counter]));
                    let id = NotificationId(self.ids.next());
                    self.notify(id, message, Severity::Success);
                }
                None => {}
            }
        }
    }
}

impl StoreHandle {
    /// Queue an action for the reducer
    pub fn dispatch(&self, action: Action) {
        let _ = self.tx.send(StoreCommand::Dispatch(action));
    }

    /// Show a notification. The returned id can be passed to [`dismiss`]
    /// to remove it early and cancel its expiry.
    ///
    /// [`dismiss`]: StoreHandle::dismiss
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId(self.ids.next());
        let _ = self.tx.send(StoreCommand::Notify {
            id,
            message: message.into(),
            severity,
        });
        id
    }

    /// Fresh `peer_<millis>` id, unique for the lifetime of this handle's clones
    pub fn next_peer_id(&self) -> String {
        format!("peer_{}", self.peer_ids.next())
    }

    pub fn dismiss(&self, id: NotificationId) {
        let _ = self.tx.send(StoreCommand::Dismiss(id));
    }

    /// The most recent snapshot
    pub fn snapshot(&self) -> Arc<AppState> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshot_rx.clone()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(StoreCommand::Shutdown);
    }
}
