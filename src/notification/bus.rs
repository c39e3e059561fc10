//! In-process notification bus simulating a real-time push feed.
//!
//! The bus has two states, disconnected and connected. While connected a
//! single ticker task runs on the ambient tokio runtime; on every tick it
//! rolls a probability gate and, on success, synthesizes a notification
//! from the [`Catalog`] and delivers it to every registered listener.
//!
//! Delivery is synchronous and in registration order. There is no replay:
//! a listener registered after an emission never sees it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::catalog::Catalog;
use crate::errors::AppError;
use crate::models::notification::{Notification, Severity};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_EMIT_PROBABILITY: f64 = 0.3;

/// Callback invoked with every delivered notification.
pub type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
pub struct BusConfig {
    pub tick_interval: Duration,
    /// Chance in `[0, 1]` that a tick produces a notification.
    pub emit_probability: f64,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub catalog: Catalog,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            emit_probability: DEFAULT_EMIT_PROBABILITY,
            seed: None,
            catalog: Catalog::default(),
        }
    }
}

impl BusConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0..=1.0).contains(&self.emit_probability) {
            return Err(AppError::InvalidProbability(self.emit_probability));
        }
        if self.tick_interval.is_zero() {
            return Err(AppError::InvalidInterval);
        }
        self.catalog.validate()
    }
}

/// Build a synthetic notification: uniform severity, uniform obra, and a
/// uniform message from the pool matching the severity.
///
/// Returns `None` only if a pool in `catalog` is empty.
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R, catalog: &Catalog) -> Option<Notification> {
    let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];
    let entity = catalog.entities.choose(rng)?;
    let message = catalog.messages.for_severity(severity).choose(rng)?;

    Some(Notification {
        id: format!("sim-{}", uuid::Uuid::new_v4()),
        obra_id: entity.id.clone(),
        obra_name: entity.name.clone(),
        severity,
        title: severity.title().to_string(),
        message: message.clone(),
        timestamp: Utc::now(),
        read: false,
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Listeners run outside every lock, so a poisoned guard only means a
    // panic elsewhere; the protected data is still consistent.
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

struct Inner {
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    ticker: Mutex<Option<JoinHandle<()>>>,
    /// Bumped on every connect/disconnect; a ticker whose generation is
    /// stale stops before emitting.
    generation: AtomicU64,
    rng: Mutex<StdRng>,
    config: BusConfig,
}

impl Inner {
    fn deliver(&self, notification: &Notification) -> usize {
        // Snapshot so callbacks may (un)subscribe without touching the
        // collection being iterated.
        let snapshot: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(notification);
        }
        snapshot.len()
    }

    fn tick(&self) -> Option<Notification> {
        let notification = {
            let mut rng = lock(&self.rng);
            if !rng.gen_bool(self.config.emit_probability) {
                return None;
            }
            synthesize(&mut *rng, &self.config.catalog)?
        };

        let delivered = self.deliver(&notification);
        debug!(
            id = %notification.id,
            severity = %notification.severity,
            obra_id = %notification.obra_id,
            listeners = delivered,
            "bus: simulated notification"
        );
        Some(notification)
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        match listeners.iter().position(|(lid, _)| *lid == id) {
            Some(index) => {
                listeners.remove(index);
                debug!(total = listeners.len(), "bus: listener removed");
                true
            }
            None => false,
        }
    }
}

fn spawn_ticker(inner: Weak<Inner>, period: Duration, generation: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(inner) = inner.upgrade() else {
                break;
            };
            if inner.generation.load(Ordering::SeqCst) != generation {
                break;
            }
            inner.tick();
        }
    })
}

/// Handle returned by [`NotificationBus::subscribe`].
///
/// Dropping it does not unsubscribe; call [`Subscription::unsubscribe`]
/// during teardown.
pub struct Subscription {
    id: ListenerId,
    bus: Weak<Inner>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove this registration and only this one. Further calls, or calls
    /// after the bus is gone, do nothing.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Simulated real-time notification feed. Owned by the composition root;
/// wrap in an `Arc` to share between consumers.
pub struct NotificationBus {
    inner: Arc<Inner>,
}

impl NotificationBus {
    pub fn new(config: BusConfig) -> Result<Self, AppError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            inner: Arc::new(Inner {
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                ticker: Mutex::new(None),
                generation: AtomicU64::new(0),
                rng: Mutex::new(rng),
                config,
            }),
        })
    }

    /// Start the ticker. A no-op when already connected.
    ///
    /// Must be called from within a tokio runtime; without one the bus
    /// logs a warning and stays disconnected.
    pub fn connect(&self) {
        let mut ticker = lock(&self.inner.ticker);
        if matches!(&*ticker, Some(handle) if !handle.is_finished()) {
            debug!("bus: already connected, ignoring connect");
            return;
        }
        // A finished handle means the runtime that drove the ticker is gone.
        if ticker.take().is_some() {
            debug!("bus: previous ticker ended, reconnecting");
        }
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("bus: no tokio runtime available, staying disconnected");
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let period = self.inner.config.tick_interval;
        *ticker = Some(spawn_ticker(Arc::downgrade(&self.inner), period, generation));

        info!(
            tick_secs = period.as_secs_f64(),
            probability = self.inner.config.emit_probability,
            "bus: connected"
        );
    }

    /// Stop the ticker. No timer-driven emission starts after this returns.
    pub fn disconnect(&self) {
        let handle = {
            let mut ticker = lock(&self.inner.ticker);
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            ticker.take()
        };

        match handle {
            Some(handle) => {
                handle.abort();
                info!("bus: disconnected");
            }
            None => debug!("bus: already disconnected"),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(&*lock(&self.inner.ticker), Some(handle) if !handle.is_finished())
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        let total = {
            let mut listeners = lock(&self.inner.listeners);
            listeners.push((id, Arc::new(callback)));
            listeners.len()
        };
        debug!(listener = id.0, total, "bus: listener added");

        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    pub fn clear_all_listeners(&self) {
        lock(&self.inner.listeners).clear();
        debug!("bus: all listeners removed");
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Deliver `notification` to every current listener right away,
    /// bypassing the timer. Returns the number of listeners reached.
    pub fn emit(&self, notification: &Notification) -> usize {
        self.inner.deliver(notification)
    }

    /// Run one probability-gated tick immediately, as the ticker would.
    pub fn tick(&self) -> Option<Notification> {
        self.inner.tick()
    }

    /// Disconnect and drop every listener.
    pub fn dispose(&self) {
        self.disconnect();
        self.clear_all_listeners();
    }
}

impl Drop for NotificationBus {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.inner.ticker).take() {
            handle.abort();
        }
    }
}
