//! Location-driven query coordination.
//!
//! A [`NearbyCoordinator`] owns two queries keyed by the current location:
//! nearby spaces and the reverse-geocoded address. Both start together as
//! soon as a location is known and land in separate slots of the published
//! [`NearbySnapshot`], so either can be shown while the other is pending or
//! failed.
//!
//! Every location change bumps a generation counter under the snapshot
//! lock. A fetch only writes its result if the generation it started with is
//! still current and the coordinator has not been disposed.
//!
//! Each slot also tickets its fetches. Starting one aborts the fetch already
//! in flight for that slot, and only the latest ticket may settle it.

use crate::location::LocationFeed;
use crate::query::{QueryError, QueryKind, QueryState};
use crate::source::NearbySource;
use spaces_api_client::models::{Address, Space};
use spaces_api_client::SpacesNearQuery;
use spaces_core::config::NearbyConfig;
use spaces_geo::Location;
use spaces_telemetry::{record_fetch, FetchOutcome, Timer};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, instrument};

/// Parameters sent with the nearby-spaces query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    pub search_radius_m: f64,
    /// Sent as `count`; the server enforces it
    pub result_cap: Option<u32>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::from(&NearbyConfig::default())
    }
}

impl From<&NearbyConfig> for CoordinatorConfig {
    fn from(config: &NearbyConfig) -> Self {
        Self {
            search_radius_m: config.search_radius_m,
            result_cap: config.result_cap,
        }
    }
}

/// Everything the map screen renders from
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NearbySnapshot {
    pub location: Option<Location>,
    pub spaces: QueryState<Vec<Space>>,
    pub address: QueryState<Address>,
    /// True while at least one [`NearbyCoordinator::refresh_all`] is unsettled
    pub is_refreshing: bool,
}

/// How one query of a refresh ended
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Succeeded,
    Failed(QueryError),
    /// No location, or the coordinator was disposed
    Skipped,
    /// The location changed before the result arrived
    Superseded,
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Per-query result of [`NearbyCoordinator::refresh_all`]
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub spaces: RefreshOutcome,
    pub address: RefreshOutcome,
}

impl RefreshReport {
    fn skipped() -> Self {
        Self {
            spaces: RefreshOutcome::Skipped,
            address: RefreshOutcome::Skipped,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.spaces.is_success() && self.address.is_success()
    }

    pub fn all_failed(&self) -> bool {
        self.spaces.error().is_some() && self.address.error().is_some()
    }
}

struct Inner<S> {
    source: S,
    config: CoordinatorConfig,
    state: watch::Sender<NearbySnapshot>,
    generation: AtomicU64,
    refreshing: AtomicUsize,
    disposed: AtomicBool,
    spaces_task: SlotTask,
    address_task: SlotTask,
    follower: Mutex<Option<AbortHandle>>,
}

/// Latest fetch started for one slot
#[derive(Default)]
struct SlotTask {
    ticket: AtomicU64,
    handle: Mutex<Option<AbortHandle>>,
}

impl SlotTask {
    fn abort(&self) {
        if let Some(handle) = lock(&self.handle).take() {
            handle.abort();
        }
    }
}

/// Drives the spaces and address queries from the current location.
///
/// Cloning is cheap and every clone controls the same state. Call
/// [`dispose`](Self::dispose) when the owning screen goes away.
pub struct NearbyCoordinator<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for NearbyCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: NearbySource> NearbyCoordinator<S> {
    pub fn new(source: S, config: CoordinatorConfig) -> Self {
        let (state, _) = watch::channel(NearbySnapshot::default());
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                state,
                generation: AtomicU64::new(0),
                refreshing: AtomicUsize::new(0),
                disposed: AtomicBool::new(false),
                spaces_task: SlotTask::default(),
                address_task: SlotTask::default(),
                follower: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// Current snapshot
    pub fn snapshot(&self) -> NearbySnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every snapshot change
    pub fn subscribe(&self) -> watch::Receiver<NearbySnapshot> {
        self.inner.state.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.load(Ordering::SeqCst) > 0
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Switches the query key.
    ///
    /// A different location invalidates both slots, aborts in-flight
    /// fetches and, when `Some`, starts both queries again. Setting the
    /// current location again is a no-op. Must be called from within a
    /// Tokio runtime.
    #[instrument(skip(self))]
    pub fn set_location(&self, location: Option<Location>) {
        if self.is_disposed() {
            return;
        }

        let mut generation = None;
        self.inner.state.send_if_modified(|snapshot| {
            if snapshot.location == location {
                return false;
            }
            generation = Some(self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1);
            snapshot.location = location;
            snapshot.spaces = QueryState::default();
            snapshot.address = QueryState::default();
            true
        });

        let Some(generation) = generation else {
            return;
        };
        self.inner.abort_tasks();
        debug!(generation, "location changed");

        if let Some(location) = location {
            self.inner.spawn_spaces(generation, location);
            self.inner.spawn_address(generation, location);
        }
    }

    /// Applies every reading from `feed`, starting with the current one.
    ///
    /// Replaces any feed followed before.
    pub fn follow(&self, mut feed: LocationFeed) {
        self.set_location(feed.current().location);

        let this = self.clone();
        let handle = tokio::spawn(async move {
            while let Some(reading) = feed.changed().await {
                if this.is_disposed() {
                    break;
                }
                this.set_location(reading.location);
            }
        });

        if let Some(previous) = lock(&self.inner.follower).replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    /// Refetches nearby spaces for the current location, replacing any
    /// spaces fetch still in flight.
    pub async fn refetch_spaces(&self) -> RefreshOutcome {
        match self.inner.current_key() {
            Some((generation, location)) => join(self.inner.spawn_spaces(generation, location)).await,
            None => RefreshOutcome::Skipped,
        }
    }

    /// Refetches the address for the current location, replacing any
    /// address fetch still in flight.
    pub async fn refetch_address(&self) -> RefreshOutcome {
        match self.inner.current_key() {
            Some((generation, location)) => join(self.inner.spawn_address(generation, location)).await,
            None => RefreshOutcome::Skipped,
        }
    }

    /// Refetches both queries concurrently and waits until both settle.
    ///
    /// Fetches already in flight are replaced, and a later refresh replaces
    /// this one's, so an overlapped refresh reports
    /// [`RefreshOutcome::Superseded`].
    ///
    /// Never fails: each query's outcome is reported separately. Without a
    /// location both are [`RefreshOutcome::Skipped`] and the refreshing
    /// flag is left alone.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> RefreshReport {
        let Some((generation, location)) = self.inner.current_key() else {
            return RefreshReport::skipped();
        };

        let _refreshing = RefreshGuard::enter(Arc::clone(&self.inner));
        let spaces = self.inner.spawn_spaces(generation, location);
        let address = self.inner.spawn_address(generation, location);
        let (spaces, address) = tokio::join!(join(spaces), join(address));

        debug!(?spaces, ?address, "refresh settled");
        RefreshReport { spaces, address }
    }

    /// Stops following the feed, aborts in-flight fetches and discards any
    /// result still on its way. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(follower) = lock(&self.inner.follower).take() {
            follower.abort();
        }
        self.inner.abort_tasks();
        self.inner.state.send_if_modified(|snapshot| {
            let spaces = snapshot.spaces.cancel();
            let address = snapshot.address.cancel();
            spaces || address
        });
        debug!("nearby coordinator disposed");
    }
}

impl<S: NearbySource> Inner<S> {
    /// Generation and location read under the same lock
    fn current_key(&self) -> Option<(u64, Location)> {
        if self.disposed.load(Ordering::SeqCst) {
            return None;
        }
        let snapshot = self.state.borrow();
        let location = snapshot.location?;
        Some((self.generation.load(Ordering::SeqCst), location))
    }

    fn slot_task(&self, kind: QueryKind) -> &SlotTask {
        match kind {
            QueryKind::Spaces => &self.spaces_task,
            QueryKind::Address => &self.address_task,
        }
    }

    fn spawn_spaces(self: &Arc<Self>, generation: u64, location: Location) -> JoinHandle<RefreshOutcome> {
        let query = SpacesNearQuery::new(location)
            .with_radius(self.config.search_radius_m)
            .with_count(self.config.result_cap);
        let this = Arc::clone(self);
        self.spawn_fetch(
            generation,
            QueryKind::Spaces,
            |s| &mut s.spaces,
            async move { this.source.spaces_near(query).await },
        )
    }

    fn spawn_address(self: &Arc<Self>, generation: u64, location: Location) -> JoinHandle<RefreshOutcome> {
        let this = Arc::clone(self);
        self.spawn_fetch(
            generation,
            QueryKind::Address,
            |s| &mut s.address,
            async move { this.source.address_of(location).await },
        )
    }

    fn spawn_fetch<T, F>(
        self: &Arc<Self>,
        generation: u64,
        kind: QueryKind,
        slot: fn(&mut NearbySnapshot) -> &mut QueryState<T>,
        fetch: F,
    ) -> JoinHandle<RefreshOutcome>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let task = self.slot_task(kind);
        let ticket = task.ticket.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.send_if_modified(|snapshot| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            slot(snapshot).begin();
            true
        });

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let timer = Timer::start(kind.timer_name());
            let result = fetch.await;
            timer.stop();
            this.settle(generation, ticket, kind, slot, result)
        });

        if let Some(previous) = lock(&task.handle).replace(handle.abort_handle()) {
            previous.abort();
        }
        handle
    }

    fn settle<T>(
        &self,
        generation: u64,
        ticket: u64,
        kind: QueryKind,
        slot: fn(&mut NearbySnapshot) -> &mut QueryState<T>,
        result: Result<T, QueryError>,
    ) -> RefreshOutcome {
        let outcome = match &result {
            Ok(_) => RefreshOutcome::Succeeded,
            Err(err) => RefreshOutcome::Failed(err.clone()),
        };

        let applied = self.state.send_if_modified(|snapshot| {
            let current = !self.disposed.load(Ordering::SeqCst)
                && self.generation.load(Ordering::SeqCst) == generation
                && self.slot_task(kind).ticket.load(Ordering::SeqCst) == ticket;
            if current {
                slot(snapshot).settle(result);
            }
            current
        });

        if !applied {
            debug!(query = %kind, generation, ticket, "discarding stale result");
            record_fetch(kind.as_str(), FetchOutcome::Stale);
            return RefreshOutcome::Superseded;
        }

        match &outcome {
            RefreshOutcome::Failed(err) => {
                debug!(query = %kind, error = %err, "query failed");
                record_fetch(kind.as_str(), FetchOutcome::Failure);
            }
            _ => record_fetch(kind.as_str(), FetchOutcome::Success),
        }
        outcome
    }

    fn abort_tasks(&self) {
        self.spaces_task.abort();
        self.address_task.abort();
    }
}

/// Holds the refreshing flag up for one `refresh_all`
struct RefreshGuard<S> {
    inner: Arc<Inner<S>>,
}

impl<S> RefreshGuard<S> {
    fn enter(inner: Arc<Inner<S>>) -> Self {
        inner.state.send_modify(|snapshot| {
            inner.refreshing.fetch_add(1, Ordering::SeqCst);
            snapshot.is_refreshing = true;
        });
        Self { inner }
    }
}

impl<S> Drop for RefreshGuard<S> {
    fn drop(&mut self) {
        let inner = &self.inner;
        inner.state.send_modify(|snapshot| {
            let remaining = inner.refreshing.fetch_sub(1, Ordering::SeqCst) - 1;
            snapshot.is_refreshing = remaining > 0;
        });
    }
}

/// Aborted or panicked fetches count as superseded
async fn join(handle: JoinHandle<RefreshOutcome>) -> RefreshOutcome {
    handle.await.unwrap_or(RefreshOutcome::Superseded)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
