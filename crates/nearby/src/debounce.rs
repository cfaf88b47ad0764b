//! Trailing debounce.
//!
//! Every [`Debouncer::call`] supersedes the pending one; the wrapped function
//! runs once the delay has passed with no further calls, with the arguments
//! of the last call. There is no leading-edge call and no maximum wait.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Default)]
struct State {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Delay-and-coalesce wrapper around `f`.
///
/// At most one timer is pending per instance. Dropping the debouncer cancels
/// the pending call.
pub struct Debouncer<T> {
    f: Arc<dyn Fn(T) + Send + Sync>,
    delay: Duration,
    state: Arc<Mutex<State>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            delay,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `f(args)` after the delay, replacing any pending call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn call(&self, args: T) {
        let mut state = lock(&self.state);
        state.generation += 1;
        let generation = state.generation;
        if let Some(previous) = state.pending.take() {
            previous.abort();
            trace!(generation, "debounced call superseded");
        }

        let f = Arc::clone(&self.f);
        let shared = Arc::clone(&self.state);
        let delay = self.delay;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = lock(&shared);
                if state.generation != generation {
                    return;
                }
                state.pending = None;
            }
            f(args);
        }));
    }

    /// Drops the pending call, if any.
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
