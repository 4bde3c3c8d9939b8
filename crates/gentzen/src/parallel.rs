//! Pool-bounded parallel evaluation with short-circuiting
//!
//! `run_parallel` evaluates a boolean task over every element of a view on
//! worker threads. The pool caps how many workers run at once across one
//! whole proof attempt; once the combining operator's absorbing value is
//! observed no further task starts, though started tasks run to completion
//! and every worker is joined before the driver returns.
//!
//! A worker that itself drives a nested run lends its own slot back to the
//! pool while it blocks on its children, so recursion deeper than the cap
//! cannot deadlock the pool.

use crate::error::ViewError;
use crate::view::View;
use parking_lot::{Condvar, Mutex};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::trace;

/// How long an admission wait sleeps before re-polling cancellation
const WAKE_EVERY: Duration = Duration::from_millis(4000);

thread_local! {
    static HOLDS_SLOT: Cell<bool> = const { Cell::new(false) };
}

/// Combining mode of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Logical AND; a single `false` settles the run.
    All,
    /// Logical OR; a single `true` settles the run.
    Any,
}

impl Mode {
    /// The accumulator value that ends the run early
    pub fn absorbing(self) -> bool {
        matches!(self, Mode::Any)
    }
}

/// Worker admission shared by one proof attempt.
///
/// A cap of zero disables admission entirely.
pub struct Pool {
    cap: usize,
    live: Mutex<usize>,
    freed: Condvar,
    cancelled: AtomicBool,
}

impl Pool {
    pub fn new(cap: usize) -> Self {
        Pool { cap, live: Mutex::new(0), freed: Condvar::new(), cancelled: AtomicBool::new(false) }
    }

    pub fn unbounded() -> Self {
        Pool::new(0)
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Stop spawning new tasks everywhere; running tasks finish on their own.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.freed.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Block until a worker slot is free and take it. Returns `false` if
    /// cancellation arrived while waiting.
    fn admit(&self) -> bool {
        if self.cap == 0 {
            return !self.is_cancelled();
        }
        let mut live = self.live.lock();
        while *live >= self.cap {
            if self.is_cancelled() {
                return false;
            }
            let _ = self.freed.wait_for(&mut live, WAKE_EVERY);
        }
        *live += 1;
        true
    }

    fn release(&self) {
        if self.cap == 0 {
            return;
        }
        let mut live = self.live.lock();
        *live = live.saturating_sub(1);
        drop(live);
        self.freed.notify_one();
    }

    /// Give the calling worker's slot back while it blocks on children.
    fn lend(&self) -> bool {
        if self.cap == 0 || !HOLDS_SLOT.get() {
            return false;
        }
        self.release();
        true
    }

    /// Take the caller's slot back after its children have joined.
    fn reclaim(&self, lent: bool) {
        if !lent {
            return;
        }
        let mut live = self.live.lock();
        while *live >= self.cap && !self.is_cancelled() {
            let _ = self.freed.wait_for(&mut live, WAKE_EVERY);
        }
        *live += 1;
    }
}

/// Cancellation handle for embedders.
///
/// Clone one out of a sequent and call `cancel` from a signal handler or
/// watchdog; every driver sharing the pool stops spawning.
#[derive(Clone)]
pub struct CancelToken {
    pool: Arc<Pool>,
}

impl CancelToken {
    pub fn new(pool: Arc<Pool>) -> Self {
        CancelToken { pool }
    }

    pub fn cancel(&self) {
        self.pool.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.pool.is_cancelled()
    }
}

/// Evaluate `task` over every element of `view`, combining under `mode`.
///
/// The first task error is returned after all workers join; an error also
/// stops further spawning. On cancellation the accumulated value so far is
/// returned.
pub fn run_parallel<V, E, F>(view: &V, pool: &Pool, mode: Mode, task: F) -> Result<bool, E>
where
    V: View + ?Sized,
    E: From<ViewError> + Send,
    F: Fn(V::Item) -> Result<bool, E> + Sync,
{
    let absorbing = mode.absorbing();
    let outcome = AtomicBool::new(!absorbing);
    let first_error: Mutex<Option<E>> = Mutex::new(None);
    let lent = pool.lend();

    thread::scope(|scope| {
        for index in 0..view.len() {
            if outcome.load(Ordering::SeqCst) == absorbing || pool.is_cancelled() {
                trace!(index, "short-circuited, not spawning further tasks");
                break;
            }
            let item = match view.try_at(index) {
                Ok(item) => item,
                Err(error) => {
                    outcome.store(absorbing, Ordering::SeqCst);
                    first_error.lock().get_or_insert(E::from(error));
                    break;
                }
            };
            if !pool.admit() {
                break;
            }
            let outcome = &outcome;
            let first_error = &first_error;
            let task = &task;
            scope.spawn(move || {
                HOLDS_SLOT.set(true);
                match task(item) {
                    Ok(value) => match mode {
                        Mode::Any => {
                            outcome.fetch_or(value, Ordering::SeqCst);
                        }
                        Mode::All => {
                            outcome.fetch_and(value, Ordering::SeqCst);
                        }
                    },
                    Err(error) => {
                        outcome.store(absorbing, Ordering::SeqCst);
                        first_error.lock().get_or_insert(error);
                    }
                }
                HOLDS_SLOT.set(false);
                pool.release();
            });
        }
    });

    pool.reclaim(lent);

    if let Some(error) = first_error.into_inner() {
        return Err(error);
    }
    Ok(outcome.into_inner())
}
