//! Periodic age-based eviction.
//!
//! # Responsibility
//! - Run one sweep per timer tick against a `Sweep` target.
//! - Guarantee that at most one sweep executes at a time.
//!
//! # Invariants
//! - A tick that fires while a sweep is running is skipped, not queued.
//! - Skipping a tick never stops the loop; it runs until the runtime shuts down.
//! - The busy flag is cleared when a sweep ends, including by panic.

use crate::store::quote_store::{QuoteRepository, QuoteStore};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);
/// Shortest timer period the loop will run with.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Target of a periodic sweep.
pub trait Sweep: Send + Sync + 'static {
    /// Removes entries older than `max_age` and returns how many were removed.
    fn sweep(&self, max_age: Duration) -> usize;
}

impl Sweep for QuoteStore {
    fn sweep(&self, max_age: Duration) -> usize {
        self.delete_older_than(max_age)
    }
}

/// Timer settings for the evictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictorConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// Entries older than this are removed on each sweep.
    pub max_age: Duration,
}

impl Default for EvictorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// Result of one timer tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A sweep was started; the handle yields the number of removed entries.
    Started(JoinHandle<usize>),
    /// A previous sweep was still running.
    Skipped,
}

/// Non-overlapping periodic sweeper.
pub struct Evictor<S: Sweep> {
    target: Arc<S>,
    config: EvictorConfig,
    busy: Arc<AtomicBool>,
}

impl<S: Sweep> Evictor<S> {
    pub fn new(target: Arc<S>, config: EvictorConfig) -> Self {
        Self {
            target,
            config,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns whether a sweep is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts a sweep on the blocking pool unless one is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn tick(&self) -> TickOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("event=evictor_tick module=evictor status=skipped reason=sweep_in_progress");
            return TickOutcome::Skipped;
        }

        let guard = BusyGuard(self.busy.clone());
        let target = self.target.clone();
        let max_age = self.config.max_age;
        TickOutcome::Started(tokio::task::spawn_blocking(move || {
            let _guard = guard;
            target.sweep(max_age)
        }))
    }

    /// Spawns the timer loop on the current runtime.
    ///
    /// The first sweep happens one full interval after spawning. Intervals
    /// shorter than `MIN_SWEEP_INTERVAL` are raised to it.
    pub fn spawn(self) -> JoinHandle<()> {
        let period = self.config.interval.max(MIN_SWEEP_INTERVAL);
        info!(
            "event=evictor_start module=evictor status=ok interval_ms={} max_age_secs={}",
            period.as_millis(),
            self.config.max_age.as_secs()
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let TickOutcome::Started(handle) = self.tick() {
                    tokio::spawn(async move {
                        match handle.await {
                            Ok(removed) => debug!(
                                "event=evictor_sweep module=evictor status=ok removed={removed}"
                            ),
                            Err(err) => error!(
                                "event=evictor_sweep module=evictor status=error error={err}"
                            ),
                        }
                    });
                }
            }
        })
    }
}

/// Clears the busy flag when dropped.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
