use chrono::{Duration as TimeDelta, Utc};
use quotes_core::{
    Evictor, EvictorConfig, QuoteDraft, QuoteRepository, QuoteStore, Sweep, TickOutcome,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sweep target that blocks until the test releases it.
struct GatedSweep {
    started: AtomicUsize,
    finished: AtomicUsize,
    started_tx: Mutex<Sender<()>>,
    release_rx: Mutex<Receiver<()>>,
}

impl Sweep for GatedSweep {
    fn sweep(&self, _max_age: Duration) -> usize {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.started_tx.lock().unwrap().send(()).unwrap();
        self.release_rx.lock().unwrap().recv().unwrap();
        self.finished.fetch_add(1, Ordering::SeqCst);
        0
    }
}

/// Sweep target whose first call blocks until the test releases it.
struct SlowFirstSweep {
    sweeps: AtomicUsize,
    release_rx: Mutex<Receiver<()>>,
}

impl Sweep for SlowFirstSweep {
    fn sweep(&self, _max_age: Duration) -> usize {
        if self.sweeps.fetch_add(1, Ordering::SeqCst) == 0 {
            self.release_rx.lock().unwrap().recv().unwrap();
        }
        0
    }
}

struct CountingSweep {
    sweeps: AtomicUsize,
}

impl Sweep for CountingSweep {
    fn sweep(&self, _max_age: Duration) -> usize {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        0
    }
}

fn config(interval: Duration) -> EvictorConfig {
    EvictorConfig {
        interval,
        max_age: Duration::from_secs(60 * 60),
    }
}

#[test]
fn default_config_is_five_minutes_and_one_hour() {
    let config = EvictorConfig::default();
    assert_eq!(config.interval, Duration::from_secs(300));
    assert_eq!(config.max_age, Duration::from_secs(3600));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tick_during_running_sweep_is_skipped_and_later_ticks_resume() {
    let (started_tx, started_rx) = channel();
    let (release_tx, release_rx) = channel();
    let target = Arc::new(GatedSweep {
        started: AtomicUsize::new(0),
        finished: AtomicUsize::new(0),
        started_tx: Mutex::new(started_tx),
        release_rx: Mutex::new(release_rx),
    });
    let evictor = Evictor::new(target.clone(), config(Duration::from_secs(1)));

    let TickOutcome::Started(first) = evictor.tick() else {
        panic!("first tick should start a sweep");
    };
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(evictor.is_busy());

    assert!(matches!(evictor.tick(), TickOutcome::Skipped));
    assert!(matches!(evictor.tick(), TickOutcome::Skipped));

    release_tx.send(()).unwrap();
    first.await.unwrap();
    assert!(!evictor.is_busy());
    assert_eq!(target.started.load(Ordering::SeqCst), 1);
    assert_eq!(target.finished.load(Ordering::SeqCst), 1);

    let TickOutcome::Started(second) = evictor.tick() else {
        panic!("tick after a finished sweep should start again");
    };
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    release_tx.send(()).unwrap();
    second.await.unwrap();
    assert_eq!(target.started.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn busy_flag_clears_when_sweep_panics() {
    struct PanickingSweep;
    impl Sweep for PanickingSweep {
        fn sweep(&self, _max_age: Duration) -> usize {
            panic!("sweep failed");
        }
    }

    let evictor = Evictor::new(Arc::new(PanickingSweep), config(Duration::from_secs(1)));
    let TickOutcome::Started(handle) = evictor.tick() else {
        panic!("first tick should start a sweep");
    };
    assert!(handle.await.is_err());
    assert!(!evictor.is_busy());
    assert!(matches!(evictor.tick(), TickOutcome::Started(_)));
}

#[tokio::test]
async fn spawned_loop_keeps_sweeping() {
    let target = Arc::new(CountingSweep {
        sweeps: AtomicUsize::new(0),
    });
    let handle = Evictor::new(target.clone(), config(Duration::from_millis(20))).spawn();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(target.sweeps.load(Ordering::SeqCst) >= 3);
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn sweep_on_store_evicts_expired_quotes() {
    let store = Arc::new(QuoteStore::new());
    let now = Utc::now();
    store.add(QuoteDraft::new("a", "old", "c").created_at(now - TimeDelta::hours(2)));
    let kept = store.add(QuoteDraft::new("a", "new", "c"));

    let evictor = Evictor::new(store.clone(), EvictorConfig::default());
    let TickOutcome::Started(handle) = evictor.tick() else {
        panic!("idle evictor should start a sweep");
    };
    assert_eq!(handle.await.unwrap(), 1);
    assert_eq!(store.all(), vec![kept]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_loop_skips_ticks_during_slow_sweep_and_resumes() {
    let (release_tx, release_rx) = channel();
    let target = Arc::new(SlowFirstSweep {
        sweeps: AtomicUsize::new(0),
        release_rx: Mutex::new(release_rx),
    });
    let handle = Evictor::new(target.clone(), config(Duration::from_millis(20))).spawn();

    // Roughly ten ticks fire while the first sweep is blocked.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(target.sweeps.load(Ordering::SeqCst), 1);
    assert!(!handle.is_finished());

    release_tx.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(target.sweeps.load(Ordering::SeqCst) >= 3);
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn zero_interval_is_raised_instead_of_panicking() {
    let target = Arc::new(CountingSweep {
        sweeps: AtomicUsize::new(0),
    });
    let handle = Evictor::new(target.clone(), config(Duration::ZERO)).spawn();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(target.sweeps.load(Ordering::SeqCst) >= 1);
    assert!(!handle.is_finished());
    handle.abort();
}
