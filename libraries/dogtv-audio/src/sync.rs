//! Audio/visual synchronization clock
//!
//! Tracks how long audio and visuals have been running since their epochs.
//! All state lives in atomics so the audio thread and the render thread can
//! share one clock through an `Arc` without locking.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Tolerance used by [`SyncClock::is_synchronized`]
pub const DEFAULT_SYNC_TOLERANCE: Duration = Duration::from_millis(100);

/// Monotonic time source
pub trait ClockSource: Send + Sync {
    /// Time elapsed since the source's fixed origin
    fn now(&self) -> Duration;
}

/// Wall-clock-independent source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven source for tests and offline rendering
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_to_nanos(by), Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, to: Duration) {
        self.nanos.store(duration_to_nanos(to), Ordering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Shared audio/visual clock
///
/// Stopped on creation. Both epochs are taken from a single clock read, so
/// the clock is synchronized immediately after [`start`](Self::start) and
/// [`resynchronize`](Self::resynchronize).
#[derive(Debug)]
pub struct SyncClock<C: ClockSource = MonotonicClock> {
    source: C,
    audio_epoch: AtomicU64,
    visual_epoch: AtomicU64,
    running: AtomicBool,
}

impl SyncClock<MonotonicClock> {
    /// Clock driven by the monotonic system clock
    pub fn new() -> Self {
        Self::with_source(MonotonicClock::new())
    }
}

impl Default for SyncClock<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> SyncClock<C> {
    /// Clock driven by a custom source
    pub fn with_source(source: C) -> Self {
        Self {
            source,
            audio_epoch: AtomicU64::new(0),
            visual_epoch: AtomicU64::new(0),
            running: AtomicBool::new(false),
        }
    }

    fn now_nanos(&self) -> u64 {
        duration_to_nanos(self.source.now())
    }

    fn set_epochs(&self, nanos: u64) {
        self.audio_epoch.store(nanos, Ordering::SeqCst);
        self.visual_epoch.store(nanos, Ordering::SeqCst);
    }

    /// Start both timelines from now
    pub fn start(&self) {
        self.set_epochs(self.now_nanos());
        self.running.store(true, Ordering::SeqCst);
        info!("Sync clock started");
    }

    /// Stop both timelines; times read zero until the next start
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!("Sync clock stopped");
    }

    /// Re-baseline both epochs from one read
    ///
    /// Returns `false` and does nothing while stopped.
    pub fn resynchronize(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        let drift = self.drift();
        self.set_epochs(self.now_nanos());
        debug!(drift_ms = drift.as_secs_f64() * 1000.0, "Sync clock resynchronized");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn elapsed_since(&self, epoch: &AtomicU64) -> Duration {
        if !self.is_running() {
            return Duration::ZERO;
        }
        let now = self.now_nanos();
        Duration::from_nanos(now.saturating_sub(epoch.load(Ordering::SeqCst)))
    }

    /// Time on the audio timeline (zero while stopped)
    pub fn current_audio_time(&self) -> Duration {
        self.elapsed_since(&self.audio_epoch)
    }

    /// Time on the visual timeline (zero while stopped)
    pub fn current_visual_time(&self) -> Duration {
        self.elapsed_since(&self.visual_epoch)
    }

    /// Absolute difference between the two timelines
    ///
    /// Each timeline is read separately, so the reads themselves
    /// contribute a little.
    pub fn drift(&self) -> Duration {
        let audio = self.current_audio_time();
        let visual = self.current_visual_time();
        if audio > visual {
            audio - visual
        } else {
            visual - audio
        }
    }

    /// Whether the timelines differ by less than `tolerance`
    ///
    /// Always `false` while stopped.
    pub fn check_synchronization(&self, tolerance: Duration) -> bool {
        self.is_running() && self.drift() < tolerance
    }

    /// [`check_synchronization`](Self::check_synchronization) with
    /// [`DEFAULT_SYNC_TOLERANCE`]
    pub fn is_synchronized(&self) -> bool {
        self.check_synchronization(DEFAULT_SYNC_TOLERANCE)
    }
}
