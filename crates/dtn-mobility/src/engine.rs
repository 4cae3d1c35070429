//! `LocationEngine` — drives join/leave transitions from a mobility schedule.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use dtn_core::{DtnError, Engine, EngineState, ExperimentClock};
use dtn_schedule::{JOIN_PRIORITY, LEAVE_PRIORITY, MobilitySchedule, Scheduler, load_schedule};

use crate::{MobilityError, MobilityResult, NetworkMembership, Transport};

const ENGINE_NAME: &str = "location engine";

// ── Shared state ──────────────────────────────────────────────────────────────

/// State shared between the engine handle and tasks on the worker thread.
struct Shared<T: Transport, M: NetworkMembership> {
    running:    AtomicBool,
    transport:  Arc<T>,
    membership: M,
    joins:      AtomicU64,
    leaves:     AtomicU64,
    failures:   AtomicU64,
}

impl<T: Transport, M: NetworkMembership> Shared<T, M> {
    /// Join `location`, then start the transport.  Failures are logged and
    /// the transition still counts: the next one is attempted on schedule.
    fn join(&self, location: &str) {
        log::info!("joining {location}");
        if let Err(e) = self.membership.join(location) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            log::warn!("join {location} failed: {e}");
        }
        if let Err(e) = self.transport.start() {
            self.failures.fetch_add(1, Ordering::SeqCst);
            log::warn!("transport start after joining {location} failed: {e}");
        }
        self.joins.fetch_add(1, Ordering::SeqCst);
    }

    /// Stop the transport, then leave the current network.
    fn leave(&self) {
        log::info!("leaving ad-hoc network");
        if let Err(e) = self.transport.stop() {
            self.failures.fetch_add(1, Ordering::SeqCst);
            log::warn!("transport stop failed: {e}");
        }
        if let Err(e) = self.membership.leave() {
            self.failures.fetch_add(1, Ordering::SeqCst);
            log::warn!("leave failed: {e}");
        }
        self.leaves.fetch_add(1, Ordering::SeqCst);
    }
}

// ── LocationEngine ────────────────────────────────────────────────────────────

/// Moves the device between ad-hoc networks following a daily schedule, and
/// starts/stops the transport with each move.
///
/// # Type parameters
///
/// `T` is the DTN transport (shared with the coordinator, which only
/// constructs it); `M` performs the OS-level join/leave, e.g.
/// [`IwMembership`][crate::IwMembership].
pub struct LocationEngine<T: Transport, M: NetworkMembership> {
    schedule:  MobilitySchedule,
    clock:     ExperimentClock,
    shared:    Arc<Shared<T, M>>,
    scheduler: Scheduler,
    worker:    Option<JoinHandle<()>>,
}

impl<T: Transport, M: NetworkMembership> LocationEngine<T, M> {
    /// Create a stopped engine for an already validated schedule.
    pub fn new(schedule: MobilitySchedule, transport: Arc<T>, membership: M, clock: ExperimentClock) -> Self {
        Self {
            schedule,
            clock,
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                transport,
                membership,
                joins: AtomicU64::new(0),
                leaves: AtomicU64::new(0),
                failures: AtomicU64::new(0),
            }),
            scheduler: Scheduler::new(),
            worker: None,
        }
    }

    /// Load the schedule file at `path` (YAML or CSV), then construct the engine.
    ///
    /// # Errors
    ///
    /// [`MobilityError::Schedule`] if the file is missing, unparsable, or
    /// describes an invalid schedule.
    pub fn from_path(
        path:       &Path,
        transport:  Arc<T>,
        membership: M,
        clock:      ExperimentClock,
    ) -> MobilityResult<Self> {
        let schedule = load_schedule(path)?;
        Ok(Self::new(schedule, transport, membership, clock))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn schedule(&self) -> &MobilitySchedule {
        &self.schedule
    }

    pub fn clock(&self) -> ExperimentClock {
        self.clock
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.shared.transport
    }

    /// Join transitions executed (each also started the transport).
    pub fn joins(&self) -> u64 {
        self.shared.joins.load(Ordering::SeqCst)
    }

    /// Leave transitions executed, including the one on `stop()`.
    pub fn leaves(&self) -> u64 {
        self.shared.leaves.load(Ordering::SeqCst)
    }

    pub fn transitions(&self) -> u64 {
        self.joins() + self.leaves()
    }

    /// Failed membership or transport calls so far.
    pub fn failures(&self) -> u64 {
        self.shared.failures.load(Ordering::SeqCst)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        if self.shared.running.load(Ordering::SeqCst) {
            EngineState::Running
        } else {
            EngineState::Stopped
        }
    }

    /// Schedule every window's transitions relative to now and spawn the
    /// worker.
    ///
    /// # Errors
    ///
    /// [`DtnError::AlreadyRunning`] if called while running; an I/O error if
    /// the worker thread cannot be spawned.
    pub fn start(&mut self) -> MobilityResult<()> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            return Err(DtnError::AlreadyRunning(ENGINE_NAME).into());
        }

        let origin = Instant::now();
        let day = self.clock.day();
        for window in self.schedule.windows() {
            let location: Arc<str> = Arc::from(window.location.as_str());
            if window.occupied_at_start() {
                let shared = Arc::clone(&self.shared);
                let loc = Arc::clone(&location);
                self.scheduler.schedule_at(origin, JOIN_PRIORITY, move |_| {
                    if shared.running.load(Ordering::SeqCst) {
                        shared.join(&loc);
                    }
                });
            }
            schedule_join(&self.scheduler, &self.shared, location, self.clock.at(origin, window.begin), day);
            schedule_leave(&self.scheduler, &self.shared, self.clock.at(origin, window.end), day);
        }

        match self.scheduler.spawn_worker("location-engine") {
            Ok(worker) => {
                self.worker = Some(worker);
                log::info!(
                    "{ENGINE_NAME} started: {} windows, {}",
                    self.schedule.len(),
                    self.clock
                );
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                self.scheduler.drain();
                Err(MobilityError::Io(e))
            }
        }
    }

    /// Cancel all transitions, then stop the transport and leave the network
    /// regardless of where the schedule left the device.
    ///
    /// Idempotent; a never-started engine touches neither transport nor
    /// network.
    pub fn stop(&mut self) -> MobilityResult<()> {
        let was_running = self.shared.running.swap(false, Ordering::SeqCst);
        if !was_running && self.worker.is_none() {
            return Ok(());
        }

        let cancelled = self.scheduler.drain();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("{ENGINE_NAME} worker panicked");
            }
        }
        self.shared.leave();

        log::info!(
            "{ENGINE_NAME} terminated ({} joins, {} leaves, {cancelled} pending transitions cancelled)",
            self.joins(),
            self.leaves()
        );
        Ok(())
    }
}

impl<T: Transport, M: NetworkMembership> Engine for LocationEngine<T, M> {
    type Error = MobilityError;

    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn start(&mut self) -> MobilityResult<()> {
        LocationEngine::start(self)
    }

    fn stop(&mut self) -> MobilityResult<()> {
        LocationEngine::stop(self)
    }

    fn state(&self) -> EngineState {
        LocationEngine::state(self)
    }
}

impl<T: Transport, M: NetworkMembership> Drop for LocationEngine<T, M> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("failed to stop {ENGINE_NAME} on drop: {e}");
        }
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

// Each transition reschedules itself one day after its own fire time, not
// after "now", so daily transitions do not drift by the task's run time.

fn schedule_join<T: Transport, M: NetworkMembership>(
    scheduler: &Scheduler,
    shared:    &Arc<Shared<T, M>>,
    location:  Arc<str>,
    at:        Instant,
    day:       Duration,
) {
    let shared = Arc::clone(shared);
    scheduler.schedule_at(at, JOIN_PRIORITY, move |s| {
        if !shared.running.load(Ordering::SeqCst) {
            return;
        }
        shared.join(&location);
        schedule_join(s, &shared, location, at + day, day);
    });
}

fn schedule_leave<T: Transport, M: NetworkMembership>(
    scheduler: &Scheduler,
    shared:    &Arc<Shared<T, M>>,
    at:        Instant,
    day:       Duration,
) {
    let shared = Arc::clone(shared);
    scheduler.schedule_at(at, LEAVE_PRIORITY, move |s| {
        if !shared.running.load(Ordering::SeqCst) {
            return;
        }
        shared.leave();
        schedule_leave(s, &shared, at + day, day);
    });
}
