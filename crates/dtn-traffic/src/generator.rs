//! `MessageGenerator` — writes synthetic messages at jittered intervals.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use dtn_core::{DeviceId, DtnError, Engine, EngineState, IntervalJitter, MessageId};
use dtn_schedule::{GENERATE_PRIORITY, ScheduleResult, Scheduler};

use crate::{MessageStore, TrafficError, TrafficResult};

const ENGINE_NAME: &str = "message generator";

/// State shared between the engine handle and tasks on the worker thread.
struct Shared<S: MessageStore> {
    device:         DeviceId,
    /// Mean seconds between two messages.
    creation_rate:  f64,
    running:        AtomicBool,
    next_counter:   AtomicU64,
    generated:      AtomicU64,
    store_failures: AtomicU64,
    jitter:         Mutex<IntervalJitter>,
    store:          Arc<S>,
}

/// Emits `{device}_{counter}` identifiers into a [`MessageStore`].
///
/// The counter is never reset: stopping and restarting the same generator
/// continues the sequence, and [`with_first_counter`][Self::with_first_counter]
/// lets a new generator pick up where a previous one for the same device
/// left off.
pub struct MessageGenerator<S: MessageStore> {
    shared:    Arc<Shared<S>>,
    scheduler: Scheduler,
    worker:    Option<JoinHandle<()>>,
}

impl<S: MessageStore> MessageGenerator<S> {
    /// Create a stopped generator.
    ///
    /// # Errors
    ///
    /// [`TrafficError::InvalidRate`] unless `creation_rate_secs` is finite
    /// and positive.
    pub fn new(device: DeviceId, creation_rate_secs: f64, store: Arc<S>) -> TrafficResult<Self> {
        if !(creation_rate_secs.is_finite() && creation_rate_secs > 0.0) {
            return Err(TrafficError::InvalidRate(creation_rate_secs));
        }
        Ok(Self {
            shared: Arc::new(Shared {
                device,
                creation_rate:  creation_rate_secs,
                running:        AtomicBool::new(false),
                next_counter:   AtomicU64::new(0),
                generated:      AtomicU64::new(0),
                store_failures: AtomicU64::new(0),
                jitter:         Mutex::new(IntervalJitter::from_entropy()),
                store,
            }),
            scheduler: Scheduler::new(),
            worker:    None,
        })
    }

    /// Use a deterministic interval sequence.
    pub fn with_seed(self, seed: u64) -> Self {
        self.shared
            .jitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reseed(seed);
        self
    }

    /// Start numbering messages at `counter` instead of 0.
    pub fn with_first_counter(self, counter: u64) -> Self {
        self.shared.next_counter.store(counter, Ordering::SeqCst);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn device(&self) -> &DeviceId {
        &self.shared.device
    }

    pub fn creation_rate(&self) -> f64 {
        self.shared.creation_rate
    }

    /// Counter the next message will carry.
    pub fn next_counter(&self) -> u64 {
        self.shared.next_counter.load(Ordering::SeqCst)
    }

    /// Messages successfully written since construction.
    pub fn generated(&self) -> u64 {
        self.shared.generated.load(Ordering::SeqCst)
    }

    /// Writes the store rejected.  Their counters are consumed anyway.
    pub fn store_failures(&self) -> u64 {
        self.shared.store_failures.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.shared.store
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        if self.shared.running.load(Ordering::SeqCst) {
            EngineState::Running
        } else {
            EngineState::Stopped
        }
    }

    /// Schedule the first message and spawn the worker.
    ///
    /// # Errors
    ///
    /// [`DtnError::AlreadyRunning`] if called while running; an I/O error if
    /// the worker thread cannot be spawned.
    pub fn start(&mut self) -> TrafficResult<()> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            return Err(DtnError::AlreadyRunning(ENGINE_NAME).into());
        }

        let spawned = schedule_next(&self.scheduler, &self.shared)
            .map_err(TrafficError::from)
            .and_then(|()| {
                self.scheduler
                    .spawn_worker(format!("msg-gen-{}", self.shared.device))
                    .map_err(TrafficError::from)
            });

        match spawned {
            Ok(worker) => {
                self.worker = Some(worker);
                log::info!(
                    "{ENGINE_NAME} for {} started (mean interval {}s, next counter {})",
                    self.shared.device,
                    self.shared.creation_rate,
                    self.next_counter()
                );
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                self.scheduler.drain();
                Err(e)
            }
        }
    }

    /// Stop generating.  No store write happens after this returns.
    ///
    /// Idempotent.
    pub fn stop(&mut self) -> TrafficResult<()> {
        let was_running = self.shared.running.swap(false, Ordering::SeqCst);
        if !was_running && self.worker.is_none() {
            return Ok(());
        }

        self.scheduler.drain();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("{ENGINE_NAME} worker for {} panicked", self.shared.device);
            }
        }

        log::info!(
            "{ENGINE_NAME} for {} terminated ({} messages, next counter {})",
            self.shared.device,
            self.generated(),
            self.next_counter()
        );
        Ok(())
    }
}

impl<S: MessageStore> Engine for MessageGenerator<S> {
    type Error = TrafficError;

    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn start(&mut self) -> TrafficResult<()> {
        MessageGenerator::start(self)
    }

    fn stop(&mut self) -> TrafficResult<()> {
        MessageGenerator::stop(self)
    }

    fn state(&self) -> EngineState {
        MessageGenerator::state(self)
    }
}

impl<S: MessageStore> Drop for MessageGenerator<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("failed to stop {ENGINE_NAME} on drop: {e}");
        }
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

fn schedule_next<S: MessageStore>(scheduler: &Scheduler, shared: &Arc<Shared<S>>) -> ScheduleResult<()> {
    let delay = shared
        .jitter
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .next_interval(shared.creation_rate);
    let next = Arc::clone(shared);
    scheduler.schedule_after_secs(delay, GENERATE_PRIORITY, move |s| generate(s, next))?;
    Ok(())
}

fn generate<S: MessageStore>(scheduler: &Scheduler, shared: Arc<Shared<S>>) {
    if !shared.running.load(Ordering::SeqCst) {
        return;
    }

    let counter = shared.next_counter.fetch_add(1, Ordering::SeqCst);
    let id = MessageId::new(shared.device.clone(), counter);
    match shared.store.add_object(&id) {
        Ok(()) => {
            shared.generated.fetch_add(1, Ordering::SeqCst);
            log::debug!("generated message {id}");
        }
        Err(e) => {
            shared.store_failures.fetch_add(1, Ordering::SeqCst);
            log::warn!("store rejected message {id}: {e}");
        }
    }

    if let Err(e) = schedule_next(scheduler, &shared) {
        log::error!("{ENGINE_NAME} for {} cannot reschedule: {e}", shared.device);
    }
}
