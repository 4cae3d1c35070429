//! `Scheduler` — a time-ordered task queue driven by one worker thread.
//!
//! # Ordering
//!
//! Tasks are keyed by `(fire_at, priority, seq)` in a `BTreeMap`:
//!
//! - earliest `fire_at` first (monotonic `Instant`);
//! - on equal instants, lower `priority` first, so a leave (1) runs before a
//!   join (2) scheduled for the same moment;
//! - on full ties, insertion order (`seq`).
//!
//! The map doubles as the cancellation index: a [`TaskHandle`] is just the
//! key, so `cancel` is an O(log n) `remove`.
//!
//! # Concurrency
//!
//! All queue mutation happens under one `Mutex`.  Actions run *outside* the
//! lock, so a task can reschedule itself (it receives `&Scheduler`) and other
//! threads can enqueue, cancel, or drain while it runs.  A `Condvar` is
//! signalled on every mutation so the worker recomputes its wait deadline.
//!
//! A task popped for execution is "in flight".  Cancelling it afterwards is a
//! no-op that reports `false`; [`Scheduler::drain`] waits for it to finish
//! instead of interrupting it.

use std::collections::BTreeMap;
use std::io;
use std::mem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use crate::{ScheduleError, ScheduleResult};

/// Lower value runs first among tasks due at the same instant.
pub type Priority = u8;

/// Leaving a network wins ties: a device must never be in two networks.
pub const LEAVE_PRIORITY: Priority = 1;
pub const JOIN_PRIORITY: Priority = 2;
pub const GENERATE_PRIORITY: Priority = 2;

type Action = Box<dyn FnOnce(&Scheduler) + Send + 'static>;

// ── TaskHandle ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
struct TaskKey {
    fire_at:  Instant,
    priority: Priority,
    seq:      u64,
}

/// Returned by the `schedule_*` methods; pass to [`Scheduler::cancel`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TaskHandle {
    key: TaskKey,
}

impl TaskHandle {
    pub fn fire_at(&self) -> Instant {
        self.key.fire_at
    }

    pub fn priority(&self) -> Priority {
        self.key.priority
    }
}

// ── Shared state ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Queue {
    tasks:     BTreeMap<TaskKey, Action>,
    next_seq:  u64,
    /// Threads currently executing a popped task.  One worker per scheduler
    /// is the norm; a `Vec` keeps `drain` correct if a caller runs more.
    in_flight: Vec<ThreadId>,
}

#[derive(Default)]
struct Shared {
    queue:   Mutex<Queue>,
    changed: Condvar,
}

/// Clears the in-flight mark when a task returns or unwinds.
struct InFlight<'a> {
    shared: &'a Shared,
    thread: ThreadId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut queue = lock(&self.shared.queue);
        if let Some(pos) = queue.in_flight.iter().position(|t| *t == self.thread) {
            queue.in_flight.swap_remove(pos);
        }
        self.shared.changed.notify_all();
    }
}

// The queue is structurally valid even if a task panicked while another
// thread held the lock, so poisoning is ignored.
fn lock(queue: &Mutex<Queue>) -> MutexGuard<'_, Queue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Cancellable, time-ordered task queue.
///
/// `Scheduler` is a cheap `Clone` handle; all clones share one queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    shared: Arc<Shared>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Enqueue ───────────────────────────────────────────────────────────

    /// Schedule `action` to run at `at`.  Instants in the past run as soon
    /// as the worker reaches them.
    pub fn schedule_at<F>(&self, at: Instant, priority: Priority, action: F) -> TaskHandle
    where
        F: FnOnce(&Scheduler) + Send + 'static,
    {
        let mut queue = lock(&self.shared.queue);
        let key = TaskKey { fire_at: at, priority, seq: queue.next_seq };
        queue.next_seq += 1;
        queue.tasks.insert(key, Box::new(action));
        self.shared.changed.notify_all();
        TaskHandle { key }
    }

    /// Schedule `action` to run `delay` from now.
    ///
    /// # Panics
    ///
    /// If `now + delay` does not fit in an `Instant`; use
    /// [`schedule_after_secs`][Self::schedule_after_secs] for delays taken
    /// from configuration.
    pub fn schedule_after<F>(&self, delay: Duration, priority: Priority, action: F) -> TaskHandle
    where
        F: FnOnce(&Scheduler) + Send + 'static,
    {
        self.schedule_at(Instant::now() + delay, priority, action)
    }

    /// Like [`schedule_after`][Self::schedule_after] with a delay in seconds.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidDelay`] if `secs` is negative, NaN, or too
    /// large to represent.
    pub fn schedule_after_secs<F>(
        &self,
        secs:     f64,
        priority: Priority,
        action:   F,
    ) -> ScheduleResult<TaskHandle>
    where
        F: FnOnce(&Scheduler) + Send + 'static,
    {
        let at = Duration::try_from_secs_f64(secs)
            .ok()
            .and_then(|delay| Instant::now().checked_add(delay))
            .ok_or(ScheduleError::InvalidDelay(secs))?;
        Ok(self.schedule_at(at, priority, action))
    }

    // ── Cancel / drain ────────────────────────────────────────────────────

    /// Remove a pending task.
    ///
    /// Returns `true` if the task was still queued and will never run;
    /// `false` if it already ran, is running, or was drained.
    pub fn cancel(&self, handle: &TaskHandle) -> bool {
        let removed = lock(&self.shared.queue).tasks.remove(&handle.key);
        match removed {
            Some(_) => {
                self.shared.changed.notify_all();
                true
            }
            None => false,
        }
    }

    /// Cancel every queued task and wait for any in-flight task to finish.
    ///
    /// An in-flight task may enqueue follow-ups before it returns; those are
    /// cleared too, repeating until the queue is empty with nothing running.
    /// Called from inside a task, it does not wait for that task itself.
    ///
    /// Returns the number of tasks cancelled.
    pub fn drain(&self) -> usize {
        let me = thread::current().id();
        let mut stale: Vec<BTreeMap<TaskKey, Action>> = Vec::new();
        let mut cancelled = 0;

        let mut queue = lock(&self.shared.queue);
        loop {
            if !queue.tasks.is_empty() {
                cancelled += queue.tasks.len();
                stale.push(mem::take(&mut queue.tasks));
            }
            self.shared.changed.notify_all();

            if queue.in_flight.iter().all(|t| *t == me) {
                break;
            }
            queue = self
                .shared
                .changed
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(queue);

        // Dropped outside the lock: captured state may have its own `Drop`.
        drop(stale);
        cancelled
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Execute due tasks in order until the queue is empty.
    ///
    /// Blocks between tasks until the head is due.  Intended to run on a
    /// dedicated thread (see [`spawn_worker`][Self::spawn_worker]).
    pub fn run_blocking(&self) {
        let me = thread::current().id();
        let mut queue = lock(&self.shared.queue);
        loop {
            let Some(&key) = queue.tasks.keys().next() else {
                return;
            };

            let now = Instant::now();
            if key.fire_at > now {
                queue = self
                    .shared
                    .changed
                    .wait_timeout(queue, key.fire_at - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
                continue;
            }

            let Some(action) = queue.tasks.remove(&key) else {
                continue;
            };
            queue.in_flight.push(me);
            drop(queue);

            {
                let _in_flight = InFlight { shared: &self.shared, thread: me };
                action(self);
            }

            queue = lock(&self.shared.queue);
        }
    }

    /// Run [`run_blocking`][Self::run_blocking] on a new named thread.
    pub fn spawn_worker(&self, name: impl Into<String>) -> io::Result<JoinHandle<()>> {
        let scheduler = self.clone();
        thread::Builder::new()
            .name(name.into())
            .spawn(move || scheduler.run_blocking())
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Number of queued (not yet dispatched) tasks.
    pub fn len(&self) -> usize {
        lock(&self.shared.queue).tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fire time of the earliest queued task.
    pub fn next_fire_time(&self) -> Option<Instant> {
        lock(&self.shared.queue).tasks.keys().next().map(|k| k.fire_at)
    }
}
