//! `dtn-schedule` — the cancellable scheduler and mobility schedules.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`scheduler`] | `Scheduler` (`BTreeMap<TaskKey, Action>` behind a mutex), `TaskHandle` |
//! | [`window`]    | `MobilityWindow`, `MobilitySchedule`                      |
//! | [`loader`]    | `load_schedule` (by extension), YAML and CSV loaders      |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Execution model (summary)
//!
//! Each engine owns one `Scheduler` and one worker thread running
//! [`Scheduler::run_blocking`].  Tasks fire in `(fire_at, priority, seq)`
//! order:
//!
//! ```text
//! loop:
//!   head = earliest task            (return when queue is empty)
//!   wait until head.fire_at         (woken early by schedule / cancel / drain)
//!   pop head, mark in flight, run it outside the lock
//! ```
//!
//! [`Scheduler::drain`] empties the queue and waits for the in-flight task,
//! which is how engines guarantee that nothing fires after `stop()` returns.

pub mod error;
pub mod loader;
pub mod scheduler;
pub mod window;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use loader::{
    load_schedule, load_schedule_csv, load_schedule_reader, load_schedule_yaml,
    load_schedule_yaml_reader,
};
pub use scheduler::{
    GENERATE_PRIORITY, JOIN_PRIORITY, LEAVE_PRIORITY, Priority, Scheduler, TaskHandle,
};
pub use window::{MobilitySchedule, MobilityWindow};
