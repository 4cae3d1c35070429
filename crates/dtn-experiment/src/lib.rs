//! `dtn-experiment` — runs a device's parameter sweep.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`config`]      | `ExperimentConfig`                                         |
//! | [`sweep`]       | `Sweep`, `RunParams`                                       |
//! | [`factory`]     | `TransportFactory`, `StoreFactory`, `ScheduleSource`       |
//! | [`guard`]       | `RunGuard<E>`, scoped engine lifetime                      |
//! | [`signal`]      | `ShutdownSignal`, ends the run-duration wait early         |
//! | [`report`]      | `RunOutcome`, `RunReport`, `SweepReport`                   |
//! | [`observer`]    | `ExperimentObserver` trait, `NoopObserver`                 |
//! | [`coordinator`] | `Coordinator`, the sweep loop                              |
//! | [`throughput`]  | `ThroughputRun`: one fixed-network transport run           |
//! | [`error`]       | `ExperimentError`, `ExperimentResult<T>`                   |
//!
//! # Run lifecycle
//!
//! ```text
//! for (batch_size, sending_freq) in sweep:       // batch size outer
//!   ① construct  transport, store, schedule       (failure → Failed, next run)
//!   ② start      generator guard, location guard  (location holds transport)
//!   ③ wait       run_duration, or until shutdown
//!   ④ stop       location (stops transport, leaves), then generator
//! ```
//!
//! The coordinator never calls `Transport::stop` itself: the location
//! engine owns the transport once the run begins.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut coordinator = Coordinator::new(config, schedule, transports, stores, membership)?;
//! let report = coordinator.run(&mut NoopObserver);
//! assert_eq!(report.failed(), 0);
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod factory;
pub mod guard;
pub mod observer;
pub mod report;
pub mod signal;
pub mod sweep;
pub mod throughput;


pub use config::ExperimentConfig;
pub use coordinator::Coordinator;
pub use error::{ExperimentError, ExperimentResult};
pub use factory::{ScheduleSource, StoreFactory, TransportFactory};
pub use guard::RunGuard;
pub use observer::{ExperimentObserver, NoopObserver};
pub use report::{RunOutcome, RunReport, SweepReport};
pub use signal::ShutdownSignal;
pub use sweep::{RunParams, Sweep};
pub use throughput::{
    SETTLE_TIME, THROUGHPUT_DURATION, THROUGHPUT_ESSID, ThroughputConfig, ThroughputReport, ThroughputRun,
};
