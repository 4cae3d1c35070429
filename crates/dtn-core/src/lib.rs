//! `dtn-core` — foundational types for the `dtn_field` experiment runner.
//!
//! This crate is a dependency of every other `dtn-*` crate.  It has no
//! `dtn-*` dependencies and few external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `DeviceId`, `MessageId`, `RunId`                          |
//! | [`time`]    | `ExperimentClock`, `HOURS_PER_DAY`                        |
//! | [`rng`]     | `jittered_interval`, `IntervalJitter`                     |
//! | [`engine`]  | `Engine` lifecycle trait, `EngineState`                   |
//! | [`error`]   | `DtnError`                                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the identifier types.    |

pub mod engine;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{Engine, EngineState};
pub use error::DtnError;
pub use ids::{DeviceId, MessageId, RunId};
pub use rng::{IntervalJitter, jittered_interval};
pub use time::{ExperimentClock, HOURS_PER_DAY};
