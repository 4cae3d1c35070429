//! `dtn-traffic` — synthetic message generation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`store`]     | `MessageStore` trait, `MemoryStore`, `FileStore`        |
//! | [`generator`] | `MessageGenerator<S>` engine                            |
//! | [`error`]     | `TrafficError`, `TrafficResult<T>`                      |
//!
//! # Generation model
//!
//! While running, the generator writes `{device}_{counter}` into its store
//! at jittered intervals around a mean creation rate:
//!
//! ```text
//! start:   schedule generate() after next_interval(mean); spawn worker
//! generate (on worker):
//!     if !running → return (no write, no reschedule)
//!     store.add_object(device_counter); counter += 1
//!     schedule generate() after next_interval(mean)
//! stop:    running = false; drain scheduler; join worker
//! ```

pub mod error;
pub mod generator;
pub mod store;


pub use error::{TrafficError, TrafficResult};
pub use generator::MessageGenerator;
pub use store::{FileStore, MemoryStore, MessageStore};
