//! `dtn-mobility` — simulated mobility through ad-hoc network membership.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`transport`]  | `Transport`: start/stop seam to the external DTN transport  |
//! | [`membership`] | `NetworkMembership` trait, `IwMembership` (`iw ibss`)       |
//! | [`engine`]     | `LocationEngine<T, M>`: schedule-driven join/leave          |
//! | [`error`]      | `MobilityError`, `MobilityResult<T>`                        |
//!
//! # Mobility model
//!
//! A device "moves" by leaving one ad-hoc network and joining another, which
//! changes its set of neighbours.  For every window of its daily schedule
//! the engine runs:
//!
//! ```text
//! at begin (priority 2):  join(location); transport.start()   every 24 h
//! at end   (priority 1):  transport.stop(); leave()           every 24 h
//! ```
//!
//! A window that wraps past the reference point also joins once immediately
//! at start.  On `stop()` the engine drains its scheduler and then always
//! stops the transport and leaves, whatever state the schedule left it in.

pub mod engine;
pub mod error;
pub mod membership;
pub mod transport;


pub use engine::LocationEngine;
pub use error::{MobilityError, MobilityResult};
pub use membership::{DEFAULT_FREQUENCY_MHZ, IwMembership, NetworkMembership};
pub use transport::Transport;
