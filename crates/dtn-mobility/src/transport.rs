//! The seam to the external DTN transport.

use crate::MobilityResult;

/// Start/stop interface of the message exchange component.
///
/// Only the [`LocationEngine`][crate::LocationEngine] calls these once a run
/// has begun.  `stop` must be safe without a prior `start` and when already
/// stopped: teardown always calls it.
pub trait Transport: Send + Sync + 'static {
    /// Begin sending and receiving with the configured batch size and
    /// sending frequency.
    fn start(&self) -> MobilityResult<()>;

    /// Halt and release resources.  Idempotent.
    fn stop(&self) -> MobilityResult<()>;
}
