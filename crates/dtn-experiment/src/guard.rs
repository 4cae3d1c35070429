//! `RunGuard` — an engine that is stopped on every exit path.

use dtn_core::Engine;

/// A started engine, stopped when the guard is finished or dropped.
///
/// The coordinator declares the generator guard before the location guard,
/// so on early return or unwinding Rust drops them in the required order:
/// location first, then generator.
pub struct RunGuard<E: Engine> {
    engine:   E,
    finished: bool,
}

impl<E: Engine> RunGuard<E> {
    /// Start `engine` and take charge of stopping it.
    ///
    /// # Errors
    ///
    /// Whatever `engine.start()` reports.  The engine is dropped, and the
    /// engines stop themselves on drop.
    pub fn start(mut engine: E) -> Result<Self, E::Error> {
        engine.start()?;
        Ok(Self { engine, finished: false })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Stop the engine now and report the result.  Later calls and the
    /// eventual drop do nothing.
    pub fn finish(&mut self) -> Result<(), E::Error> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.engine.stop()
    }
}

impl<E: Engine> Drop for RunGuard<E> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::debug!("stopping {} on scope exit", self.engine.name());
        if let Err(e) = self.finish() {
            log::error!("failed to stop {}: {e}", self.engine.name());
        }
    }
}
