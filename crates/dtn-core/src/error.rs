//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `DtnError` as one
//! variant via `#[from]`, so lifecycle misuse reported here flows through
//! every engine's result type unchanged.

use thiserror::Error;

/// The common base error for `dtn-*` crates.
#[derive(Debug, Error)]
pub enum DtnError {
    /// `start()` was called on an engine that is already running.
    #[error("{0} is already running")]
    AlreadyRunning(&'static str),
}
