//! Message stores: where generated identifiers are recorded.
//!
//! The real store belongs to the DTN transport and lives outside this
//! workspace; anything that can durably append an identifier implements
//! [`MessageStore`].

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use dtn_core::MessageId;

use crate::TrafficResult;

/// Append-only sink for generated message identifiers.
///
/// Called from the generator's worker thread, hence `Send + Sync`.
pub trait MessageStore: Send + Sync + 'static {
    fn add_object(&self, id: &MessageId) -> TrafficResult<()>;
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-memory store keeping identifiers in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    ids: Mutex<Vec<MessageId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded identifiers.
    pub fn ids(&self) -> Vec<MessageId> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageStore for MemoryStore {
    fn add_object(&self, id: &MessageId) -> TrafficResult<()> {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id.clone());
        Ok(())
    }
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// File-backed store: one identifier per line, flushed on every write.
pub struct FileStore {
    path:   PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileStore {
    /// Open (or create) `path` for appending.
    pub fn open(path: &Path) -> TrafficResult<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(Self {
            path:   path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageStore for FileStore {
    fn add_object(&self, id: &MessageId) -> TrafficResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{id}")?;
        writer.flush()?;
        Ok(())
    }
}
