//! Per-run construction seams: transport, message store, mobility schedule.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dtn_core::DeviceId;
use dtn_mobility::Transport;
use dtn_schedule::{MobilitySchedule, ScheduleResult, load_schedule};
use dtn_traffic::MessageStore;

use crate::{ExperimentResult, RunParams};

/// Builds a fresh transport for each sweep combination.
///
/// The returned transport is handed to the run's location engine, which is
/// the only caller of `start`/`stop` from then on.
pub trait TransportFactory {
    type Transport: Transport;

    fn create(&mut self, params: &RunParams, interface: &str) -> ExperimentResult<Arc<Self::Transport>>;
}

/// Builds the message store for each sweep combination, typically named
/// after [`RunParams::run_id`].
pub trait StoreFactory {
    type Store: MessageStore;

    fn create(&mut self, params: &RunParams) -> ExperimentResult<Arc<Self::Store>>;
}

/// Where a device's mobility schedule comes from.
///
/// Loaded again for every run, so a broken file fails each combination on
/// its own instead of the whole sweep up front.
#[derive(Clone, Debug)]
pub enum ScheduleSource {
    /// A YAML or CSV schedule file, by extension.
    File(PathBuf),
    /// An already validated schedule.
    Inline(MobilitySchedule),
}

impl ScheduleSource {
    /// `<dir>/<device>.yaml`, the per-device layout used in the field.
    pub fn for_device(dir: &Path, device: &DeviceId) -> Self {
        Self::File(dir.join(format!("{device}.yaml")))
    }

    pub fn load(&self) -> ScheduleResult<MobilitySchedule> {
        match self {
            Self::File(path) => load_schedule(path),
            Self::Inline(schedule) => Ok(schedule.clone()),
        }
    }
}
