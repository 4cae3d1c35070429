//! Joining and leaving ad-hoc (IBSS) networks.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use crate::{MobilityError, MobilityResult};

/// 802.11 channel 5.
pub const DEFAULT_FREQUENCY_MHZ: u32 = 2432;

/// OS-level ad-hoc network membership.
///
/// Both calls are synchronous and may fail (device busy, interface down).
/// The engine logs failures and keeps following its schedule.
pub trait NetworkMembership: Send + Sync + 'static {
    /// Join the ad-hoc network named `location`.
    fn join(&self, location: &str) -> MobilityResult<()>;

    /// Leave whichever ad-hoc network the interface is in.
    fn leave(&self) -> MobilityResult<()>;
}

/// One membership backend serves every run's location engine.
impl<M: NetworkMembership> NetworkMembership for Arc<M> {
    fn join(&self, location: &str) -> MobilityResult<()> {
        (**self).join(location)
    }

    fn leave(&self) -> MobilityResult<()> {
        (**self).leave()
    }
}

// ── IwMembership ──────────────────────────────────────────────────────────────

/// Membership through `iw <iface> ibss join <essid> <freq>` / `iw <iface> ibss leave`.
#[derive(Clone, Debug)]
pub struct IwMembership {
    program:       PathBuf,
    interface:     String,
    frequency_mhz: u32,
}

impl IwMembership {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            program:       PathBuf::from("iw"),
            interface:     interface.into(),
            frequency_mhz: DEFAULT_FREQUENCY_MHZ,
        }
    }

    pub fn with_frequency(mut self, frequency_mhz: u32) -> Self {
        self.frequency_mhz = frequency_mhz;
        self
    }

    /// Run `program` instead of `iw` found on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn frequency_mhz(&self) -> u32 {
        self.frequency_mhz
    }

    fn run(&self, args: &[&str]) -> MobilityResult<()> {
        let command = format!("{} {}", self.program.display(), args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| MobilityError::Command { command: command.clone(), reason: e.to_string() })?;

        if output.status.success() {
            log::debug!("ran `{command}`");
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(MobilityError::Command {
            command,
            reason: format!("{} {}", output.status, stderr.trim()).trim_end().to_owned(),
        })
    }
}

impl NetworkMembership for IwMembership {
    fn join(&self, location: &str) -> MobilityResult<()> {
        let freq = self.frequency_mhz.to_string();
        self.run(&[self.interface.as_str(), "ibss", "join", location, freq.as_str()])
    }

    fn leave(&self) -> MobilityResult<()> {
        self.run(&[self.interface.as_str(), "ibss", "leave"])
    }
}
