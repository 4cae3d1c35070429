//! `throughput` — one fixed-network transport run.
//!
//! Joins the shared `test` network, waits for it to settle, then runs the
//! transport for five minutes with the given sending frequency and batch
//! size.  Sends and receives land in `network_events.log` for offline
//! throughput counting.
//!
//! Run with (needs permission to drive the wireless interface):
//!   sudo RUST_LOG=info throughput <device_id> <sending_freq> <batch_size>

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use env_logger::Builder;
use log::{LevelFilter, info, warn};

use dtn_core::DeviceId;
use dtn_experiment::{RunOutcome, ThroughputConfig, ThroughputRun};
use dtn_mobility::IwMembership;
use dtn_output::{EVENT_LOG_FILE, EventLog, EventLogTransport};

const USAGE: &str = "usage: throughput <device_id> <sending_freq> <batch_size>";
const INTERFACE: &str = "wlan0";
/// 802.11 channel 5.
const FREQUENCY_MHZ: u32 = 2432;

fn main() -> Result<()> {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [device, sending_freq, batch_size] = args.as_slice() else {
        bail!(USAGE);
    };
    let sending_freq: u32 = sending_freq
        .parse()
        .with_context(|| format!("sending_freq must be whole seconds, got '{sending_freq}'\n{USAGE}"))?;
    let batch_size: u32 = batch_size
        .parse()
        .with_context(|| format!("batch_size must be a number of packets, got '{batch_size}'\n{USAGE}"))?;

    let config = ThroughputConfig::new(DeviceId::new(device.clone()), batch_size, sending_freq);
    let events = Arc::new(EventLog::open(Path::new(EVENT_LOG_FILE))?);
    let transport = Arc::new(EventLogTransport::new(Arc::clone(&events), batch_size, sending_freq));
    let run = ThroughputRun::new(
        config,
        transport,
        IwMembership::new(INTERFACE).with_frequency(FREQUENCY_MHZ),
    )?;

    let signal = run.shutdown_signal().clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, stopping the transport");
        signal.trigger();
    })?;

    events.record_start(batch_size, sending_freq)?;
    let report = run.run()?;
    info!(
        "{}: {} after {:.0}s{}",
        report.experiment_id,
        report.outcome,
        report.elapsed.as_secs_f64(),
        if report.joined { "" } else { " (network join failed)" }
    );

    if report.outcome == RunOutcome::Interrupted {
        bail!("{} was interrupted", report.experiment_id);
    }
    Ok(())
}
