//! `field` — runs one device's DTN field experiment.
//!
//! Sweeps every batch size × sending frequency combination for five days
//! each, moving the device between ad-hoc networks according to its daily
//! schedule in `scheduling/<device_id>.yaml` and generating synthetic
//! messages throughout.
//!
//! Run with (needs permission to drive the wireless interface):
//!   sudo RUST_LOG=info field <device_id>

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use env_logger::Builder;
use log::{LevelFilter, info, warn};

use dtn_core::{DeviceId, ExperimentClock};
use dtn_experiment::{
    Coordinator, ExperimentConfig, ExperimentResult, RunParams, ScheduleSource, StoreFactory, Sweep,
    TransportFactory,
};
use dtn_mobility::IwMembership;
use dtn_output::{
    CsvSummaryWriter, EVENT_LOG_FILE, EventLog, EventLogObserver, EventLogTransport, SUMMARY_FILE,
};
use dtn_traffic::FileStore;

// ── Constants ─────────────────────────────────────────────────────────────────

const BATCH_SIZES:        [u32; 3] = [1, 10, 20];
/// Seconds between transmission opportunities.
const SENDING_FREQS:      [u32; 4] = [5, 10, 30, 60];
/// Mean seconds between generated messages (about 250 an hour).
const CREATION_RATE_SECS: f64      = 14.28;
const RUN_DAYS:           u64      = 5;
const INTERFACE:          &str     = "wlan0";
/// 802.11 channel 5.
const FREQUENCY_MHZ:      u32      = 2432;
const SCHEDULE_DIR:       &str     = "scheduling";
const DATA_DIR:           &str     = "data";

// ── Transport ─────────────────────────────────────────────────────────────────

struct LoggedTransports {
    events: Arc<EventLog>,
}

impl TransportFactory for LoggedTransports {
    type Transport = EventLogTransport;

    fn create(&mut self, params: &RunParams, interface: &str) -> ExperimentResult<Arc<EventLogTransport>> {
        info!(
            "transport for {} on {interface}: batch size {}, every {}s",
            params.run_id, params.batch_size, params.sending_freq
        );
        Ok(Arc::new(EventLogTransport::new(
            Arc::clone(&self.events),
            params.batch_size,
            params.sending_freq,
        )))
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// One append-only file per run: `data/<run_id>.ids`.
struct FileStores {
    dir: PathBuf,
}

impl StoreFactory for FileStores {
    type Store = FileStore;

    fn create(&mut self, params: &RunParams) -> ExperimentResult<Arc<FileStore>> {
        let path = self.dir.join(format!("{}.ids", params.run_id));
        Ok(Arc::new(FileStore::open(&path)?))
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let device = env::args().nth(1).context("usage: field <device_id>")?;
    let device = DeviceId::new(device);

    let data_dir = Path::new(DATA_DIR);
    fs::create_dir_all(data_dir).with_context(|| format!("creating {}", data_dir.display()))?;
    let events = Arc::new(EventLog::open(Path::new(EVENT_LOG_FILE))?);

    let config = ExperimentConfig {
        device:             device.clone(),
        sweep:              Sweep::new(BATCH_SIZES.to_vec(), SENDING_FREQS.to_vec()),
        creation_rate_secs: CREATION_RATE_SECS,
        run_duration:       Duration::from_secs(RUN_DAYS * 24 * 3_600),
        interface:          INTERFACE.to_owned(),
        clock:              ExperimentClock::default(),
        seed:               None,
    };
    info!(
        "device {device}: {} runs, {:?} in total",
        config.sweep.len(),
        config.sweep_duration()
    );

    let mut coordinator = Coordinator::new(
        config,
        ScheduleSource::for_device(Path::new(SCHEDULE_DIR), &device),
        LoggedTransports { events: Arc::clone(&events) },
        FileStores { dir: data_dir.to_path_buf() },
        IwMembership::new(INTERFACE).with_frequency(FREQUENCY_MHZ),
    )?;

    let signal = coordinator.shutdown_signal().clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, stopping the current run");
        signal.trigger();
    })?;

    let summary = CsvSummaryWriter::new(&data_dir.join(SUMMARY_FILE))?;
    let mut observer = EventLogObserver::new(events, summary);
    let report = coordinator.run(&mut observer);
    if let Some(e) = observer.take_error() {
        warn!("experiment output incomplete: {e}");
    }

    println!();
    println!("{:<14} {:>10} {:>10} {:>12}  outcome", "run", "messages", "moves", "elapsed");
    for run in &report.runs {
        println!(
            "{:<14} {:>10} {:>10} {:>11.0}s  {}",
            run.params.run_id.as_str(),
            run.messages,
            run.transitions,
            run.elapsed.as_secs_f64(),
            run.outcome
        );
    }

    if report.failed() > 0 {
        bail!("{} of {} runs failed", report.failed(), report.runs.len());
    }
    Ok(())
}
