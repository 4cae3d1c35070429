//! `Coordinator` — runs every sweep combination in turn.

use std::sync::Arc;
use std::time::Instant;

use dtn_mobility::{LocationEngine, NetworkMembership};
use dtn_traffic::MessageGenerator;

use crate::{
    ExperimentConfig, ExperimentError, ExperimentObserver, ExperimentResult, RunGuard, RunOutcome,
    RunParams, RunReport, ScheduleSource, ShutdownSignal, StoreFactory, SweepReport,
    TransportFactory,
};

/// What a run that got its engines started produced.
struct RunStats {
    interrupted: bool,
    messages:    u64,
    transitions: u64,
}

/// Drives a device through its sweep.
///
/// Each combination gets a fresh transport, store, message generator and
/// location engine.  All of them are gone before the next combination
/// starts.  The message counter carries over, so identifiers stay unique
/// across the whole sweep.
///
/// # Type parameters
///
/// - `TF` builds transports, `SF` builds message stores.
/// - `M` joins and leaves ad-hoc networks; one instance serves every run.
pub struct Coordinator<TF, SF, M>
where
    TF: TransportFactory,
    SF: StoreFactory,
    M: NetworkMembership,
{
    config:       ExperimentConfig,
    schedule:     ScheduleSource,
    transports:   TF,
    stores:       SF,
    membership:   Arc<M>,
    shutdown:     ShutdownSignal,
    next_counter: u64,
}

impl<TF, SF, M> Coordinator<TF, SF, M>
where
    TF: TransportFactory,
    SF: StoreFactory,
    M: NetworkMembership,
{
    /// # Errors
    ///
    /// [`ExperimentError::Config`] if `config` fails validation.
    pub fn new(
        config:     ExperimentConfig,
        schedule:   ScheduleSource,
        transports: TF,
        stores:     SF,
        membership: M,
    ) -> ExperimentResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            schedule,
            transports,
            stores,
            membership:   Arc::new(membership),
            shutdown:     ShutdownSignal::new(),
            next_counter: 0,
        })
    }

    /// Share `signal` instead of the coordinator's own.
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = signal;
        self
    }

    /// Continue an earlier sweep's message numbering.
    pub fn with_first_counter(mut self, counter: u64) -> Self {
        self.next_counter = counter;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Counter the next generated message will carry.
    pub fn next_counter(&self) -> u64 {
        self.next_counter
    }

    pub fn transports(&self) -> &TF {
        &self.transports
    }

    pub fn stores(&self) -> &SF {
        &self.stores
    }

    // ── Sweep ─────────────────────────────────────────────────────────────

    /// Run every combination, or until the shutdown signal fires.
    ///
    /// A combination that cannot be constructed is logged and recorded as
    /// [`RunOutcome::Failed`]; the sweep moves on.
    pub fn run<O: ExperimentObserver>(&mut self, observer: &mut O) -> SweepReport {
        let mut report = SweepReport::default();
        let runs: Vec<RunParams> = self.config.sweep.runs(self.config.creation_rate_secs).collect();
        log::info!(
            "device {}: {} runs of {:?} each",
            self.config.device,
            runs.len(),
            self.config.run_duration
        );

        for params in runs {
            if self.shutdown.is_triggered() {
                log::warn!("shutdown requested, skipping remaining runs");
                break;
            }

            observer.on_run_start(&params);
            let run = self.run_one(params);
            observer.on_run_end(&run);
            let interrupted = run.outcome == RunOutcome::Interrupted;
            report.runs.push(run);
            if interrupted {
                break;
            }
        }

        log::info!(
            "sweep finished: {} completed, {} failed{}",
            report.completed(),
            report.failed(),
            if report.interrupted() { ", interrupted" } else { "" }
        );
        observer.on_sweep_end(&report);
        report
    }

    fn run_one(&mut self, params: RunParams) -> RunReport {
        log::info!(
            "run {} started: batch size {}, sending frequency {}s",
            params.run_id,
            params.batch_size,
            params.sending_freq
        );
        let began = Instant::now();

        let (outcome, messages, transitions) = match self.execute(&params) {
            Ok(stats) if stats.interrupted => (RunOutcome::Interrupted, stats.messages, stats.transitions),
            Ok(stats) => (RunOutcome::Completed, stats.messages, stats.transitions),
            Err(e) => {
                let e = ExperimentError::Construction { run: params.run_id.clone(), source: Box::new(e) };
                log::error!("{e}");
                (RunOutcome::Failed(e.to_string()), 0, 0)
            }
        };

        let elapsed = began.elapsed();
        log::info!(
            "run {} {outcome} after {elapsed:?} ({messages} messages, {transitions} transitions)",
            params.run_id
        );
        RunReport { params, outcome, messages, transitions, elapsed }
    }

    fn execute(&mut self, params: &RunParams) -> ExperimentResult<RunStats> {
        // Everything fallible is built before any engine starts.
        let transport = self.transports.create(params, &self.config.interface)?;
        let store = self.stores.create(params)?;
        let schedule = self.schedule.load()?;

        let mut generator = MessageGenerator::new(self.config.device.clone(), self.config.creation_rate_secs, store)?
            .with_first_counter(self.next_counter);
        if let Some(seed) = self.config.seed {
            generator = generator.with_seed(seed.wrapping_add(params.index as u64));
        }
        let location = LocationEngine::new(schedule, transport, Arc::clone(&self.membership), self.config.clock);

        // Declared generator first: dropped last.
        let mut generator = RunGuard::start(generator)?;
        let mut location = match RunGuard::start(location) {
            Ok(guard) => guard,
            Err(e) => {
                let stopped = generator.finish();
                self.next_counter = generator.engine().next_counter();
                stopped?;
                return Err(e.into());
            }
        };

        let interrupted = self.shutdown.wait_timeout(self.config.run_duration);
        if interrupted {
            log::warn!("run {} interrupted", params.run_id);
        }

        let location_stopped = location.finish();
        let generator_stopped = generator.finish();
        self.next_counter = generator.engine().next_counter();
        location_stopped?;
        generator_stopped?;

        Ok(RunStats {
            interrupted,
            messages:    generator.engine().generated(),
            transitions: location.engine().transitions(),
        })
    }
}
