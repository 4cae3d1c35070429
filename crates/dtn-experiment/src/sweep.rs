//! The parameter sweep: every batch size × sending frequency combination.

use dtn_core::RunId;

/// Transport parameters to sweep.
///
/// Combinations run with batch size as the outer loop and sending frequency
/// as the inner one, each in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sweep {
    pub batch_sizes:   Vec<u32>,
    /// Seconds between two transmission opportunities.
    pub sending_freqs: Vec<u32>,
}

impl Sweep {
    pub fn new(batch_sizes: Vec<u32>, sending_freqs: Vec<u32>) -> Self {
        Self { batch_sizes, sending_freqs }
    }

    /// Number of combinations.
    pub fn len(&self) -> usize {
        self.batch_sizes.len() * self.sending_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All combinations in run order.  `creation_rate_secs` becomes part of
    /// each run id.
    pub fn runs(&self, creation_rate_secs: f64) -> impl Iterator<Item = RunParams> + '_ {
        self.batch_sizes
            .iter()
            .flat_map(move |&bs| self.sending_freqs.iter().map(move |&sf| (bs, sf)))
            .enumerate()
            .map(move |(index, (batch_size, sending_freq))| {
                RunParams::new(index, batch_size, sending_freq, creation_rate_secs)
            })
    }
}

/// One sweep combination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunParams {
    /// Position in the sweep, from 0.
    pub index:        usize,
    pub batch_size:   u32,
    pub sending_freq: u32,
    /// `<batch_size>_<sending_freq>_<creation_rate>`, also the name of the
    /// run's data store.
    pub run_id:       RunId,
}

impl RunParams {
    pub fn new(index: usize, batch_size: u32, sending_freq: u32, creation_rate_secs: f64) -> Self {
        Self {
            index,
            batch_size,
            sending_freq,
            run_id: RunId::new(format!("{batch_size}_{sending_freq}_{creation_rate_secs}")),
        }
    }
}
