use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::simulator::{SimulationTrace, Simulator};

/// Applied-current magnitudes to try, one independent trial each.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrialSet {
    /// Current magnitudes (A), in trial order
    pub applied_currents: Vec<f64>,
}

impl TrialSet {
    pub fn new(applied_currents: Vec<f64>) -> Self {
        Self { applied_currents }
    }

    pub fn len(&self) -> usize {
        self.applied_currents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied_currents.is_empty()
    }
}

impl Default for TrialSet {
    fn default() -> Self {
        Self::new(vec![5e-10])
    }
}

/// Runs a [`Simulator`] once per magnitude of a [`TrialSet`].
pub struct TrialRunner {
    simulator: Simulator,
    parallel: bool,
}

impl TrialRunner {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator,
            parallel: true,
        }
    }

    /// Runs trials one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Returns one trace per magnitude, in the order of the trial set.
    pub fn run(&self, trials: &TrialSet) -> Vec<SimulationTrace> {
        info!(
            trials = trials.len(),
            steps = self.simulator.params().num_steps(),
            parallel = self.parallel,
            "Running trials"
        );

        let run_one = |(idx, &magnitude): (usize, &f64)| {
            let trace = self.simulator.run(magnitude);
            debug!(
                trial = idx,
                applied_current = magnitude,
                spikes = trace.spike_count(),
                "Trial complete"
            );
            trace
        };

        // Indexed parallel iterators keep the input order on collect.
        if self.parallel {
            trials
                .applied_currents
                .par_iter()
                .enumerate()
                .map(run_one)
                .collect()
        } else {
            trials
                .applied_currents
                .iter()
                .enumerate()
                .map(run_one)
                .collect()
        }
    }
}
