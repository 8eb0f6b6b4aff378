use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigResult, SimulationParameters};
use crate::grid::{InputCurrentTrace, TimeGrid};
use crate::neuron::LIFNeuron;

/// Output of one run. All sequences are index-aligned and have the grid's length.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimulationTrace {
    /// Applied current magnitude that produced this trace (A)
    pub applied_current: f64,
    /// Sample times (s)
    pub time: Vec<f64>,
    /// Injected current per sample (A)
    pub current: Vec<f64>,
    /// Membrane potential per sample (V)
    pub potential: Vec<f64>,
    /// 1 where a spike was recorded, 0 elsewhere
    pub spikes: Vec<u8>,
}

impl SimulationTrace {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Grid indices at which the neuron fired.
    pub fn spike_indices(&self) -> Vec<usize> {
        self.spikes
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Times at which the neuron fired (s).
    pub fn spike_times(&self) -> Vec<f64> {
        self.spike_indices()
            .into_iter()
            .map(|i| self.time[i])
            .collect()
    }

    pub fn spike_count(&self) -> usize {
        self.spikes.iter().filter(|&&s| s == 1).count()
    }
}

/// Integrates a single LIF neuron over a fixed grid.
///
/// Parameters are validated once at construction; [`Simulator::run`] is then
/// a pure function of the applied current and may be called concurrently.
#[derive(Clone, Debug)]
pub struct Simulator {
    params: SimulationParameters,
}

impl Simulator {
    pub fn new(params: SimulationParameters) -> ConfigResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid::linspace(self.params.t0, self.params.t_max, self.params.num_steps())
    }

    pub fn input_current(&self, magnitude: f64) -> InputCurrentTrace {
        let n = self.params.num_steps();
        let onset = self.params.onset_index();
        let offset = self.params.offset_index();
        if offset > n {
            debug!(offset, n, "Current offset clamped to grid length");
        }
        if onset >= n {
            warn!(onset, n, "Current onset lies past the grid; trace carries no stimulus");
        }
        InputCurrentTrace::pulse(n, onset, offset, magnitude)
    }

    /// Runs one trial with the given applied current (A).
    pub fn run(&self, magnitude: f64) -> SimulationTrace {
        let time = self.time_grid();
        let current = self.input_current(magnitude);
        let n = time.len();

        let mut neuron = LIFNeuron::from_params(&self.params);
        let mut potential = vec![0.0; n];
        let mut spikes = vec![0u8; n];

        if n > 0 {
            potential[0] = neuron.v;
        }

        // Each step depends on the previous one; this loop must stay sequential.
        let drive = current.as_slice();
        for i in 1..n {
            if neuron.step(drive[i], self.params.dt) {
                spikes[i] = 1;
                debug!(index = i, t = time.as_slice()[i], "Spike");
            }
            potential[i] = neuron.v;
        }

        SimulationTrace {
            applied_current: magnitude,
            time: time.into_inner(),
            current: current.into_inner(),
            potential,
            spikes,
        }
    }
}
