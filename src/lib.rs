//! # lif-trace
//!
//! Simulation of a single leaky integrate-and-fire neuron driven by a
//! rectangular current pulse.
//!
//! The membrane potential is integrated with forward Euler on a fixed grid;
//! crossing the threshold records a spike and clamps the potential to the
//! reset value on the same sample. Each applied-current magnitude in a
//! [`TrialSet`] yields one [`SimulationTrace`], which [`TraceTable`] lays out
//! as `Time`, `Membrane Potential`, `Current` and `Spikes` columns.

pub mod config;
pub mod error;
pub mod grid;
pub mod neuron;
pub mod report;
pub mod simulator;
pub mod stats;
pub mod trials;

pub use config::{Config, ConfigError, SimulationParameters};
pub use error::{Error, Result};
pub use grid::{InputCurrentTrace, TimeGrid};
pub use neuron::LIFNeuron;
pub use report::{TraceArchive, TraceRow, TraceTable, PREVIEW_ROWS};
pub use simulator::{SimulationTrace, Simulator};
pub use stats::SpikeSummary;
pub use trials::{TrialRunner, TrialSet};
