//! Simulation configuration.
//!
//! All biological and numerical constants live in [`SimulationParameters`];
//! the applied-current magnitudes to try live in [`TrialSet`]. Both can be
//! read from a TOML file in which every key is optional:
//!
//! ```toml
//! [simulation]
//! dt = 1e-4
//! t_max = 2.0
//! El = -0.07        # short names such as El, Vth, ton also work
//!
//! [trials]
//! applied_currents = [5e-10, 1e-9]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::trials::TrialSet;

/// Reasons a configuration is rejected before any simulation runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Time step must be positive, got dt = {0}")]
    NonPositiveStep(f64),

    #[error("Start time must not be negative, got t0 = {0}")]
    NegativeStart(f64),

    #[error("Simulation horizon is empty: t_max = {t_max} <= t0 = {t0}")]
    EmptyHorizon { t0: f64, t_max: f64 },

    #[error("Current onset {t_on} precedes the start time t0 = {t0}")]
    OnsetBeforeStart { t_on: f64, t0: f64 },

    #[error("Current onset {t_on} must precede offset {t_off}")]
    InvalidStimulusWindow { t_on: f64, t_off: f64 },

    #[error("Current offset {t_off} lies beyond the horizon t_max = {t_max}")]
    StimulusBeyondHorizon { t_off: f64, t_max: f64 },

    #[error("Parameter {0} is not a finite number")]
    NonFinite(&'static str),

    #[error("Trial set contains no applied currents")]
    NoTrials,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Immutable parameter set for one neuron and its stimulus window.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationParameters {
    /// Initial time (s)
    pub t0: f64,
    /// Integration step (s)
    pub dt: f64,
    /// Simulation horizon (s)
    #[serde(alias = "tmax")]
    pub t_max: f64,
    /// Leak potential (V)
    #[serde(alias = "El")]
    pub e_leak: f64,
    /// Membrane resistance (Ohm)
    #[serde(alias = "Rm")]
    pub r_m: f64,
    /// Membrane capacitance (F)
    #[serde(alias = "Cm")]
    pub c_m: f64,
    /// Spike threshold (V)
    #[serde(alias = "Vth")]
    pub v_threshold: f64,
    /// Reset potential (V)
    #[serde(alias = "Vreset")]
    pub v_reset: f64,
    /// Leak conductance (S)
    #[serde(alias = "Gl")]
    pub g_leak: f64,
    /// Applied current onset (s)
    #[serde(alias = "ton")]
    pub t_on: f64,
    /// Applied current offset (s)
    #[serde(alias = "toff")]
    pub t_off: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            t0: 0.0,
            dt: 1e-4,
            t_max: 2.0,
            e_leak: -0.07,
            r_m: 5000.0,
            c_m: 2e-9,
            v_threshold: -0.05,
            v_reset: -0.065,
            g_leak: 1e-8,
            t_on: 0.90,
            t_off: 1.10,
        }
    }
}

impl SimulationParameters {
    /// Rejects parameter sets that would produce degenerate or truncated grids.
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("t0", self.t0),
            ("dt", self.dt),
            ("t_max", self.t_max),
            ("e_leak", self.e_leak),
            ("r_m", self.r_m),
            ("c_m", self.c_m),
            ("v_threshold", self.v_threshold),
            ("v_reset", self.v_reset),
            ("g_leak", self.g_leak),
            ("t_on", self.t_on),
            ("t_off", self.t_off),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }

        if self.dt <= 0.0 {
            return Err(ConfigError::NonPositiveStep(self.dt));
        }
        if self.t0 < 0.0 {
            return Err(ConfigError::NegativeStart(self.t0));
        }
        if self.t_max <= self.t0 {
            return Err(ConfigError::EmptyHorizon {
                t0: self.t0,
                t_max: self.t_max,
            });
        }
        if self.t_on < self.t0 {
            return Err(ConfigError::OnsetBeforeStart {
                t_on: self.t_on,
                t0: self.t0,
            });
        }
        if self.t_on >= self.t_off {
            return Err(ConfigError::InvalidStimulusWindow {
                t_on: self.t_on,
                t_off: self.t_off,
            });
        }
        if self.t_off > self.t_max {
            return Err(ConfigError::StimulusBeyondHorizon {
                t_off: self.t_off,
                t_max: self.t_max,
            });
        }
        Ok(())
    }

    /// Number of grid samples, `floor(t_max / dt)`.
    pub fn num_steps(&self) -> usize {
        (self.t_max / self.dt).floor() as usize
    }

    /// Index of the first sample carrying the applied current.
    ///
    /// `round(t_on / dt) + 1`, so the pulse starts one sample after `t_on`.
    pub fn onset_index(&self) -> usize {
        step_index(self.t_on, self.dt)
    }

    /// Index one past the last sample carrying the applied current.
    pub fn offset_index(&self) -> usize {
        step_index(self.t_off, self.dt)
    }

    /// Leak time constant `C_m / G_l` (s), the one the integration follows.
    pub fn time_constant(&self) -> f64 {
        self.c_m / self.g_leak
    }

    /// Nominal `R_m * C_m` (s). `r_m` does not enter the update rule.
    pub fn rc_constant(&self) -> f64 {
        self.r_m * self.c_m
    }

    /// Potential the membrane relaxes to under a constant current `i_app`.
    pub fn steady_state(&self, i_app: f64) -> f64 {
        self.e_leak + i_app / self.g_leak
    }
}

// Ties round to the even neighbour.
fn step_index(t: f64, dt: f64) -> usize {
    (t / dt).round_ties_even() as usize + 1
}

/// Everything the binary needs to run: the neuron and the trials to drive it with.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationParameters,
    pub trials: TrialSet,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// File contents when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                tracing::debug!(path = %path.display(), "Loaded configuration file");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.simulation.validate()?;
        if self.trials.is_empty() {
            return Err(ConfigError::NoTrials);
        }
        Ok(())
    }
}
