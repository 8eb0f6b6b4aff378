use crate::config::SimulationParameters;

/// A Leaky Integrate and Fire (LIF) Neuron model.
///
/// The membrane obeys the conductance form of the LIF equation:
/// C_m * dV/dt = I(t) + G_l * (E_l - V)
/// where:
/// - C_m is the membrane capacitance
/// - V is the membrane potential
/// - E_l is the leak (resting) potential
/// - G_l is the leak conductance
/// - I(t) is the applied current at time t
///
/// There is no refractory period: the potential is clamped to the reset
/// value on the step that crosses threshold and integrates again from there.
#[derive(Clone, Debug, PartialEq)]
pub struct LIFNeuron {
    /// Current membrane potential (V)
    pub v: f64,
    /// Leak potential (V)
    pub e_leak: f64,
    /// Leak conductance (S)
    pub g_leak: f64,
    /// Membrane capacitance (F)
    pub c_m: f64,
    /// Threshold potential to trigger a spike (V)
    pub v_threshold: f64,
    /// Reset potential after a spike (V)
    pub v_reset: f64,
}

impl LIFNeuron {
    /// Creates a new LIFNeuron resting at its leak potential.
    pub fn new(e_leak: f64, g_leak: f64, c_m: f64, v_threshold: f64, v_reset: f64) -> Self {
        Self {
            v: e_leak,
            e_leak,
            g_leak,
            c_m,
            v_threshold,
            v_reset,
        }
    }

    /// Builds the neuron described by a parameter set.
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::new(
            params.e_leak,
            params.g_leak,
            params.c_m,
            params.v_threshold,
            params.v_reset,
        )
    }

    /// Rate of change of the membrane potential for the given input current.
    pub fn dv_dt(&self, i_ext: f64) -> f64 {
        (i_ext + self.g_leak * (self.e_leak - self.v)) / self.c_m
    }

    /// Updates the neuron state for a single time step.
    ///
    /// - `i_ext`: External input current (Amperes)
    /// - `dt`: Time step duration (seconds)
    ///
    /// Returns `true` if the neuron fired a spike. On a spike the stored
    /// potential is `v_reset`, not the supra-threshold Euler value.
    pub fn step(&mut self, i_ext: f64, dt: f64) -> bool {
        // Numerical integration using Euler method
        self.v += dt * self.dv_dt(i_ext);

        if self.v >= self.v_threshold {
            self.v = self.v_reset;
            true
        } else {
            false
        }
    }
}

impl Default for LIFNeuron {
    fn default() -> Self {
        Self::from_params(&SimulationParameters::default())
    }
}
