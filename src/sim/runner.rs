use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;
use crate::control::Controller;
use crate::error::{Error, Result};
use crate::pid::{PidConfig, PidController};
use crate::plant::{Plant, State};
use super::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Longest run accepted, in control cycles. The trajectory is preallocated.
pub const MAX_STEPS: usize = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,               // control and integration period, s
    pub max_time: f64,         // s
    pub setpoint: f64,         // m
    pub initial_position: f64, // m
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,        // 100 Hz
            max_time: 10.0,
            setpoint: 1.0,
            initial_position: 0.0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidSim(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.max_time.is_finite() && self.max_time > 0.0) {
            return Err(Error::InvalidSim(format!(
                "max_time must be positive, got {}",
                self.max_time
            )));
        }
        if self.dt > self.max_time {
            return Err(Error::InvalidSim(format!(
                "dt ({}) exceeds max_time ({})",
                self.dt, self.max_time
            )));
        }
        if (self.max_time / self.dt).round() > MAX_STEPS as f64 {
            return Err(Error::InvalidSim(format!(
                "max_time / dt exceeds {MAX_STEPS} steps (dt {}, max_time {})",
                self.dt, self.max_time
            )));
        }
        if !(self.setpoint.is_finite() && self.initial_position.is_finite()) {
            return Err(Error::InvalidSim("setpoint and initial position must be finite".into()));
        }
        Ok(())
    }

    /// Number of control cycles in one run.
    pub fn steps(&self) -> usize {
        (self.max_time / self.dt).round() as usize
    }
}

// ---------------------------------------------------------------------------
// Trajectory sample
// ---------------------------------------------------------------------------

/// One recorded point of a closed-loop run.
///
/// `output` is the command that was applied over the step ending at `time`
/// (zero for the initial sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub error: f64,
    pub output: f64,
}

impl Sample {
    fn record(state: &State, setpoint: f64, output: f64) -> Self {
        Self {
            time: state.time,
            position: state.position(),
            velocity: state.velocity(),
            error: setpoint - state.position(),
            output,
        }
    }
}

// ---------------------------------------------------------------------------
// Closed-loop simulation
// ---------------------------------------------------------------------------

/// Run a step response with a custom controller.
///
/// `clock` is advanced by `dt` before every control call, so controllers that
/// time themselves with a clone of it see exactly one period per update.
/// Returns `steps() + 1` samples, the first at t = 0.
pub fn simulate_with(
    plant: &Plant,
    config: &SimConfig,
    controller: &mut dyn Controller,
    clock: &ManualClock,
) -> Vec<Sample> {
    let mut state = State::at_rest(config.initial_position);
    state.time = clock.now();

    let steps = config.steps();
    let mut trajectory = Vec::with_capacity(steps.min(1_000_000) + 1);
    trajectory.push(Sample::record(&state, config.setpoint, 0.0));

    for _ in 0..steps {
        clock.advance(config.dt);
        let error = config.setpoint - state.position();
        let output = controller.control(error);

        state = rk4_step(&state, plant, output, config.dt);
        trajectory.push(Sample::record(&state, config.setpoint, output));
    }

    trajectory
}

/// Simulate with a PID controller timed by a fresh manual clock.
pub fn simulate(plant: &Plant, pid: &PidConfig, config: &SimConfig) -> Result<Vec<Sample>> {
    plant.validate()?;
    config.validate()?;

    let clock = ManualClock::new();
    let mut controller = PidController::with_clock(*pid, clock.clone());
    Ok(simulate_with(plant, config, &mut controller, &clock))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
