use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Plant: 1-DOF mass-spring-damper with a constant load
// ---------------------------------------------------------------------------

/// Physical parameters of the controlled axis.
///
/// `load` is a constant external force (e.g. gravity on a lift). With a load,
/// a pure P controller settles with an offset; integral action removes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plant {
    pub mass: f64,      // kg
    pub damping: f64,   // N*s/m
    pub stiffness: f64, // N/m
    pub load: f64,      // N
}

impl Default for Plant {
    fn default() -> Self {
        Self {
            mass: 1.0,
            damping: 0.8,
            stiffness: 0.0,
            load: 0.0,
        }
    }
}

impl Plant {
    pub fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(Error::InvalidPlant(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        for (name, v) in [
            ("damping", self.damping),
            ("stiffness", self.stiffness),
            ("load", self.load),
        ] {
            if !v.is_finite() {
                return Err(Error::InvalidPlant(format!("{name} must be finite, got {v}")));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Plant state
// ---------------------------------------------------------------------------

/// Plant state at a single point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub time: f64,         // s
    pub x: Vector2<f64>,   // [position m, velocity m/s]
}

impl State {
    pub fn at_rest(position: f64) -> Self {
        Self { time: 0.0, x: Vector2::new(position, 0.0) }
    }

    pub fn position(&self) -> f64 {
        self.x[0]
    }

    pub fn velocity(&self) -> f64 {
        self.x[1]
    }

    /// Advance state by a derivative scaled by dt (used inside RK4).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            x: self.x + d.dx * dt,
        }
    }
}

/// State derivative: [velocity, acceleration].
#[derive(Debug, Clone)]
pub struct Deriv {
    pub dx: Vector2<f64>,
}

/// Equations of motion under actuator `force`.
pub fn derivatives(state: &State, plant: &Plant, force: f64) -> Deriv {
    let pos = state.position();
    let vel = state.velocity();
    let accel = (force + plant.load - plant.damping * vel - plant.stiffness * pos) / plant.mass;
    Deriv { dx: Vector2::new(vel, accel) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_accelerates_free_mass() {
        let plant = Plant { mass: 2.0, damping: 0.0, stiffness: 0.0, load: -4.0 };
        let d = derivatives(&State::at_rest(0.0), &plant, 0.0);
        assert!((d.dx[0]).abs() < 1e-12);
        assert!((d.dx[1] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn actuator_balances_load() {
        let plant = Plant::default();
        let d = derivatives(&State::at_rest(0.3), &plant, -plant.load);
        assert!(d.dx.norm() < 1e-12);
    }

    #[test]
    fn spring_and_damper_oppose_motion() {
        let plant = Plant { mass: 1.0, damping: 1.0, stiffness: 4.0, load: 0.0 };
        let state = State { time: 0.0, x: Vector2::new(0.5, 1.0) };
        let d = derivatives(&state, &plant, 0.0);
        assert!((d.dx[1] + 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Plant { mass: 0.0, ..Plant::default() }.validate().is_err());
        assert!(Plant { mass: f64::NAN, ..Plant::default() }.validate().is_err());
        assert!(Plant { damping: f64::INFINITY, ..Plant::default() }.validate().is_err());
        assert!(Plant::default().validate().is_ok());
    }
}
