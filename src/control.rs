use crate::clock::ElapsedClock;
use crate::pid::PidController;

/// Trait for feedback controllers driven once per control cycle.
///
/// Implement this to plug a custom control law into the simulation loop.
pub trait Controller {
    /// Consume the current error (setpoint minus measurement) and return the
    /// actuator command.
    fn control(&mut self, error: f64) -> f64;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

impl<C: ElapsedClock> Controller for PidController<C> {
    fn control(&mut self, error: f64) -> f64 {
        self.update(error);
        self.sum()
    }

    fn reset(&mut self) {
        PidController::reset(self);
    }

    fn name(&self) -> &str {
        if self.config().clegg {
            "PID (Clegg)"
        } else {
            "PID"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::pid::PidConfig;

    #[test]
    fn pid_control_is_update_then_sum() {
        let time = ManualClock::new();
        let mut pid = PidController::with_clock(PidConfig::new(1.0, 1.0, 0.0), time.clone());
        let ctrl: &mut dyn Controller = &mut pid;

        time.advance(0.5);
        let out = ctrl.control(2.0);
        assert!((out - 3.0).abs() < 1e-10);

        ctrl.reset();
        assert_eq!(pid.sum(), 0.0);
    }

    #[test]
    fn names_reflect_integration_mode() {
        let plain = PidController::new(1.0, 0.0, 0.0);
        let clegg = PidController::with_clegg(1.0, 0.0, 0.0, true);
        assert_eq!(Controller::name(&plain), "PID");
        assert_eq!(Controller::name(&clegg), "PID (Clegg)");
    }
}
