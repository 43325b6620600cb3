use serde::{Deserialize, Serialize};

use crate::clock::{ElapsedClock, MonotonicClock};

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Gains and integration mode, fixed for the life of a controller.
///
/// Gains are not validated: zero disables a term, a negative gain inverts it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Zero the integrator whenever the error changes sign.
    pub clegg: bool,
}

impl PidConfig {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, clegg: false }
    }

    pub fn clegg(mut self, clegg: bool) -> Self {
        self.clegg = clegg;
        self
    }
}

/// Sign of the most recent error, as seen by Clegg integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorSign {
    #[default]
    NonPositive,
    Positive,
}

impl ErrorSign {
    pub fn of(error: f64) -> Self {
        if error > 0.0 {
            ErrorSign::Positive
        } else {
            ErrorSign::NonPositive
        }
    }
}

/// One value per PID term.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Terms {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

impl Terms {
    pub fn total(&self) -> f64 {
        self.p + self.i + self.d
    }
}

// ---------------------------------------------------------------------------
// PID Controller (single axis)
// ---------------------------------------------------------------------------

/// Single-axis PID controller that times its own updates.
///
/// The time step for integration and differentiation is whatever the clock
/// reports since the previous `update` or `reset`.
///
/// ```
/// use clegg_pid::clock::ManualClock;
/// use clegg_pid::pid::{PidConfig, PidController};
///
/// let time = ManualClock::new();
/// let mut pid = PidController::with_clock(PidConfig::new(1.0, 0.5, 0.1).clegg(true), time.clone());
///
/// time.advance(1.0);
/// pid.update(2.0);
/// assert!((pid.sum() - 3.2).abs() < 1e-10);
///
/// time.advance(1.0);
/// pid.update(-1.0);
/// assert!((pid.sum() + 1.8).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct PidController<C = MonotonicClock> {
    config: PidConfig,
    p: f64,
    i: f64,
    d: f64,
    last_error: f64,
    sign: ErrorSign,
    clock: C,
}

impl PidController<MonotonicClock> {
    /// Wall-clock controller with plain integration.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self::with_clegg(kp, ki, kd, false)
    }

    /// Wall-clock controller, optionally with Clegg integration.
    pub fn with_clegg(kp: f64, ki: f64, kd: f64, clegg: bool) -> Self {
        Self::with_clock(PidConfig::new(kp, ki, kd).clegg(clegg), MonotonicClock::new())
    }
}

impl<C: ElapsedClock> PidController<C> {
    pub fn with_clock(config: PidConfig, clock: C) -> Self {
        let mut pid = Self {
            config,
            p: 0.0,
            i: 0.0,
            d: 0.0,
            last_error: 0.0,
            sign: ErrorSign::NonPositive,
            clock,
        };
        pid.reset();
        pid
    }

    /// Feed one error sample (setpoint minus measurement).
    ///
    /// A non-positive or non-finite time step contributes nothing to the
    /// integral and leaves the derivative at its previous value.
    pub fn update(&mut self, error: f64) {
        let sign = ErrorSign::of(error);
        if self.config.clegg && sign != self.sign {
            self.sign = sign;
            self.i = 0.0;
        }

        let dt = self.clock.elapsed();
        self.p = error;
        if dt.is_finite() && dt > 0.0 {
            self.i += error * dt;
            self.d = (error - self.last_error) / dt;
        }
        self.last_error = error;
        self.clock.reset();
    }

    /// Zero all accumulated state and restart the clock.
    pub fn reset(&mut self) {
        self.p = 0.0;
        self.i = 0.0;
        self.d = 0.0;
        self.last_error = 0.0;
        self.sign = ErrorSign::NonPositive;
        self.clock.reset();
    }

    /// Weighted output: `p*kp + i*ki + d*kd`.
    pub fn sum(&self) -> f64 {
        self.p * self.config.kp + self.i * self.config.ki + self.d * self.config.kd
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn i(&self) -> f64 {
        self.i
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn sign(&self) -> ErrorSign {
        self.sign
    }

    /// Raw accumulators, unweighted.
    pub fn terms(&self) -> Terms {
        Terms { p: self.p, i: self.i, d: self.d }
    }

    /// Per-term contribution to `sum()`.
    pub fn contributions(&self) -> Terms {
        Terms {
            p: self.p * self.config.kp,
            i: self.i * self.config.ki,
            d: self.d * self.config.kd,
        }
    }
}
