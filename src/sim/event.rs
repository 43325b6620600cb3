use super::runner::Sample;

// ---------------------------------------------------------------------------
// Step-response events
// ---------------------------------------------------------------------------

/// Kinds of step-response events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Error changed sign (the instants at which Clegg integration zeroes
    /// the integrator).
    ErrorCrossing { rising: bool },
    /// Local maximum of position.
    Peak { position: f64 },
    /// Error stayed inside the band for the hold time, starting at `since`.
    Settled { since: f64 },
}

/// A discrete event found in a trajectory.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub sample: Sample,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind>;
}

/// Detects error sign changes, classifying `error > 0` as positive.
pub struct ErrorCrossingDetector;

impl EventDetector for ErrorCrossingDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        let was = prev.error > 0.0;
        let now = current.error > 0.0;
        (was != now).then_some(EventKind::ErrorCrossing { rising: now })
    }
}

/// Detects position peaks (velocity going from positive to non-positive).
pub struct PeakDetector;

impl EventDetector for PeakDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if prev.velocity > 0.0 && current.velocity <= 0.0 {
            Some(EventKind::Peak { position: current.position })
        } else {
            None
        }
    }
}

/// Fires once when |error| has stayed within `band` for `hold` seconds.
pub struct SettleDetector {
    pub band: f64,
    pub hold: f64,
    inside_since: Option<f64>,
    fired: bool,
}

impl SettleDetector {
    pub fn new(band: f64, hold: f64) -> Self {
        Self { band, hold, inside_since: None, fired: false }
    }
}

impl EventDetector for SettleDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if current.error.abs() > self.band {
            self.inside_since = None;
            return None;
        }
        let since = *self.inside_since.get_or_insert(if prev.error.abs() <= self.band {
            prev.time
        } else {
            current.time
        });
        if current.time - since >= self.hold {
            self.fired = true;
            Some(EventKind::Settled { since })
        } else {
            None
        }
    }
}

/// Crossing, peak and settle detectors for one step response.
///
/// `band` is the settle band on |error|, `hold` the time it must be held.
pub fn step_detectors(band: f64, hold: f64) -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(ErrorCrossingDetector),
        Box::new(PeakDetector),
        Box::new(SettleDetector::new(band, hold)),
    ]
}

/// Run every detector over consecutive sample pairs, in time order.
pub fn detect(trajectory: &[Sample], detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in trajectory.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent { time: pair[1].time, kind, sample: pair[1] });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pid::PidConfig;
    use crate::plant::Plant;
    use crate::sim::runner::{simulate, SimConfig};

    fn sample(time: f64, position: f64, velocity: f64) -> Sample {
        Sample { time, position, velocity, error: 1.0 - position, output: 0.0 }
    }

    #[test]
    fn crossing_detected_both_ways() {
        let mut det = ErrorCrossingDetector;
        let below = sample(0.0, 0.9, 1.0);
        let above = sample(0.1, 1.1, 1.0);
        assert_eq!(det.check(&below, &above), Some(EventKind::ErrorCrossing { rising: false }));
        assert_eq!(det.check(&above, &below), Some(EventKind::ErrorCrossing { rising: true }));
        assert_eq!(det.check(&below, &below), None);
    }

    #[test]
    fn peak_detected() {
        let mut det = PeakDetector;
        let prev = sample(1.0, 1.2, 0.1);
        let curr = sample(1.1, 1.21, -0.01);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Peak { position: 1.21 }));
    }

    #[test]
    fn settle_requires_hold_and_fires_once() {
        let mut det = SettleDetector::new(0.05, 0.15);
        let out = sample(0.0, 0.5, 0.0);
        let in1 = sample(0.1, 0.98, 0.0);
        let in2 = sample(0.2, 0.99, 0.0);
        let in3 = sample(0.3, 1.0, 0.0);
        assert_eq!(det.check(&out, &in1), None);
        assert_eq!(det.check(&in1, &in2), None);
        assert_eq!(det.check(&in2, &in3), Some(EventKind::Settled { since: 0.1 }));
        assert_eq!(det.check(&in3, &in3), None);
    }

    #[test]
    fn settle_restarts_after_leaving_band() {
        let mut det = SettleDetector::new(0.05, 0.2);
        assert_eq!(det.check(&sample(0.0, 0.5, 0.0), &sample(0.1, 1.0, 0.0)), None);
        assert_eq!(det.check(&sample(0.1, 1.0, 0.0), &sample(0.2, 1.2, 0.0)), None);
        assert_eq!(det.check(&sample(0.2, 1.2, 0.0), &sample(0.3, 1.0, 0.0)), None);
        assert_eq!(
            det.check(&sample(0.3, 1.0, 0.0), &sample(0.6, 1.0, 0.0)),
            Some(EventKind::Settled { since: 0.3 })
        );
    }

    #[test]
    fn clegg_run_crosses_and_settles() {
        let traj = simulate(
            &Plant::default(),
            &PidConfig::new(4.0, 2.0, 1.0).clegg(true),
            &SimConfig::default(),
        )
        .unwrap();
        let events = detect(&traj, &mut step_detectors(0.02, 1.0));

        let crossings = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::ErrorCrossing { .. }))
            .count();
        assert!(crossings >= 1);
        assert_eq!(
            events.iter().filter(|e| matches!(e.kind, EventKind::Settled { .. })).count(),
            1
        );
        assert!(events.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn overshooting_run_reports_its_peak() {
        let traj = simulate(
            &Plant::default(),
            &PidConfig::new(4.0, 2.0, 1.0),
            &SimConfig::default(),
        )
        .unwrap();
        let events = detect(&traj, &mut step_detectors(0.02, 1.0));

        let first_peak = events
            .iter()
            .find_map(|e| match e.kind {
                EventKind::Peak { position } => Some(position),
                _ => None,
            })
            .expect("an overshooting response has a peak");
        assert!(first_peak > 1.0, "first peak {first_peak} should overshoot");
    }
}
