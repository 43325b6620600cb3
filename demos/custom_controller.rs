use clegg_pid::clock::ManualClock;
use clegg_pid::io::json::StepSummary;
use clegg_pid::plant::Plant;
use clegg_pid::sim::{self, SimConfig};
use clegg_pid::{Controller, PidConfig};

/// A relay controller: full force towards the setpoint, nothing inside the
/// deadband.
struct BangBangController {
    force: f64,
    deadband: f64,
}

impl Controller for BangBangController {
    fn control(&mut self, error: f64) -> f64 {
        if error > self.deadband {
            self.force
        } else if error < -self.deadband {
            -self.force
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn report(name: &str, traj: &[sim::Sample], setpoint: f64) {
    let Some(s) = StepSummary::from_trajectory(traj, setpoint) else {
        return;
    };
    println!(
        "{:>12}: peak {:.3} m ({:.1}% overshoot), final error {:+.4} m, peak output {:.1}",
        name, s.peak_position, s.overshoot_pct, s.final_error, s.peak_output
    );
}

fn main() {
    let plant = Plant::default();
    let config = SimConfig { dt: 0.005, ..SimConfig::default() };

    let mut relay = BangBangController { force: 3.0, deadband: 0.01 };
    println!("Simulating with {} controller...", relay.name());
    let clock = ManualClock::new();
    let traj = sim::simulate_with(&plant, &config, &mut relay, &clock);
    report(relay.name(), &traj, config.setpoint);

    for clegg in [false, true] {
        let pid = PidConfig::new(4.0, 2.0, 1.0).clegg(clegg);
        match sim::simulate(&plant, &pid, &config) {
            Ok(traj) => report(if clegg { "PID (Clegg)" } else { "PID" }, &traj, config.setpoint),
            Err(e) => eprintln!("error: {e}"),
        }
    }
}
