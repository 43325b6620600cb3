use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use clegg_pid::config::TuningFile;
use clegg_pid::io::{csv, json};
use clegg_pid::io::json::StepSummary;
use clegg_pid::sim::event::{self, EventKind, SimEvent};
use clegg_pid::sim::{self, Sample};
use clegg_pid::PidConfig;

#[derive(Parser, Debug)]
#[command(name = "clegg-pid", version, about = "Simulate a PID step response on a 1-DOF plant")]
struct Cli {
    /// TOML tuning file with [pid], [plant] and [sim] sections
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, allow_hyphen_values = true)]
    kp: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    ki: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    kd: Option<f64>,

    /// Enable Clegg integration
    #[arg(long, conflicts_with = "no_clegg")]
    clegg: bool,

    /// Disable Clegg integration
    #[arg(long)]
    no_clegg: bool,

    #[arg(long, allow_hyphen_values = true)]
    setpoint: Option<f64>,

    /// Control period, s
    #[arg(long)]
    dt: Option<f64>,

    /// Run length, s
    #[arg(long)]
    max_time: Option<f64>,

    /// Also run with the opposite integration mode and compare
    #[arg(long)]
    compare: bool,

    /// Write the trajectory as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Write the tuning and step summary as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> clegg_pid::Result<()> {
    let mut tuning = match &cli.config {
        Some(path) => TuningFile::load(path)?,
        None => TuningFile::default(),
    };
    apply_overrides(&mut tuning, cli);
    tuning.validate()?;

    let trajectory = sim::simulate(&tuning.plant, &tuning.pid, &tuning.sim)?;
    let Some(summary) = StepSummary::from_trajectory(&trajectory, tuning.sim.setpoint) else {
        return Ok(());
    };
    let events = find_events(&trajectory, &tuning);

    print_report(&tuning, &trajectory, &summary, &events);

    if cli.compare {
        let other = tuning.pid.clegg(!tuning.pid.clegg);
        let other_traj = sim::simulate(&tuning.plant, &other, &tuning.sim)?;
        if let Some(other_summary) = StepSummary::from_trajectory(&other_traj, tuning.sim.setpoint) {
            print_comparison(&[(tuning.pid, &summary), (other, &other_summary)]);
        }
    }

    if let Some(path) = &cli.csv {
        csv::write_trajectory_file(path, &trajectory)?;
        println!("  Trajectory written to {}", path.display());
    }
    if let Some(path) = &cli.json {
        json::write_summary_file(path, &tuning.pid, &summary)?;
        println!("  Summary written to {}", path.display());
    }

    Ok(())
}

fn apply_overrides(tuning: &mut TuningFile, cli: &Cli) {
    if let Some(kp) = cli.kp {
        tuning.pid.kp = kp;
    }
    if let Some(ki) = cli.ki {
        tuning.pid.ki = ki;
    }
    if let Some(kd) = cli.kd {
        tuning.pid.kd = kd;
    }
    if cli.clegg {
        tuning.pid.clegg = true;
    }
    if cli.no_clegg {
        tuning.pid.clegg = false;
    }
    if let Some(setpoint) = cli.setpoint {
        tuning.sim.setpoint = setpoint;
    }
    if let Some(dt) = cli.dt {
        tuning.sim.dt = dt;
    }
    if let Some(max_time) = cli.max_time {
        tuning.sim.max_time = max_time;
    }
}

fn find_events(trajectory: &[Sample], tuning: &TuningFile) -> Vec<SimEvent> {
    let step = (tuning.sim.setpoint - tuning.sim.initial_position).abs();
    event::detect(trajectory, &mut event::step_detectors(json::SETTLE_BAND * step, 0.5))
}

fn mode(pid: &PidConfig) -> &'static str {
    if pid.clegg {
        "Clegg"
    } else {
        "plain"
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "—".to_string(), |t| format!("{t:.2} s"))
}

fn print_report(tuning: &TuningFile, trajectory: &[Sample], summary: &StepSummary, events: &[SimEvent]) {
    let pid = &tuning.pid;
    let plant = &tuning.plant;
    let sim = &tuning.sim;

    println!();
    println!("====================================================================");
    println!("  PID STEP RESPONSE — {} integration", mode(pid));
    println!("====================================================================");
    println!();
    println!("  Controller");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Kp: {:>8.3}    Ki: {:>8.3}    Kd: {:>8.3}", pid.kp, pid.ki, pid.kd);
    println!();
    println!("  Plant");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:      {:>8.3} kg      Damping:  {:>8.3} N*s/m",
        plant.mass, plant.damping
    );
    println!(
        "  Stiffness: {:>8.3} N/m     Load:     {:>8.3} N",
        plant.stiffness, plant.load
    );
    println!(
        "  Step:      {:>8.3} -> {:.3} m   dt = {} s, {} s run",
        sim.initial_position, sim.setpoint, sim.dt, sim.max_time
    );
    println!();

    println!("  Response");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Peak:      {:>8.4} m at t={:.2} s   Overshoot: {:>6.1} %",
        summary.peak_position, summary.peak_time, summary.overshoot_pct
    );
    println!(
        "  Rise time: {:>10}              Settling:  {:>10}",
        fmt_opt(summary.rise_time),
        fmt_opt(summary.settling_time)
    );
    println!(
        "  Final err: {:>10.5} m            Peak out:  {:>10.2}",
        summary.final_error, summary.peak_output
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    let crossings = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::ErrorCrossing { .. }))
        .count();
    println!("  Error zero crossings: {crossings}");
    for e in events {
        match e.kind {
            EventKind::Peak { position } => {
                println!("  PEAK      t={:>6.2}s   pos={:>8.4}m", e.time, position);
            }
            EventKind::Settled { since } => {
                println!("  SETTLED   t={:>6.2}s   (inside band since {:.2}s)", e.time, since);
            }
            EventKind::ErrorCrossing { .. } => {}
        }
    }
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>9}  {:>9}",
        "t (s)", "pos (m)", "vel (m/s)", "error", "output"
    );
    println!("  {}", "─".repeat(51));

    let sample_interval = (trajectory.len() / 25).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.4}  {:>9.4}  {:>9.4}  {:>9.3}",
            s.time, s.position, s.velocity, s.error, s.output
        );
    }

    println!();
    println!("  Simulation: {} samples, dt={} s", trajectory.len(), sim.dt);
    println!("====================================================================");
    println!();
}

fn print_comparison(runs: &[(PidConfig, &StepSummary)]) {
    println!("  Integration comparison");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>10}  {:>10}  {:>10}  {:>11}",
        "mode", "peak (m)", "overshoot", "rise", "settling"
    );
    for (pid, s) in runs {
        println!(
            "  {:>7}  {:>10.4}  {:>9.1}%  {:>10}  {:>11}",
            mode(pid),
            s.peak_position,
            s.overshoot_pct,
            fmt_opt(s.rise_time),
            fmt_opt(s.settling_time)
        );
    }
    println!();
}
