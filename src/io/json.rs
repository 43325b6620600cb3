use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::pid::PidConfig;
use crate::sim::Sample;

/// Fraction of the step size that counts as settled.
pub const SETTLE_BAND: f64 = 0.02;

/// Step-response figures computed from a closed-loop trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    pub setpoint: f64,
    pub peak_position: f64,
    pub peak_time: f64,
    pub overshoot_pct: f64,
    /// 10% to 90% of the step; `None` if never reached.
    pub rise_time: Option<f64>,
    /// Time after which |error| stays inside the settle band.
    pub settling_time: Option<f64>,
    pub final_error: f64,
    pub peak_output: f64,
}

impl StepSummary {
    /// Compute summary from trajectory data. `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &[Sample], setpoint: f64) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;
        let step = setpoint - first.position;

        // Normalized progress: 0 at the start, 1 at the setpoint.
        let progress = |s: &Sample| {
            if step == 0.0 {
                0.0
            } else {
                (s.position - first.position) / step
            }
        };

        let peak = trajectory
            .iter()
            .max_by(|a, b| progress(*a).total_cmp(&progress(*b)))?;

        let crossing = |level: f64| {
            trajectory
                .iter()
                .find(|s| progress(*s) >= level)
                .map(|s| s.time)
        };
        let rise_time = if step == 0.0 {
            None
        } else {
            match (crossing(0.1), crossing(0.9)) {
                (Some(t10), Some(t90)) => Some(t90 - t10),
                _ => None,
            }
        };

        let band = SETTLE_BAND * step.abs();
        let settling_time = match trajectory.iter().rposition(|s| s.error.abs() > band) {
            None => Some(first.time),
            Some(i) => trajectory.get(i + 1).map(|s| s.time),
        };

        let peak_output = trajectory
            .iter()
            .map(|s| s.output.abs())
            .fold(0.0_f64, f64::max);

        Some(StepSummary {
            setpoint,
            peak_position: peak.position,
            peak_time: peak.time,
            overshoot_pct: ((progress(peak) - 1.0) * 100.0).max(0.0),
            rise_time,
            settling_time,
            final_error: last.error,
            peak_output,
        })
    }
}

#[derive(Serialize)]
struct Report<'a> {
    controller: &'a PidConfig,
    response: &'a StepSummary,
}

/// Write controller tuning and step summary as JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, pid: &PidConfig, summary: &StepSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, &Report { controller: pid, response: summary })?;
    Ok(())
}

/// Write summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    pid: &PidConfig,
    summary: &StepSummary,
) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| Error::Io { path: path.to_path_buf(), source };
    let mut file = io::BufWriter::new(std::fs::File::create(path).map_err(io_err)?);
    write_summary(&mut file, pid, summary)?;
    file.flush().map_err(io_err)
}
