use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::pid::PidConfig;
use crate::plant::Plant;
use crate::sim::SimConfig;

/// Tuning file: controller gains, plant and run settings.
///
/// Every section and field is optional and falls back to its default.
///
/// ```
/// use clegg_pid::config::TuningFile;
///
/// let tuning = TuningFile::from_toml_str("[pid]\nkp = 2.0\nclegg = true\n").unwrap();
/// assert_eq!(tuning.pid.kp, 2.0);
/// assert!(tuning.pid.clegg);
/// assert_eq!(tuning.sim.dt, 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "RawTuning")]
pub struct TuningFile {
    pub pid: PidConfig,
    pub plant: Plant,
    pub sim: SimConfig,
}

/// `[pid]` as written: absent fields keep the harness gains.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PidSection {
    kp: Option<f64>,
    ki: Option<f64>,
    kd: Option<f64>,
    clegg: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTuning {
    pid: PidSection,
    plant: Plant,
    sim: SimConfig,
}

impl From<RawTuning> for TuningFile {
    fn from(raw: RawTuning) -> Self {
        let base = TuningFile::default().pid;
        let pid = PidConfig {
            kp: raw.pid.kp.unwrap_or(base.kp),
            ki: raw.pid.ki.unwrap_or(base.ki),
            kd: raw.pid.kd.unwrap_or(base.kd),
            clegg: raw.pid.clegg.unwrap_or(base.clegg),
        };
        Self { pid, plant: raw.plant, sim: raw.sim }
    }
}

impl Default for TuningFile {
    fn default() -> Self {
        Self {
            pid: PidConfig::new(4.0, 2.0, 1.0),
            plant: Plant::default(),
            sim: SimConfig::default(),
        }
    }
}

impl TuningFile {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let tuning: TuningFile = toml::from_str(text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Checks the plant and run settings. Gains are accepted as given.
    pub fn validate(&self) -> Result<()> {
        self.plant.validate()?;
        self.sim.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(TuningFile::from_toml_str("").unwrap(), TuningFile::default());
    }

    #[test]
    fn full_file_overrides_everything() {
        let text = r#"
            [pid]
            kp = 1.5
            ki = -0.5
            kd = 0.0
            clegg = true

            [plant]
            mass = 2.0
            damping = 0.1
            stiffness = 3.0
            load = -9.8

            [sim]
            dt = 0.002
            max_time = 4.0
            setpoint = -1.0
            initial_position = 0.5
        "#;
        let t = TuningFile::from_toml_str(text).unwrap();
        assert_eq!(t.pid, PidConfig::new(1.5, -0.5, 0.0).clegg(true));
        assert_eq!(t.plant, Plant { mass: 2.0, damping: 0.1, stiffness: 3.0, load: -9.8 });
        assert_eq!(t.sim.dt, 0.002);
        assert_eq!(t.sim.setpoint, -1.0);
        assert_eq!(t.sim.initial_position, 0.5);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let t = TuningFile::from_toml_str("[plant]\nload = -2.0\n").unwrap();
        assert_eq!(t.plant.load, -2.0);
        assert_eq!(t.plant.mass, Plant::default().mass);
        assert!(!t.pid.clegg);
    }

    #[test]
    fn partial_pid_section_keeps_default_gains() {
        let defaults = TuningFile::default().pid;
        let t = TuningFile::from_toml_str("[pid]\nkp = 6.0\n").unwrap();
        assert_eq!(t.pid.kp, 6.0);
        assert_eq!(t.pid.ki, defaults.ki);
        assert_eq!(t.pid.kd, defaults.kd);
        assert_eq!(t.pid.clegg, defaults.clegg);

        let t = TuningFile::from_toml_str("[pid]\nclegg = true\n").unwrap();
        assert_eq!(t.pid, defaults.clegg(true));

        let t = TuningFile::from_toml_str("[pid]\nki = 0.0\n").unwrap();
        assert_eq!(t.pid.ki, 0.0, "an explicit zero still disables the term");
        assert_eq!(t.pid.kp, defaults.kp);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            TuningFile::from_toml_str("[sim]\ndt = -0.1\n"),
            Err(Error::InvalidSim(_))
        ));
        assert!(matches!(
            TuningFile::from_toml_str("[plant]\nmass = 0.0\n"),
            Err(Error::InvalidPlant(_))
        ));
        assert!(matches!(
            TuningFile::from_toml_str("[pid]\nkp = \"fast\"\n"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            TuningFile::from_toml_str("[gains]\nkp = 1.0\n"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            TuningFile::from_toml_str("[pid]\nkq = 1.0\n"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TuningFile::load("/nonexistent/tuning.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
