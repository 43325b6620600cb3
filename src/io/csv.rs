use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::sim::Sample;

/// Write trajectory data to CSV format.
///
/// Columns: time, position, velocity, error, output
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[Sample]) -> io::Result<()> {
    writeln!(writer, "time,position,velocity,error,output")?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6}",
            s.time, s.position, s.velocity, s.error, s.output,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[Sample]) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| Error::Io { path: path.to_path_buf(), source };
    let mut file = io::BufWriter::new(std::fs::File::create(path).map_err(io_err)?);
    write_trajectory(&mut file, trajectory).map_err(io_err)?;
    file.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_header_and_rows() {
        let traj = vec![
            Sample { time: 0.0, position: 0.0, velocity: 0.0, error: 1.0, output: 0.0 },
            Sample { time: 0.01, position: 0.001, velocity: 0.2, error: 0.999, output: 104.0 },
        ];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "time,position,velocity,error,output");
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert_eq!(lines[2], "0.0100,0.001000,0.200000,0.999000,104.000000");
    }

    #[test]
    fn file_error_names_the_path() {
        let err = write_trajectory_file("/nonexistent-dir/out.csv", &[]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/out.csv"));
    }
}
