//! Sample File I/O
//!
//! Plain-text dump and load of real-valued sample buffers: one
//! floating-point sample per line, in time order. This is the toolkit's
//! only persisted artifact, written on explicit request so a generated
//! signal can be inspected elsewhere or re-analyzed later; there is no
//! further schema.
//!
//! ## Example
//!
//! ```rust,no_run
//! use psrlab_core::io::{read_samples, write_samples};
//!
//! let samples = vec![0.0, 0.5, -0.25];
//! write_samples("signal.txt", &samples).unwrap();
//! let back = read_samples("signal.txt").unwrap();
//! assert_eq!(back.len(), 3);
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write samples to a text file, one per line.
pub fn write_samples<P: AsRef<Path>>(path: P, samples: &[f64]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        writeln!(writer, "{sample}")?;
    }
    writer.flush()
}

/// Read samples from a text file written by [`write_samples`] (or any
/// compatible one-value-per-line source). Blank lines are skipped;
/// malformed values surface as `io::ErrorKind::InvalidData`.
pub fn read_samples<P: AsRef<Path>>(path: P) -> io::Result<Vec<f64>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut samples = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse::<f64>().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: {e}", line_no + 1),
            )
        })?;
        samples.push(value);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signal.txt");

        let samples = vec![0.0, 1.5, -2.25, 1e-9, -1234.5678];
        write_samples(&path, &samples).unwrap();
        let back = read_samples(&path).unwrap();

        assert_eq!(back.len(), samples.len());
        for (a, b) in samples.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-12, "{a} != {b}");
        }
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        write_samples(&path, &[]).unwrap();
        assert!(read_samples(&path).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1.0\nnot-a-number\n2.0\n").unwrap();

        let err = read_samples(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_file() {
        assert!(read_samples("/nonexistent/psrlab/samples.txt").is_err());
    }
}
