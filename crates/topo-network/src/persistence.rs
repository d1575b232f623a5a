//! Plain-text dump and restore of a network.
//!
//! A dump is a directory holding six line-oriented files, each name carrying
//! an optional suffix:
//!
//! | file | one line per |
//! |---|---|
//! | `min.data` | minimum value |
//! | `min.coords` | minimum coordinates, whitespace separated |
//! | `ts.data` | transition state value |
//! | `ts.coords` | transition state coordinates |
//! | `ts.pairs` | the two minimum indices joined by the transition state |
//! | `ts.modes` | transition state eigenvector (optional on read) |
//!
//! Floats are written in shortest round-trip exponent form so a restored
//! network is bitwise identical to the dumped one.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use topo_core::errors::{ErrorInfo, TopoError};

use crate::network::{KineticTransitionNetwork, RawTransitionState};

const MIN_DATA: &str = "min.data";
const MIN_COORDS: &str = "min.coords";
const TS_DATA: &str = "ts.data";
const TS_COORDS: &str = "ts.coords";
const TS_PAIRS: &str = "ts.pairs";
const TS_MODES: &str = "ts.modes";

/// Base names of the files written by `dump_network`, before the suffix.
pub const NETWORK_FILES: [&str; 6] = [MIN_DATA, MIN_COORDS, TS_DATA, TS_COORDS, TS_PAIRS, TS_MODES];

impl KineticTransitionNetwork {
    /// Writes the network into `dir` using file names ending in `suffix`.
    pub fn dump_network(&self, dir: &Path, suffix: &str) -> Result<(), TopoError> {
        fs::create_dir_all(dir).map_err(|err| io_error("create-dir", dir, err))?;

        let mut min_data = String::new();
        let mut min_coords = String::new();
        for minimum in self.minima() {
            let _ = writeln!(min_data, "{:e}", minimum.value);
            let _ = writeln!(min_coords, "{}", join(&minimum.point));
        }

        let mut ts_data = String::new();
        let mut ts_coords = String::new();
        let mut ts_pairs = String::new();
        let mut ts_modes = String::new();
        for ts in self.transition_states() {
            let _ = writeln!(ts_data, "{:e}", ts.value);
            let _ = writeln!(ts_coords, "{}", join(&ts.point));
            let _ = writeln!(ts_pairs, "{} {}", ts.minima.0.as_raw(), ts.minima.1.as_raw());
            let _ = writeln!(ts_modes, "{}", join(&ts.eigenvector));
        }

        for (name, contents) in [
            (MIN_DATA, min_data),
            (MIN_COORDS, min_coords),
            (TS_DATA, ts_data),
            (TS_COORDS, ts_coords),
            (TS_PAIRS, ts_pairs),
            (TS_MODES, ts_modes),
        ] {
            let path = file_path(dir, name, suffix);
            fs::write(&path, contents).map_err(|err| io_error("write-network", &path, err))?;
        }
        log::info!(
            "dumped {} minima and {} transition states to {}",
            self.n_minima(),
            self.n_transition_states(),
            dir.display()
        );
        Ok(())
    }

    /// Replaces the contents of this network with a dump read from `dir`.
    ///
    /// Every file is parsed and cross-checked before anything is replaced, so
    /// a malformed dump leaves the network untouched.
    pub fn read_network(&mut self, dir: &Path, suffix: &str) -> Result<(), TopoError> {
        let min_values = read_scalars(&file_path(dir, MIN_DATA, suffix))?;
        let min_points = read_vectors(&file_path(dir, MIN_COORDS, suffix))?;
        let ts_values = read_scalars(&file_path(dir, TS_DATA, suffix))?;
        let ts_points = read_vectors(&file_path(dir, TS_COORDS, suffix))?;
        let pairs_path = file_path(dir, TS_PAIRS, suffix);
        let ts_pairs = read_pairs(&pairs_path)?;
        let modes_path = file_path(dir, TS_MODES, suffix);
        let ts_modes = if modes_path.exists() {
            read_vectors(&modes_path)?
        } else {
            vec![Vec::new(); ts_values.len()]
        };

        check_count(MIN_COORDS, min_values.len(), min_points.len())?;
        check_count(TS_COORDS, ts_values.len(), ts_points.len())?;
        check_count(TS_PAIRS, ts_values.len(), ts_pairs.len())?;
        check_count(TS_MODES, ts_values.len(), ts_modes.len())?;

        let minima = min_points.into_iter().zip(min_values).collect();
        let transition_states = ts_points
            .into_iter()
            .zip(ts_values)
            .zip(ts_modes)
            .zip(ts_pairs)
            .map(|(((point, value), eigenvector), minima)| RawTransitionState {
                point,
                value,
                eigenvector,
                minima,
            })
            .collect();
        let restored = Self::restore(self.comparer().clone(), minima, transition_states)?;
        *self = restored;
        log::info!(
            "read {} minima and {} transition states from {}",
            self.n_minima(),
            self.n_transition_states(),
            dir.display()
        );
        Ok(())
    }
}

fn file_path(dir: &Path, name: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{name}{suffix}"))
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:e}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn io_error(code: &str, path: &Path, err: std::io::Error) -> TopoError {
    TopoError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Every line is one record; a blank line is an empty record, which only
/// `ts.modes` accepts.
fn read_lines(path: &Path) -> Result<Vec<String>, TopoError> {
    let contents = fs::read_to_string(path).map_err(|err| io_error("read-network", path, err))?;
    Ok(contents.lines().map(str::to_owned).collect())
}

fn parse_f64(token: &str, path: &Path, line: usize) -> Result<f64, TopoError> {
    token.parse::<f64>().map_err(|err| {
        TopoError::Serde(
            ErrorInfo::new("parse-float", err.to_string())
                .with_context("path", path.display().to_string())
                .with_context("line", (line + 1).to_string())
                .with_context("token", token),
        )
    })
}

fn read_scalars(path: &Path) -> Result<Vec<f64>, TopoError> {
    read_lines(path)?
        .iter()
        .enumerate()
        .map(|(idx, line)| parse_f64(line.trim(), path, idx))
        .collect()
}

fn read_vectors(path: &Path) -> Result<Vec<Vec<f64>>, TopoError> {
    read_lines(path)?
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            line.split_whitespace()
                .map(|token| parse_f64(token, path, idx))
                .collect()
        })
        .collect()
}

fn read_pairs(path: &Path) -> Result<Vec<(u64, u64)>, TopoError> {
    let mut pairs = Vec::new();
    for (idx, line) in read_lines(path)?.iter().enumerate() {
        let parsed: Result<Vec<u64>, _> = line.split_whitespace().map(str::parse::<u64>).collect();
        match parsed.as_deref() {
            Ok([a, b]) => pairs.push((*a, *b)),
            _ => {
                return Err(TopoError::Serde(
                    ErrorInfo::new("parse-pair", "expected two minimum indices")
                        .with_context("path", path.display().to_string())
                        .with_context("line", (idx + 1).to_string()),
                ))
            }
        }
    }
    Ok(pairs)
}

fn check_count(file: &str, expected: usize, found: usize) -> Result<(), TopoError> {
    if expected != found {
        return Err(TopoError::Serde(
            ErrorInfo::new("count-mismatch", "network files disagree on record counts")
                .with_context("file", file)
                .with_context("expected", expected.to_string())
                .with_context("found", found.to_string())
                .with_hint("the dump is incomplete; re-dump the network"),
        ));
    }
    Ok(())
}
