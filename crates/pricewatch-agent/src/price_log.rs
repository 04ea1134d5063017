//! Append-only CSV log of observed prices
//!
//! One line per observation. The file is opened and closed on every write,
//! so an interrupted process never leaves a dangling handle and the log can
//! be tailed while the agent runs.

use crate::error::Result;
use crate::observation::Observation;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const HEADER: &str = "timestamp,symbol,price,below_threshold";

/// Append-only sink for price observations
#[derive(Debug, Clone)]
pub struct PriceLog {
    path: PathBuf,
}

impl PriceLog {
    /// Create a log writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the log writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one observation, writing the header first if the file is new
    pub fn append(&self, observation: &Observation) -> Result<()> {
        let exists = self.path.is_file();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if !exists {
            writeln!(file, "{HEADER}")?;
        }

        writeln!(
            file,
            "{},{},{:.2},{}",
            observation.timestamp.format("%Y-%m-%d %H:%M:%S"),
            observation.symbol,
            observation.price,
            observation.below_threshold
        )?;

        Ok(())
    }
}
