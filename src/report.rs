//! CSV output of the per-round state counts, for charting outside the engine.
//!
//! Each row holds one round:
//!
//! ```text
//! round,susceptible,infected,immune,quarantined,hospitalized,deceased
//! 0,711,3,186,0,0,0
//! 1,703,11,186,0,0,0
//! ```
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::counters::StateCounts;
use crate::engine::EpidemicGrid;
use crate::error::SpreadError;
use crate::log::trace;

/// Where reports go and how they are named.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            output_dir: PathBuf::from("."),
            file_prefix: String::new(),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    pub fn directory(&mut self, output_dir: PathBuf) -> &mut Self {
        self.output_dir = output_dir;
        self
    }

    pub fn file_prefix(&mut self, file_prefix: &str) -> &mut Self {
        self.file_prefix = file_prefix.to_string();
        self
    }

    pub fn overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    /// `<output_dir>/<file_prefix><short_name>.csv`
    #[must_use]
    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{short_name}.csv", self.file_prefix))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsReportItem {
    pub round: usize,
    pub susceptible: usize,
    pub infected: usize,
    pub immune: usize,
    pub quarantined: usize,
    pub hospitalized: usize,
    pub deceased: usize,
}

impl CountsReportItem {
    #[must_use]
    pub fn new(round: usize, counts: StateCounts) -> Self {
        CountsReportItem {
            round,
            susceptible: counts.susceptible,
            infected: counts.infected,
            immune: counts.immune,
            quarantined: counts.quarantined,
            hospitalized: counts.hospitalized,
            deceased: counts.deceased,
        }
    }
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful.
fn generate_validate_filepath(path: &Path) -> Result<File, SpreadError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(SpreadError::ReportError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

pub struct CountsReport {
    path: PathBuf,
    writer: Writer<File>,
}

impl CountsReport {
    /// Opens `<output_dir>/<file_prefix><short_name>.csv` according to `options`.
    ///
    /// # Errors
    /// Returns `SpreadError::ReportError` if the file exists and `overwrite` is off, or an
    /// I/O error if it cannot be created.
    pub fn create(options: &ReportOptions, short_name: &str) -> Result<Self, SpreadError> {
        let path = options.path_for(short_name);
        if !options.overwrite && path.exists() {
            return Err(SpreadError::ReportError(format!(
                "report file already exists: {}",
                path.display()
            )));
        }
        Self::at_path(&path)
    }

    /// Opens a report at an explicit path, replacing any existing file.
    ///
    /// # Errors
    /// Returns `SpreadError::ReportError` if `path` does not end in `.csv`, or an I/O error
    /// if it cannot be created.
    pub fn at_path(path: &Path) -> Result<Self, SpreadError> {
        let file = generate_validate_filepath(path)?;
        trace!("writing counts report to {}", path.display());
        Ok(CountsReport {
            path: path.to_path_buf(),
            writer: Writer::from_writer(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one row and flushes it.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn send(&mut self, round: usize, counts: StateCounts) -> Result<(), SpreadError> {
        self.writer
            .serialize(CountsReportItem::new(round, counts))?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes one row per recorded round of `grid`.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn send_history(&mut self, grid: &EpidemicGrid) -> Result<(), SpreadError> {
        let counters = grid.counters();
        for round in 0..counters.rounds() {
            if let Some(counts) = counters.at(round) {
                self.writer.serialize(CountsReportItem::new(round, counts))?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Convenience wrapper writing the full history of `grid` to `path`.
    ///
    /// # Errors
    /// See [`CountsReport::at_path`] and [`CountsReport::send_history`].
    pub fn write_history(path: &Path, grid: &EpidemicGrid) -> Result<(), SpreadError> {
        let mut report = Self::at_path(path)?;
        report.send_history(grid)
    }
}
