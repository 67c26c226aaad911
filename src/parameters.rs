//! Disease parameters.
//!
//! Every rate is a probability in `[0, 1]` and every delay a number of rounds counted from
//! the round a cell became infected. None of this is validated: out-of-range values are a
//! caller error and simply make the corresponding transition always or never fire.
//!
//! Parameters can be loaded from a JSON file. Fields that are missing take their default
//! value, unknown fields are rejected:
//!
//! ```json
//! {
//!     "immunity_rate": 0.0,
//!     "contagion_rate": 0.1538,
//!     "contagion_delay": 14,
//!     "diagnosis_delay": 5,
//!     "hospitalization_delay": 5,
//!     "quarantine_rate": 0.5
//! }
//! ```
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpreadError;
use crate::log::trace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Probability that a cell starts out immune.
    pub immunity_rate: f64,
    /// Number of seed infections placed at round 0.
    pub cluster_count: usize,
    /// Probability that an infected cell infects a given susceptible neighbour in one round.
    pub contagion_rate: f64,
    /// Rounds after infection at which a sick cell becomes immune.
    pub contagion_delay: u32,
    /// Overall probability of dying from the disease. Only hospitalized cells die, so the
    /// per-cell draw uses `mortality_rate / hospitalization_rate`.
    pub mortality_rate: f64,
    pub mortality_delay: u32,
    /// Probability that an infected cell is diagnosed and quarantined.
    pub quarantine_rate: f64,
    pub diagnosis_delay: u32,
    pub hospitalization_rate: f64,
    pub hospitalization_delay: u32,
    /// Round at which social distancing starts. `None` disables it.
    pub social_distancing_round: Option<u32>,
    /// Contagion rate that replaces `contagion_rate` once social distancing starts.
    pub social_distancing_contagion_rate: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            immunity_rate: 0.2,
            cluster_count: 3,
            // One expected infection per round spread over 8 neighbours.
            contagion_rate: 1.0 / 8.0,
            contagion_delay: 3,
            mortality_rate: 0.03,
            mortality_delay: 6,
            quarantine_rate: 0.2,
            diagnosis_delay: 2,
            hospitalization_rate: 0.2,
            hospitalization_delay: 2,
            social_distancing_round: None,
            social_distancing_contagion_rate: 0.0,
        }
    }
}

impl Parameters {
    /// Expected number of secondary infections per case.
    #[must_use]
    pub fn r0(&self) -> f64 {
        self.contagion_rate * f64::from(self.contagion_delay)
    }

    /// Probability that a hospitalized cell dies when it reaches `mortality_delay`.
    ///
    /// Division by a zero hospitalization rate yields an infinite or NaN probability;
    /// no cell can be hospitalized in that configuration unless the rate is changed
    /// mid-run, in which case every draw succeeds (infinite) or fails (NaN).
    #[must_use]
    pub fn hospital_mortality(&self) -> f64 {
        self.mortality_rate / self.hospitalization_rate
    }

    /// Parses parameters from a JSON string.
    ///
    /// # Errors
    /// Returns `SpreadError::JsonError` if the JSON is malformed or contains unknown or
    /// ill-typed fields (a negative cluster count, for instance).
    pub fn from_json_str(json: &str) -> Result<Self, SpreadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads parameters from a JSON file.
    ///
    /// # Errors
    /// Returns `SpreadError::IoError` if the file cannot be read and
    /// `SpreadError::JsonError` if it cannot be parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, SpreadError> {
        trace!("loading parameters from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_r0() {
        let params = Parameters::default();
        assert_relative_eq!(params.r0(), 0.375);
        assert_relative_eq!(params.hospital_mortality(), 0.15);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let params = Parameters::from_json_str(
            r#"{ "contagion_rate": 0.5, "contagion_delay": 4, "social_distancing_round": 10 }"#,
        )
        .unwrap();
        assert_relative_eq!(params.contagion_rate, 0.5);
        assert_eq!(params.contagion_delay, 4);
        assert_eq!(params.social_distancing_round, Some(10));
        assert_eq!(params.mortality_delay, Parameters::default().mortality_delay);
        assert_relative_eq!(params.r0(), 2.0);
    }

    #[test]
    fn unknown_field_rejected() {
        let result = Parameters::from_json_str(r#"{ "contagion_speed": 0.5 }"#);
        assert!(matches!(result, Err(SpreadError::JsonError(_))));
    }

    #[test]
    fn negative_cluster_count_rejected() {
        let result = Parameters::from_json_str(r#"{ "cluster_count": -2 }"#);
        assert!(matches!(result, Err(SpreadError::JsonError(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "immunity_rate": 0.0, "cluster_count": 7 }}"#).unwrap();
        let params = Parameters::from_json_file(file.path()).unwrap();
        assert_relative_eq!(params.immunity_rate, 0.0);
        assert_eq!(params.cluster_count, 7);
    }

    #[test]
    fn missing_file() {
        let result = Parameters::from_json_file(Path::new("/no/such/spread-params.json"));
        assert!(matches!(result, Err(SpreadError::IoError(_))));
    }
}
