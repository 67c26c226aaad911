use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `SpreadError` and maps to other errors to
/// convert to a `SpreadError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SpreadError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    /// The engine was asked for a board that has a zero-length side, or some
    /// other construction argument that cannot describe a population.
    InvalidConfiguration(String),
    /// `advance()` was called on an engine that has no round-0 board yet.
    NotSeeded,
    ReportError(String),
    SpreadError(String),
}

impl From<io::Error> for SpreadError {
    fn from(error: io::Error) -> Self {
        SpreadError::IoError(error)
    }
}

impl From<serde_json::Error> for SpreadError {
    fn from(error: serde_json::Error) -> Self {
        SpreadError::JsonError(error)
    }
}

impl From<csv::Error> for SpreadError {
    fn from(error: csv::Error) -> Self {
        SpreadError::CsvError(error)
    }
}

impl From<String> for SpreadError {
    fn from(error: String) -> Self {
        SpreadError::SpreadError(error)
    }
}

impl From<&str> for SpreadError {
    fn from(error: &str) -> Self {
        SpreadError::SpreadError(error.to_string())
    }
}

impl std::error::Error for SpreadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpreadError::IoError(error) => Some(error),
            SpreadError::JsonError(error) => Some(error),
            SpreadError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for SpreadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpreadError::IoError(error) => write!(f, "I/O error: {error}"),
            SpreadError::JsonError(error) => write!(f, "JSON error: {error}"),
            SpreadError::CsvError(error) => write!(f, "CSV error: {error}"),
            SpreadError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {message}")
            }
            SpreadError::NotSeeded => {
                write!(f, "no round-0 board: call reset() before advance()")
            }
            SpreadError::ReportError(message) => write!(f, "report error: {message}"),
            SpreadError::SpreadError(message) => write!(f, "Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn string_conversions() {
        let from_str: SpreadError = "boom".into();
        assert!(matches!(from_str, SpreadError::SpreadError(ref m) if m == "boom"));

        let from_string: SpreadError = String::from("bang").into();
        assert_eq!(from_string.to_string(), "Error: bang");
    }

    #[test]
    fn io_error_keeps_source() {
        let error: SpreadError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(error.source().is_some());
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn not_seeded_message() {
        assert_eq!(
            SpreadError::NotSeeded.to_string(),
            "no round-0 board: call reset() before advance()"
        );
    }
}
