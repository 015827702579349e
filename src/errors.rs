// errors.rs
use thiserror::Error;

/// Errors raised while pulling records from the directory API.
/// None of these reach the UI: the loader logs them and substitutes an empty source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Could not decode {endpoint} payload: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("{endpoint} reported success=false")]
    Unsuccessful { endpoint: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// A filter value outside the vocabulary of its dimension.
/// The store rejects it and leaves its state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("'{value}' is not a valid {dimension} value")]
    UnknownValue {
        dimension: &'static str,
        value: String,
    },

    #[error("{dimension} filters only apply to the primary region")]
    RegionMismatch { dimension: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}
