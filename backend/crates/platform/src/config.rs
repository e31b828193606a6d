//! Environment configuration helpers
//!
//! Every crate loads its settings once at startup from process environment
//! (populated from `.env` by the binary). Missing or malformed values are
//! reported as [`ConfigError`] so startup can abort with a clear message.

use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Read a required, non-blank variable
pub fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingEnvVar(name))
}

/// Read a required secret without keeping a plain copy around
pub fn required_secret(name: &'static str) -> Result<SecretString, ConfigError> {
    required(name).map(SecretString::from)
}

/// Read an optional variable; blank values count as absent
pub fn optional(name: &'static str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Read and parse an optional variable, falling back to `default`
pub fn parse_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
    })
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
