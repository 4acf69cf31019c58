//! Configuration utility functions
//!
//! Helpers for reading optional overrides from environment variables. A value
//! that is present but unparsable is ignored with a warning, and the caller's
//! current value is kept.

use std::path::PathBuf;
use std::str::FromStr;

/// Get a string value from an environment variable, if set and non-empty
pub fn get_env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get a path value from an environment variable, if set and non-empty
pub fn get_env_path(key: &str) -> Option<PathBuf> {
    get_env_string(key).map(PathBuf::from)
}

/// Get a parsed value from an environment variable, or `current` when unset or invalid
pub fn get_env_parsed<T: FromStr + Copy>(key: &str, current: T) -> T {
    match get_env_string(key) {
        Some(val) => val.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value '{}' for {}", val, key);
            current
        }),
        None => current,
    }
}
