//! Environment variable names used by this crate for convenient
//! configuration of a plug from services.
//!
//! These are purely helpers; [`PlugConfig`](crate::config::PlugConfig) and
//! [`LevelConfig`](crate::level::LevelConfig) remain plain values.

/// Header layout of the upstream logger, e.g. `date|time|shortfile`.
pub const LOG_PLUG_FLAGS_ENV: &str = "LOG_PLUG_FLAGS";

/// Field name for the message text.
pub const LOG_PLUG_MESSAGE_FIELD_ENV: &str = "LOG_PLUG_MESSAGE_FIELD";

/// Field name for the parsed timestamp.
pub const LOG_PLUG_TIMESTAMP_FIELD_ENV: &str = "LOG_PLUG_TIMESTAMP_FIELD";

/// Field name for the source location.
pub const LOG_PLUG_LOCATION_FIELD_ENV: &str = "LOG_PLUG_LOCATION_FIELD";

/// Minimum level for the level hook.
pub const LOG_PLUG_MIN_LEVEL_ENV: &str = "LOG_PLUG_MIN_LEVEL";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating unset and empty the same.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
