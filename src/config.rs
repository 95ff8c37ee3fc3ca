use crate::env::{
    env_opt, env_or, LOG_PLUG_FLAGS_ENV, LOG_PLUG_LOCATION_FIELD_ENV, LOG_PLUG_MESSAGE_FIELD_ENV,
    LOG_PLUG_TIMESTAMP_FIELD_ENV,
};
use crate::error::FlagsParseError;
use crate::flags::LogFlags;

pub const DEFAULT_MESSAGE_FIELD: &str = "message";
pub const DEFAULT_TIMESTAMP_FIELD: &str = "timestamp";
pub const DEFAULT_LOCATION_FIELD: &str = "location";

/// Parsing configuration of a [`Plug`](crate::plug::Plug).
///
/// Fixed once the plug is built; encoders receive it by reference so they
/// can find the message, timestamp and location fields.
///
/// **Fields**
/// - `message_field`: where the remaining line text goes.
/// - `timestamp_field`: where the parsed date/time header goes.
/// - `location_field`: where the `file:line` header goes.
/// - `flags`: the header layout printed by the upstream logger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlugConfig {
    pub message_field: String,
    pub timestamp_field: String,
    pub location_field: String,
    pub flags: LogFlags,
}

impl Default for PlugConfig {
    fn default() -> Self {
        Self {
            message_field: DEFAULT_MESSAGE_FIELD.to_string(),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            location_field: DEFAULT_LOCATION_FIELD.to_string(),
            flags: LogFlags::empty(),
        }
    }
}

impl PlugConfig {
    /// Build a config from `LOG_PLUG_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, FlagsParseError> {
        let flags = match env_opt(LOG_PLUG_FLAGS_ENV) {
            Some(raw) => raw.parse()?,
            None => LogFlags::empty(),
        };

        Ok(Self {
            message_field: env_or(LOG_PLUG_MESSAGE_FIELD_ENV, DEFAULT_MESSAGE_FIELD),
            timestamp_field: env_or(LOG_PLUG_TIMESTAMP_FIELD_ENV, DEFAULT_TIMESTAMP_FIELD),
            location_field: env_or(LOG_PLUG_LOCATION_FIELD_ENV, DEFAULT_LOCATION_FIELD),
            flags,
        })
    }

    pub fn message_field(&self) -> &str {
        &self.message_field
    }

    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    pub fn location_field(&self) -> &str {
        &self.location_field
    }

    pub fn flags(&self) -> LogFlags {
        self.flags
    }
}
