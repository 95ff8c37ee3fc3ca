use std::collections::{HashMap, HashSet};

use crate::config::PlugConfig;
use crate::encoder::{hook, BoxEncoder, Encoder, Hook};
use crate::env::{env_opt, LOG_PLUG_MIN_LEVEL_ENV};
use crate::error::PlugError;
use crate::record::LogRecord;

pub const DEFAULT_LEVEL_FIELD: &str = "level";

/// Level name as written inside the `[...]` marker.
pub type Level = String;

/// Raw marker to canonical level name.
pub type LevelAlias = HashMap<String, Level>;

/// Configuration of the level hook.
///
/// **Fields**
/// - `levels`: recognized levels, least severe first.
/// - `default`: level for messages without a marker; `levels[0]` when unset.
/// - `min`: levels before this one in `levels` are dropped; `levels[0]` when
///   unset, i.e. nothing is dropped.
/// - `alias`: rewrites a raw marker to a canonical level before filtering.
/// - `field`: record field receiving the level; `"level"` when unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelConfig {
    pub levels: Vec<Level>,
    pub default: Option<Level>,
    pub min: Option<Level>,
    pub alias: LevelAlias,
    pub field: Option<String>,
}

impl LevelConfig {
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Level>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, level: impl Into<Level>) -> Self {
        self.default = Some(level.into());
        self
    }

    pub fn with_min(mut self, level: impl Into<Level>) -> Self {
        self.min = Some(level.into());
        self
    }

    pub fn with_alias(mut self, raw: impl Into<String>, level: impl Into<Level>) -> Self {
        self.alias.insert(raw.into(), level.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Override `min` with `LOG_PLUG_MIN_LEVEL` when it is set.
    pub fn with_min_from_env(self) -> Self {
        match env_opt(LOG_PLUG_MIN_LEVEL_ENV) {
            Some(min) => self.with_min(min),
            None => self,
        }
    }
}

/// Level handling resolved from a [`LevelConfig`], shared by every line.
#[derive(Debug, Clone)]
struct LevelRules {
    default: Option<Level>,
    alias: LevelAlias,
    field: String,
    suppressed: HashSet<Level>,
}

impl LevelRules {
    fn new(config: LevelConfig) -> Self {
        let first = config.levels.first().cloned();
        let default = config.default.or_else(|| first.clone());
        let min = config.min.or(first);

        let suppressed = match &min {
            Some(min) => match config.levels.iter().position(|l| l == min) {
                Some(pos) => config.levels[..pos].iter().cloned().collect(),
                None => {
                    tracing::warn!(
                        min = %min,
                        levels = ?config.levels,
                        "minimum level is not a configured level, nothing will be filtered"
                    );
                    HashSet::new()
                }
            },
            None => HashSet::new(),
        };

        Self {
            default,
            alias: config.alias,
            field: config
                .field
                .unwrap_or_else(|| DEFAULT_LEVEL_FIELD.to_string()),
            suppressed,
        }
    }

    fn canonical(&self, raw: Level) -> Level {
        match self.alias.get(&raw) {
            Some(level) => level.clone(),
            None => raw,
        }
    }
}

/// Split `[LEVEL] rest` into `("LEVEL", "rest")`.
///
/// Only a closed marker at the very start counts; one space after it is
/// dropped.
fn split_marker(msg: &str) -> Option<(&str, &str)> {
    let inner = msg.strip_prefix('[')?;
    let end = inner.find(']')?;
    let rest = &inner[end + 1..];
    Some((&inner[..end], rest.strip_prefix(' ').unwrap_or(rest)))
}

/// Encoder installed by [`level_hook`].
pub struct LevelEncoder {
    inner: BoxEncoder,
    rules: LevelRules,
}

impl LevelEncoder {
    pub fn new(config: LevelConfig, inner: BoxEncoder) -> Self {
        Self {
            inner,
            rules: LevelRules::new(config),
        }
    }
}

impl Encoder for LevelEncoder {
    fn encode(&self, config: &PlugConfig, record: &mut LogRecord) -> Result<(), PlugError> {
        let marker = record
            .get_str(config.message_field())
            .and_then(split_marker)
            .map(|(level, rest)| (level.to_string(), rest.to_string()));

        let raw = match marker {
            Some((level, rest)) => {
                record.set(config.message_field(), rest);
                Some(level)
            }
            None => self.rules.default.clone(),
        };

        if let Some(raw) = raw {
            let level = self.rules.canonical(raw);
            if self.rules.suppressed.contains(&level) {
                tracing::trace!(level = %level, "line below minimum level dropped");
                return Ok(());
            }
            record.set(self.rules.field.as_str(), level);
        }

        self.inner.encode(config, record)
    }
}

/// Hook that reads a leading `[LEVEL]` marker from the message, writes the
/// level into its own field and drops lines below the minimum level.
///
/// simple:
///
/// ```
/// use log_plug::level::{level_hook, LevelConfig};
/// let hook = level_hook(LevelConfig::new(["DBG", "WARN", "ERR"]));
/// ```
///
/// minimum level and alias (`DBG` becomes `DEBUG`):
///
/// ```
/// use log_plug::level::{level_hook, LevelConfig};
/// let hook = level_hook(
///     LevelConfig::new(["DEBUG", "INFO", "ERROR"])
///         .with_min("INFO")
///         .with_alias("DBG", "DEBUG"),
/// );
/// ```
pub fn level_hook(config: LevelConfig) -> Hook {
    let rules = LevelRules::new(config);
    hook(move |inner| Box::new(LevelEncoder { inner, rules }))
}
