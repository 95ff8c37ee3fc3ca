//! Structured output for plain text loggers.
//!
//! A [`Plug`](plug::Plug) is a byte sink: point a `prefix + header + message`
//! logger at it and every line comes out as a [`LogRecord`](record::LogRecord)
//! passed through a chain of [hooks](encoder::Hook) into a terminal
//! [`Encoder`](encoder::Encoder), newline-delimited JSON by default.
//!
//! ```
//! use std::io::Write;
//! use log_plug::flags::LogFlags;
//! use log_plug::level::{level_hook, LevelConfig};
//! use log_plug::plug::Plug;
//!
//! let mut plug = Plug::builder()
//!     .flags(LogFlags::DATE)
//!     .hook(level_hook(LevelConfig::new(["DBG", "INFO", "WARN", "ERR"]).with_min("INFO")))
//!     .build_json(std::io::stdout());
//!
//! plug.write_all(b"2024/01/02 [INFO]output test\n").unwrap();
//! ```

pub mod config;
pub mod encoder;
pub mod env;
pub mod error;
pub mod flags;
pub mod header;
pub mod init;
pub mod json;
pub mod level;
pub mod plug;
pub mod pool;
pub mod prefix;
pub mod record;

pub use config::PlugConfig;
pub use encoder::{encoder_fn, hook, Encoder, EncoderFn, Hook};
pub use error::PlugError;
pub use flags::LogFlags;
pub use level::{level_hook, LevelConfig};
pub use plug::{Plug, PlugBuilder};
pub use record::{LogRecord, Value};
