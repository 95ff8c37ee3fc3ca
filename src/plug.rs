use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;

use crate::config::PlugConfig;
use crate::encoder::{build_chain, BoxEncoder, Encoder, Hook};
use crate::error::PlugError;
use crate::flags::LogFlags;
use crate::header::{extract_location, extract_timestamp};
use crate::json::JsonEncoder;
use crate::pool::RecordPool;
use crate::prefix::apply_prefix_tokens;
use crate::record::LogRecord;

/// Byte sink that turns text log lines into structured records.
///
/// Every `write` is expected to carry exactly one formatted line, as
/// produced by a logger that prints `[prefix] [date [time]] [file:line: ]
/// message`. The line is parsed into a [`LogRecord`] and handed to the
/// encoder chain built from the hooks and the terminal encoder.
///
/// A plug is immutable once built and can be written from many threads at
/// once; only the record pool is shared between lines.
pub struct Plug {
    config: PlugConfig,
    encoder: BoxEncoder,
    pool: RecordPool,
}

impl Plug {
    /// Create a plug around `encoder`.
    ///
    /// `hooks` wrap the encoder in order: the first hook sees each record
    /// first.
    pub fn new<E>(encoder: E, config: PlugConfig, hooks: Vec<Hook>) -> Self
    where
        E: Encoder + 'static,
    {
        Self {
            config,
            encoder: build_chain(Box::new(encoder), hooks),
            pool: RecordPool::default(),
        }
    }

    /// Plug that writes newline-delimited JSON to `writer` with the default
    /// configuration.
    pub fn json<W: Write + Send + 'static>(writer: W) -> Self {
        Self::builder().build_json(writer)
    }

    pub fn builder() -> PlugBuilder {
        PlugBuilder::default()
    }

    pub fn config(&self) -> &PlugConfig {
        &self.config
    }

    pub fn message_field(&self) -> &str {
        self.config.message_field()
    }

    pub fn timestamp_field(&self) -> &str {
        self.config.timestamp_field()
    }

    pub fn location_field(&self) -> &str {
        self.config.location_field()
    }

    pub fn flags(&self) -> LogFlags {
        self.config.flags()
    }

    /// Records currently parked in the reuse pool.
    pub fn idle_records(&self) -> usize {
        self.pool.idle()
    }

    /// Parse one line and run it through the encoder chain.
    ///
    /// **Returns**
    /// - `Ok(line.len())` when the line was encoded or dropped by a hook.
    /// - `Err(..)` with the encoder chain's error otherwise.
    ///
    /// The pooled record is cleared and released on both paths.
    ///
    /// A line written while this plug is already processing a line on the
    /// same thread (for instance this crate's own `tracing` events, when the
    /// plug is the global subscriber's output) is dropped and reported as
    /// written.
    pub fn process(&self, line: &[u8]) -> Result<usize, PlugError> {
        let Some(_active) = ActiveLine::enter(self) else {
            return Ok(line.len());
        };

        let text = String::from_utf8_lossy(line);
        let mut record = self.pool.acquire();
        self.parse_line(&text, &mut record);

        match self.encoder.encode(&self.config, &mut record) {
            Ok(()) => Ok(line.len()),
            Err(err) => {
                tracing::debug!(error = %err, "encoder chain rejected log line");
                Err(err)
            }
        }
    }

    fn parse_line(&self, line: &str, record: &mut LogRecord) {
        let mut msg = line;

        // header first, then the configured prefix
        if self.config.flags.prefix_after_header() {
            msg = self.apply_header(msg, record);
        }

        msg = apply_prefix_tokens(msg, record);

        if record.get_time(self.timestamp_field()).is_none()
            && record.get_str(self.location_field()).is_none()
        {
            msg = self.apply_header(msg, record);
        }

        // `[key:value]` written by the caller as part of the message
        msg = apply_prefix_tokens(msg, record);

        let msg = msg
            .trim_end_matches(|c| c == '\n' || c == '\r')
            .trim_start_matches(' ');
        record.add_str(self.message_field(), msg);
    }

    fn apply_header<'a>(&self, mut msg: &'a str, record: &mut LogRecord) -> &'a str {
        let flags = self.config.flags;

        let (timestamp, consumed) = extract_timestamp(msg, flags);
        if let Some(timestamp) = timestamp {
            record.set(self.timestamp_field(), timestamp);
            msg = &msg[consumed..];
        }

        let (location, consumed) = extract_location(msg, flags);
        if let Some(location) = location {
            record.set(self.location_field(), location);
            msg = &msg[consumed..];
        }

        msg
    }
}

thread_local! {
    static ACTIVE_PLUGS: RefCell<Vec<usize>> = RefCell::new(Vec::new());
}

/// Marks a plug as busy on the current thread until dropped.
struct ActiveLine {
    plug: usize,
}

impl ActiveLine {
    fn enter(plug: &Plug) -> Option<Self> {
        let plug = plug as *const Plug as usize;
        ACTIVE_PLUGS.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&plug) {
                return None;
            }
            active.push(plug);
            Some(ActiveLine { plug })
        })
    }
}

impl Drop for ActiveLine {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread exit
        let _ = ACTIVE_PLUGS.try_with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|p| *p == self.plug) {
                active.swap_remove(pos);
            }
        });
    }
}

impl fmt::Debug for Plug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plug")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Write for &Plug {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.process(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for Plug {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.process(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Plug {
    type Writer = &'a Plug;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

/// Construction-time options of a [`Plug`].
#[derive(Default)]
pub struct PlugBuilder {
    config: PlugConfig,
    hooks: Vec<Hook>,
}

impl PlugBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration, e.g. one read by
    /// [`PlugConfig::from_env`].
    pub fn config(mut self, config: PlugConfig) -> Self {
        self.config = config;
        self
    }

    /// Header layout; must match what the upstream logger prints.
    pub fn flags(mut self, flags: LogFlags) -> Self {
        self.config.flags = flags;
        self
    }

    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn hooks<I: IntoIterator<Item = Hook>>(mut self, hooks: I) -> Self {
        self.hooks.extend(hooks);
        self
    }

    pub fn message_field(mut self, field: impl Into<String>) -> Self {
        self.config.message_field = field.into();
        self
    }

    pub fn timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.config.timestamp_field = field.into();
        self
    }

    pub fn location_field(mut self, field: impl Into<String>) -> Self {
        self.config.location_field = field.into();
        self
    }

    pub fn build<E: Encoder + 'static>(self, encoder: E) -> Plug {
        Plug::new(encoder, self.config, self.hooks)
    }

    pub fn build_json<W: Write + Send + 'static>(self, writer: W) -> Plug {
        self.build(JsonEncoder::new(writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encoder_fn, hook};
    use std::sync::{Arc, Mutex};

    type Lines = Arc<Mutex<Vec<String>>>;

    fn capture(builder: PlugBuilder) -> (Plug, Lines) {
        let lines: Lines = Arc::default();
        let sink = lines.clone();
        let plug = builder.build(encoder_fn(move |_, record| {
            sink.lock().unwrap().push(serde_json::to_string(&*record)?);
            Ok(())
        }));
        (plug, lines)
    }

    fn one(builder: PlugBuilder, line: &str) -> String {
        let (plug, lines) = capture(builder);
        assert_eq!(plug.process(line.as_bytes()).unwrap(), line.len());
        let mut lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        lines.pop().unwrap()
    }

    #[test]
    fn text_only() {
        assert_eq!(one(Plug::builder(), "text only\n"), r#"{"message":"text only"}"#);
    }

    #[test]
    fn prefix_tokens() {
        assert_eq!(
            one(Plug::builder(), "[trace:1000]with prefix\n"),
            r#"{"message":"with prefix","trace":"1000"}"#
        );
        assert_eq!(
            one(Plug::builder(), "[trace:true]prefix is boolean\n"),
            r#"{"message":"prefix is boolean","trace":true}"#
        );
        assert_eq!(
            one(Plug::builder(), "[trace:one][trace:two]append field value\n"),
            r#"{"message":"append field value","trace":"onetwo"}"#
        );
    }

    #[test]
    fn prefix_then_message_tokens() {
        assert_eq!(
            one(Plug::builder(), "[trace:one][prefix:before]message prefix\n"),
            r#"{"message":"message prefix","prefix":"before","trace":"one"}"#
        );
    }

    #[test]
    fn date_header() {
        assert_eq!(
            one(Plug::builder().flags(LogFlags::DATE), "2024/01/02 with date\n"),
            r#"{"message":"with date","timestamp":"2024-01-02T00:00:00Z"}"#
        );
    }

    #[test]
    fn prefix_before_header_and_message_tokens() {
        assert_eq!(
            one(
                Plug::builder().flags(LogFlags::DATE),
                "[label:test]2024/01/02 [with:prefix]msg prefix\n"
            ),
            r#"{"label":"test","message":"msg prefix","timestamp":"2024-01-02T00:00:00Z","with":"prefix"}"#
        );
    }

    #[test]
    fn prefix_after_header() {
        let flags = LogFlags::DATE | LogFlags::SHORT_FILE | LogFlags::MSG_PREFIX;
        assert_eq!(
            one(
                Plug::builder().flags(flags),
                "2024/01/02 main.rs:10: [label:test] with msg: prefix\n"
            ),
            r#"{"label":"test","location":"main.rs:10","message":"with msg: prefix","timestamp":"2024-01-02T00:00:00Z"}"#
        );
    }

    #[test]
    fn bad_header_stays_in_message() {
        assert_eq!(
            one(Plug::builder().flags(LogFlags::STD_FLAGS), "yesterday noon oops\n"),
            r#"{"message":"yesterday noon oops"}"#
        );
    }

    #[test]
    fn custom_field_names() {
        let builder = Plug::builder()
            .flags(LogFlags::DATE | LogFlags::LONG_FILE)
            .message_field("msg")
            .timestamp_field("ts")
            .location_field("src");
        assert_eq!(
            one(builder, "2024/01/02 /app/main.rs:3: hi\n"),
            r#"{"msg":"hi","src":"/app/main.rs:3","ts":"2024-01-02T00:00:00Z"}"#
        );
    }

    #[test]
    fn encoder_error_releases_record() {
        let plug = Plug::builder().build(encoder_fn(|_, record| {
            assert!(record.get_str("message").is_some());
            Err(PlugError::encode("sink closed"))
        }));

        let err = plug.process(b"hello\n").unwrap_err();
        assert!(matches!(err, PlugError::Encode(_)));
        assert_eq!(plug.idle_records(), 1);

        // the recycled record starts empty
        let err = plug.process(b"again\n").unwrap_err();
        assert!(matches!(err, PlugError::Encode(_)));
        assert_eq!(plug.idle_records(), 1);
    }

    #[test]
    fn write_maps_errors_to_io() {
        let mut plug = Plug::builder().build(encoder_fn(|_, _| Err(PlugError::encode("nope"))));
        let err = plug.write(b"x\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn nested_write_to_same_plug_is_dropped() {
        let (plug, lines) = capture(Plug::builder());
        let other = Plug::builder().build(encoder_fn(|_, _| Ok(())));

        {
            let _outer = ActiveLine::enter(&plug).unwrap();
            assert!(ActiveLine::enter(&plug).is_none());
            assert!(ActiveLine::enter(&other).is_some());
            assert_eq!(plug.process(b"nested\n").unwrap(), 7);
        }
        assert!(lines.lock().unwrap().is_empty());

        plug.process(b"after\n").unwrap();
        assert_eq!(*lines.lock().unwrap(), vec![r#"{"message":"after"}"#]);
    }

    #[test]
    fn nested_write_from_encoder_is_dropped() {
        let plug: Arc<Mutex<Option<Arc<Plug>>>> = Arc::default();
        let lines: Lines = Arc::default();
        let (inner, sink) = (plug.clone(), lines.clone());
        let built = Arc::new(Plug::builder().build(encoder_fn(move |_, record| {
            sink.lock().unwrap().push(serde_json::to_string(&*record)?);
            let me = inner.lock().unwrap().clone();
            if let Some(me) = me {
                // the plug writing a diagnostic line back into itself
                assert_eq!(me.process(b"loop\n").unwrap(), 5);
            }
            Ok(())
        })));
        *plug.lock().unwrap() = Some(built.clone());

        built.process(b"outer\n").unwrap();
        assert_eq!(*lines.lock().unwrap(), vec![r#"{"message":"outer"}"#]);
        *plug.lock().unwrap() = None;
    }

    #[test]
    fn suppressing_hook_is_success() {
        let (plug, lines) = capture(
            Plug::builder().hook(hook(|_inner| Box::new(encoder_fn(|_, _| Ok(()))))),
        );
        assert_eq!(plug.process(b"dropped\n").unwrap(), 8);
        assert!(lines.lock().unwrap().is_empty());
    }
}
