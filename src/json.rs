use std::io::Write;

use parking_lot::Mutex;

use crate::config::PlugConfig;
use crate::encoder::Encoder;
use crate::error::PlugError;
use crate::record::LogRecord;

/// Terminal encoder that writes one JSON object per line.
///
/// Keys come out sorted; timestamps are RFC 3339 strings in UTC. Each
/// record is serialized first and then written with a single `write_all`
/// under the lock, so concurrent lines never interleave.
pub struct JsonEncoder<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Take the writer back, e.g. to inspect a buffer in tests.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Encoder for JsonEncoder<W> {
    fn encode(&self, _config: &PlugConfig, record: &mut LogRecord) -> Result<(), PlugError> {
        let mut line = serde_json::to_vec(&*record)?;
        line.push(b'\n');

        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        Ok(())
    }
}
