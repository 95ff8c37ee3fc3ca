use std::io::{self, Write};

use log_plug::config::PlugConfig;
use log_plug::encoder::Encoder;
use log_plug::error::PlugError;
use log_plug::level::{level_hook, LevelConfig};
use log_plug::plug::Plug;
use log_plug::record::LogRecord;
use parking_lot::Mutex;

/// Writes `level,message` rows instead of JSON.
struct CsvEncoder<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> Encoder for CsvEncoder<W> {
    fn encode(&self, config: &PlugConfig, record: &mut LogRecord) -> Result<(), PlugError> {
        let level = record.get_str("level").unwrap_or_default();
        let message = record.get_str(config.message_field()).unwrap_or_default();
        let mut writer = self.writer.lock();
        writeln!(writer, "{},{}", quote(level), quote(message))?;
        Ok(())
    }
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn main() -> io::Result<()> {
    println!("level,message");

    let plug = Plug::builder()
        .hook(level_hook(LevelConfig::new(["DBG", "INFO", "ERR"])))
        .build(CsvEncoder {
            writer: Mutex::new(io::stdout()),
        });

    let mut out = &plug;
    out.write_all(b"[INFO]csv output\n")?;
    out.write_all(b"[ERR]with, a comma\n")?;
    Ok(())
}
