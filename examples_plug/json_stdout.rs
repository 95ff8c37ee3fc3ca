use std::io::Write;

use log_plug::flags::LogFlags;
use log_plug::level::{level_hook, LevelConfig};
use log_plug::plug::Plug;

fn main() -> std::io::Result<()> {
    let levels = LevelConfig::new(["DEBUG", "INFO", "WARNING", "ERROR"])
        .with_default("INFO")
        .with_min("INFO")
        .with_alias("DBG", "DEBUG")
        .with_alias("WARN", "WARNING")
        .with_alias("ERR", "ERROR")
        .with_field("severity")
        .with_min_from_env();

    let plug = Plug::builder()
        .flags(LogFlags::DATE | LogFlags::MICROSECONDS | LogFlags::LONG_FILE)
        .hook(level_hook(levels))
        .build_json(std::io::stdout());

    // Lines as a conventional text logger with prefix "[trace:1000][span:20]" prints them.
    let mut out = &plug;
    out.write_all(b"[trace:1000][span:20]2024/01/02 03:04:05.123456 /srv/app/main.rs:12: [ERR] output test\n")?;
    out.write_all(b"[trace:1001][span:21]2024/01/02 03:04:05.223456 /srv/app/main.rs:13: [DBG] dropped\n")?;
    out.write_all(b"[trace:1002][span:22]2024/01/02 03:04:05.323456 /srv/app/main.rs:14: no level given\n")?;
    Ok(())
}
