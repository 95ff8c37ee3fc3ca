use std::io::Write;

use log_plug::encoder::{encoder_fn, hook, Encoder, Hook};
use log_plug::flags::LogFlags;
use log_plug::plug::Plug;

/// Re-render the parsed timestamp with a custom strftime layout.
fn time_layout_hook(layout: &'static str) -> Hook {
    hook(move |inner| {
        Box::new(encoder_fn(move |config, record| {
            if let Some(t) = record.get_time(config.timestamp_field()) {
                record.set(config.timestamp_field(), t.format(layout).to_string());
            }
            inner.encode(config, record)
        }))
    })
}

fn main() -> std::io::Result<()> {
    let plug = Plug::builder()
        .flags(LogFlags::DATE)
        .hook(time_layout_hook("%Y/%m/%d"))
        .build_json(std::io::stdout());

    // {"message":"time","timestamp":"2024/01/02"}
    (&plug).write_all(b"2024/01/02 time\n")
}
