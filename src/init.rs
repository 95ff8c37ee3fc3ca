use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

use crate::plug::Plug;

/// `fmt` layer that prints bare event text into a [`Plug`].
///
/// Time, level, target and ANSI colors are left out so that the plug only
/// sees `message field=value` lines; write levels as a `[LEVEL]` marker in
/// the message if a [`level_hook`](crate::level::level_hook) is installed.
pub fn layer<S>(plug: Plug) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_writer(plug)
}

/// Build a subscriber whose formatted events are written through `plug`.
///
/// Use it with [`tracing::subscriber::with_default`] for scoped capture, or
/// see [`init_tracing`] to install it process-wide.
pub fn subscriber(plug: Plug) -> impl Subscriber + Send + Sync {
    Registry::default().with(layer(plug))
}

/// Initialize the global `tracing` subscriber so that every event goes
/// through `plug`.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing(plug: Plug) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber(plug))
}
