//! Log output set-up for applications embedding the engine.

/// Install a global `tracing` subscriber writing to stderr.
///
/// `verbosity` selects the default level (0 = warn, 1 = info, 2 = debug,
/// 3+ = trace); `RUST_LOG` directives are honoured on top of it. Calling this
/// when a subscriber is already installed does nothing.
pub fn init(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
