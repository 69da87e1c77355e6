use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// JSON logs to stderr, filtered by `RUST_LOG` or else `default_directive`.
///
/// Stdout is left to the caller's own output. Safe to call more than once;
/// later calls leave the first subscriber in place.
pub fn init_tracing(default_directive: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
