//! Telemetry initialization.
//!
//! Controlled by `LINEBISECT_LOG`:
//! - unset → no-op (tracing disabled, zero overhead)
//! - `"json"` → JSON events to stderr
//! - anything else → human-readable events to stderr
//!
//! The level filter comes from `RUST_LOG` and defaults to `info`. Stdout
//! carries only the report, so logs never go there.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log sink.
pub const LOG_ENV: &str = "LINEBISECT_LOG";

/// Install a global subscriber according to [`LOG_ENV`].
pub fn init() {
    let sink = std::env::var(LOG_ENV).ok();

    match sink.as_deref() {
        None | Some("") => {}
        Some("json") => init_json(),
        Some(_) => init_text(),
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// JSON events to stderr via tracing-subscriber's JSON formatter.
fn init_json() {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
        )
        .init();
}

fn init_text() {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
