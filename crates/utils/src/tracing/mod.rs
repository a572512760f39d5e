use reclaim_core::RECLAIM_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-exported for callers building their own spans
pub use tracing::{span, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `RECLAIM_LOG` (falling back to `RUST_LOG`, then
/// `info`). Output goes to stderr so that it never mixes with anything a
/// command prints on stdout. ANSI colours are only used on a TTY.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(RECLAIM_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new("info"))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_names(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering the lifetime of one resource
pub fn resource_span(kind: &str, path: &std::path::Path) -> Span {
    span!(Level::INFO, "resource", kind = %kind, path = %path.display())
}
