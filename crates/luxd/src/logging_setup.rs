//! Logging initialization

use anyhow::{Context, Result};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Initialize the logging system.
///
/// `level` is the default directive; the RUST_LOG environment variable
/// takes precedence.
pub fn init(level: &str) -> Result<()> {
    let directive = level
        .parse()
        .with_context(|| format!("invalid log level {level:?}"))?;
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
    Ok(())
}
