//! Installing a `tracing` subscriber.
//!
//! The library crates only emit events. A program that wants them calls
//! [`init`] once at startup. Terminal programs own stdout and stderr while
//! running, so they should pass a file (or another sink) as the writer.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use ttk_core::{Result, TtkError};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "TTK_LOG";

/// Filter used when neither an explicit filter nor `TTK_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: `filter` if given, else `TTK_LOG`, else `warn`.
pub fn env_filter(filter: Option<&str>) -> Result<EnvFilter> {
    let from_env = std::env::var(LOG_ENV).ok();
    let given = |d: &&str| !d.trim().is_empty();
    let directives = filter
        .filter(given)
        .or_else(|| from_env.as_deref().filter(given))
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives)
        .map_err(|err| TtkError::Init(format!("invalid log filter {directives:?}: {err}")))
}

/// Install a global fmt subscriber writing to `writer`.
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init<W>(filter: Option<&str>, writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = env_filter(filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| TtkError::Init(format!("logging already initialized: {err}")))
}
