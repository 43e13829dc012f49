use std::{fs::OpenOptions, path::Path, sync::Mutex};

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "chat_desk_client=info,common=info";

/// Sends diagnostics to `path`; the terminal itself belongs to the UI.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}
