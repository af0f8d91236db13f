use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

/// Initialise logging into the file at `path`, appending.
///
/// The terminal belongs to the table view, so nothing is written to stdout or stderr.
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
