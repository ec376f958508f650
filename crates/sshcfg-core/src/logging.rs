use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a tracing subscriber for a front-end embedding the library.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` selects the level, defaulting to "info".
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with_default("info")
}

/// Like [`init`], with `default_directive` used when `RUST_LOG` is unset.
pub fn init_with_default(
    default_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, warn};

    #[test]
    fn test_logging_init() {
        // Only the first init in a process succeeds
        let _ = init();

        debug!(path = "/tmp/config", "parsed");
        info!("wrote backup");
        warn!("skipping include");

        assert!(init_with_default("debug").is_err());
    }
}
