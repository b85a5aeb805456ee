//! Tracing subscriber setup

use rmkit_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over everything; otherwise `--debug` raises the rmkit
/// crates to debug and the configured level applies to the rest. Logs go to
/// stderr so JSON results on stdout stay parseable.
pub fn init_tracing(logging: &LoggingConfig, debug: bool) {
    let fallback = if debug {
        format!("{},rmkit=debug,rmkit_platform=debug,rmkit_events=debug", logging.level)
    } else {
        logging.level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init(),
        LogFormat::Plain => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(debug)
            .init(),
    }
}
