// (C) Coralbits SL 2025
// This file is part of Cachetrace and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    // RUST_LOG overrides the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        // logs to stderr, stdout is for command output
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}
