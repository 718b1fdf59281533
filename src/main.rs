use std::io;

use goalgrid::constants::LOG_ENV;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    goalgrid::cli::run_cli();
}
