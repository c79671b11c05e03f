//! Subscriber setup. Filters come from `TYCK_LOG` using `RUST_LOG` syntax,
//! e.g. `TYCK_LOG=tyck_checker=trace`. Output always goes to stderr so it
//! never mixes with `--listFiles`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TYCK_LOG";

fn build_filter(verbose: bool) -> EnvFilter {
    let filter = match std::env::var(LOG_ENV) {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::new("warn"),
    };
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .try_init();
}
