use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr so command output on stdout stays clean. `RUST_LOG` wins
/// over the verbosity flag.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "benevity_bridge=debug"
    } else {
        "benevity_bridge=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
