use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log verbosity selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    pub verbose: u8,
    pub warn: bool,
    pub quiet: bool,
}

impl Verbosity {
    pub fn level_filter(self) -> LevelFilter {
        match (self.quiet, self.warn, self.verbose) {
            (true, _, _) => LevelFilter::ERROR,
            (false, true, _) => LevelFilter::WARN,
            (false, false, 0) => LevelFilter::INFO,
            (false, false, 1) => LevelFilter::DEBUG,
            (false, false, _) => LevelFilter::TRACE,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout only
/// carries the rendered report. `RUST_LOG` overrides the verbosity flags.
pub fn init_subscriber(verbosity: Verbosity) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .with(ErrorLayer::default())
        .init();
}
