use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::Context;
use pd_oncall::client::PagerDutyClient;
use pd_oncall::commands::{self, ExportFormat, OncallFormat};
use pd_oncall::config::load_config;
use pd_oncall::output::{self, STDOUT};
use pd_oncall::telemetry::{init_subscriber, Verbosity};
use pd_oncall::types::ApiToken;

const TOKEN_ENV: &str = "PAGERDUTY_TOKEN";

#[derive(Parser)]
#[command(author, version, about = "PagerDuty on-call reports")]
#[clap(rename_all = "kebab-case")]
struct Cli {
    /// A PagerDuty API token with read access
    #[clap(short, long, global = true, env = TOKEN_ENV)]
    api_token: Option<String>,

    /// TOML config files, later files override earlier ones
    #[clap(short, long, global = true)]
    config: Vec<PathBuf>,

    /// Extra env files to load, each must exist
    #[clap(short, long, global = true)]
    env_file: Vec<PathBuf>,

    #[clap(flatten)]
    logging: LoggingArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args)]
struct LoggingArgs {
    /// Increase verbosity
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only display warning messages
    #[clap(short, long, global = true)]
    warn: bool,

    /// Only display errors
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
#[clap(rename_all = "kebab-case")]
enum Command {
    /// List who is on call
    #[clap(alias = "who")]
    WhoIsOncall {
        /// Only show escalation policies whose name contains this text
        #[clap(long)]
        filter: Option<String>,

        /// Report layout
        #[clap(short, long, value_enum, default_value_t)]
        format: OncallFormat,

        /// Where to save the output, `-` for stdout
        #[clap(short, long, default_value = STDOUT)]
        output: String,
    },

    /// Export escalation policies
    Export {
        /// Export layout
        #[clap(short, long, value_enum, default_value_t)]
        format: ExportFormat,

        /// Where to save the output, `-` for stdout
        #[clap(short, long, default_value = STDOUT)]
        output: String,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let cli = Cli::parse();

    for path in &cli.env_file {
        dotenv::from_path(path).wrap_err_with(|| {
            format!("Unable to load env file {}", path.display())
        })?;
    }

    init_subscriber(Verbosity {
        verbose: cli.logging.verbose,
        warn: cli.logging.warn,
        quiet: cli.logging.quiet,
    });

    let mut config = load_config(cli.config.iter().map(PathBuf::as_ref))
        .wrap_err("Unable to load config")?;

    // Env files are loaded after parsing, so check the variable again
    let api_token = cli.api_token.or_else(|| std::env::var(TOKEN_ENV).ok());
    if let Some(api_token) = api_token {
        config.api.token = Some(ApiToken::from(api_token));
    }

    tracing::debug!(?config, "Loaded config");

    let client = PagerDutyClient::new(&config.api)?;

    match cli.command {
        Command::WhoIsOncall {
            filter,
            format,
            output,
        } => {
            let rendered =
                commands::who_is_oncall(&client, filter.as_deref(), format)
                    .await?;
            output::write_file(&output, &rendered)?;
        }
        Command::Export { format, output } => {
            let rendered = commands::export(&client, format).await?;
            output::write_file(&output, &rendered)?;
        }
    }

    Ok(())
}
