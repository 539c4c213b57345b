mod commands;
mod output;

use clap::{Parser, Subcommand};
use hedgelayer_client::{ApiClient, Config};

#[derive(Parser)]
#[command(
    name = "hl",
    version,
    about = "Hedge Layer CLI — hedge real-world risks on Polymarket"
)]
struct Cli {
    /// Output as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override API base URL
    #[arg(long, global = true, value_name = "URL", env = "HL_API_URL")]
    api_url: Option<String>,

    /// Override stored API token
    #[arg(long, global = true, value_name = "TOKEN", env = "HL_TOKEN")]
    token: Option<String>,

    /// Show HTTP request details
    #[arg(long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage API authentication
    #[command(subcommand)]
    Auth(commands::auth::AuthCommand),

    /// Browse Polymarket prediction markets
    #[command(subcommand)]
    Markets(commands::markets::MarketsCommand),

    /// Show your user profile
    Profile,

    /// AI-powered risk assessment
    Assess {
        #[command(subcommand)]
        command: Option<commands::assess::AssessCommand>,
    },

    /// Calculate hedge positions from a risk profile JSON
    Hedge {
        /// Risk profile JSON file, or `-` for stdin
        file: Option<String>,
    },
}

/// Resolved global options: CLI flags override the stored config.
pub struct Ctx {
    pub json: bool,
    pub verbose: bool,
    pub api_url: String,
    pub token: Option<String>,
}

impl Ctx {
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.api_url, self.token.as_deref())?)
    }

    /// Like `client`, but fails fast when no token is available.
    pub fn authed_client(&self) -> anyhow::Result<ApiClient> {
        if self.token.is_none() {
            anyhow::bail!("Not logged in. Run {} first.", output::bold("hl auth login"));
        }
        self.client()
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        output::disable_color();
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let config = Config::load();
    let ctx = Ctx {
        json: cli.json,
        verbose: cli.verbose,
        api_url: cli.api_url.unwrap_or_else(|| config.api_url.clone()),
        token: cli.token.or_else(|| config.token.clone()),
    };

    let result = match cli.command {
        Command::Auth(command) => commands::auth::run(command, &ctx).await,
        Command::Markets(command) => commands::markets::run(command, &ctx).await,
        Command::Profile => commands::profile::run(&ctx).await,
        Command::Assess { command } => {
            commands::assess::run(command.unwrap_or_default(), &ctx).await
        }
        Command::Hedge { file } => commands::hedge::run(file, &ctx).await,
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
