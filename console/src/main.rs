use clap::Parser;
use hrdesk_console::{Config, Console};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so tables on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrdesk=info,hrdesk_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();

    let config = Config::load()?;
    tracing::debug!(
        api_base_url = %config.api_base_url,
        poll_interval_secs = config.poll_interval.as_secs(),
        session_file = %config.session_file.display(),
        time_zone = %config.time_zone,
        "Loaded configuration"
    );

    let console = Console::from_config(&config)?;
    match console.resume().await? {
        Some(user) => tracing::debug!(user = %user.username, role = %user.role, "Resumed session"),
        None if !matches!(args.command, Command::Login { .. }) => {
            anyhow::bail!("Not signed in, run `hrdesk login` first");
        }
        None => {}
    }

    cli::run(console, args.command).await
}
