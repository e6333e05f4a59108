//! Pathsheet - command-line entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pathsheet_engine::cli::{self, Cli};
use pathsheet_engine::infrastructure::settings::{load_dotenv_from_repo_root, EngineSettings};
use pathsheet_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathsheet_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = EngineSettings::from_env();
    cli.apply_to(&mut settings);
    tracing::debug!(
        data_dir = %settings.data_dir.display(),
        reference = %settings.reference_path.display(),
        without_level = settings.proficiency_without_level,
        "Loaded settings"
    );

    let app = App::from_settings(&settings);
    let output = cli::execute(&app, cli.command).await?;

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");

    Ok(())
}
