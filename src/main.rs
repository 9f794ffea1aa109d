use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use features_repo::add_to_repository::AddToRepository;
use features_repo::config::AddToRepositoryConfig;

/// Copies features descriptors and the bundles and config files of their features into a
///  maven repository directory
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON configuration of the run
    #[arg(long, short)]
    config: PathBuf,

    /// overrides the repository directory from the configuration
    #[arg(long)]
    repository: Option<PathBuf>,

    /// use the flat repository layout regardless of the configuration
    #[arg(long)]
    flat_repo_layout: bool,

    /// generate maven-metadata.xml and checksums regardless of the configuration
    #[arg(long)]
    generate_maven_metadata: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("adding features to repository failed: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AddToRepositoryConfig::load(&cli.config).await?;
    if let Some(repository) = cli.repository {
        config.repository = repository;
    }
    config.flat_repo_layout |= cli.flat_repo_layout;
    config.generate_maven_metadata |= cli.generate_maven_metadata;

    let report = AddToRepository::from_config(config)
        .run()
        .await?;

    // NB: items that failed were logged already, and do not fail the run
    info!("{} items processed", report.outcomes.len());
    Ok(())
}
