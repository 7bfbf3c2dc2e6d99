use anyhow::Result;
use clap::Parser;
use price_compare_cli::{cli::{Args, CliApp}, utils::Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env()?.with_storage_dir(args.storage_dir.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&config.log_level)
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "Price compare starting for {} environment",
        config.environment
    );

    let mut app = CliApp::new(config).await.map_err(|e| {
        tracing::error!("Failed to start: {}", e);
        e
    })?;
    app.run(args).await?;

    tracing::info!("Price compare stopped");
    Ok(())
}
