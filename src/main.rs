use anyhow::Result;
use clap::Parser;
use storefront_cli::{
    cli::{Args, CliApp},
    utils::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    let filter = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("🦀 Storefront starting...");
    tracing::debug!(
        "Config: successfully loaded for {} environment, catalog at {}",
        config.environment,
        config.catalog_url
    );

    let app = CliApp::new(&config)?;
    app.run(args).await?;

    tracing::info!("🦀 Storefront stopped");
    Ok(())
}
