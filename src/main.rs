use caselabel::config::CliConfig;
use caselabel::utils::{logger, validation::Validate};
use caselabel::{ArtworkSource, DiscogsClient, HttpArtworkSource, LabelComposer, ReleaseSource};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting caselabel CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(()) => {
            tracing::info!("Label PDF saved to: {}", config.out);
            println!("PDF saved to {}", config.out);
        }
        Err(e) => {
            tracing::error!("Label generation failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> anyhow::Result<()> {
    let client = DiscogsClient::new(config.token.clone())?;
    let release = client.lookup(&config.query).await?;
    tracing::info!("Found release: {} - {}", release.artist, release.title);

    let artwork = match &release.cover_art_url {
        Some(url) => match HttpArtworkSource::new()?.fetch(url).await {
            Ok(artwork) => Some(artwork),
            Err(e) => {
                tracing::warn!("Cover art unavailable, continuing without it: {}", e);
                None
            }
        },
        None => None,
    };

    let composer = LabelComposer::new(config.label_options());
    let pdf = composer.compose(&release, artwork.as_ref())?;
    std::fs::write(&config.out, pdf)?;
    Ok(())
}
