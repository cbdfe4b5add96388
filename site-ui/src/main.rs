use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use site_core::{
    PageController,
    news::NewsFeed,
    submission::SimulatedSubmitter,
};
use site_data::{CatalogLoader, GalleryLoader, JsonFileNewsSource};
use site_ui::{
    AppConfig, ConsoleSurface, Session, logging,
    session::{self, Event},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Console host for the agency budget form.
///
/// Loads the price catalog (and optionally the news feed and gallery) named
/// in the config file, then reads commands from stdin.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file. Missing file means defaults.
    #[arg(long, default_value = "site.toml")]
    config: PathBuf,

    /// Overrides `catalog_path` from the config file.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Overrides `[logging] level` from the config file.
    #[arg(long)]
    log_level: Option<String>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    logging::init_logging(&config.logging)?;
    debug!(?config, "configuration loaded");

    let catalog = CatalogLoader::load_from_file(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", config.catalog_path.display()))?;

    let controller = PageController::new(
        catalog,
        Box::new(SimulatedSubmitter::new(config.submit_delay())),
    )
    .with_reset_delay(config.reset_delay());

    let mut session = Session::new(controller, ConsoleSurface::new(std::io::stdout()));
    if let Some(news_path) = &config.news_path {
        session = session.with_news(NewsFeed::new(Box::new(JsonFileNewsSource::new(news_path))));
    }
    if let Some(gallery_path) = &config.gallery_path {
        let items = GalleryLoader::load_from_file(gallery_path)
            .with_context(|| format!("Failed to load gallery: {}", gallery_path.display()))?;
        session = session.with_gallery(items);
    }

    let (sender, events) = mpsc::channel::<Event>(32);
    session::spawn_stdin_reader(sender.clone());

    info!("site started");
    session.run(events, sender).await;

    Ok(())
}
