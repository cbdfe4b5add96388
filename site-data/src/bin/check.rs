use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use site_core::{
    calculations::common::format_currency,
    news::{NewsFeed, NewsView},
};
use site_data::{CatalogLoader, GalleryLoader, JsonFileNewsSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate the site's data files before deploying them.
///
/// Loads the price catalog and, when given, the news feed and the gallery,
/// then prints what was found. Exits non-zero on the first invalid file.
#[derive(Parser, Debug)]
#[command(name = "site-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Price catalog CSV (`kind,id,label,price`)
    #[arg(short, long)]
    catalog: PathBuf,

    /// News feed JSON array
    #[arg(short, long)]
    news: Option<PathBuf>,

    /// Gallery CSV (`id,title,description,category`)
    #[arg(short, long)]
    gallery: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let catalog = CatalogLoader::load_from_file(&args.catalog)
        .with_context(|| format!("Failed to load catalog: {}", args.catalog.display()))?;

    println!("Products:");
    for product in catalog.products() {
        println!("  {:<12} {:<30} {:>12}", product.id, product.label, format_currency(product.price));
    }
    println!("Add-ons:");
    for add_on in catalog.add_ons() {
        println!("  {:<12} {:<30} {:>12}", add_on.id, add_on.label, format_currency(add_on.price));
    }

    if let Some(news_path) = &args.news {
        let feed = NewsFeed::new(Box::new(JsonFileNewsSource::new(news_path)));
        match feed.latest().await {
            NewsView::Cards(cards) => info!(shown = cards.len(), "news feed ok"),
            NewsView::Empty => info!("news feed is empty"),
            NewsView::Failed => {
                anyhow::bail!("Failed to load news feed: {}", news_path.display())
            }
        }
    }

    if let Some(gallery_path) = &args.gallery {
        let items = GalleryLoader::load_from_file(gallery_path)
            .with_context(|| format!("Failed to load gallery: {}", gallery_path.display()))?;
        println!("Gallery: {} projects", items.len());
    }

    Ok(())
}
