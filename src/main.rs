mod byline;
mod config;
mod export;
mod fetch;
mod listing;
mod post;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use url::Url;

use config::Config;
use export::AuthorLayout;
use fetch::Fetcher;

#[derive(Parser)]
#[command(
    name = "substack_scraper",
    about = "Archive a publication's post metadata to CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the post listing, scrape bylines, write the CSV archive
    Run {
        /// Publication base URL, e.g. https://example.substack.com
        base: String,
        /// Output CSV path (overwritten)
        #[arg(short, long, default_value = "output.csv")]
        out: PathBuf,
        /// Author column layout
        #[arg(long, value_enum, default_value_t = AuthorLayout::Spread)]
        authors: AuthorLayout,
        /// Posts requested per listing page
        #[arg(long, default_value_t = 50)]
        page_size: usize,
        /// Safety cap on listing pages
        #[arg(long, default_value_t = 1000)]
        max_pages: usize,
        /// Pause between listing pages, in milliseconds
        #[arg(long, default_value_t = 500)]
        page_delay_ms: u64,
        /// Pause between article fetches, in milliseconds
        #[arg(long, default_value_t = 200)]
        post_delay_ms: u64,
    },
    /// Fetch one listing page and print the normalized posts as JSON
    Page {
        /// Publication base URL
        base: String,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Fetch one article page and print its byline candidates
    Byline {
        /// Full article URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            base,
            out,
            authors,
            page_size,
            max_pages,
            page_delay_ms,
            post_delay_ms,
        } => {
            let cfg = Config::new(
                &base,
                out,
                authors,
                page_size,
                max_pages,
                page_delay_ms,
                post_delay_ms,
            )?;
            run(cfg).await
        }
        Commands::Page {
            base,
            offset,
            limit,
        } => page(&base, offset, limit).await,
        Commands::Byline { url } => byline_probe(&url).await,
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(cfg: Config) -> anyhow::Result<()> {
    let fetcher = Fetcher::new(&cfg.base)?;

    // Phase 1: paginate the listing into author-less shells
    println!("Collecting posts from {}...", cfg.base_display);
    let collected = listing::collect(&fetcher, &cfg).await?;
    if collected.posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }
    println!(
        "Collected {} posts across {} pages",
        collected.posts.len(),
        collected.pages
    );

    // Phase 2: per-article byline scrape
    let mut posts = collected.posts;
    println!("Scraping bylines for {} posts...", posts.len());
    let enricher = byline::Enricher::new(&fetcher, cfg.post_delay);
    let stats = enricher.enrich_all(&mut posts).await;
    println!(
        "Bylines: {} articles scraped ({} without a byline), {} failed, {} skipped (no URL)",
        stats.scraped, stats.empty, stats.failed, stats.skipped
    );

    // Phase 3: write the archive
    export::write_csv(&posts, cfg.layout, &cfg.output)?;
    println!("Saved {} posts to {}", posts.len(), cfg.output.display());
    if cfg.layout == AuthorLayout::Spread {
        println!("Max authors per post: {}", export::max_authors(&posts));
    }

    Ok(())
}

async fn page(base: &str, offset: u64, limit: usize) -> anyhow::Result<()> {
    let cfg = Config::new(base, "output.csv".into(), AuthorLayout::Spread, limit, 1, 0, 0)?;
    let fetcher = Fetcher::new(&cfg.base)?;

    let value = fetcher.listing_page(limit, offset).await?;
    let posts: Vec<_> = listing::posts_in(value)
        .into_iter()
        .filter_map(post::RawPost::from_value)
        .map(|raw| post::normalize(&raw, &cfg.base, &cfg.base_display))
        .collect();

    println!("{}", serde_json::to_string_pretty(&posts)?);
    println!("\n{} posts at offset {}", posts.len(), offset);
    Ok(())
}

async fn byline_probe(url: &str) -> anyhow::Result<()> {
    let parsed = Url::parse(url)?;
    let fetcher = Fetcher::new(&parsed)?;

    let html = fetcher.article(url).await?;
    let authors = byline::extract_authors(&html, &byline::default_strategies());
    if authors.is_empty() {
        println!("No byline candidates found.");
    } else {
        for author in authors {
            println!("{}", author);
        }
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
