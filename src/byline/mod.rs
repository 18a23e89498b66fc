pub mod strategies;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

pub use strategies::{default_strategies, extract_authors, Extract};

use crate::post::NormalizedPost;

/// Article HTML source. The production impl is `Fetcher`; tests serve
/// pages from memory.
pub trait Articles {
    async fn article(&self, url: &str) -> Result<String>;
}

impl Articles for crate::fetch::Fetcher {
    async fn article(&self, url: &str) -> Result<String> {
        self.article(url).await
    }
}

/// Enrichment stats returned after the byline pass completes.
pub struct EnrichStats {
    pub scraped: usize,
    /// Scraped fine, but no strategy produced a candidate.
    pub empty: usize,
    pub failed: usize,
    /// Posts with no URL; never fetched.
    pub skipped: usize,
}

/// Second pipeline stage: walks the collected posts in order and fills in
/// `authors` by scraping each article page. Failures here are best-effort
/// by contract — one broken page must not abort the remaining thousands.
pub struct Enricher<'a, A: Articles> {
    source: &'a A,
    strategies: Vec<Box<dyn Extract>>,
    delay: Duration,
}

impl<'a, A: Articles> Enricher<'a, A> {
    pub fn new(source: &'a A, delay: Duration) -> Self {
        Self {
            source,
            strategies: default_strategies(),
            delay,
        }
    }

    pub async fn enrich_all(&self, posts: &mut [NormalizedPost]) -> EnrichStats {
        let mut stats = EnrichStats {
            scraped: 0,
            empty: 0,
            failed: 0,
            skipped: 0,
        };

        let pb = ProgressBar::new(posts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
                .unwrap()
                .progress_chars("=> "),
        );

        for post in posts.iter_mut() {
            if post.url.is_empty() {
                stats.skipped += 1;
                pb.inc(1);
                continue;
            }

            match self.authors_for(&post.url).await {
                Some(authors) => {
                    stats.scraped += 1;
                    if authors.is_empty() {
                        stats.empty += 1;
                        debug!("No byline candidates on {}", post.url);
                    }
                    post.authors = authors;
                }
                None => stats.failed += 1,
            }
            pb.inc(1);
            tokio::time::sleep(self.delay).await;
        }

        pb.finish_and_clear();
        stats
    }

    /// Fetch one article and run the strategies. `None` means the fetch
    /// failed; the run continues with an empty byline.
    async fn authors_for(&self, url: &str) -> Option<Vec<String>> {
        match self.source.article(url).await {
            Ok(html) => Some(extract_authors(&html, &self.strategies)),
            Err(e) => {
                warn!("Byline fetch failed for {}: {}", url, e);
                None
            }
        }
    }
}

// ── Tests ──
