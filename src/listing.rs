use anyhow::Result;
use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::post::{normalize, NormalizedPost, RawPost};

/// Keys under which an object-shaped listing page may hold its post array,
/// in priority order.
const CONTAINER_KEYS: &[&str] = &["posts", "items", "results"];

/// One page of the post listing. The production impl is `Fetcher`; tests
/// feed pages from memory.
pub trait Listing {
    async fn page(&self, limit: usize, offset: u64) -> Result<Value>;
}

impl Listing for crate::fetch::Fetcher {
    async fn page(&self, limit: usize, offset: u64) -> Result<Value> {
        self.listing_page(limit, offset).await
    }
}

/// Collection stats returned after pagination completes.
pub struct Collected {
    pub posts: Vec<NormalizedPost>,
    pub pages: usize,
}

/// Drive pagination to exhaustion, normalizing every post into an
/// author-less shell. Stops on an empty page, on a short page (fewer posts
/// than requested, so no extra round-trip), or at the page cap.
pub async fn collect<L: Listing>(listing: &L, cfg: &Config) -> Result<Collected> {
    let mut posts = Vec::new();
    let mut offset = 0u64;
    let mut pages = 0usize;

    for page_num in 1..=cfg.max_pages {
        let value = listing.page(cfg.page_size, offset).await?;
        let batch = posts_in(value);

        if batch.is_empty() {
            println!("Page {}: done", page_num);
            break;
        }

        pages += 1;
        let count = batch.len();
        for entry in batch {
            match RawPost::from_value(entry) {
                Some(raw) => posts.push(normalize(&raw, &cfg.base, &cfg.base_display)),
                None => warn!("Skipping non-object listing entry on page {}", page_num),
            }
        }
        println!("Page {}: {} posts", page_num, count);

        if count < cfg.page_size {
            break;
        }
        if page_num == cfg.max_pages {
            warn!("Page cap of {} reached, stopping early", cfg.max_pages);
            break;
        }
        offset += count as u64;
        tokio::time::sleep(cfg.page_delay).await;
    }

    Ok(Collected { posts, pages })
}

/// Unwrap a listing page into its post array: either a bare array, or an
/// object holding one under `posts`/`items`/`results`.
pub(crate) fn posts_in(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => CONTAINER_KEYS
            .iter()
            .find_map(|k| match map.remove(*k) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

// ── Tests ──
