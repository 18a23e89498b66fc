use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::export::AuthorLayout;

/// Everything a run needs, resolved once in `main` and passed down by
/// reference. Defaults match the pacing the listing API tolerates.
pub struct Config {
    pub base: Url,
    /// Base with any trailing slash removed, for `{base}/p/{slug}` links.
    pub base_display: String,
    pub output: PathBuf,
    pub layout: AuthorLayout,
    pub page_size: usize,
    /// Hard cap on listing pages per run.
    pub max_pages: usize,
    pub page_delay: Duration,
    pub post_delay: Duration,
}

impl Config {
    pub fn new(
        base: &str,
        output: PathBuf,
        layout: AuthorLayout,
        page_size: usize,
        max_pages: usize,
        page_delay_ms: u64,
        post_delay_ms: u64,
    ) -> Result<Self> {
        let base_display = base.trim().trim_end_matches('/').to_string();
        let base = Url::parse(&base_display)
            .with_context(|| format!("Invalid base URL: {}", base_display))?;
        Ok(Self {
            base,
            base_display,
            output,
            layout,
            page_size,
            max_pages,
            page_delay: Duration::from_millis(page_delay_ms),
            post_delay: Duration::from_millis(post_delay_ms),
        })
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> Config {
        Config::new(base, "out.csv".into(), AuthorLayout::Spread, 50, 1000, 0, 0).unwrap()
    }

    #[test]
    fn trailing_slash_trimmed() {
        let cfg = config("https://example.substack.com/");
        assert_eq!(cfg.base_display, "https://example.substack.com");
    }

    #[test]
    fn bad_base_rejected() {
        assert!(Config::new(
            "not a url",
            "out.csv".into(),
            AuthorLayout::Joined,
            50,
            1000,
            0,
            0
        )
        .is_err());
    }
}
