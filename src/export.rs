use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::post::NormalizedPost;

/// How multiple authors land in the CSV. Both layouts are in active use
/// downstream, so the choice is the caller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthorLayout {
    /// `author_1..author_N` columns, N = widest byline in the run
    Spread,
    /// Single `author_byline` column, names joined with ", "
    Joined,
}

/// Widest author list across the run; sizes the spread header.
pub fn max_authors(posts: &[NormalizedPost]) -> usize {
    posts.iter().map(|p| p.authors.len()).max().unwrap_or(0)
}

/// Write the archive, overwriting any existing file at `path`.
pub fn write_csv(posts: &[NormalizedPost], layout: AuthorLayout, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_to(file, posts, layout)
}

pub fn write_to<W: std::io::Write>(
    writer: W,
    posts: &[NormalizedPost],
    layout: AuthorLayout,
) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    match layout {
        AuthorLayout::Spread => {
            let width = max_authors(posts);
            let mut header = vec!["date".to_string()];
            header.extend((1..=width).map(|i| format!("author_{}", i)));
            header.extend(["headline", "url", "subheading"].map(String::from));
            w.write_record(&header)?;

            for p in posts {
                let mut record = Vec::with_capacity(width + 4);
                record.push(p.date.as_str());
                for i in 0..width {
                    record.push(p.authors.get(i).map(String::as_str).unwrap_or(""));
                }
                record.push(&p.headline);
                record.push(&p.url);
                record.push(&p.subheading);
                w.write_record(&record)?;
            }
        }
        AuthorLayout::Joined => {
            w.write_record(["date", "author_byline", "headline", "url", "subheading"])?;
            for p in posts {
                let byline = p.authors.join(", ");
                w.write_record([
                    p.date.as_str(),
                    byline.as_str(),
                    &p.headline,
                    &p.url,
                    &p.subheading,
                ])?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn post(date: &str, authors: &[&str], headline: &str) -> NormalizedPost {
        NormalizedPost {
            date: date.into(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            headline: headline.into(),
            url: format!("https://example.substack.com/p/{}", headline),
            subheading: String::new(),
        }
    }

    fn render(posts: &[NormalizedPost], layout: AuthorLayout) -> Vec<String> {
        let mut buf = Vec::new();
        write_to(&mut buf, posts, layout).unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn spread_header_sized_to_widest_row() {
        let posts = vec![
            post("2024-01-01", &["Jane Doe"], "one"),
            post("2024-01-02", &["Jane Doe", "John Roe", "Ann Poe"], "two"),
        ];
        let lines = render(&posts, AuthorLayout::Spread);
        assert_eq!(
            lines[0],
            "date,author_1,author_2,author_3,headline,url,subheading"
        );
        // Single-author row leaves author_2/author_3 blank
        assert_eq!(
            lines[1],
            "2024-01-01,Jane Doe,,,one,https://example.substack.com/p/one,"
        );
        assert_eq!(
            lines[2],
            "2024-01-02,Jane Doe,John Roe,Ann Poe,two,https://example.substack.com/p/two,"
        );
    }

    #[test]
    fn spread_with_no_authors_has_no_author_columns() {
        let posts = vec![post("2024-01-01", &[], "one")];
        let lines = render(&posts, AuthorLayout::Spread);
        assert_eq!(lines[0], "date,headline,url,subheading");
    }

    #[test]
    fn joined_layout_single_column() {
        let posts = vec![
            post("2024-01-01", &["Jane Doe", "John Roe"], "one"),
            post("2024-01-02", &[], "two"),
        ];
        let lines = render(&posts, AuthorLayout::Joined);
        assert_eq!(lines[0], "date,author_byline,headline,url,subheading");
        assert_eq!(
            lines[1],
            "2024-01-01,\"Jane Doe, John Roe\",one,https://example.substack.com/p/one,"
        );
        assert_eq!(
            lines[2],
            "2024-01-02,,two,https://example.substack.com/p/two,"
        );
    }

    #[test]
    fn row_order_matches_input_order() {
        let posts = vec![
            post("2024-01-03", &[], "newest"),
            post("2024-01-02", &[], "older"),
            post("2024-01-01", &[], "oldest"),
        ];
        let lines = render(&posts, AuthorLayout::Joined);
        assert!(lines[1].contains("newest"));
        assert!(lines[3].contains("oldest"));
    }

    #[test]
    fn max_authors_empty_run() {
        assert_eq!(max_authors(&[]), 0);
    }
}
