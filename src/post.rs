use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

const DATE_KEYS: &[&str] = &["published_at", "post_date", "created_at"];
const SUBHEADING_KEYS: &[&str] = &["subtitle", "dek", "description"];

/// One untyped record from the listing API. Keys vary across publication
/// backends; lookups fall through to the next key on absent, non-string,
/// or empty values.
pub struct RawPost(Map<String, Value>);

impl RawPost {
    /// Listing entries are expected to be JSON objects; anything else is
    /// dropped by the caller.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.str_field(k))
    }

    /// `slug`, else `id` (which some backends emit as a bare number).
    fn slug_or_id(&self) -> Option<String> {
        if let Some(slug) = self.str_field("slug") {
            return Some(slug.to_string());
        }
        match self.0.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Uniform record shape, one per post, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedPost {
    pub date: String,
    pub authors: Vec<String>,
    pub headline: String,
    pub url: String,
    pub subheading: String,
}

/// Map a raw record onto the output shape. Pure field work: `authors` is
/// left empty here and filled by the byline enrichment pass.
pub fn normalize(raw: &RawPost, base: &Url, base_display: &str) -> NormalizedPost {
    let date = raw.first_str(DATE_KEYS).unwrap_or("").to_string();
    let headline = raw.str_field("title").unwrap_or("").trim().to_string();
    let subheading = raw
        .first_str(SUBHEADING_KEYS)
        .unwrap_or("")
        .trim()
        .to_string();

    // URL field wins over slug/id; relative links resolve against the base.
    let url = match raw.str_field("url") {
        Some(link) => base
            .join(link)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| link.to_string()),
        None => match raw.slug_or_id() {
            Some(slug) => format!("{}/p/{}", base_display, slug),
            None => String::new(),
        },
    };

    NormalizedPost {
        date,
        authors: Vec::new(),
        headline,
        url,
        subheading,
    }
}

// ── Tests ──
