use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{content::date::serialize_long_date, domain::track::Track};

/// Metadata block found on top of a mix markdown file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frontmatter {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rendered as a long date, e.g. "December 25, 2024"
    #[serde(serialize_with = "serialize_long_date")]
    pub date: Option<NaiveDate>,
    /// Freeform keys kept as they were written
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Frontmatter {
    /// Frontmatter used when the real one could not be read
    pub fn fallback(slug: &str) -> Self {
        Self {
            title: slug.to_string(),
            description: None,
            date: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// One year of curated music plus its write-up
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mix {
    pub slug: String,
    pub frontmatter: Frontmatter,
    pub excerpt: String,
    pub content: String,
    pub tracks: Vec<Track>,
    pub ingestion_error: Option<String>,
}

/// A mix together with its neighbours in collection order.
///
/// `previous` is the older mix, `next` the newer one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixPage {
    pub mix: Mix,
    pub previous: Option<Mix>,
    pub next: Option<Mix>,
}
