//! Splitting a mix markdown file into frontmatter, excerpt and body.

use std::collections::BTreeMap;

use log::warn;
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::{
    content::date::parse_date,
    domain::{
        mix::Frontmatter,
        track::{Track, UNKNOWN},
    },
};

const DELIMITER: &str = "---";

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("frontmatter block is not closed")]
    Unterminated,

    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("frontmatter has no date")]
    MissingDate,

    #[error("frontmatter date '{0}' is not a recognized date")]
    InvalidDate(String),
}

/// Markdown file split in its three parts
#[derive(Debug, PartialEq, Eq)]
pub struct Document<'a> {
    /// Raw YAML between the delimiters, `None` when the file has no frontmatter
    pub matter: Option<&'a str>,
    pub excerpt: &'a str,
    pub content: &'a str,
}

/// Splits a markdown file.
///
/// The frontmatter opens with a `---` line and closes with the next `---` line.
/// The excerpt is the body text before the first `excerpt_separator` line and
/// stays empty without a separator.
pub fn split_document<'a>(
    source: &'a str,
    excerpt_separator: Option<&str>,
) -> Result<Document<'a>, FrontmatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (matter, content) = match strip_delimiter_line(source) {
        Some(rest) => {
            let (matter, content) =
                split_at_line(rest, DELIMITER).ok_or(FrontmatterError::Unterminated)?;
            (Some(matter), content)
        }
        None => (None, source),
    };

    let excerpt = excerpt_separator
        .and_then(|separator| split_at_line(content, separator))
        .map(|(excerpt, _)| excerpt.trim())
        .unwrap_or("");

    Ok(Document {
        matter,
        excerpt,
        content,
    })
}

/// Returns the text after a leading `---` line
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    (first.trim_end() == DELIMITER).then_some(rest)
}

/// Splits at the first line consisting solely of `marker`
fn split_at_line<'a>(text: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == marker {
            return Some((&text[..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    title: Option<Value>,
    description: Option<Value>,
    date: Option<Value>,
    tracklist: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Typed frontmatter plus the inline track list, if it declares one
#[derive(Debug)]
pub struct ParsedFrontmatter {
    pub frontmatter: Frontmatter,
    pub tracklist: Option<Vec<InlineTrack>>,
    /// Set when the date is missing or unreadable, `frontmatter.date` is then `None`
    pub date_error: Option<FrontmatterError>,
}

/// Track declared in frontmatter, for mixes without local audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTrack {
    pub name: String,
    pub artist: String,
}

impl InlineTrack {
    pub fn into_track(self, directory: &str) -> Track {
        Track {
            name: self.name,
            artist: self.artist,
            audio_ref: String::new(),
            cover_ref: Track::cover_for(directory),
        }
    }
}

/// Parses the YAML block of the mix `slug`.
///
/// Only invalid YAML fails. A bad date leaves the other fields intact and is
/// reported in `date_error`.
pub fn parse_frontmatter(
    matter: Option<&str>,
    slug: &str,
) -> Result<ParsedFrontmatter, FrontmatterError> {
    let raw: RawFrontmatter = match matter {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => RawFrontmatter::default(),
    };

    let (date, date_error) = match raw.date.as_ref().and_then(scalar_to_string) {
        None => (None, Some(FrontmatterError::MissingDate)),
        Some(raw_date) => match parse_date(&raw_date) {
            Some(date) => (Some(date), None),
            None => (None, Some(FrontmatterError::InvalidDate(raw_date))),
        },
    };

    let extra = raw
        .extra
        .into_iter()
        .filter_map(|(key, value)| match serde_json::to_value(&value) {
            Ok(json) => Some((key, json)),
            Err(e) => {
                warn!("{slug}: dropping frontmatter key '{key}': {e}");
                None
            }
        })
        .collect();

    Ok(ParsedFrontmatter {
        frontmatter: Frontmatter {
            title: raw
                .title
                .as_ref()
                .and_then(scalar_to_string)
                .unwrap_or_else(|| slug.to_string()),
            description: raw.description.as_ref().and_then(scalar_to_string),
            date,
            extra,
        },
        tracklist: raw.tracklist.as_ref().and_then(inline_tracks),
        date_error,
    })
}

/// Year titles are usually written as bare numbers
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn inline_tracks(value: &Value) -> Option<Vec<InlineTrack>> {
    let Value::Sequence(items) = value else {
        return None;
    };

    Some(
        items
            .iter()
            .map(|item| InlineTrack {
                name: first_non_empty(item, &["name", "title"]),
                artist: first_non_empty(item, &["artist", "singer"]),
            })
            .collect(),
    )
}

fn first_non_empty(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| item.get(*key).and_then(scalar_to_string))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
