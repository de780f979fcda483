//! Flat search index consumed by client-side search.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::mix::Mix;

/// Longest content excerpt kept per mix, in characters
pub const CONTENT_PREVIEW_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedTrack {
    pub name: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content_preview: String,
    pub tracks: Vec<IndexedTrack>,
}

impl SearchIndexEntry {
    pub fn from_mix(mix: &Mix) -> Self {
        Self {
            id: mix.slug.clone(),
            title: mix.frontmatter.title.clone(),
            description: mix.frontmatter.description_or_empty().to_string(),
            content_preview: mix.content.chars().take(CONTENT_PREVIEW_LEN).collect(),
            tracks: mix
                .tracks
                .iter()
                .map(|t| IndexedTrack {
                    name: t.name.clone(),
                    artist: t.artist.clone(),
                })
                .collect(),
        }
    }
}

/// One entry per mix, in collection order
pub fn build_index(mixes: &[Mix]) -> Vec<SearchIndexEntry> {
    mixes.iter().map(SearchIndexEntry::from_mix).collect()
}

/// Writes the index as pretty printed JSON, creating parent directories
pub fn write_index(path: &Path, entries: &[SearchIndexEntry]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.to_string_lossy()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.to_string_lossy()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.flush()?;

    info!(
        "Search data generated: {} mixes indexed at {}",
        entries.len(),
        path.to_string_lossy()
    );
    Ok(())
}

pub fn load_index(path: &Path) -> anyhow::Result<Vec<SearchIndexEntry>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open search index {}", path.to_string_lossy()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse search index {}", path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::tempdir;

    use super::*;
    use crate::domain::{mix::Frontmatter, track::Track};

    fn mix(slug: &str, content: &str, tracks: usize) -> Mix {
        Mix {
            slug: slug.to_string(),
            frontmatter: Frontmatter {
                title: slug.to_string(),
                description: None,
                date: None,
                extra: BTreeMap::new(),
            },
            excerpt: String::new(),
            content: content.to_string(),
            tracks: (0..tracks)
                .map(|i| Track {
                    name: format!("Song {i}"),
                    artist: format!("Artist {i}"),
                    audio_ref: format!("/{slug}/{i}.mp3"),
                    cover_ref: Track::cover_for(slug),
                })
                .collect(),
            ingestion_error: None,
        }
    }

    #[test]
    fn test_one_entry_per_mix_with_bounded_preview() {
        let long = "x".repeat(1200);
        let mixes = vec![mix("2024", &long, 2), mix("2023", "short", 0), mix("2022", "", 1)];

        let index = build_index(&mixes);

        assert_eq!(index.len(), mixes.len());
        for (entry, mix) in index.iter().zip(&mixes) {
            assert_eq!(entry.id, mix.slug);
            assert_eq!(
                entry.content_preview.chars().count(),
                mix.content.chars().count().min(CONTENT_PREVIEW_LEN)
            );
            assert_eq!(entry.tracks.len(), mix.tracks.len());
        }
        assert_eq!(index[0].tracks[1].artist, "Artist 1");
        assert_eq!(index[1].description, "");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let content = "é".repeat(600);

        let entry = SearchIndexEntry::from_mix(&mix("2019", &content, 0));

        assert_eq!(entry.content_preview.chars().count(), CONTENT_PREVIEW_LEN);
    }

    #[test]
    fn test_serializes_camel_case_without_media_refs() -> anyhow::Result<()> {
        let entry = SearchIndexEntry::from_mix(&mix("2024", "body", 1));

        let json = serde_json::to_value(&entry)?;

        assert_eq!(json["contentPreview"], "body");
        assert_eq!(
            json["tracks"][0],
            serde_json::json!({"name": "Song 0", "artist": "Artist 0"})
        );

        Ok(())
    }

    #[test]
    fn test_write_then_load() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("public").join("search-data.json");
        let index = build_index(&[mix("2024", "body", 3)]);

        write_index(&path, &index)?;
        let loaded = load_index(&path)?;

        assert_eq!(loaded, index);
        Ok(())
    }

    #[test]
    fn test_load_missing_index_fails() {
        let dir = tempdir().unwrap();

        assert!(load_index(&dir.path().join("missing.json")).is_err());
    }
}
