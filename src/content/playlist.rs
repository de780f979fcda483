//! Extended M3U playlist parsing.
//!
//! The format is a `#EXTM3U` header followed by entries made of an
//! `#EXTINF:<duration>,<display title>` line and a URI line.
//! The display title is `"<name> - <artist>"`.

use crate::domain::track::{Track, UNKNOWN};

const EXTINF: &str = "#EXTINF:";

/// Result of parsing a playlist blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistOutcome {
    Tracks(Vec<Track>),
    /// The blob has no content at all
    Empty,
    /// The blob is not a usable playlist
    Malformed(String),
}

#[derive(Debug)]
struct Entry<'a> {
    title: Option<&'a str>,
    uri: &'a str,
}

/// Parses raw playlist bytes of the mix stored in `directory`.
pub fn parse_playlist(blob: &[u8], directory: &str) -> PlaylistOutcome {
    match std::str::from_utf8(blob) {
        Ok(text) => parse_playlist_str(text, directory),
        Err(e) => PlaylistOutcome::Malformed(format!("playlist is not valid UTF-8: {e}")),
    }
}

pub fn parse_playlist_str(text: &str, directory: &str) -> PlaylistOutcome {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.is_empty() {
        return PlaylistOutcome::Empty;
    }

    let entries = entries(text);
    if entries.is_empty() {
        return PlaylistOutcome::Malformed("playlist is empty or incorrectly formatted".into());
    }

    PlaylistOutcome::Tracks(
        entries
            .iter()
            .map(|entry| to_track(entry, directory))
            .collect(),
    )
}

fn entries(text: &str) -> Vec<Entry<'_>> {
    let mut entries = Vec::new();
    let mut pending_title: Option<&str> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if let Some(info) = line.strip_prefix(EXTINF) {
            // "<duration>,<title>", title may itself contain commas
            pending_title = Some(info.split_once(',').map(|(_, t)| t).unwrap_or(""));
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        entries.push(Entry {
            title: pending_title.take(),
            uri: line,
        });
    }

    entries
}

fn to_track(entry: &Entry<'_>, directory: &str) -> Track {
    let (name, artist) = split_title(entry.title);
    let file_name = entry.uri.rsplit('/').next().unwrap_or(entry.uri);

    Track {
        name,
        artist,
        audio_ref: format!("/{directory}/{file_name}"),
        cover_ref: Track::cover_for(directory),
    }
}

/// Splits a display title on its first `-`.
///
/// The left part becomes the name, the right part the artist. A blank part
/// trims to `""`; only a missing title or missing part becomes "Unknown".
fn split_title(title: Option<&str>) -> (String, String) {
    let title = match title.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    match title.split_once('-') {
        Some((name, artist)) => (name.trim().to_string(), artist.trim().to_string()),
        None => (title.to_string(), UNKNOWN.to_string()),
    }
}
