use serde::{Deserialize, Serialize};

/// Sentinel used when a track title or artist cannot be recovered.
pub const UNKNOWN: &str = "Unknown";

/// Represent a playable (or listed) track of a mix.
///
/// Tracks have no identity of their own, only their position in the mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub name: String,
    pub artist: String,
    /// Public path of the audio file, empty when the mix has no local audio
    pub audio_ref: String,
    pub cover_ref: String,
}

impl Track {
    /// Cover art of every track in a mix directory
    pub fn cover_for(directory: &str) -> String {
        format!("/{directory}/{directory}.jpg")
    }
}
