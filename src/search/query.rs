use serde::{Deserialize, Serialize};

use crate::search::index::{IndexedTrack, SearchIndexEntry};

/// Most matching tracks reported per mix
pub const MAX_MATCHING_TRACKS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub matching_tracks: Vec<IndexedTrack>,
}

/// Case-insensitive substring search over the index.
///
/// Results keep index order. An empty query matches nothing.
pub fn search(query: &str, index: &[SearchIndexEntry]) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();

    index
        .iter()
        .filter(|entry| matches_entry(entry, &query))
        .map(|entry| SearchResult {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            matching_tracks: entry
                .tracks
                .iter()
                .filter(|track| {
                    track.name.to_lowercase().contains(&query)
                        || track.artist.to_lowercase().contains(&query)
                })
                .take(MAX_MATCHING_TRACKS)
                .cloned()
                .collect(),
        })
        .collect()
}

/// `query` must already be lowercase
fn matches_entry(entry: &SearchIndexEntry, query: &str) -> bool {
    let text = [
        entry.title.as_str(),
        entry.description.as_str(),
        entry.content_preview.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    if text.contains(query) {
        return true;
    }

    let tracks = entry
        .tracks
        .iter()
        .map(|t| format!("{} {}", t.name, t.artist))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    tracks.contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str) -> IndexedTrack {
        IndexedTrack {
            name: name.to_string(),
            artist: artist.to_string(),
        }
    }

    fn entry(id: &str, description: &str, preview: &str, tracks: Vec<IndexedTrack>) -> SearchIndexEntry {
        SearchIndexEntry {
            id: id.to_string(),
            title: id.to_string(),
            description: description.to_string(),
            content_preview: preview.to_string(),
            tracks,
        }
    }

    fn index() -> Vec<SearchIndexEntry> {
        vec![
            entry(
                "2024",
                "Holiday music mix for 2024",
                "# HBBJ 2024\n\nWelcome to the 2024 holiday mix!",
                vec![
                    track("Silent Night", "Bing Crosby"),
                    track("White Christmas", "Frank Sinatra"),
                    track("Jingle Bells", "Ella Fitzgerald"),
                ],
            ),
            entry(
                "2023",
                "Exotica and rare soul",
                "Recorded live somewhere warm",
                vec![],
            ),
            entry(
                "2022",
                "Holiday music mix for 2022",
                "",
                vec![
                    track("Christmas 1", "Bing Crosby"),
                    track("Christmas 2", "Bing Crosby"),
                    track("Christmas 3", "Bing Crosby"),
                    track("Christmas 4", "Bing Crosby"),
                    track("Christmas 5", "Bing Crosby"),
                ],
            ),
        ]
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(search("", &index()).is_empty());
    }

    #[test]
    fn test_matches_tracks_and_reports_them() {
        let results = search("bing crosby", &index());

        assert_eq!(ids(&results), vec!["2024", "2022"]);
        assert_eq!(
            results[0].matching_tracks,
            vec![track("Silent Night", "Bing Crosby")]
        );
    }

    #[test]
    fn test_matching_tracks_are_capped() {
        let results = search("bing crosby", &index());

        let tracks = &results[1].matching_tracks;
        assert_eq!(tracks.len(), MAX_MATCHING_TRACKS);
        assert_eq!(tracks[0].name, "Christmas 1");
        assert_eq!(tracks[2].name, "Christmas 3");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert_eq!(search("BING CROSBY", &index()), search("bing crosby", &index()));
    }

    #[test]
    fn test_matches_description_and_preview_without_tracks() {
        let results = search("exotica", &index());
        assert_eq!(ids(&results), vec!["2023"]);
        assert!(results[0].matching_tracks.is_empty());

        assert_eq!(ids(&search("somewhere warm", &index())), vec!["2023"]);
    }

    #[test]
    fn test_title_match_keeps_index_order() {
        assert_eq!(ids(&search("holiday", &index())), vec!["2024", "2022"]);
        assert_eq!(ids(&search("20", &index())), vec!["2024", "2023", "2022"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(search("polka", &index()).is_empty());
    }
}
