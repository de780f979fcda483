//! Badges summarizing what is notable about a mix, mined from its text.

pub mod rng;
pub mod rules;

use once_cell::sync::Lazy;
use regex::Regex;

use rules::{
    COPIES_PATTERN, EPIC_MINUTES, GENRES, KeywordRule, MAX_BADGES, RARITY, RECORDING,
    TRACK_LENGTH_PATTERN,
};

static COPIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(COPIES_PATTERN).expect("Invalid copies pattern"));

static TRACK_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(TRACK_LENGTH_PATTERN).expect("Invalid track length pattern"));

/// Default length of descriptions shown in mix listings
pub const SUMMARY_LENGTH: usize = 150;

/// Badges for a mix description and its markdown content.
///
/// Returns at most `MAX_BADGES` badges. When more match, they are shuffled with
/// a seed taken from the description length and the first ones are kept.
pub fn extract_metadata(description: &str, content: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }

    let lower_desc = description.to_lowercase();
    let combined = format!("{description} {content}");
    let lower_combined = combined.to_lowercase();

    let mut badges: Vec<String> = Vec::new();
    let mut push = |badge: String| {
        if !badges.contains(&badge) {
            badges.push(badge);
        }
    };

    keyword_badges(RARITY, &lower_desc).for_each(|b| push(b.to_string()));
    keyword_badges(GENRES, &lower_combined).for_each(|b| push(b.to_string()));
    keyword_badges(RECORDING, &lower_combined).for_each(|b| push(b.to_string()));

    if let Some(copies) = COPIES.captures(&combined) {
        push(format!("{} COPIES", &copies[1]));
    }

    if let Some(length) = TRACK_LENGTH.captures(&combined) {
        let minutes = &length[1];
        // digits too long for u64 are still long enough
        if minutes.parse::<u64>().map_or(true, |m| m >= EPIC_MINUTES) {
            push(format!("{minutes}-MIN EPIC"));
        }
    }

    if badges.len() > MAX_BADGES {
        let seed = description.encode_utf16().count() as u32;
        rng::seeded_shuffle(&mut badges, seed);
        badges.truncate(MAX_BADGES);
    }

    badges
}

fn keyword_badges<'a>(
    rules: &'a [KeywordRule],
    text: &'a str,
) -> impl Iterator<Item = &'static str> + 'a {
    rules
        .iter()
        .filter(move |rule| {
            rule.keywords.iter().any(|k| text.contains(k))
                && !rule.exclude.iter().any(|e| text.contains(e))
        })
        .map(|rule| rule.badge)
}

/// Truncates to `max_len` characters on a word boundary and appends "..."
pub fn truncate_description(description: &str, max_len: usize) -> String {
    if description.chars().count() <= max_len {
        return description.to_string();
    }

    let truncated: String = description.chars().take(max_len).collect();
    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{truncated}..."),
    }
}
