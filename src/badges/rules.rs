//! Keywords and patterns that turn mix descriptions into badges.

/// A badge emitted when any keyword is found in the searched text
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    /// Suppresses the badge when one of these is also found
    pub exclude: &'static [&'static str],
    pub badge: &'static str,
}

const fn rule(keywords: &'static [&'static str], badge: &'static str) -> KeywordRule {
    KeywordRule {
        keywords,
        exclude: &[],
        badge,
    }
}

/// Searched in the description only
pub const RARITY: &[KeywordRule] = &[
    rule(&["rare", "obscure"], "RARE"),
    rule(&["private press", "self-released"], "PRIVATE PRESS"),
    rule(&["vinyl only", "vinyl-only"], "VINYL ONLY"),
    rule(&["unreleased"], "UNRELEASED"),
];

/// Searched in description and content
pub const GENRES: &[KeywordRule] = &[
    rule(&["punk"], "PUNK"),
    rule(&["indie"], "INDIE"),
    rule(&["exotica"], "EXOTICA"),
    rule(&["garage"], "GARAGE"),
    rule(&["gospel"], "GOSPEL"),
    rule(&["psych", "psychedelic"], "PSYCH"),
    rule(&["funk"], "FUNK"),
    rule(&["folk"], "FOLK"),
    rule(&["r&b"], "R&B"),
    rule(&["soul"], "SOUL"),
    rule(&["rumba"], "RUMBA"),
    rule(&["cumbia"], "CUMBIA"),
    rule(&["blues"], "BLUES"),
    rule(&["jazz"], "JAZZ"),
    rule(&["reggae"], "REGGAE"),
    rule(&["country"], "COUNTRY"),
    rule(&["afrobeat"], "AFROBEAT"),
    rule(&["disco"], "DISCO"),
    rule(&["surf"], "SURF"),
    rule(&["house"], "HOUSE"),
    rule(&["techno"], "TECHNO"),
    rule(&["ambient"], "AMBIENT"),
    rule(&["drum and bass", "drum & bass"], "DRUM & BASS"),
    rule(&["electronic", "electro"], "ELECTRO"),
    rule(&["synthesizer", "synth"], "SYNTHS"),
    rule(&["hip hop", "hip-hop"], "HIP HOP"),
    rule(&["rockabilly"], "ROCKABILLY"),
    rule(&["doo-wop", "doo wop"], "DOO-WOP"),
    rule(&["girl group"], "GIRL GROUP"),
    rule(&["lounge"], "LOUNGE"),
    rule(&["new wave"], "NEW WAVE"),
    rule(&["bluegrass"], "BLUEGRASS"),
    rule(&["novelty"], "NOVELTY"),
    rule(&["instrumental"], "INSTRUMENTAL"),
];

/// Searched in description and content
pub const RECORDING: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["cover"],
        exclude: &["album cover"],
        badge: "COVER",
    },
    rule(&["live", "live at", "live recording"], "LIVE"),
    rule(&["remix", "remixed"], "REMIX"),
    rule(&["remaster", "remastered", "reissue"], "REMASTER"),
];

/// "500 copies"
pub const COPIES_PATTERN: &str = r"(?i)(\d+)\s*copies";

/// "8-min", "12 min"
pub const TRACK_LENGTH_PATTERN: &str = r"(?i)(\d+)[\s-]min";

/// Shortest track length, in minutes, worth an epic badge
pub const EPIC_MINUTES: u64 = 6;

/// Most badges shown for one mix
pub const MAX_BADGES: usize = 15;
