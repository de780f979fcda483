//! Reading mixes from the content directories.
//!
//! Layout: `<root>/<slug>/<slug>.md` with optional `<root>/<slug>/<slug>.m3u8`.

pub mod date;
pub mod error;
pub mod frontmatter;
pub mod fs;
pub mod playlist;
pub mod repository;
