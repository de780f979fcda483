use std::{cmp::Ordering, fs, io, sync::Arc};

use log::{error, info, warn};

use crate::{
    config::ContentSource,
    content::{
        error::ContentError,
        frontmatter::{InlineTrack, parse_frontmatter, split_document},
        fs::{MixDir, scan_roots},
        playlist::{PlaylistOutcome, parse_playlist},
    },
    domain::{
        mix::{Frontmatter, Mix, MixPage},
        track::Track,
    },
};

/// Holds the mix collection once it has been built.
///
/// Written on the first `list_mixes` call, read afterwards, cleared only by `reset`.
#[derive(Debug, Default)]
pub struct MixCache {
    mixes: Option<Arc<Vec<Mix>>>,
}

impl MixCache {
    pub fn get(&self) -> Option<Arc<Vec<Mix>>> {
        self.mixes.clone()
    }

    pub fn store(&mut self, mixes: Vec<Mix>) -> Arc<Vec<Mix>> {
        let mixes = Arc::new(mixes);
        self.mixes = Some(Arc::clone(&mixes));
        mixes
    }

    pub fn reset(&mut self) {
        self.mixes = None;
    }

    pub fn is_filled(&self) -> bool {
        self.mixes.is_some()
    }
}

/// Main structure that reads mixes from the content directories
pub struct MixRepository {
    source: ContentSource,
    cache: MixCache,
}

impl MixRepository {
    pub fn new(source: ContentSource) -> Self {
        Self {
            source,
            cache: MixCache::default(),
        }
    }

    /// All mixes, newest first.
    ///
    /// The collection is built on the first call and served from the cache afterwards.
    pub fn list_mixes(&mut self) -> Result<Arc<Vec<Mix>>, ContentError> {
        if let Some(mixes) = self.cache.get() {
            return Ok(mixes);
        }

        let mixes = self.build()?;
        Ok(self.cache.store(mixes))
    }

    /// Slugs of every mix directory, in directory-name order
    pub fn list_slugs(&self) -> Result<Vec<String>, ContentError> {
        Ok(scan_roots(&self.source)?
            .into_iter()
            .map(|dir| dir.slug)
            .collect())
    }

    /// Mix with its older (`previous`) and newer (`next`) neighbours
    pub fn get_mix_by_slug(&mut self, slug: &str) -> Result<MixPage, ContentError> {
        let mixes = self.list_mixes()?;
        let index = mixes
            .iter()
            .position(|mix| mix.slug == slug)
            .ok_or_else(|| ContentError::MixNotFound(slug.to_string()))?;

        Ok(MixPage {
            mix: mixes[index].clone(),
            previous: mixes.get(index + 1).cloned(),
            next: index.checked_sub(1).and_then(|i| mixes.get(i)).cloned(),
        })
    }

    /// Directory holding the files of a mix
    pub fn mix_dir(&self, slug: &str) -> Result<MixDir, ContentError> {
        scan_roots(&self.source)?
            .into_iter()
            .find(|dir| dir.slug == slug)
            .ok_or_else(|| ContentError::MixNotFound(slug.to_string()))
    }

    /// Drops the cached collection, the next `list_mixes` rebuilds it
    pub fn reset(&mut self) {
        if self.cache.is_filled() {
            info!("Dropping cached mix collection");
        }
        self.cache.reset();
    }

    fn build(&self) -> Result<Vec<Mix>, ContentError> {
        let dirs = scan_roots(&self.source)?;
        let mut mixes: Vec<Mix> = dirs
            .iter()
            .map(|dir| load_mix(dir, &self.source))
            .collect();
        sort_mixes(&mut mixes);

        let failed = mixes.iter().filter(|m| m.ingestion_error.is_some()).count();
        info!(
            "Loaded {} mixes from {} content root(s), {} with ingestion errors",
            mixes.len(),
            self.source.roots.len(),
            failed
        );
        Ok(mixes)
    }
}

/// Newest first; equal dates by slug descending; undated mixes last
pub fn sort_mixes(mixes: &mut [Mix]) {
    mixes.sort_by(|a, b| {
        let by_date = match (a.frontmatter.date, b.frontmatter.date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| b.slug.cmp(&a.slug))
    });
}

struct MarkdownParts {
    frontmatter: Frontmatter,
    tracklist: Option<Vec<InlineTrack>>,
    excerpt: String,
    content: String,
}

/// Reads one mix directory.
///
/// Never fails: problems are logged and recorded in `ingestion_error`.
pub fn load_mix(dir: &MixDir, source: &ContentSource) -> Mix {
    let mut errors = Vec::new();
    let markdown = read_markdown(dir, source.excerpt_separator.as_deref(), &mut errors);

    let mut tracks = match read_playlist(dir, &source.playlist_extension) {
        Ok(Some(tracks)) => tracks,
        Ok(None) => Vec::new(),
        Err(reason) => {
            error!("{}: {reason}", dir.slug);
            errors.push(reason);
            Vec::new()
        }
    };

    if tracks.is_empty() {
        if let Some(inline) = markdown.tracklist {
            tracks = inline
                .into_iter()
                .map(|track| track.into_track(&dir.slug))
                .collect();
        }
    }

    Mix {
        slug: dir.slug.clone(),
        frontmatter: markdown.frontmatter,
        excerpt: markdown.excerpt,
        content: markdown.content,
        tracks,
        ingestion_error: (!errors.is_empty()).then(|| errors.join("; ")),
    }
}

fn read_markdown(
    dir: &MixDir,
    excerpt_separator: Option<&str>,
    errors: &mut Vec<String>,
) -> MarkdownParts {
    let path = dir.markdown_path();
    let mut parts = MarkdownParts {
        frontmatter: Frontmatter::fallback(&dir.slug),
        tracklist: None,
        excerpt: String::new(),
        content: String::new(),
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            let reason = format!("failed to read {}: {e}", path.to_string_lossy());
            error!("{}: {reason}", dir.slug);
            errors.push(reason);
            return parts;
        }
    };

    let doc = match split_document(&source, excerpt_separator) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("{}: {e}", dir.slug);
            errors.push(e.to_string());
            parts.content = source;
            return parts;
        }
    };

    parts.excerpt = doc.excerpt.to_string();
    parts.content = doc.content.to_string();

    match parse_frontmatter(doc.matter, &dir.slug) {
        Ok(parsed) => {
            if let Some(e) = parsed.date_error {
                warn!("{}: {e}", dir.slug);
                errors.push(e.to_string());
            }
            parts.frontmatter = parsed.frontmatter;
            parts.tracklist = parsed.tracklist;
        }
        Err(e) => {
            warn!("{}: {e}", dir.slug);
            errors.push(e.to_string());
        }
    }

    parts
}

/// `Ok(None)` when the mix has no playlist file
fn read_playlist(dir: &MixDir, extension: &str) -> Result<Option<Vec<Track>>, String> {
    let path = dir.playlist_path(extension);
    let path_str = path.to_string_lossy();

    let blob = match fs::read(&path) {
        Ok(blob) => blob,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("failed to read playlist {path_str}: {e}")),
    };

    match parse_playlist(&blob, &dir.slug) {
        PlaylistOutcome::Tracks(tracks) => Ok(Some(tracks)),
        PlaylistOutcome::Empty => Err(format!("playlist {path_str} is empty")),
        PlaylistOutcome::Malformed(reason) => Err(format!("playlist {path_str}: {reason}")),
    }
}
