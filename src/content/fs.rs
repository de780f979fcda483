//! Module to discover mix directories in the file system

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::warn;
use walkdir::WalkDir;

use crate::{config::ContentSource, content::error::ContentError};

/// One directory under a content root, i.e. one candidate mix
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MixDir {
    pub slug: String,
    pub path: PathBuf,
}

impl MixDir {
    pub fn new(slug: impl Into<String>, path: PathBuf) -> Self {
        Self {
            slug: slug.into(),
            path,
        }
    }

    /// `<dir>/<dir>.md`
    pub fn markdown_path(&self) -> PathBuf {
        self.path.join(format!("{}.md", self.slug))
    }

    /// `<dir>/<dir>.<ext>`
    pub fn playlist_path(&self, extension: &str) -> PathBuf {
        self.path.join(format!("{}.{extension}", self.slug))
    }
}

/// Lists the immediate subdirectories of a content root, sorted by name
pub fn scan_root(
    follow_symlinks: bool,
    root: &Path,
    ignored_dirs: &[PathBuf],
) -> Result<Vec<MixDir>, ContentError> {
    if !root.is_dir() {
        return Err(ContentError::MissingRoot(root.to_path_buf()));
    }
    let root_str = root.to_string_lossy();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(follow_symlinks)
        .sort_by_file_name();

    let dirs = walker
        .into_iter()
        .filter_entry(|entry| {
            let entry_path = entry.path();
            !ignored_dirs
                .iter()
                .any(|ignored| entry_path.starts_with(ignored))
        })
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("error while scanning dir {root_str}, skipping an entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_str().map(str::to_string);
            if name.is_none() {
                warn!("skipping non UTF-8 directory {}", e.path().to_string_lossy());
            }
            name.map(|slug| MixDir::new(slug, e.path().to_path_buf()))
        })
        .filter(|dir| !dir.slug.starts_with('.'))
        .collect();

    Ok(dirs)
}

/// Lists mix directories of every root.
///
/// Fails when the same slug appears under two roots.
pub fn scan_roots(source: &ContentSource) -> Result<Vec<MixDir>, ContentError> {
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut dirs = Vec::new();

    for root in &source.roots {
        for dir in scan_root(source.follow_symlinks, root, &source.ignored_dirs)? {
            if let Some(first) = seen.get(&dir.slug) {
                return Err(ContentError::DuplicateSlug {
                    slug: dir.slug,
                    first: first.clone(),
                    second: dir.path,
                });
            }
            seen.insert(dir.slug.clone(), dir.path.clone());
            dirs.push(dir);
        }
    }

    dirs.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::{
        config::ContentSource,
        content::{
            error::ContentError,
            fs::{scan_root, scan_roots},
        },
    };

    fn source(roots: Vec<std::path::PathBuf>) -> ContentSource {
        ContentSource {
            roots,
            ..Default::default()
        }
    }

    #[test]
    fn test_scan_lists_directories_only() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir(root.join("2023")).unwrap();
        fs::create_dir(root.join("2021")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".DS_Store"), b"x").unwrap();
        fs::write(root.join("README.md"), b"x").unwrap();

        let dirs = scan_root(false, root, &[]).unwrap();

        let slugs: Vec<_> = dirs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["2021", "2023"]);
        assert_eq!(dirs[0].markdown_path(), root.join("2021").join("2021.md"));
        assert_eq!(
            dirs[1].playlist_path("m3u8"),
            root.join("2023").join("2023.m3u8")
        );
    }

    #[test]
    fn test_scan_respects_ignored_dirs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir(root.join("2020")).unwrap();
        fs::create_dir(root.join("drafts")).unwrap();

        let dirs = scan_root(false, root, &[root.join("drafts")]).unwrap();

        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].slug, "2020");
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let tmp = TempDir::new().unwrap();

        let result = scan_root(false, &tmp.path().join("nope"), &[]);

        assert!(matches!(result, Err(ContentError::MissingRoot(_))));
    }

    #[test]
    fn test_scan_roots_merges_and_sorts() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();

        fs::create_dir(dir1.path().join("2022")).unwrap();
        fs::create_dir(dir2.path().join("2019")).unwrap();
        fs::create_dir(dir2.path().join("2024")).unwrap();

        let dirs = scan_roots(&source(vec![
            dir1.path().to_path_buf(),
            dir2.path().to_path_buf(),
        ]))
        .unwrap();

        let slugs: Vec<_> = dirs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["2019", "2022", "2024"]);
    }

    #[test]
    fn test_scan_roots_rejects_duplicate_slugs() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();

        fs::create_dir(dir1.path().join("2022")).unwrap();
        fs::create_dir(dir2.path().join("2022")).unwrap();

        let result = scan_roots(&source(vec![
            dir1.path().to_path_buf(),
            dir2.path().to_path_buf(),
        ]));

        match result {
            Err(ContentError::DuplicateSlug { slug, .. }) => assert_eq!(slug, "2022"),
            other => panic!("expected duplicate slug error, got {other:?}"),
        }
    }
}
