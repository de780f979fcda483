use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub content: ContentSource,
    pub site: SiteConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Expose error details in 500 responses
    #[serde(default)]
    pub development: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentSource {
    pub roots: Vec<PathBuf>,
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default)]
    pub ignored_dirs: Vec<PathBuf>,
    #[serde(default = "default_playlist_extension")]
    pub playlist_extension: String,
    /// Line that ends the excerpt at the top of a mix body. No excerpts when unset
    #[serde(default)]
    pub excerpt_separator: Option<String>,
}

impl Default for ContentSource {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            follow_symlinks: false,
            ignored_dirs: Vec::new(),
            playlist_extension: default_playlist_extension(),
            excerpt_separator: None,
        }
    }
}

fn default_playlist_extension() -> String {
    "m3u8".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub base_url: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_search_index_file")]
    pub search_index_file: String,
}

impl SiteConfig {
    pub fn search_index_path(&self) -> PathBuf {
        self.output_dir.join(&self.search_index_file)
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.output_dir.join("sitemap.xml")
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_search_index_file() -> String {
    "search-data.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[content]
roots = ["content/mixes", "/srv/archive/mixes"]
follow_symlinks = true
ignored_dirs = ['content/mixes/drafts']
playlist_extension = "m3u"
excerpt_separator = "<!-- more -->"

[site]
base_url = "https://hbbj.holiday"
output_dir = "dist"
search_index_file = "index.json"

[http]
bind_addr = "127.0.0.1"
port = 8080
development = true
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.version, 1);

        assert_eq!(
            cfg.content.roots,
            vec![
                PathBuf::from("content/mixes"),
                PathBuf::from("/srv/archive/mixes")
            ]
        );
        assert!(cfg.content.follow_symlinks);
        assert_eq!(cfg.content.playlist_extension, "m3u");
        assert_eq!(cfg.content.excerpt_separator.as_deref(), Some("<!-- more -->"));

        assert_eq!(cfg.site.search_index_path(), PathBuf::from("dist/index.json"));
        assert!(cfg.http.development);

        Ok(())
    }

    #[test]
    fn test_parse_minimal_config() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[content]
roots = ["content/mixes"]

[site]
base_url = "https://hbbj.holiday"

[http]
bind_addr = "127.0.0.1"
port = 8080
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert!(!cfg.content.follow_symlinks);
        assert!(cfg.content.ignored_dirs.is_empty());
        assert_eq!(cfg.content.playlist_extension, "m3u8");
        assert_eq!(cfg.content.excerpt_separator, None);

        assert_eq!(
            cfg.site.search_index_path(),
            PathBuf::from("public/search-data.json")
        );
        assert_eq!(cfg.site.sitemap_path(), PathBuf::from("public/sitemap.xml"));
        assert!(!cfg.http.development);

        Ok(())
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load(Path::new("/definitely/not/here/mixdeck.toml"));

        assert!(result.is_err());
    }
}
