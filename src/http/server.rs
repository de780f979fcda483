use chrono::Utc;
use log::info;
use rouille::{Request, Response};
use serde::{Deserialize, Serialize};
use std::{
    io,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    badges::{SUMMARY_LENGTH, extract_metadata, truncate_description},
    config::{HttpConfig, SiteConfig},
    content::{date::format_long_date, repository::MixRepository},
    domain::mix::Mix,
    http::error::ApiError,
    search::{
        index::build_index,
        query::{SearchResult, search},
    },
    sitemap::generate_sitemap,
};

const SEARCH_PATH: &str = "/api/search";
const SEARCH_INDEX_PATH: &str = "/search-data.json";
const SITEMAP_PATH: &str = "/sitemap.xml";

pub struct HttpServer {
    repository: Arc<Mutex<MixRepository>>,
    site: SiteConfig,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(repository: MixRepository, site: SiteConfig, config: HttpConfig) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            site,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let result = match (request.method(), request.url().as_str()) {
            (method, SEARCH_PATH) if method != "GET" => {
                Err(ApiError::MethodNotAllowed(method.to_string()))
            }
            ("GET", SEARCH_INDEX_PATH) => self.handle_search_index(),
            ("GET", SITEMAP_PATH) => self.handle_sitemap(),
            _ => rouille::router!(request,
                (GET) (/api/search) => {
                    self.handle_search(request)
                },
                (GET) (/api/mixes) => {
                    self.handle_list_mixes()
                },
                (GET) (/api/mixes/{slug: String}) => {
                    self.handle_get_mix(&slug)
                },
                (GET) (/{dir: String}/{file: String}) => {
                    self.handle_media(&dir, &file)
                },
                _ => Ok(Response::empty_404())
            ),
        };

        let response = result.unwrap_or_else(|e| e.into_response(self.config.development));

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.raw_url());
    }

    fn repository(&self) -> Result<MutexGuard<'_, MixRepository>, ApiError> {
        self.repository.lock().map_err(|e| {
            ApiError::internal("Could not access mix repository under lock", e)
        })
    }

    /// Empty or missing query answers without touching the repository
    fn handle_search(&self, request: &Request) -> Result<Response, ApiError> {
        let query = request.get_param("q").unwrap_or_default();
        if query.is_empty() {
            return Ok(Response::json(&SearchResponse { results: vec![] }));
        }

        let mixes = self
            .repository()?
            .list_mixes()
            .map_err(|e| ApiError::internal("Failed to search mixes", e))?;
        let results = search(&query, &build_index(&mixes));

        Ok(Response::json(&SearchResponse { results }))
    }

    fn handle_list_mixes(&self) -> Result<Response, ApiError> {
        let mixes = self.repository()?.list_mixes()?;
        let summaries: Vec<MixSummary> = mixes.iter().map(MixSummary::from_domain).collect();
        Ok(Response::json(&summaries))
    }

    fn handle_get_mix(&self, slug: &str) -> Result<Response, ApiError> {
        let page = self.repository()?.get_mix_by_slug(slug)?;

        Ok(Response::json(&MixPageResponse {
            badges: extract_metadata(page.mix.frontmatter.description_or_empty(), &page.mix.content),
            previous: page.previous.as_ref().map(MixLink::from_domain),
            next: page.next.as_ref().map(MixLink::from_domain),
            mix: &page.mix,
        }))
    }

    fn handle_search_index(&self) -> Result<Response, ApiError> {
        let mixes = self.repository()?.list_mixes()?;
        Ok(Response::json(&build_index(&mixes)))
    }

    fn handle_sitemap(&self) -> Result<Response, ApiError> {
        let mixes = self.repository()?.list_mixes()?;
        let xml = generate_sitemap(&self.site, &mixes, Utc::now());
        Ok(Response::from_data("text/xml", xml))
    }

    /// Serves audio and cover files referenced by tracks, e.g. `/2024/track1.mp3`
    fn handle_media(&self, dir: &str, file: &str) -> Result<Response, ApiError> {
        if file.starts_with('.') || file.contains(['/', '\\']) || dir.starts_with('.') {
            return Err(ApiError::BadRequest(format!("invalid media path {dir}/{file}")));
        }

        let mix_dir = self.repository()?.mix_dir(dir)?;
        let path = mix_dir.path.join(file);

        let media = std::fs::File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApiError::NotFound(format!("{dir}/{file} not found")),
            _ => ApiError::internal("failed to open media file", e),
        })?;
        let mime = Self::mime_for_media(&path);

        log::debug!(
            "MEDIA {dir}/{file} -> 200 OK, path: {}, MIME type: {mime}",
            path.to_string_lossy()
        );
        Ok(Response::from_file(mime, media))
    }

    fn mime_for_media(path: &Path) -> String {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .map(|s| s.to_lowercase());
        let default = || {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string()
        };
        ext.and_then(|ext| Self::mime_from_ext(ext.as_str()))
            .unwrap_or_else(default)
    }

    /// Map audio file extension (without dot) to proper MIME type for browser playback.
    /// Returns None if the extension is not recognized.
    pub fn mime_from_ext(ext: &str) -> Option<String> {
        match ext {
            "m4a" => Some("audio/x-m4a".to_string()), // Safari iOS compatible
            "aac" => Some("audio/aac".to_string()),
            "mp3" => Some("audio/mpeg".to_string()),
            "wav" => Some("audio/wav".to_string()),
            "ogg" => Some("audio/ogg".to_string()),
            "flac" => Some("audio/flac".to_string()),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MixSummary {
    slug: String,
    title: String,
    date: Option<String>,
    description: String,
    track_count: usize,
    badges: Vec<String>,
}

impl MixSummary {
    fn from_domain(mix: &Mix) -> Self {
        let description = mix.frontmatter.description_or_empty();
        Self {
            slug: mix.slug.clone(),
            title: mix.frontmatter.title.clone(),
            date: mix.frontmatter.date.map(format_long_date),
            description: truncate_description(description, SUMMARY_LENGTH),
            track_count: mix.tracks.len(),
            badges: extract_metadata(description, &mix.content),
        }
    }
}

#[derive(Serialize)]
struct MixLink {
    slug: String,
    title: String,
}

impl MixLink {
    fn from_domain(mix: &Mix) -> Self {
        Self {
            slug: mix.slug.clone(),
            title: mix.frontmatter.title.clone(),
        }
    }
}

#[derive(Serialize)]
struct MixPageResponse<'a> {
    mix: &'a Mix,
    previous: Option<MixLink>,
    next: Option<MixLink>,
    badges: Vec<String>,
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}
