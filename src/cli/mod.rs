use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::badges::extract_metadata;
use crate::config::{self, Config};
use crate::content::date::format_long_date;
use crate::content::repository::MixRepository;
use crate::domain::mix::Mix;
use crate::search::index::{SearchIndexEntry, build_index, load_index, write_index};
use crate::search::query::search;
use crate::sitemap::generate_sitemap;

#[derive(Parser)]
#[command(name = "mixdeck")]
#[command(version = "0.1")]
#[command(about = "Annual holiday mixes: content ingestion, search index and site API")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "mixdeck.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the search index and the sitemap
    Build,
    /// Write the search index
    Index {
        /// Output file, defaults to the configured site output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the sitemap
    Sitemap {
        /// Output file, defaults to the configured site output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the slug of every mix
    Slugs,
    /// Show one mix with its neighbours, badges and tracks
    Show { slug: String },
    /// Search mixes and tracks
    Search {
        query: String,
        /// Search a previously written index instead of the content directories
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Run http server hosting the site API
    Serve,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let mut repository = MixRepository::new(cfg.content.clone());

    match &cli.command {
        Commands::Build => {
            let mixes = repository.list_mixes()?;
            write_index(&cfg.site.search_index_path(), &build_index(&mixes))?;
            write_sitemap(&cfg.site, &mixes, &cfg.site.sitemap_path())?;

            println!("Built {} mixes", mixes.len());
            report_ingestion_errors(&mixes);
        }

        Commands::Index { output } => {
            let mixes = repository.list_mixes()?;
            let path = output.clone().unwrap_or_else(|| cfg.site.search_index_path());
            write_index(&path, &build_index(&mixes))?;
            report_ingestion_errors(&mixes);
        }

        Commands::Sitemap { output } => {
            let mixes = repository.list_mixes()?;
            let path = output.clone().unwrap_or_else(|| cfg.site.sitemap_path());
            write_sitemap(&cfg.site, &mixes, &path)?;
        }

        Commands::Slugs => {
            for slug in repository.list_slugs()? {
                println!("{slug}");
            }
        }

        Commands::Show { slug } => {
            let page = repository.get_mix_by_slug(slug)?;
            print_mix(&page.mix);

            if let Some(next) = &page.next {
                println!("  Next: {} ({})", next.frontmatter.title, next.slug);
            }
            if let Some(previous) = &page.previous {
                println!("  Previous: {} ({})", previous.frontmatter.title, previous.slug);
            }
        }

        Commands::Search { query, index } => {
            let entries = match index {
                Some(path) => match load_index(path) {
                    Ok(entries) => entries,
                    Err(e) => {
                        log::error!("{e:#}");
                        println!("Search unavailable: the index could not be loaded");
                        return Ok(());
                    }
                },
                None => build_index(&repository.list_mixes()?),
            };
            print_results(query, &entries);
        }

        Commands::Serve => {
            println!("Starting HTTP server...");

            let http_server =
                crate::http::server::HttpServer::new(repository, cfg.site.clone(), cfg.http.clone());

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }
    }

    Ok(())
}

fn write_sitemap(site: &config::SiteConfig, mixes: &[Mix], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let xml = generate_sitemap(site, mixes, chrono::Utc::now());
    std::fs::write(path, xml)
        .with_context(|| format!("failed to write sitemap {}", path.to_string_lossy()))?;
    log::info!("Sitemap generated at {}", path.to_string_lossy());
    Ok(())
}

fn report_ingestion_errors(mixes: &[Mix]) {
    let failed: Vec<_> = mixes
        .iter()
        .filter_map(|m| m.ingestion_error.as_ref().map(|e| (&m.slug, e)))
        .collect();

    if !failed.is_empty() {
        println!("Some mixes were only partially loaded ({}):", failed.len());
        for (slug, error) in failed {
            println!("    - {slug}: {error}");
        }
    }
}

fn print_mix(mix: &Mix) {
    println!("Mix: {} ({})", mix.frontmatter.title, mix.slug);
    if let Some(date) = mix.frontmatter.date {
        println!("  Date: {}", format_long_date(date));
    }
    if let Some(error) = &mix.ingestion_error {
        println!("  Ingestion error: {error}");
    }

    let badges = extract_metadata(mix.frontmatter.description_or_empty(), &mix.content);
    if !badges.is_empty() {
        println!("  Badges: {}", badges.join(", "));
    }

    if mix.tracks.is_empty() {
        println!("  No tracks :(");
    } else {
        println!("  Tracks:");
        for (i, track) in mix.tracks.iter().enumerate() {
            println!("    {:>2}. {} - {}", i + 1, track.name, track.artist);
        }
    }
}

fn print_results(query: &str, entries: &[SearchIndexEntry]) {
    let results = search(query, entries);
    if results.is_empty() {
        println!("No mixes match \"{query}\"");
        return;
    }

    for result in results {
        println!("{} ({})", result.title, result.id);
        for track in result.matching_tracks {
            println!("    - {} - {}", track.name, track.artist);
        }
    }
}
