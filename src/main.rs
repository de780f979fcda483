use crate::cli::run;

pub mod badges;
pub mod cli;
mod config;
pub mod content;
pub mod domain;
pub mod http;
pub mod search;
mod sitemap;

fn main() -> anyhow::Result<()> {
    run()
}
