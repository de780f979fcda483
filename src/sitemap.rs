use chrono::{DateTime, SecondsFormat, Utc};

use crate::{config::SiteConfig, content::date::format_iso_midnight, domain::mix::Mix};

/// returns the public url of a mix page
pub fn mix_url(conf: &SiteConfig, slug: &str) -> String {
    let url = conf.base_url.trim_end_matches('/');
    format!("{url}/mix/{slug}")
}

/// Sitemap listing the site root and one page per mix
pub fn generate_sitemap(conf: &SiteConfig, mixes: &[Mix], generated_at: DateTime<Utc>) -> String {
    let root = conf.base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    xml.push_str(&url_entry(
        root,
        Some(generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        "daily",
        "1.0",
    ));

    for mix in mixes {
        xml.push_str(&url_entry(
            &mix_url(conf, &mix.slug),
            mix.frontmatter.date.map(format_iso_midnight),
            "monthly",
            "0.8",
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

fn url_entry(loc: &str, lastmod: Option<String>, changefreq: &str, priority: &str) -> String {
    let lastmod = lastmod
        .map(|l| format!("    <lastmod>{l}</lastmod>\n"))
        .unwrap_or_default();
    format!(
        "  <url>\n    <loc>{}</loc>\n{lastmod}    <changefreq>{changefreq}</changefreq>\n    <priority>{priority}</priority>\n  </url>\n",
        escape_xml(loc)
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::domain::mix::Frontmatter;

    fn site(base_url: &str) -> SiteConfig {
        SiteConfig {
            base_url: base_url.to_string(),
            output_dir: "public".into(),
            search_index_file: "search-data.json".into(),
        }
    }

    fn mix(slug: &str, date: Option<NaiveDate>) -> Mix {
        Mix {
            slug: slug.to_string(),
            frontmatter: Frontmatter {
                title: slug.to_string(),
                description: None,
                date,
                extra: BTreeMap::new(),
            },
            excerpt: String::new(),
            content: String::new(),
            tracks: Vec::new(),
            ingestion_error: None,
        }
    }

    #[test]
    fn test_mix_url_trailing_slash() {
        assert_eq!(
            mix_url(&site("https://hbbj.holiday/"), "2024"),
            "https://hbbj.holiday/mix/2024"
        );
        assert_eq!(
            mix_url(&site("https://hbbj.holiday"), "2024"),
            "https://hbbj.holiday/mix/2024"
        );
    }

    #[test]
    fn test_sitemap_lists_root_and_mixes() {
        let generated_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let mixes = vec![
            mix("2024", NaiveDate::from_ymd_opt(2024, 12, 25)),
            mix("broken", None),
        ];

        let xml = generate_sitemap(&site("https://hbbj.holiday/"), &mixes, generated_at);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://hbbj.holiday</loc>"));
        assert!(xml.contains("<lastmod>2025-01-02T03:04:05.000Z</lastmod>"));
        assert!(xml.contains("<loc>https://hbbj.holiday/mix/2024</loc>"));
        assert!(xml.contains("<lastmod>2024-12-25T00:00:00.000Z</lastmod>"));
        assert!(xml.contains("<loc>https://hbbj.holiday/mix/broken</loc>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("<lastmod>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_sitemap_escapes_locations() {
        let xml = generate_sitemap(&site("https://example.org"), &[mix("a&b", None)], Utc::now());

        assert!(xml.contains("<loc>https://example.org/mix/a&amp;b</loc>"));
    }
}
