// src/sources/rdn.rs
//! RDNation: there is no global skater list, so we crawl.
//!
//! 1. Read `sitemap.xml`, following nested sitemap indexes a few levels deep.
//! 2. Keep league pages: URLs containing `roller-derby-league/` and either
//!    `/1/` or `/2/`, sorted.
//! 3. Each league page has a member table; its `Derby Name` column becomes
//!    `Name`, and the league URL is kept in `url`.
//!
//! A league page that fails to load or has no usable table is skipped.
//! Failing to read the root sitemap fails the source.

use std::collections::{BTreeSet, VecDeque};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::consts::{COL_NAME, COL_URL, RDN_LEAGUE_MARKER, RDN_MAX_SITEMAP_DEPTH, RDN_SITEMAP_URL};
use crate::core::HttpClient;
use crate::core::html::{Html, inner_after_open_tag, table_rows, text};
use crate::error::FetchError;
use crate::table::{Row, Table};

/// `<loc>` entries of one sitemap document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sitemap {
    /// Child sitemaps of a sitemap index.
    pub sitemaps: Vec<String>,
    /// Page URLs.
    pub pages: Vec<String>,
}

pub fn parse_sitemap(xml: &str) -> Sitemap {
    let doc = Html::new(xml);
    let loc_of = |block: &str| {
        Html::new(block)
            .first_block("loc")
            .map(|loc| text(inner_after_open_tag(loc)))
            .filter(|s| !s.is_empty())
    };
    Sitemap {
        sitemaps: doc.blocks("sitemap").into_iter().filter_map(loc_of).collect(),
        pages: doc.blocks("url").into_iter().filter_map(loc_of).collect(),
    }
}

/// League page URLs, sorted and unique.
pub fn league_urls<'a, I: IntoIterator<Item = &'a String>>(pages: I) -> Vec<String> {
    pages
        .into_iter()
        .filter(|u| u.contains(RDN_LEAGUE_MARKER) && (u.contains("/1/") || u.contains("/2/")))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The first table on a league page that has a `Derby Name` (or `Name`) column.
pub fn parse_league(doc: &str, league_url: &str) -> Option<Table> {
    for block in Html::new(doc).blocks("table") {
        let mut rows = table_rows(block).into_iter();
        let Some(mut header) = rows.next() else { continue };

        for h in header.iter_mut().filter(|h| h.as_str() == "Derby Name") {
            *h = s!(COL_NAME);
        }
        let Some(name_col) = header.iter().position(|h| h == COL_NAME) else { continue };
        let url_col = match header.iter().position(|h| h == COL_URL) {
            Some(c) => c,
            None => {
                header.push(s!(COL_URL));
                header.len() - 1
            }
        };

        let mut table = Table::new(header);
        for r in rows {
            let mut row: Row = r.into_iter().map(Some).collect();
            row.resize(table.headers().len(), None);
            if row[name_col].as_deref().is_none_or(str::is_empty) { continue; }
            row[url_col] = Some(s!(league_url));
            table.push_row(row);
        }
        return Some(table);
    }
    None
}

pub fn fetch(client: &dyn HttpClient, pause: Duration) -> Result<Table, FetchError> {
    let pages = crawl_sitemaps(client, pause)?;
    let leagues = league_urls(&pages);
    info!("RDN: {} league pages in sitemap", leagues.len());

    let mut parts: Vec<Table> = Vec::with_capacity(leagues.len());
    for url in &leagues {
        if !pause.is_zero() {
            thread::sleep(pause);
        }
        match client.get(url) {
            Ok(doc) => match parse_league(&doc, url) {
                Some(t) => parts.push(t),
                None => debug!("RDN: no member table at {url}"),
            },
            Err(e) => warn!("RDN: skipping league {url}: {e}"),
        }
    }

    let mut table = Table::concat(parts);
    if table.headers().is_empty() {
        table = Table::new([COL_NAME, COL_URL]);
    }
    Ok(table)
}

fn crawl_sitemaps(client: &dyn HttpClient, pause: Duration) -> Result<Vec<String>, FetchError> {
    let root = parse_sitemap(&client.get(RDN_SITEMAP_URL)?);
    let mut pages = root.pages;
    let mut queue: VecDeque<(String, usize)> = root.sitemaps.into_iter().map(|s| (s, 1)).collect();
    let mut seen: BTreeSet<String> = BTreeSet::from([s!(RDN_SITEMAP_URL)]);

    while let Some((url, depth)) = queue.pop_front() {
        if depth > RDN_MAX_SITEMAP_DEPTH || !seen.insert(url.clone()) {
            continue;
        }
        if !pause.is_zero() {
            thread::sleep(pause);
        }
        match client.get(&url) {
            Ok(xml) => {
                let map = parse_sitemap(&xml);
                pages.extend(map.pages);
                queue.extend(map.sitemaps.into_iter().map(|s| (s, depth + 1)));
            }
            Err(e) => warn!("RDN: skipping sitemap {url}: {e}"),
        }
    }
    Ok(pages)
}
