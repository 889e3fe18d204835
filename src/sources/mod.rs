// src/sources/mod.rs
//! # Source fetchers
//!
//! One module per website. Each knows *where the names live in the HTML* of
//! its site and turns a page (or a crawl of pages) into a [`Table`] with at
//! least a `Name` column.
//!
//! ## What lives here
//! - Pure parsing (`parse*` functions), testable offline against captured HTML.
//! - The request sequence for each site (`fetch`), through an injected
//!   [`HttpClient`].
//!
//! ## What does **not** live here
//! - Persistence. Fetch tasks commit the table; fetchers never touch disk.
//! - Merging across sources. That is the Combine task's job.
//!
//! ## Contract
//! `fetch` returns `Ok(table)` or a [`FetchError`]. An empty table is a valid
//! return here; the fetch task decides it is a failure.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RdrOptions;
use crate::config::consts::*;
use crate::core::HttpClient;
use crate::error::FetchError;
use crate::table::Table;

pub mod drc;
pub mod rdn;
pub mod rdr;
pub mod twoevils;
pub mod wftda;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Wftda,
    Drc,
    Rdr,
    Rdn,
    Twoevils,
}

impl Source {
    pub const ALL: [Source; 5] = [Source::Wftda, Source::Drc, Source::Rdr, Source::Rdn, Source::Twoevils];

    /// Logical name of the artifact the source's fetch task commits.
    pub fn artifact(self) -> &'static str {
        match self {
            Source::Wftda => WFTDA_CSV,
            Source::Drc => DRC_CSV,
            Source::Rdr => RDR_CSV,
            Source::Rdn => RDN_CSV,
            Source::Twoevils => TWOEVILS_CSV,
        }
    }

    pub fn from_artifact(name: &str) -> Option<Source> {
        Source::ALL.into_iter().find(|s| s.artifact() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Source::Wftda => "WFTDA",
            Source::Drc => "DRC",
            Source::Rdr => "RDR",
            Source::Rdn => "RDN",
            Source::Twoevils => "Twoevils",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything that can produce one source's table.
pub trait Fetcher: Send + Sync {
    fn site(&self) -> Source;
    fn fetch(&self) -> Result<Table, FetchError>;
}

/// The real websites, reached through a shared client.
pub struct SiteFetcher {
    site: Source,
    client: Arc<dyn HttpClient>,
    rdr: RdrOptions,
    pause: Duration,
}

impl SiteFetcher {
    pub fn new(site: Source, client: Arc<dyn HttpClient>, rdr: RdrOptions) -> Self {
        Self { site, client, rdr, pause: Duration::from_millis(REQUEST_PAUSE_MS) }
    }

    /// Delay between consecutive requests of a multi-page crawl.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

impl Fetcher for SiteFetcher {
    fn site(&self) -> Source { self.site }

    fn fetch(&self) -> Result<Table, FetchError> {
        let client = self.client.as_ref();
        match self.site {
            Source::Wftda => wftda::fetch(client),
            Source::Drc => drc::fetch(client),
            Source::Rdr => rdr::fetch(client, self.rdr.letters(), self.pause),
            Source::Rdn => rdn::fetch(client, self.pause),
            Source::Twoevils => twoevils::fetch(client),
        }
    }
}

/// One [`SiteFetcher`] per source, all sharing `client`.
pub fn site_fetchers(client: Arc<dyn HttpClient>, rdr: &RdrOptions) -> Vec<Arc<dyn Fetcher>> {
    Source::ALL
        .into_iter()
        .map(|site| Arc::new(SiteFetcher::new(site, Arc::clone(&client), rdr.clone())) as Arc<dyn Fetcher>)
        .collect()
}
