// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use derby_names::config::PipelineOptions;
use derby_names::error::FetchError;
use derby_names::sources::{Fetcher, Source};
use derby_names::table::{Row, Table};
use derby_names::core::HttpClient;

/// Serves a canned table, or a 503 when it has none, and counts calls.
pub struct FakeFetcher {
    site: Source,
    table: Option<Table>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn ok(site: Source, table: Table) -> Arc<Self> {
        Arc::new(Self { site, table: Some(table), calls: AtomicUsize::new(0) })
    }

    pub fn down(site: Source) -> Arc<Self> {
        Arc::new(Self { site, table: None, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetcher for FakeFetcher {
    fn site(&self) -> Source { self.site }

    fn fetch(&self) -> Result<Table, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .clone()
            .ok_or_else(|| FetchError::Status { url: format!("fake://{}", self.site), status: 503 })
    }
}

/// URL → body; anything else is a 404. URLs in `timeouts` time out.
#[derive(Default)]
pub struct FakeClient {
    pub pages: HashMap<String, String>,
    pub timeouts: Vec<String>,
    pub requests: Mutex<Vec<String>>,
}

impl HttpClient for FakeClient {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        if self.timeouts.iter().any(|u| u == url) {
            return Err(FetchError::Timeout { url: url.to_string() });
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status { url: url.to_string(), status: 404 })
    }
}

pub fn table(headers: &[&str], rows: Vec<Row>) -> Table {
    let mut t = Table::new(headers.iter().copied());
    for r in rows {
        t.push_row(r);
    }
    t
}

pub fn options(dir: &Path) -> PipelineOptions {
    PipelineOptions::new(dir).unwrap()
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

/// Names of everything in `dir`, sorted.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
