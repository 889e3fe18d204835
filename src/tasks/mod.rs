// src/tasks/mod.rs
//! Pipeline tasks and the graph that orders them.
//!
//! ```text
//! ScrapeWFTDA ─┐
//! ScrapeDRC ───┤
//! ScrapeRDR ───┼──▶ CombineNames            (derby_names.csv)
//! ScrapeRDN ───┤
//! ScrapeTwoevils ┘  CombineNames(staged) ──▶ NameList, NumberList, NameNumberList
//! ```
//! The scrape → combine edges only exist with
//! [`CombineDependencies::RunFetches`](crate::config::CombineDependencies).

use std::fmt;

use crate::sources::Source;

pub mod combine;
pub mod fetch;
pub mod graph;
pub mod lists;

pub use combine::{CombineTask, combine};
pub use fetch::FetchTask;
pub use graph::{Artifact, Inputs, RunReport, TaskGraph, TaskNode, TaskStatus};
pub use lists::{ListKind, ListTask};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    Scrape(Source),
    Combine,
    /// Combine feeding the derived lists in memory; never writes.
    CombineStaged,
    NameList,
    NumberList,
    NameNumberList,
}

impl TaskId {
    /// Tasks an operator can ask for by name.
    pub const SELECTABLE: [TaskId; 9] = [
        TaskId::Scrape(Source::Wftda),
        TaskId::Scrape(Source::Drc),
        TaskId::Scrape(Source::Rdr),
        TaskId::Scrape(Source::Rdn),
        TaskId::Scrape(Source::Twoevils),
        TaskId::Combine,
        TaskId::NameList,
        TaskId::NumberList,
        TaskId::NameNumberList,
    ];

    pub fn cli_name(self) -> &'static str {
        match self {
            TaskId::Scrape(Source::Wftda) => "scrape-wftda",
            TaskId::Scrape(Source::Drc) => "scrape-drc",
            TaskId::Scrape(Source::Rdr) => "scrape-rdr",
            TaskId::Scrape(Source::Rdn) => "scrape-rdn",
            TaskId::Scrape(Source::Twoevils) => "scrape-twoevils",
            TaskId::Combine => "combine",
            TaskId::CombineStaged => "combine-staged",
            TaskId::NameList => "name-list",
            TaskId::NumberList => "number-list",
            TaskId::NameNumberList => "name-number-list",
        }
    }

    pub fn from_cli_name(name: &str) -> Option<TaskId> {
        TaskId::SELECTABLE.into_iter().find(|t| t.cli_name() == name)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Scrape(site) => write!(f, "Scrape{}", site.label()),
            TaskId::Combine => f.write_str("CombineNames"),
            TaskId::CombineStaged => f.write_str("CombineNames(staged)"),
            TaskId::NameList => f.write_str("NameList"),
            TaskId::NumberList => f.write_str("NumberList"),
            TaskId::NameNumberList => f.write_str("NameNumberList"),
        }
    }
}
