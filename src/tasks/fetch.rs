// src/tasks/fetch.rs
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::{Artifact, Inputs, TaskId, TaskNode};
use crate::config::consts::COL_NAME;
use crate::csv::Delim;
use crate::error::{FetchError, TaskError};
use crate::sources::{Fetcher, Source};
use crate::store::commit_table;
use crate::table::ColumnOrder;

/// Scrape one site into its CSV artifact.
pub struct FetchTask {
    fetcher: Arc<dyn Fetcher>,
    output: PathBuf,
}

impl FetchTask {
    pub fn new(fetcher: Arc<dyn Fetcher>, output: impl Into<PathBuf>) -> Self {
        Self { fetcher, output: output.into() }
    }

    pub fn site(&self) -> Source {
        self.fetcher.site()
    }

    /// Nothing is written unless the fetch yields a non-empty table with a
    /// `Name` column.
    pub fn run(&self) -> Result<Artifact, TaskError> {
        let site = self.site();
        let fetched = self.fetcher.fetch().and_then(|t| {
            if t.is_empty() { Err(FetchError::Empty { site }) } else { Ok(t) }
        });
        let mut table = fetched.map_err(|error| TaskError::Fetch { site, error })?;

        let Some(name_col) = table.column(COL_NAME) else {
            return Err(TaskError::MissingColumn { column: s!(COL_NAME), artifact: s!(site.artifact()) });
        };
        if site == Source::Drc {
            table.sort_by_columns(&[(name_col, ColumnOrder::Lexical)]);
        }

        info!("{site}: {} rows", table.len());
        commit_table(&self.output, &table, Delim::Csv, true)?;
        Ok(Artifact::Committed(self.output.clone()))
    }

    pub fn into_node(self) -> TaskNode {
        let id = TaskId::Scrape(self.site());
        let output = self.output.clone();
        TaskNode::new(id, Vec::new(), Some(output), move |_: &Inputs<'_>| self.run())
    }
}
