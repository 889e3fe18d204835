// src/tasks/combine.rs
//! Merge the per-site artifacts into one table of unique names.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Artifact, Inputs, TaskId, TaskNode};
use crate::config::consts::{COL_NAME, COL_NUMBER};
use crate::config::{CombineDependencies, CombineOptions, CommitMode};
use crate::csv::Delim;
use crate::error::TaskError;
use crate::sources::Source;
use crate::store::{commit_table, load_table};
use crate::table::{ColumnOrder, Table};

/// Concatenate `tables` (column superset), drop rows without a name, keep
/// the first row per name, then sort by `Name` and `Number`.
pub fn combine<I: IntoIterator<Item = Table>>(tables: I) -> Table {
    let mut table = Table::concat(tables);
    let Some(name_col) = table.column(COL_NAME) else {
        return table;
    };

    table.retain_rows(|r| r.get(name_col).is_some_and(Option::is_some));
    table.dedup_by_column(name_col);

    // Names always compare as text, even when every one of them looks numeric.
    let mut keys = vec![(name_col, ColumnOrder::Lexical)];
    keys.extend(table.column(COL_NUMBER).map(|c| (c, table.column_order(c))));
    table.sort_by_columns(&keys);
    table
}

pub struct CombineTask {
    inputs: Vec<PathBuf>,
    commit: CommitMode,
    output: PathBuf,
}

impl CombineTask {
    /// `inputs` and `output` resolve against `output_dir`.
    pub fn new(options: &CombineOptions, commit: CommitMode, output_dir: &Path, output: &str) -> Self {
        Self {
            inputs: options.inputs().iter().map(|name| output_dir.join(name)).collect(),
            commit,
            output: output_dir.join(output),
        }
    }

    pub fn run(&self) -> Result<Artifact, TaskError> {
        let mut tables = Vec::with_capacity(self.inputs.len());
        for path in &self.inputs {
            let t = load_table(path)?;
            if t.column(COL_NAME).is_none() {
                return Err(TaskError::MissingColumn {
                    column: s!(COL_NAME),
                    artifact: path.display().to_string(),
                });
            }
            debug!("combine: {} rows from {}", t.len(), path.display());
            tables.push(t);
        }

        let table = combine(tables);
        info!("combine: {} unique names from {} inputs", table.len(), self.inputs.len());

        match self.commit {
            CommitMode::Stage => Ok(Artifact::Staged(table)),
            CommitMode::Promote => {
                commit_table(&self.output, &table, Delim::Csv, true)?;
                Ok(Artifact::Committed(self.output.clone()))
            }
        }
    }

    /// Graph node for this task. A staged combine declares no output, so it
    /// always runs.
    pub fn into_node(self, id: TaskId, dependencies: CombineDependencies) -> TaskNode {
        let deps = match dependencies {
            CombineDependencies::AssumeArtifactsExist => Vec::new(),
            CombineDependencies::RunFetches => self
                .inputs
                .iter()
                .filter_map(|p| p.file_name()?.to_str().and_then(Source::from_artifact))
                .map(TaskId::Scrape)
                .collect(),
        };
        let output = match self.commit {
            CommitMode::Promote => Some(self.output.clone()),
            CommitMode::Stage => None,
        };
        TaskNode::new(id, deps, output, move |_: &Inputs<'_>| self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: Vec<Vec<Option<String>>>) -> Table {
        let mut t = Table::new(headers.iter().copied());
        for r in rows {
            t.push_row(r);
        }
        t
    }

    #[test]
    fn first_source_wins_on_duplicate_names() {
        let a = table(&["Name", "url"], vec![cells!["Bea Rage", "https://a"]]);
        let b = table(&["Number", "Name"], vec![cells!["12", "Bea Rage"], cells!["3", "Abby"]]);
        let t = combine([a, b]);

        assert_eq!(t.headers(), ["Name", "url", "Number"]);
        assert_eq!(t.rows(), [cells!["Abby", null, "3"], cells!["Bea Rage", "https://a", null]]);
    }

    #[test]
    fn nameless_rows_are_dropped() {
        let a = table(&["Name", "Number"], vec![cells![null, "1"], cells!["X", "2"], cells![null, "3"]]);
        let t = combine([a]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.cell(0, 0), Some("X"));
    }

    #[test]
    fn sorts_by_name_then_number() {
        let a = table(&["Name", "Number"], vec![
            cells!["b", "10"],
            cells!["a", null],
            cells!["c", "9"],
        ]);
        let t = combine([a]);
        let names: Vec<_> = t.values(0).collect();
        assert_eq!(names, [Some("a"), Some("b"), Some("c")]);
    }

    #[test]
    fn numeric_looking_names_sort_as_text() {
        let a = table(&["Name"], vec![cells!["9"], cells!["10"], cells!["100"]]);
        let t = combine([a]);
        let names: Vec<_> = t.values(0).flatten().collect();
        assert_eq!(names, ["10", "100", "9"]);
    }
}
