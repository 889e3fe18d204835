// src/tasks/lists.rs
//! Derived lists built from the combined table.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::info;
use unicode_normalization::UnicodeNormalization;

use super::{Artifact, Inputs, TaskId, TaskNode};
use crate::config::consts::{COL_NAME, COL_NUMBER, COMBINED_CSV};
use crate::csv::Delim;
use crate::error::TaskError;
use crate::store::{commit_lines, commit_table, load_table};
use crate::table::{ColumnOrder, Table};

/// NFKD, then drop everything outside ASCII: "Zoë" → "Zoe", "Ǆ" → "DZ".
pub fn fold_ascii(s: &str) -> String {
    s.nfkd().filter(char::is_ascii).collect()
}

fn column_of(table: &Table, column: &str) -> Result<usize, TaskError> {
    table.column(column).ok_or_else(|| TaskError::MissingColumn {
        column: s!(column),
        artifact: s!(COMBINED_CSV),
    })
}

/// Unique names in code-point order. With `ascii_only` the names are folded
/// first; names that fold to nothing are dropped.
///
/// Uniqueness is taken after folding, so "Zoë" and "Zoe" give one "Zoe".
/// The name scraper these lists replace deduplicated before folding, so its
/// ASCII list repeated "Zoe".
pub fn name_list(table: &Table, ascii_only: bool) -> Result<Vec<String>, TaskError> {
    let col = column_of(table, COL_NAME)?;
    let names: BTreeSet<String> = table
        .values(col)
        .flatten()
        .map(|n| if ascii_only { fold_ascii(n) } else { s!(n) })
        .filter(|n| !n.is_empty())
        .collect();
    Ok(names.into_iter().collect())
}

/// Unique non-null numbers in the column's natural order.
pub fn number_list(table: &Table) -> Result<Vec<String>, TaskError> {
    let col = column_of(table, COL_NUMBER)?;
    let mut numbers: Vec<String> = table
        .values(col)
        .flatten()
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    ColumnOrder::sort(&mut numbers);
    Ok(numbers)
}

/// `(Name, Number)` pairs with a number, unique, sorted by name then number.
pub fn name_number_list(table: &Table) -> Result<Table, TaskError> {
    let name = column_of(table, COL_NAME)?;
    let number = column_of(table, COL_NUMBER)?;

    let mut pairs = table.project(&[name, number]);
    pairs.retain_rows(|r| r[0].is_some() && r[1].is_some());
    pairs.dedup_rows();
    let number_order = pairs.column_order(1);
    pairs.sort_by_columns(&[(0, ColumnOrder::Lexical), (1, number_order)]);
    Ok(pairs)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Names { ascii_only: bool },
    Numbers,
    NamesNumbers,
}

impl ListKind {
    pub fn task_id(self) -> TaskId {
        match self {
            ListKind::Names { .. } => TaskId::NameList,
            ListKind::Numbers => TaskId::NumberList,
            ListKind::NamesNumbers => TaskId::NameNumberList,
        }
    }
}

/// One derived list, fed by the combine node `source`.
pub struct ListTask {
    kind: ListKind,
    source: TaskId,
    output: PathBuf,
}

impl ListTask {
    pub fn new(kind: ListKind, source: TaskId, output: impl Into<PathBuf>) -> Self {
        Self { kind, source, output: output.into() }
    }

    pub fn run(&self, inputs: &Inputs<'_>) -> Result<Artifact, TaskError> {
        let loaded;
        let table = match inputs.get(self.source)? {
            Artifact::Staged(t) => t,
            Artifact::Committed(path) => {
                loaded = load_table(path)?;
                &loaded
            }
        };

        let count = match self.kind {
            ListKind::Names { ascii_only } => {
                let names = name_list(table, ascii_only)?;
                commit_lines(&self.output, &names)?;
                names.len()
            }
            ListKind::Numbers => {
                let numbers = number_list(table)?;
                commit_lines(&self.output, &numbers)?;
                numbers.len()
            }
            ListKind::NamesNumbers => {
                let pairs = name_number_list(table)?;
                commit_table(&self.output, &pairs, Delim::Tsv, false)?;
                pairs.len()
            }
        };
        info!("{}: {count} entries", self.kind.task_id());
        Ok(Artifact::Committed(self.output.clone()))
    }

    pub fn into_node(self) -> TaskNode {
        let id = self.kind.task_id();
        let deps = vec![self.source];
        let output = Some(self.output.clone());
        TaskNode::new(id, deps, output, move |inputs: &Inputs<'_>| self.run(inputs))
    }
}
