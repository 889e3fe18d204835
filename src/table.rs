// src/table.rs
//! In-memory tabular data shared by every pipeline stage.
//!
//! A `Table` is an ordered header list plus rows of nullable text cells.
//! Cells are never reformatted: a jersey number read as `"007"` is written
//! back as `"007"`. On disk, an empty field and a null cell are the same thing.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use crate::csv::{self, Delim};

pub type Row = Vec<Option<String>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Empty table with the given headers. Repeated header labels get a
    /// `.1`, `.2`, ... suffix so every column stays addressable by name.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: unique_headers(headers.into_iter().map(Into::into)), rows: Vec::new() }
    }

    pub fn headers(&self) -> &[String] { &self.headers }
    pub fn rows(&self) -> &[Row] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Append a row, padding with nulls or truncating to the header width.
    /// Empty strings are stored as null.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.headers.len(), None);
        for cell in row.iter_mut() {
            if cell.as_deref().is_some_and(str::is_empty) {
                *cell = None;
            }
        }
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// All cells of one column, top to bottom.
    pub fn values(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |r| r.get(col).and_then(|c| c.as_deref()))
    }

    /// Returns false when `from` is not a column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column(from) {
            Some(ix) => {
                self.headers[ix] = s!(to);
                true
            }
            None => false,
        }
    }

    pub fn retain_rows<F: FnMut(&Row) -> bool>(&mut self, f: F) {
        self.rows.retain(f);
    }

    /// Keep a subset of columns, in the given order.
    pub fn project(&self, cols: &[usize]) -> Table {
        let headers = cols.iter().map(|&c| self.headers[c].clone()).collect();
        let rows = self.rows
            .iter()
            .map(|r| cols.iter().map(|&c| r.get(c).cloned().flatten()).collect())
            .collect();
        Table { headers, rows }
    }

    /// Union of several tables. Columns are the superset of all headers in
    /// first-seen order; cells a table does not have are null.
    pub fn concat<I: IntoIterator<Item = Table>>(tables: I) -> Table {
        let tables: Vec<Table> = tables.into_iter().collect();

        let mut headers: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for t in &tables {
            for h in &t.headers {
                if !index.contains_key(h) {
                    index.insert(h.clone(), headers.len());
                    headers.push(h.clone());
                }
            }
        }

        let width = headers.len();
        let mut rows = Vec::with_capacity(tables.iter().map(Table::len).sum());
        for t in tables {
            let map: Vec<usize> = t.headers.iter().map(|h| index[h]).collect();
            for row in t.rows {
                let mut out: Row = vec![None; width];
                for (i, cell) in row.into_iter().enumerate() {
                    out[map[i]] = cell;
                }
                rows.push(out);
            }
        }

        Table { headers, rows }
    }

    /// Drop every row whose cell in `col` was already seen. First one wins.
    /// Null keys compare equal to each other.
    pub fn dedup_by_column(&mut self, col: usize) {
        let mut seen: HashSet<Option<String>> = HashSet::new();
        self.rows.retain(|r| seen.insert(r.get(col).cloned().flatten()));
    }

    /// Drop rows that are exact duplicates of an earlier row.
    pub fn dedup_rows(&mut self) {
        let mut seen: HashSet<Row> = HashSet::new();
        self.rows.retain(|r| seen.insert(r.clone()));
    }

    /// Stable sort by the given `(column, order)` keys. Nulls sort last.
    pub fn sort_by_columns(&mut self, keys: &[(usize, ColumnOrder)]) {
        self.rows.sort_by(|a, b| {
            for (c, order) in keys {
                let ord = order.compare(
                    a.get(*c).and_then(|x| x.as_deref()),
                    b.get(*c).and_then(|x| x.as_deref()),
                );
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    /// Natural order of one column's values, see [`ColumnOrder::detect`].
    pub fn column_order(&self, col: usize) -> ColumnOrder {
        ColumnOrder::detect(self.values(col))
    }

    /* ---------------- Text I/O ---------------- */

    /// First row is the header. Rows shorter than the header are padded with nulls.
    pub fn from_delimited(text: &str, delim: Delim) -> Table {
        let mut rows = csv::parse_rows(text, delim).into_iter();
        let mut table = match rows.next() {
            Some(h) => Table::new(h),
            None => return Table::default(),
        };
        for r in rows {
            table.push_row(r.into_iter().map(Some).collect());
        }
        table
    }

    pub fn write_delimited<W: Write>(&self, mut w: W, delim: Delim, with_header: bool) -> io::Result<()> {
        if with_header {
            csv::write_row(&mut w, &self.headers, delim)?;
        }
        for r in &self.rows {
            let cells: Vec<&str> = r.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            csv::write_row(&mut w, &cells, delim)?;
        }
        Ok(())
    }
}

fn unique_headers<I: Iterator<Item = String>>(headers: I) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for h in headers {
        let count = seen.entry(h.clone()).or_insert(0);
        if *count == 0 {
            out.push(h);
        } else {
            out.push(format!("{h}.{count}"));
        }
        *count += 1;
    }
    out
}

/* ---------------- Ordering ---------------- */

/// How the cells of one column compare.
///
/// Source data is heterogeneous: one site publishes `7`, another `"K-9"`.
/// A column is `Numeric` only when every non-null cell parses as a finite
/// number; a single non-numeric cell makes the whole column `Lexical`.
/// Either way the order is total, and nulls always sort last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnOrder {
    Numeric,
    Lexical,
}

impl ColumnOrder {
    pub fn detect<'a, I: IntoIterator<Item = Option<&'a str>>>(values: I) -> Self {
        let mut any = false;
        for v in values.into_iter().flatten() {
            if parse_number(v).is_none() {
                return ColumnOrder::Lexical;
            }
            any = true;
        }
        if any { ColumnOrder::Numeric } else { ColumnOrder::Lexical }
    }

    pub fn compare(self, a: Option<&str>, b: Option<&str>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match self {
                ColumnOrder::Lexical => a.cmp(b),
                ColumnOrder::Numeric => match (parse_number(a), parse_number(b)) {
                    (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
                    _ => a.cmp(b),
                },
            },
        }
    }

    /// Sort plain values by their natural order.
    pub fn sort(values: &mut [String]) {
        let order = ColumnOrder::detect(values.iter().map(|v| Some(v.as_str())));
        values.sort_by(|a, b| order.compare(Some(a.as_str()), Some(b.as_str())));
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
