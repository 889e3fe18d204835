// src/sources/drc.rs
//! Derby Roll Call, `/everyone`: one big table, first row is the header.
//! The jersey column is labelled `#` on the site and becomes `Number`.

use crate::config::consts::{COL_NAME, COL_NUMBER, DRC_URL};
use crate::core::HttpClient;
use crate::core::html::{Html, table_rows};
use crate::error::FetchError;
use crate::sources::Source;
use crate::table::Table;

pub fn fetch(client: &dyn HttpClient) -> Result<Table, FetchError> {
    let doc = client.get(DRC_URL)?;
    parse(&doc)
}

pub fn parse(doc: &str) -> Result<Table, FetchError> {
    let table_block = Html::new(doc)
        .first_block("table")
        .ok_or_else(|| parse_error("no table on page"))?;

    let mut rows = table_rows(table_block).into_iter();
    let header = rows.next().ok_or_else(|| parse_error("table has no rows"))?;

    let mut table = Table::new(header);
    table.rename_column("#", COL_NUMBER);
    let name_col = table.column(COL_NAME).ok_or_else(|| parse_error("no Name column"))?;

    for r in rows {
        table.push_row(r.into_iter().map(Some).collect());
    }
    table.retain_rows(|r| r[name_col].is_some());
    Ok(table)
}

fn parse_error(reason: &str) -> FetchError {
    FetchError::Parse { site: Source::Drc, reason: s!(reason) }
}
