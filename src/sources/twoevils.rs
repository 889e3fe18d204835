// src/sources/twoevils.rs
//! Two Evils international name register.
//!
//! The register is the first table on the page. Its first row is a banner,
//! the second row holds the labels ("Skater Name", "Number", "Date Added",
//! ...) and the last row is a footer. Labels lose their "Skater" prefix and
//! "Date Added" becomes `Registered`.

use crate::config::consts::{COL_NAME, COL_REGISTERED, TWOEVILS_URL};
use crate::core::HttpClient;
use crate::core::html::{Html, table_rows};
use crate::error::FetchError;
use crate::sources::Source;
use crate::table::Table;

pub fn fetch(client: &dyn HttpClient) -> Result<Table, FetchError> {
    let doc = client.get(TWOEVILS_URL)?;
    parse(&doc)
}

pub fn parse(doc: &str) -> Result<Table, FetchError> {
    let block = Html::new(doc)
        .first_block("table")
        .ok_or_else(|| parse_error("no table on page"))?;

    let rows = table_rows(block);
    let Some((labels, body)) = rows.get(1..).and_then(|r| r.split_first()) else {
        return Err(parse_error("table has no header row"));
    };

    let headers = labels.iter().map(|h| s!(h.replace("Skater", "").trim()));
    let mut table = Table::new(headers);
    table.rename_column("Date Added", COL_REGISTERED);
    if table.column(COL_NAME).is_none() {
        return Err(parse_error("no Name column"));
    }

    let body = body.split_last().map_or(&[][..], |(_footer, rest)| rest);
    for r in body {
        if r.iter().all(|c| c.trim().is_empty()) { continue; }
        table.push_row(r.iter().cloned().map(Some).collect());
    }
    Ok(table)
}

fn parse_error(reason: &str) -> FetchError {
    FetchError::Parse { site: Source::Twoevils, reason: s!(reason) }
}
