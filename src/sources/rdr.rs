// src/sources/rdr.rs
//! Roller Derby Roster, one page per initial letter:
//!   /view-names/?ini=A
//! The names are the links of the *last* `<ul>` on the page (earlier lists
//! are navigation). Columns: `Name`, `url` (the letter page).
//!
//! A letter whose request times out is skipped with a warning; any other
//! failure fails the whole source.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::consts::{COL_NAME, COL_URL, RDR_URL};
use crate::core::HttpClient;
use crate::core::html::{Html, inner_after_open_tag, text};
use crate::error::FetchError;
use crate::table::Table;

pub fn letter_url(letter: char) -> String {
    join!(RDR_URL, letter.encode_utf8(&mut [0u8; 4]))
}

pub fn fetch(client: &dyn HttpClient, letters: &[char], pause: Duration) -> Result<Table, FetchError> {
    let mut parts: Vec<Table> = Vec::with_capacity(letters.len());
    let mut skipped: Vec<char> = Vec::new();

    for (i, &letter) in letters.iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            thread::sleep(pause);
        }
        let url = letter_url(letter);
        match client.get(&url) {
            Ok(doc) => parts.push(parse_letter(&doc, &url)),
            Err(e) if e.is_timeout() => {
                warn!("RDR letter {letter}: {e}; continuing without it");
                skipped.push(letter);
            }
            Err(e) => return Err(e),
        }
    }

    if !skipped.is_empty() {
        info!("RDR: {} of {} letters skipped ({})", skipped.len(), letters.len(),
            skipped.iter().collect::<String>());
    }

    let mut table = Table::concat(parts);
    if table.headers().is_empty() {
        table = Table::new([COL_NAME, COL_URL]);
    }
    Ok(table)
}

pub fn parse_letter(doc: &str, page_url: &str) -> Table {
    let mut table = Table::new([COL_NAME, COL_URL]);
    let uls = Html::new(doc).blocks("ul");
    let Some(list) = uls.last() else { return table };

    for li in Html::new(inner_after_open_tag(list)).blocks("li") {
        let Some(a) = Html::new(li).first_block("a") else { continue };
        let name = text(inner_after_open_tag(a));
        if name.is_empty() { continue; }
        table.push_row(vec![Some(name), Some(s!(page_url))]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_names_from_last_list() {
        let doc = r#"
            <ul class="menu"><li><a href="/">Home</a></li></ul>
            <ul>
              <li><a href="/n/1">Abby Normal</a></li>
              <li>no link here</li>
              <li><a href="/n/2">Axe Grinder</a></li>
            </ul>"#;
        let t = parse_letter(doc, "https://rdr/?ini=A");
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, 0), Some("Abby Normal"));
        assert_eq!(t.cell(1, 1), Some("https://rdr/?ini=A"));
    }

    #[test]
    fn builds_letter_urls() {
        assert!(letter_url('Q').ends_with("?ini=Q"));
        assert!(letter_url('7').ends_with("?ini=7"));
    }
}
