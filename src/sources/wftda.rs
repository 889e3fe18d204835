// src/sources/wftda.rs
//! WFTDA roster of certified officials.
//!
//! Every official is an `<h5>` holding a link to their profile:
//!   <h5><a href="https://resources.wftda.org/.../jane-doe/">Jane Doe</a></h5>
//! Columns: `Name`, `url`.

use crate::config::consts::{COL_NAME, COL_URL, WFTDA_URL};
use crate::core::HttpClient;
use crate::core::html::{Html, attr_value, inner_after_open_tag, text};
use crate::error::FetchError;
use crate::table::Table;

pub fn fetch(client: &dyn HttpClient) -> Result<Table, FetchError> {
    let doc = client.get(WFTDA_URL)?;
    Ok(parse(&doc))
}

/// Headings without a link are not officials and are skipped.
pub fn parse(doc: &str) -> Table {
    let mut table = Table::new([COL_NAME, COL_URL]);
    for h5 in Html::new(doc).blocks("h5") {
        let Some(a) = Html::new(inner_after_open_tag(h5)).first_block("a") else { continue };
        let name = text(inner_after_open_tag(a));
        if name.is_empty() { continue; }
        table.push_row(vec![Some(name), attr_value(a, "href")]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_linked_headings() {
        let doc = r#"
            <h5>Roster</h5>
            <h5 class="name"><a href="https://x/jane/">Jane  Doe</a></h5>
            <H5><A HREF='https://x/zoe/'>Zo&euml; Crush</A></H5>"#;
        let t = parse(doc);
        assert_eq!(t.headers(), ["Name", "url"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, 0), Some("Jane Doe"));
        assert_eq!(t.cell(1, 0), Some("Zoë Crush"));
        assert_eq!(t.cell(1, 1), Some("https://x/zoe/"));
    }
}
