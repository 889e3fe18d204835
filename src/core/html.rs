// src/core/html.rs
//! Tolerant, case-insensitive tag scanning. No DOM: callers slice the blocks
//! they care about (`<table>`, `<ul>`, `<h5>`) and read text out of them.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    // ASCII-only lowering keeps byte offsets identical to the input.
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// A document lowered once, so repeated block lookups stay linear.
pub struct Html<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> Html<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw, lower: to_lower(raw) }
    }

    pub fn raw(&self) -> &'a str { self.raw }

    /// Byte range of the next `<tag ...>...</tag>` block starting at or after
    /// `from`, closing tag included. Nested blocks of the same tag are matched
    /// by depth. An unclosed block runs to the end of the document.
    pub fn next_block(&self, tag: &str, from: usize) -> Option<(usize, usize)> {
        let open = format!("<{}", to_lower(tag));
        let close = format!("</{}", to_lower(tag));

        let start = self.find_tag(&open, from)?;
        let open_end = self.lower[start..].find('>')? + start + 1;

        let mut depth = 1usize;
        let mut pos = open_end;
        loop {
            let next_open = self.find_tag(&open, pos);
            let next_close = self.find_tag(&close, pos);
            match (next_open, next_close) {
                (Some(o), Some(c)) if o < c => {
                    depth += 1;
                    pos = o + open.len();
                }
                (_, Some(c)) => {
                    depth -= 1;
                    let end = self.lower[c..].find('>').map_or(self.raw.len(), |e| c + e + 1);
                    if depth == 0 {
                        return Some((start, end));
                    }
                    pos = end;
                }
                (_, None) => return Some((start, self.raw.len())),
            }
        }
    }

    /// Every top-level `<tag>` block, in document order.
    pub fn blocks(&self, tag: &str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut pos = 0usize;
        while let Some((s, e)) = self.next_block(tag, pos) {
            out.push(&self.raw[s..e]);
            pos = e;
        }
        out
    }

    pub fn first_block(&self, tag: &str) -> Option<&'a str> {
        self.next_block(tag, 0).map(|(s, e)| &self.raw[s..e])
    }

    /// `pat` is `<name` or `</name`; the match must end on a tag boundary so
    /// `<a` never matches `<abbr`.
    fn find_tag(&self, pat: &str, from: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let at = self.lower.get(pos..)?.find(pat)? + pos;
            let after = self.lower.as_bytes().get(at + pat.len()).copied();
            match after {
                None | Some(b'>') | Some(b'/') => return Some(at),
                Some(b) if b.is_ascii_whitespace() => return Some(at),
                _ => pos = at + pat.len(),
            }
        }
    }
}

/// Content between the end of the opening tag and the start of the last tag.
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return &block[oe + 1..cs];
            }
        }
        return &block[oe + 1..];
    }
    ""
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Visible text of a fragment: tags stripped, entities decoded, whitespace collapsed.
pub fn text(fragment: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(fragment)))
}

/// Value of `attr` on the first tag of `block`, entity-decoded.
pub fn attr_value(block: &str, attr: &str) -> Option<String> {
    let open_end = block.find('>')?;
    let open = &block[..open_end];
    let lc = to_lower(open);
    let needle = format!("{}=", to_lower(attr));

    let mut from = 0usize;
    let at = loop {
        let at = lc.get(from..)?.find(&needle)? + from;
        let boundary = at == 0 || lc.as_bytes()[at - 1].is_ascii_whitespace();
        if boundary { break at; }
        from = at + needle.len();
    };

    let val = open[at + needle.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => (Some('"'), 1),
        Some(b'\'') => (Some('\''), 1),
        _ => (None, 0),
    };
    let end = match quote {
        Some(q) => val[start_off..].find(q).map(|e| start_off + e),
        None => val.find(|c: char| c.is_ascii_whitespace()),
    }
    .unwrap_or(val.len());
    Some(normalize_entities(&val[start_off..end]))
}

/// Cell texts of one `<tr>` block, `<th>` and `<td>` alike, in order.
pub fn row_cells(tr: &str) -> Vec<String> {
    let doc = Html::new(inner_after_open_tag(tr));
    let mut cells = Vec::new();
    let mut pos = 0usize;
    loop {
        let th = doc.next_block("th", pos);
        let td = doc.next_block("td", pos);
        let (s, e) = match (th, td) {
            (Some(a), Some(b)) => if a.0 < b.0 { a } else { b },
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };
        cells.push(text(inner_after_open_tag(&doc.raw()[s..e])));
        pos = e;
    }
    cells
}

/// All rows of a `<table>` block as cell texts. Rows without cells are skipped.
pub fn table_rows(table: &str) -> Vec<Vec<String>> {
    let doc = Html::new(inner_after_open_tag(table));
    doc.blocks("tr")
        .into_iter()
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_blocks_case_insensitively() {
        let doc = Html::new("<DIV><UL><li>a</li></UL><ul class=x><li>b</li></ul></DIV>");
        let uls = doc.blocks("ul");
        assert_eq!(uls.len(), 2);
        assert_eq!(text(uls[1]), "b");
    }

    #[test]
    fn tag_boundary_is_respected() {
        let doc = Html::new("<abbr>x</abbr><a href='/p'>y</a>");
        assert_eq!(doc.first_block("a"), Some("<a href='/p'>y</a>"));
    }

    #[test]
    fn nested_blocks_match_by_depth() {
        let doc = Html::new("<table><tr><td><table><tr><td>in</td></tr></table></td></tr></table>tail");
        let (s, e) = doc.next_block("table", 0).unwrap();
        assert_eq!(&doc.raw()[e..], "tail");
        assert_eq!(s, 0);
    }

    #[test]
    fn reads_attributes() {
        let a = r#"<a class="n" data-href="no" href="/skater/1?a=1&amp;b=2">X</a>"#;
        assert_eq!(attr_value(a, "href").as_deref(), Some("/skater/1?a=1&b=2"));
        assert_eq!(attr_value("<a href=/x>y</a>", "href").as_deref(), Some("/x"));
        assert_eq!(attr_value("<a>y</a>", "href"), None);
    }

    #[test]
    fn reads_table_rows() {
        let t = "<table><tr><th>#</th><th>Name</th></tr>\
                 <tr><td>7</td><td><b>Zo&euml;</b>  Crush</td></tr><tr></tr></table>";
        let rows = table_rows(t);
        assert_eq!(rows, vec![vec!["#", "Name"], vec!["7", "Zoë Crush"]]);
    }
}
