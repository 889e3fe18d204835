// src/core/sanitize.rs

/// Decode the HTML entities that show up in skater names: the common named
/// ones plus decimal / hex character references. Unknown entities are kept.
pub fn normalize_entities(s: &str) -> String {
    if !s.contains('&') {
        return s!(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|&semi| semi <= 10) {
            Some(semi) => {
                let entity = &tail[1..semi];
                match decode_entity(entity) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&tail[..=semi]),
                }
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "nbsp" => Some(' '),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "aacute" => Some('á'),
        "agrave" => Some('à'),
        "auml" => Some('ä'),
        "ccedil" => Some('ç'),
        "eacute" => Some('é'),
        "egrave" => Some('è'),
        "euml" => Some('ë'),
        "iacute" => Some('í'),
        "ntilde" => Some('ñ'),
        "oacute" => Some('ó'),
        "ouml" => Some('ö'),
        "oslash" => Some('ø'),
        "uacute" => Some('ú'),
        "uuml" => Some('ü'),
        "szlig" => Some('ß'),
        "rsquo" => Some('\u{2019}'),
        "lsquo" => Some('\u{2018}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(normalize_entities("Zo&#235; &amp; Le&#xF3;n"), "Zoë & León");
        assert_eq!(normalize_entities("A&nbsp;B"), "A B");
        assert_eq!(normalize_entities("Fish & Chips"), "Fish & Chips");
        assert_eq!(normalize_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_ws("  Jammy \n\t Dodger "), "Jammy Dodger");
    }
}
