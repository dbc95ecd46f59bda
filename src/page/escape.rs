// HTML escaping that leaves existing character references alone

use regex::Regex;

lazy_static::lazy_static! {
    static ref ENTITY_RE: Regex =
        Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap();
}

/// Escape text for HTML content and quoted attributes.
///
/// yt-dlp metadata frequently arrives with entities already applied
/// (`&amp;`), so an `&` that starts a character reference is kept as is.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for (i, c) in input.char_indices() {
        match c {
            '&' if ENTITY_RE.is_match(&input[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape, then turn line breaks into `<br>`
pub fn escape_multiline(input: &str) -> String {
    escape_html(input)
        .replace("\r\n", "\n")
        .split('\n')
        .collect::<Vec<_>>()
        .join("<br>\n")
}
