//! Catalog file format.
//!
//! A catalog is a comment header followed by one `key=message` line per
//! entry, escaped the way `.properties` files are.

const COMMENT_PREFIXES: [char; 2] = ['#', '!'];

pub fn render_catalog<'a>(origin: &str, entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = format!("# Generated by msgbundle from {origin}. Do not edit.\n");
    for (key, message) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(message, false));
        out.push('\n');
    }
    out
}

/// Parse catalog text back into `(key, message)` pairs, in file order.
pub fn read_catalog(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            !line.is_empty() && !line.starts_with(COMMENT_PREFIXES)
        })
        .map(|line| {
            let line = line.trim_start();
            match find_separator(line) {
                Some(at) => (unescape(&line[..at]), unescape(&line[at + 1..])),
                None => (unescape(line), String::new()),
            }
        })
        .collect()
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if is_key && i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Byte offset of the first unescaped `=` or `:`.
fn find_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (at, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return Some(at),
            _ => {}
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
