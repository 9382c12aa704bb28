//! Small helpers for handling package identifiers.

use std::collections::HashSet;

/// Characters that never need quoting in a POSIX shell word
fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '_' | '-')
}

/// Quote a single identifier for a POSIX shell.
///
/// Identifiers made only of safe characters are returned verbatim; anything
/// else is wrapped in single quotes with embedded quotes escaped as `'\''`.
pub fn shell_quote(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_shell_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Quote each identifier and join them with single spaces
pub fn join_quoted<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| shell_quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a string is usable as a package identifier
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}

/// Whether a value can be placed on one Containerfile line.
///
/// A line break would end the instruction and start a new one.
pub fn is_single_line(value: &str) -> bool {
    !value.contains(['\n', '\r'])
}

/// Remove duplicates while keeping the first occurrence of each entry
pub fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Parse a space/comma-separated package list into individual identifiers.
///
/// Handles both "pkg1 pkg2 pkg3" and "pkg1,pkg2,pkg3" formats.
pub fn parse_package_list(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
