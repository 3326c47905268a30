//! Object-key sanitization.

use deunicode::deunicode;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // + makes a whole run of adjacent invalid characters collapse into one
    // replacement.
    static ref INVALID_CHARS: Regex = Regex::new(r"[^0-9A-Za-z._-]+").unwrap();
}

/// Sanitize an object key while keeping its folder structure intact.
///
/// Non-ASCII characters are transliterated to their closest ASCII
/// equivalents before any pattern matching, then every maximal run of
/// characters outside `[0-9A-Za-z._-]` is replaced with a single `_` within
/// each `/`-separated segment. Segments are never added, dropped or
/// reordered: `a/b/c` stays three segments and a leading `/` survives as an
/// empty first segment.
///
/// The function is idempotent and total; empty input produces empty output.
pub fn sanitize_path(path: &str) -> String {
    let latin_path = deunicode(path);

    latin_path
        .split('/')
        .map(|part| INVALID_CHARS.replace_all(part, "_"))
        .collect::<Vec<_>>()
        .join("/")
}
