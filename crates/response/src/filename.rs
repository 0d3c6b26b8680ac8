//! Filename cleanup for `Content-Disposition`.
//!
//! Two variants of the requested filename are sent: the primary one, which keeps any
//! UTF-8 and only loses path separators, and a fallback reduced to a conservative ASCII
//! set for clients that ignore `filename*`.

use once_cell::sync::Lazy;
use regex::Regex;

// ascii-only on purpose: `(?i)` would let unicode case folding keep e.g. the Kelvin sign
static FALLBACK_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\-.]+").expect("fallback filename pattern is valid"));

/// Replaces each `:`, `\` and `/` with `-`.
pub fn sanitize(filename: &str) -> String {
    filename.chars().map(|c| if matches!(c, ':' | '\\' | '/') { '-' } else { c }).collect()
}

/// Replaces every run of characters outside `[A-Za-z0-9-.]` with a single `-`.
pub fn sanitize_fallback(filename: &str) -> String {
    FALLBACK_UNSAFE.replace_all(filename, "-").into_owned()
}

/// Appends `.{extension}` unless `filename` already ends with `extension`.
///
/// The check is a plain case-sensitive suffix match and does not look for the dot, so
/// `report.XLSX` gains a second extension while `reportxlsx` is left alone.
pub fn enforce_extension(filename: &str, extension: &str) -> String {
    if filename.ends_with(extension) {
        filename.to_owned()
    } else {
        format!("{filename}.{extension}")
    }
}
