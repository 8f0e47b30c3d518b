//! Label normalization for tolerant comparison

use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form of a free-text label: NFKC composed, em and en
/// dashes folded to `-`, whitespace runs collapsed, trimmed, lowercased.
#[must_use]
pub fn normalize(text: &str) -> String {
    let composed: String = text
        .nfkc()
        .map(|c| match c {
            '\u{2014}' | '\u{2013}' => '-',
            other => other,
        })
        .collect();
    composed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
