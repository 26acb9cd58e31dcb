//! Maps item display names to icon asset filenames.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

pub const ICON_EXTENSION: &str = ".png";

/// Scroll icons keyed by the success-rate suffix, checked in order.
const SCROLL_ICONS: [(&str, &str); 3] = [
    ("100%", "scroll-100.png"),
    ("60%", "scroll-60.png"),
    ("10%", "scroll-10.png"),
];

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*").unwrap());
static SLASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/\\]+").unwrap());
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s-]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Returns the icon filename for an item name. Empty input yields an empty string.
pub fn item_icon_filename(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let lower = name.trim().to_lowercase();
    if lower.starts_with("scroll for") {
        for (suffix, icon) in SCROLL_ICONS {
            if lower.ends_with(suffix) {
                return icon.to_string();
            }
        }
    }

    let unaccented: String = name
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    let without_parens = PARENTHESIZED_RE.replace_all(&unaccented, " ");
    let without_slashes = SLASHES_RE.replace_all(&without_parens, " ");
    let cleaned = DISALLOWED_RE.replace_all(&without_slashes, "");
    let hyphenated = WHITESPACE_RE.replace_all(cleaned.trim(), "-");

    format!("{}{}", hyphenated.to_lowercase(), ICON_EXTENSION)
}
