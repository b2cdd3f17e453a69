//! Query text canonicalization.
//!
//! Cache lookups and writes always use the normalized form of the user's
//! search text; the raw form is only ever used for display. Video variant
//! queries additionally strip punctuation, which trips up the upstream
//! search more often than it helps.

/// Canonical cache-key form of free-text search input: trimmed and
/// lower-cased (locale-insensitive). Whitespace-only input normalizes to
/// the empty string, which callers treat as "no query".
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Deletes characters outside the ASCII word/whitespace set and collapses
/// whitespace runs. Punctuation is removed, not turned into separators, so
/// a hyphenated name stays one word. Used to clean movie titles before
/// building video search variants.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let filtered: String = title
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace())
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substitutes `{title}` and `{year}` into each template in order. A
/// missing year substitutes the empty string; leftover whitespace from
/// that is collapsed so variants stay valid query strings.
#[must_use]
pub fn build_variants(templates: &[&str], title: &str, year: Option<&str>) -> Vec<String> {
    let clean_title = sanitize_title(title);
    let year = year.unwrap_or("");

    templates
        .iter()
        .map(|template| {
            let filled = template
                .replace("{title}", &clean_title)
                .replace("{year}", year);
            filled.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .collect()
}
