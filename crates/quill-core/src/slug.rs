//! URL slug generation.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks stripped after NFD decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Derive a URL-safe slug from a title.
///
/// Lowercases, strips diacritics, spells out `&` as `and` and collapses every
/// other run of non-alphanumeric characters into a single hyphen. The result
/// never starts or ends with a hyphen. Uniqueness is left to the store.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for ch in lowered.nfd().filter(|c| !COMBINING_MARKS.contains(c)) {
        if ch == '&' {
            pending_dash = true;
            push_segment(&mut slug, "and", &mut pending_dash);
            pending_dash = true;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            let mut buf = [0u8; 4];
            push_segment(&mut slug, ch.encode_utf8(&mut buf), &mut pending_dash);
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn push_segment(slug: &mut String, segment: &str, pending_dash: &mut bool) {
    if *pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    *pending_dash = false;
    slug.push_str(segment);
}
