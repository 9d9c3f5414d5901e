//! Name ordering and search folding for mixed Hangul/Latin text.
//!
//! Ordering uses the Unicode root collation at primary strength, the same
//! rules a browser applies for `localeCompare` with base sensitivity:
//! `Apple`, `apple` and `Äpple` compare equal, `ß` sorts as `ss`, `ø` with
//! `o`. Script groups follow the root order (symbols, digits, Latin, Greek,
//! Cyrillic, Hangul, Han) and Hangul syllables keep dictionary order.

use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Primary);
    Collator::try_new(CollatorPreferences::default(), options).ok()
});

/// Fold `input` for search: strip accents, lowercase, recompose.
#[must_use]
pub fn fold(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .nfc()
        .collect()
}

/// Compare two names under the base-strength collation.
///
/// Falls back to comparing the folded strings if no collation data is
/// available.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    match COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => fold(a).cmp(&fold(b)),
    }
}

/// Case- and accent-insensitive substring test. An empty needle matches.
#[must_use]
pub fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    folded_needle.is_empty() || fold(haystack).contains(folded_needle)
}
