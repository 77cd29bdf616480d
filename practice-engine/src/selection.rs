use deck_shuffle::DeckRng;
use vocab_data::{Catalog, VocabularyDataSource, VocabularyItem};

use crate::cards::PracticeSize;
use crate::config::PracticeConfig;

/// Reads the user's custom deck size.
///
/// Leading whitespace and trailing junk are ignored (`"25 words"` is 25), but anything that
/// doesn't start with a positive whole number falls back to `fallback`.
pub fn parse_custom_count(input: &str, fallback: usize) -> usize {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return fallback;
    }

    match digits.parse::<usize>() {
        Ok(0) => fallback,
        Ok(count) => count,
        // Only overflow is left: more digits than any deck could hold.
        Err(_) => usize::MAX,
    }
}

/// How many cards a deck of the given size policy holds when `available` items exist.
pub fn deck_size(
    size: PracticeSize,
    custom_count: &str,
    available: usize,
    config: &PracticeConfig,
) -> usize {
    let requested = match size {
        PracticeSize::Random50 => config.random_size,
        PracticeSize::Custom => parse_custom_count(custom_count, config.default_custom_count),
        PracticeSize::All => available,
    };
    requested.min(available)
}

/// Picks the items for a new deck: the source's practicable items in a uniformly random order,
/// cut down to the size policy.
pub fn select_practice_items(
    catalog: &Catalog,
    source: VocabularyDataSource,
    size: PracticeSize,
    custom_count: &str,
    config: &PracticeConfig,
    rng: &mut DeckRng,
) -> Vec<VocabularyItem> {
    let available: Vec<VocabularyItem> = catalog.by_source(source).cloned().collect();
    let count = deck_size(size, custom_count, available.len(), config);
    deck_shuffle::deal(&available, count, rng)
}
