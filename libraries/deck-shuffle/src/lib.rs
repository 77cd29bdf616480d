//! Reproducible shuffling for flashcard decks.
//!
//! Every shuffle draws from an explicit RNG, so a deck that was dealt from a given seed can be
//! dealt again identically. Sessions that should differ every time seed from [`entropy_seed`].
//!
//! # Example
//!
//! ```
//! use deck_shuffle::{seeded_rng, shuffle};
//!
//! let words = vec!["bayt", "masjid", "qalam", "kitab"];
//! let mut rng = seeded_rng(7);
//! let dealt = shuffle(&words, &mut rng);
//!
//! assert_eq!(dealt.len(), words.len());
//! assert_eq!(words, vec!["bayt", "masjid", "qalam", "kitab"]);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The RNG every deck operation uses.
pub type DeckRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> DeckRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A fresh seed from the operating system's entropy source.
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Returns a uniformly random permutation of `items`, leaving `items` untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Shuffles `items` and keeps the first `count` of them (all of them if there are fewer).
pub fn deal<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut dealt = shuffle(items, rng);
    dealt.truncate(count);
    dealt
}
