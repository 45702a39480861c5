//! Number dealing.

use rand::Rng;
use rand::seq::index;

/// Deals `count` distinct numbers drawn uniformly from `min..=max`.
///
/// Each call is independent; nothing is remembered between rounds. If the
/// range holds fewer than `count` numbers the whole range is dealt, so the
/// caller must check the length when that matters.
pub fn deal<R: Rng + ?Sized>(rng: &mut R, count: usize, min: u8, max: u8) -> Vec<u8> {
    if max < min {
        return Vec::new();
    }
    let range = usize::from(max - min) + 1;
    index::sample(rng, range, count.min(range))
        .into_iter()
        .map(|offset| min + offset as u8)
        .collect()
}
