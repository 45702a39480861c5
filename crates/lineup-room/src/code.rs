//! Room code generation.

use lineup_protocol::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN, RoomCode};
use rand::Rng;

use crate::GameError;

/// Draws one random code. Duplicates are possible; see [`generate`].
pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> RoomCode {
    let code: String = (0..ROOM_CODE_LEN)
        .map(|_| {
            let i = rng.random_range(0..ROOM_CODE_ALPHABET.len());
            char::from(ROOM_CODE_ALPHABET[i])
        })
        .collect();
    RoomCode::normalize(&code)
}

/// Draws codes until one is not taken.
///
/// `is_taken` is asked about each candidate. With 32^4 possible codes a
/// collision is rare at any realistic room count, but the loop still gives
/// up after `max_attempts` draws rather than spinning forever.
///
/// # Errors
/// [`GameError::CodesExhausted`] if every attempt collided.
pub fn generate<R, F>(
    rng: &mut R,
    max_attempts: usize,
    mut is_taken: F,
) -> Result<RoomCode, GameError>
where
    R: Rng + ?Sized,
    F: FnMut(&RoomCode) -> bool,
{
    for _ in 0..max_attempts {
        let code = random_code(rng);
        if !is_taken(&code) {
            return Ok(code);
        }
    }
    Err(GameError::CodesExhausted(max_attempts))
}
