//! Weighted winner selection
//!
//! The pool holds each eligible number once per unit of draw weight, so the
//! odds of a number match the share of wedges it occupies on the wheel.

use tracing::debug;

use crate::models::{is_eligible, Blacklist, DrawNumber, Participant, WonNumbers};
use crate::random::RandomSource;

/// Participants that may still win
pub fn eligible_participants<'a>(
    participants: &'a [Participant],
    blacklist: &'a Blacklist,
    won: &'a WonNumbers,
) -> impl Iterator<Item = &'a Participant> + 'a {
    participants
        .iter()
        .filter(move |p| is_eligible(p, blacklist, won))
}

/// Flat pool for uniform selection, duplicated by draw weight
pub fn weighted_pool(participants: &[Participant], blacklist: &Blacklist, won: &WonNumbers) -> Vec<DrawNumber> {
    let mut pool = Vec::new();
    for participant in eligible_participants(participants, blacklist, won) {
        for _ in 0..participant.draw_weight() {
            pool.push(participant.number);
        }
    }
    pool
}

/// Draw one winning number, or `None` when nobody is eligible.
///
/// Prize stock is the caller's concern and is checked before this is called.
pub fn select_winner(
    participants: &[Participant],
    blacklist: &Blacklist,
    won: &WonNumbers,
    rng: &mut dyn RandomSource,
) -> Option<DrawNumber> {
    let pool = weighted_pool(participants, blacklist, won);
    if pool.is_empty() {
        return None;
    }

    let winner = pool[rng.index(pool.len())];
    debug!(pool_size = pool.len(), winner = %winner, "Selected winner");
    Some(winner)
}
