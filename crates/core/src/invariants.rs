//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Blacklist, Participant, Prize, WheelSegment, WonNumbers};
use crate::segments::{expected_pool_size, expected_segment_count};

/// Remaining stock never exceeds the initial stock
pub fn assert_prize_invariants(prize: &Prize) {
    debug_assert!(
        prize.quantity <= prize.initial_quantity,
        "Prize {} has {} left out of {}",
        prize.id,
        prize.quantity,
        prize.initial_quantity
    );
}

/// Draw numbers and ids are unique within the roster
pub fn assert_roster_invariants(participants: &[Participant]) {
    let mut numbers = HashSet::new();
    let mut ids = HashSet::new();
    for participant in participants {
        debug_assert!(
            numbers.insert(participant.number),
            "Draw number {} assigned twice",
            participant.number
        );
        debug_assert!(
            ids.insert(participant.id.as_str()),
            "Participant id {} used twice",
            participant.id
        );
    }
}

/// The wheel shows exactly the wedges the weighting rule implies, and the
/// drawable ones match the weighted pool.
pub fn assert_layout_invariants(
    segments: &[WheelSegment],
    participants: &[Participant],
    blacklist: &Blacklist,
    won: &WonNumbers,
) {
    debug_assert_eq!(
        segments.len(),
        expected_segment_count(participants, won),
        "Wheel wedge count does not match roster weights"
    );

    let drawable = segments.iter().filter(|s| !s.is_blacklisted).count();
    debug_assert_eq!(
        drawable,
        expected_pool_size(participants, blacklist, won),
        "Drawable wedges do not match the weighted pool"
    );

    debug_assert!(
        segments.iter().all(|s| !won.contains(s.value)),
        "Wheel still shows a number that already won"
    );
}
