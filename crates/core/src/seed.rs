//! Demo event data
//!
//! Loaded on first run and by factory reset.

use crate::models::{Blacklist, EventState, Participant, Prize};
use crate::random::RandomSource;

/// Numbers excluded from winning in a fresh event
pub const DEFAULT_BLACKLIST: [u32; 8] = [13, 44, 49, 53, 7, 21, 66, 77];

const STAFF_COUNT: u32 = 60;
const GUEST_COUNT: u32 = 20;

/// 60 staff (roughly 30% senior) numbered 1..=60, then 20 guests
pub fn demo_participants(rng: &mut dyn RandomSource) -> Vec<Participant> {
    let staff = (1..=STAFF_COUNT).map(|n| {
        let tenure = if rng.next_float() > 0.7 { 4 } else { 1 };
        Participant::staff(format!("staff-{n}"), format!("Staff {n}"), tenure, n)
    });
    let mut participants: Vec<Participant> = staff.collect();

    participants.extend((1..=GUEST_COUNT).map(|n| {
        Participant::guest(format!("guest-{n}"), format!("Guest {n}"), STAFF_COUNT + n)
    }));
    participants
}

pub fn demo_prizes() -> Vec<Prize> {
    vec![
        Prize::new("Grand Prize", 1, "#FFD700")
            .with_id("p1")
            .with_info("The top prize of the night"),
        Prize::new("First Prize", 1, "#F37021")
            .with_id("p2")
            .with_info("Biggest regular prize"),
        Prize::new("Second Prize", 2, "#0054A6")
            .with_id("p3")
            .with_info("Premium prize"),
        Prize::new("Third Prize", 3, "#FFFFFF")
            .with_id("p4")
            .with_info("Standard prize"),
        Prize::new("Consolation Prize", 5, "#333333")
            .with_id("p5")
            .with_info("Encouragement prize"),
    ]
}

/// A fresh event: demo roster and prizes, default blacklist, no winners
pub fn demo_state(rng: &mut dyn RandomSource) -> EventState {
    EventState {
        participants: demo_participants(rng),
        prizes: demo_prizes(),
        blacklist: Blacklist::from(DEFAULT_BLACKLIST),
        ..EventState::default()
    }
}
