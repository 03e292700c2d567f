//! State snapshots
//!
//! `EventState` is everything the host persists between runs;
//! `DrawSnapshot` is the subset that undo/redo rewinds.

use serde::{Deserialize, Serialize};

use super::{Blacklist, Participant, Prize, WinRecord, WonNumbers};

/// Full persisted state of one lucky-draw event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventState {
    pub participants: Vec<Participant>,
    pub prizes: Vec<Prize>,
    pub blacklist: Blacklist,
    pub won_numbers: WonNumbers,
    /// Newest first
    pub win_history: Vec<WinRecord>,
}

/// What a confirmed win changes, captured before the change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSnapshot {
    pub won_numbers: WonNumbers,
    pub win_history: Vec<WinRecord>,
    pub prizes: Vec<Prize>,
}
