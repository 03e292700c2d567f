//! Win history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DrawNumber, Participant, Prize};

/// Name shown when the winning number has no participant on the roster
pub const UNKNOWN_WINNER: &str = "Unknown";

/// A confirmed win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRecord {
    pub id: Uuid,
    pub participant_name: String,
    pub participant_number: DrawNumber,
    pub prize_name: String,
    pub prize_color: String,
    pub timestamp: DateTime<Utc>,
}

impl WinRecord {
    pub fn new(number: DrawNumber, participant: Option<&Participant>, prize: &Prize) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_name: participant
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_WINNER.to_string()),
            participant_number: number,
            prize_name: prize.name.clone(),
            prize_color: prize.color.clone(),
            timestamp: Utc::now(),
        }
    }
}
