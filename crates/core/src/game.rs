//! Draw phase machine
//!
//! `Idle -> Spinning -> Landed -> Revealing -> Closed -> Idle`
//!
//! The machine only sequences phases. Side effects of a confirmed win
//! (history, prize stock, undo) belong to the session that owns it.

use std::time::Duration;

use tracing::{error, info};

use crate::error::SpinRefusal;
use crate::models::{Blacklist, DrawNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Spinning { winner: DrawNumber, target_index: usize },
    /// Wheel stopped; anticipation pause before the reveal
    Landed { winner: DrawNumber, remaining: Duration },
    /// Winner popup shown, waiting for the operator to dismiss it
    Revealing { winner: DrawNumber },
    Closed { winner: DrawNumber },
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Spinning { .. } => "Spinning",
            GamePhase::Landed { .. } => "Landed",
            GamePhase::Revealing { .. } => "Revealing",
            GamePhase::Closed { .. } => "Closed",
        }
    }

    pub fn winner(&self) -> Option<DrawNumber> {
        match self {
            GamePhase::Idle => None,
            GamePhase::Spinning { winner, .. }
            | GamePhase::Landed { winner, .. }
            | GamePhase::Revealing { winner }
            | GamePhase::Closed { winner } => Some(*winner),
        }
    }
}

/// What happened when the wheel stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingOutcome {
    /// Winner accepted; reveal follows after the anticipation delay
    Accepted(DrawNumber),
    /// Winner was blacklisted while the wheel was turning. The spin is void.
    Voided(DrawNumber),
}

#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    reveal_delay: Duration,
}

impl GameStateMachine {
    pub fn new(reveal_delay: Duration) -> Self {
        Self {
            phase: GamePhase::Idle,
            reveal_delay,
        }
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GamePhase::Idle
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, GamePhase::Spinning { .. })
    }

    pub fn is_revealing(&self) -> bool {
        matches!(self.phase, GamePhase::Revealing { .. })
    }

    /// Idle -> Spinning
    pub fn begin_spin(&mut self, winner: DrawNumber, target_index: usize) -> Result<(), SpinRefusal> {
        if !self.is_idle() {
            return Err(SpinRefusal::AlreadySpinning);
        }
        self.transition(GamePhase::Spinning {
            winner,
            target_index,
        });
        Ok(())
    }

    /// Spinning -> Landed (or straight to Revealing with no delay).
    ///
    /// The landed number is checked against the current blacklist once more;
    /// an admin may have listed it after the draw. Such a spin is voided and
    /// the machine returns to Idle without revealing anyone.
    pub fn on_landed(&mut self, landed: DrawNumber, blacklist: &Blacklist) -> Option<LandingOutcome> {
        let GamePhase::Spinning { winner, .. } = self.phase else {
            return None;
        };
        if winner != landed {
            error!(expected = %winner, landed = %landed, "Wheel landed on a different number than drawn");
        }

        if blacklist.contains(landed) {
            error!(number = %landed, "Landed on a blacklisted number, voiding spin");
            self.transition(GamePhase::Idle);
            return Some(LandingOutcome::Voided(landed));
        }

        self.transition(GamePhase::Landed {
            winner: landed,
            remaining: self.reveal_delay,
        });
        if self.reveal_delay.is_zero() {
            self.transition(GamePhase::Revealing { winner: landed });
        }
        Some(LandingOutcome::Accepted(landed))
    }

    /// Count down the anticipation delay. Returns the winner when the
    /// reveal starts on this call.
    pub fn advance(&mut self, delta: Duration) -> Option<DrawNumber> {
        let GamePhase::Landed { winner, remaining } = self.phase else {
            return None;
        };
        let remaining = remaining.saturating_sub(delta);
        if remaining.is_zero() {
            self.transition(GamePhase::Revealing { winner });
            Some(winner)
        } else {
            self.phase = GamePhase::Landed { winner, remaining };
            None
        }
    }

    /// Revealing -> Closed, on the operator dismissing the popup
    pub fn close_reveal(&mut self) -> Option<DrawNumber> {
        let GamePhase::Revealing { winner } = self.phase else {
            return None;
        };
        self.transition(GamePhase::Closed { winner });
        Some(winner)
    }

    /// Closed -> Idle
    pub fn finish(&mut self) {
        if matches!(self.phase, GamePhase::Closed { .. }) {
            self.transition(GamePhase::Idle);
        }
    }

    fn transition(&mut self, next: GamePhase) {
        info!(from = self.phase.label(), to = next.label(), winner = ?next.winner(), "Phase change");
        self.phase = next;
    }
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
