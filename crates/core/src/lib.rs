//! Prize Wheel Core Library
//!
//! Wheel layout, weighted draw, spin animation, the draw phase machine and
//! storage for a live lucky-draw event.

pub mod config;
pub mod draw;
pub mod error;
pub mod game;
pub mod history;
pub mod invariants;
pub mod models;
pub mod random;
pub mod seed;
pub mod segments;
pub mod session;
pub mod spin;
pub mod storage;

pub use config::{RevealConfig, RosterConfig, SpinConfig, WheelConfig};
pub use draw::select_winner;
pub use error::{Error, Result, SpinRefusal};
pub use game::{GamePhase, GameStateMachine, LandingOutcome};
pub use history::UndoHistory;
pub use models::*;
pub use random::{RandomSource, SeededRandom, SequenceRandom};
pub use segments::{build_segments, SegmentBuilder};
pub use session::{DrawSession, FrameUpdate, SpinTicket};
pub use spin::{Landing, NoopObserver, RotationState, SpinAnimator, SpinObserver, SpinPlan};
pub use storage::{Database, StateRepository};
