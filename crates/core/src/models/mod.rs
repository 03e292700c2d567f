//! Data models for the prize wheel

mod participant;
mod prize;
mod segment;
mod snapshot;
mod win_record;

pub use participant::*;
pub use prize::*;
pub use segment::*;
pub use snapshot::*;
pub use win_record::*;
