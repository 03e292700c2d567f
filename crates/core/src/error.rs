//! Error types for the prize wheel core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a spin request was turned down.
///
/// These are routine outcomes (the operator pressed spin with nothing to
/// draw), so they are returned as values and never logged above `warn`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRefusal {
    #[error("no prize selected")]
    NoPrizeSelected,

    #[error("selected prize has no items left")]
    PrizeExhausted,

    #[error("a spin is already in progress")]
    AlreadySpinning,

    #[error("no eligible participants left")]
    NoEligibleWinners,

    #[error("the wheel has no segments")]
    DegenerateLayout,

    #[error("target segment {index} is outside a wheel of {len} segments")]
    TargetOutOfRange { index: usize, len: usize },
}
