//! Error types for the simulation core.

use thiserror::Error;

/// Errors surfaced by entity transitions and configuration loading.
///
/// Running out of free pool slots is deliberately *not* represented here:
/// callers see it as a `None` / rejected outcome, never as a failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// `fire` was called on a projectile that is already in flight.
    #[error("projectile is already in flight")]
    ProjectileAlreadyActive,

    /// `spawn_at` was called on a hostile that is already alive.
    #[error("hostile is already active")]
    HostileAlreadyActive,

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// RON parsing failed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}

pub type SimResult<T> = Result<T, SimError>;
