//! # Authority Error Types
//!
//! Errors surface only at the API boundary (authority violations, bad spawn
//! parameters, bad configuration). The damage path itself never fails: bad
//! amounts are clamped and stale references resolve to `None`.

use bastion_shared::ActorId;
use thiserror::Error;

/// Errors returned by authority node operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthorityError {
    /// A process tried to mutate state it does not own.
    #[error("process is not authoritative for {actor}")]
    NotAuthoritative {
        /// The actor that was targeted.
        actor: ActorId,
    },

    /// Spawn with an id that is already live on this host.
    #[error("{0} is already spawned")]
    DuplicateActor(ActorId),

    /// Operation on an actor this host does not know.
    #[error("{0} is not spawned on this host")]
    UnknownActor(ActorId),

    /// Max health must be finite and strictly positive.
    #[error("invalid max health {max_health} for {actor}")]
    InvalidMaxHealth {
        /// Actor being spawned.
        actor: ActorId,
        /// Rejected value.
        max_health: f32,
    },

    /// Starting health must be strictly positive.
    #[error("invalid starting health {health} for {actor}")]
    InvalidStartingHealth {
        /// Actor being spawned.
        actor: ActorId,
        /// Rejected value.
        health: f32,
    },
}

/// Result type for authority operations.
pub type AuthorityResult<T> = Result<T, AuthorityError>;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
