//! Crate error type.
//!
//! Everything here is an initialization-time failure. Per-tick APIs
//! (`update`, triggers, events) are infallible: illegal requests are no-ops.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("entity for {0} is not in the world")]
    MissingEntity(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TagResult<T> = Result<T, TagError>;
