//! Collision error types

use thiserror::Error;

/// Errors raised by colliders and the collision system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// The collider's transform handle no longer resolves
    #[error("collider '{collider}' refers to a transform that no longer exists")]
    MissingTransform {
        /// Collider id
        collider: String,
    },

    /// Another active collider already uses this id
    #[error("a collider with id '{0}' is already registered")]
    DuplicateId(String),
}
