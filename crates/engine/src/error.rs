//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an entity invariant is violated at the store
//!   boundary (bad date range, non-positive amount, malformed breakdown).
//! - [`PermissionDenied`] thrown when an authenticated principal is not
//!   authorized for an action; distinct from [`KeyNotFound`] so the transport
//!   layer can map 403 vs 404 without leaking existence.
//! - [`Aggregate`] thrown when an expense-summary recomputation cannot
//!   complete; the triggering mutation rolls back with it.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`PermissionDenied`]: EngineError::PermissionDenied
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Aggregate`]: EngineError::Aggregate
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Summary maintenance failed: {0}")]
    Aggregate(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::PermissionDenied(a), Self::PermissionDenied(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Aggregate(a), Self::Aggregate(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
