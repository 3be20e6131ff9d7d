//! # Service Layer
//!
//! Business rules sit here, between the HTTP handlers and the repositories.

use thiserror::Error;

use crate::error::RepositoryError;

pub mod activities;

pub use activities::ActivityService;

/// Failures of the activity service.
///
/// The first four variants are expected outcomes of a request and map to
/// client errors; `Repository` carries store failures that are not retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Activity not found")]
    ActivityNotFound { name: String },
    #[error("Student is already signed up")]
    AlreadySignedUp,
    #[error("Activity is full")]
    ActivityFull,
    #[error("Student is not signed up for this activity")]
    NotSignedUp,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Label used for the `outcome` dimension of service metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceError::ActivityNotFound { .. } => "not_found",
            ServiceError::AlreadySignedUp => "already_signed_up",
            ServiceError::ActivityFull => "full",
            ServiceError::NotSignedUp => "not_signed_up",
            ServiceError::Repository(_) => "error",
        }
    }
}
