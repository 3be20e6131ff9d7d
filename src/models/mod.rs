//! # Data Models
//!
//! This module contains the SeaORM entities backing the Activities API and the
//! read model returned by the listing endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod activity;
pub mod enrollment;

pub use activity::Entity as Activity;
pub use enrollment::Entity as Enrollment;

/// An activity as presented to clients, keyed externally by its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityDetails {
    /// Free-text description
    pub description: String,
    /// Human-readable meeting times
    pub schedule: String,
    /// Maximum number of enrolled students
    pub max_participants: i32,
    /// Enrolled student emails in signup order
    pub participants: Vec<String>,
}
