//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for database entities, providing a clean API for data access.

pub mod activity;
pub mod enrollment;

pub use activity::{ActivityRepository, NewActivity};
pub use enrollment::EnrollmentRepository;
