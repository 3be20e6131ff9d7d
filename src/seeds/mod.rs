//! Database seeding functionality
//!
//! This module populates an empty store with the school's built-in
//! activities and their initial rosters.

pub mod activities;

pub use activities::{SEED_ACTIVITIES, SeedActivity, SeedOutcome, seed_activities};
