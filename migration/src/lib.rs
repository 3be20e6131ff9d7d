//! Database migrations for the Activities API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_10_18_000001_create_activity;
mod m2025_10_18_000002_create_enrollment;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_10_18_000001_create_activity::Migration),
            Box::new(m2025_10_18_000002_create_enrollment::Migration),
        ]
    }
}
