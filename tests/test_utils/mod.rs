//! Test utilities for database testing.
//!
//! This module provides utilities for setting up SQLite databases with
//! migrations applied, optionally seeded, plus a router over them.

#![allow(dead_code)]

use activities::config::AppConfig;
use activities::repositories::{ActivityRepository, NewActivity};
use activities::seeds::seed_activities;
use activities::server::{AppState, create_app};
use anyhow::Result;
use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Sets up an in-memory database holding the built-in activities.
pub async fn setup_seeded_db() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    seed_activities(&db).await?;
    Ok(db)
}

/// A file-backed database that lives as long as its temp directory.
///
/// In-memory SQLite is pinned to a single connection, so tests that need real
/// concurrency or a reopened store use a file instead.
pub struct FileDb {
    pub dir: TempDir,
    pub url: String,
}

impl FileDb {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("activities.db").display()
        );
        Ok(Self { dir, url })
    }

    /// Opens a pool with `max_connections` connections and applies migrations.
    pub async fn connect(&self, max_connections: u32) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(max_connections)
            .sqlx_logging(false);
        let db = Database::connect(opt).await?;
        Migrator::up(&db, None).await?;
        Ok(db)
    }
}

/// Inserts an activity with no participants.
pub async fn insert_activity(
    db: &DatabaseConnection,
    name: &str,
    max_participants: i32,
) -> Result<i32> {
    let activity = ActivityRepository::new(db)
        .insert(NewActivity {
            name,
            description: "Test activity",
            schedule: "Daily, 12:00 PM - 1:00 PM",
            max_participants,
        })
        .await?;
    Ok(activity.id)
}

/// Builds the application router over `db` with default configuration.
pub fn test_app(db: DatabaseConnection) -> Router {
    create_app(AppState::new(AppConfig::default(), db))
}
