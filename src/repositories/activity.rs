//! # Activity Repository
//!
//! This module contains the repository implementation for Activity entities.
//! Activities are only ever inserted (at seed time) and read.

use crate::error::RepositoryError;
use crate::models::activity::{
    ActiveModel as ActivityActiveModel, Column, Entity as Activity, Model as ActivityModel,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, Statement,
};

// Touches no row, but as the first statement of a transaction it makes
// SQLite take the write lock, waiting out other writers via the busy timeout.
const SQL_LOCK_FOR_WRITE: &str = "UPDATE activity SET name = name WHERE 0";

/// Data required to insert a new activity
#[derive(Debug, Clone, Copy)]
pub struct NewActivity<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub max_participants: i32,
}

/// Repository for Activity database operations
///
/// Generic over the connection so the same queries run against the pool or
/// inside a transaction.
pub struct ActivityRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ActivityRepository<'a, C> {
    /// Create a new ActivityRepository with the given connection
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// List all activities ordered by id (insertion order)
    pub async fn list_all(&self) -> Result<Vec<ActivityModel>, RepositoryError> {
        Activity::find()
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Count stored activities
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Activity::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Find an activity by its exact name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ActivityModel>, RepositoryError> {
        Activity::find()
            .filter(Column::Name.eq(name))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Take the store's write lock for the enclosing transaction.
    ///
    /// Reads issued afterwards see every previously committed write, and no
    /// other writer can commit until this transaction ends.
    pub async fn lock_for_write(&self) -> Result<(), RepositoryError> {
        let stmt = Statement::from_string(
            self.db.get_database_backend(),
            SQL_LOCK_FOR_WRITE.to_string(),
        );

        self.db
            .execute(stmt)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Insert a new activity
    ///
    /// Fails with [`RepositoryError::UniqueViolation`] when the name is taken.
    pub async fn insert(&self, activity: NewActivity<'_>) -> Result<ActivityModel, RepositoryError> {
        ActivityActiveModel {
            name: Set(activity.name.to_string()),
            description: Set(activity.description.to_string()),
            schedule: Set(activity.schedule.to_string()),
            max_participants: Set(activity.max_participants),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)
    }
}
