//! # Enrollment Repository
//!
//! This module contains the repository implementation for Enrollment entities:
//! roster queries, plain inserts, capacity-guarded inserts and removals.

use crate::error::RepositoryError;
use crate::models::enrollment::{
    ActiveModel as EnrollmentActiveModel, Column, Entity as Enrollment, Model as EnrollmentModel,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, Value,
};

// The count, the insert and the read-back run as one statement, so two
// writers racing for the last seat cannot both pass the check and a
// concurrent removal cannot hide the inserted row.
const SQL_INSERT_WITHIN_CAPACITY: &str = r#"
INSERT INTO enrollment (activity_id, email)
SELECT ?, ?
WHERE (SELECT COUNT(*) FROM enrollment WHERE activity_id = ?) < ?
RETURNING id, activity_id, email
"#;

/// Repository for Enrollment database operations
pub struct EnrollmentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentRepository<'a, C> {
    /// Create a new EnrollmentRepository with the given connection
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// List the roster of an activity in signup order
    pub async fn list_for_activity(
        &self,
        activity_id: i32,
    ) -> Result<Vec<EnrollmentModel>, RepositoryError> {
        Enrollment::find()
            .filter(Column::ActivityId.eq(activity_id))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Count the enrollments of an activity
    pub async fn count_for_activity(&self, activity_id: i32) -> Result<u64, RepositoryError> {
        Enrollment::find()
            .filter(Column::ActivityId.eq(activity_id))
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Find the enrollment of `email` in an activity
    pub async fn find(
        &self,
        activity_id: i32,
        email: &str,
    ) -> Result<Option<EnrollmentModel>, RepositoryError> {
        Enrollment::find()
            .filter(Column::ActivityId.eq(activity_id))
            .filter(Column::Email.eq(email))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Insert an enrollment without a capacity check
    pub async fn insert(
        &self,
        activity_id: i32,
        email: &str,
    ) -> Result<EnrollmentModel, RepositoryError> {
        EnrollmentActiveModel {
            activity_id: Set(activity_id),
            email: Set(email.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)
    }

    /// Insert an enrollment only while the roster holds fewer than `max_participants` rows.
    ///
    /// Returns `Ok(None)` when the activity is already full. A duplicate
    /// `(activity_id, email)` pair fails with [`RepositoryError::UniqueViolation`].
    pub async fn insert_within_capacity(
        &self,
        activity_id: i32,
        email: &str,
        max_participants: i32,
    ) -> Result<Option<EnrollmentModel>, RepositoryError> {
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            SQL_INSERT_WITHIN_CAPACITY,
            [
                Value::from(activity_id),
                Value::from(email),
                Value::from(activity_id),
                Value::from(max_participants),
            ],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(RepositoryError::database_error)?;

        row.map(|row| EnrollmentModel::from_query_result(&row, ""))
            .transpose()
            .map_err(RepositoryError::database_error)
    }

    /// Delete an enrollment, returning whether a row was removed
    pub async fn delete(&self, enrollment: EnrollmentModel) -> Result<bool, RepositoryError> {
        let result = enrollment
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected > 0)
    }
}
