//! Activity service: listing, signup and unregistration.
//!
//! Every check a request depends on is re-asserted by the store when the
//! write happens: a unique index guards duplicate signups and the insert
//! itself refuses to overfill a roster. Concurrent requests therefore see
//! the same errors a sequential caller would.

use std::collections::BTreeMap;

use metrics::counter;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};

use crate::error::RepositoryError;
use crate::models::ActivityDetails;
use crate::models::activity::Model as ActivityModel;
use crate::repositories::{ActivityRepository, EnrollmentRepository};

use super::ServiceError;

/// Activity service operating on an explicitly provided store handle
#[derive(Debug, Clone)]
pub struct ActivityService {
    db: DatabaseConnection,
}

impl ActivityService {
    /// Creates a service backed by the given connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every activity keyed by name, with its roster in signup order.
    ///
    /// All reads share one transaction so the result is a consistent snapshot.
    #[instrument(skip(self))]
    pub async fn list_activities(&self) -> Result<BTreeMap<String, ActivityDetails>, ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let activities = ActivityRepository::new(&txn).list_all().await?;
        let enrollments = EnrollmentRepository::new(&txn);

        let mut details = BTreeMap::new();
        for activity in activities {
            let participants = enrollments
                .list_for_activity(activity.id)
                .await?
                .into_iter()
                .map(|enrollment| enrollment.email)
                .collect();

            details.insert(
                activity.name,
                ActivityDetails {
                    description: activity.description,
                    schedule: activity.schedule,
                    max_participants: activity.max_participants,
                    participants,
                },
            );
        }

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(details)
    }

    /// Signs `email` up for the named activity.
    ///
    /// Checks run in order and the first failure wins: unknown activity,
    /// existing enrollment, full roster.
    #[instrument(skip(self))]
    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<String, ServiceError> {
        let result = self.try_signup(activity_name, email).await;
        let outcome = result.as_ref().map_or_else(ServiceError::outcome, |_| "ok");
        counter!("activity_signups_total", "outcome" => outcome).increment(1);
        result
    }

    /// Removes `email` from the named activity's roster.
    #[instrument(skip(self))]
    pub async fn unregister(&self, activity_name: &str, email: &str) -> Result<String, ServiceError> {
        let result = self.try_unregister(activity_name, email).await;
        let outcome = result.as_ref().map_or_else(ServiceError::outcome, |_| "ok");
        counter!("activity_unregistrations_total", "outcome" => outcome).increment(1);
        result
    }

    async fn try_signup(&self, activity_name: &str, email: &str) -> Result<String, ServiceError> {
        let activity = self.find_activity(activity_name).await?;
        let enrollments = EnrollmentRepository::new(&self.db);

        if enrollments.find(activity.id, email).await?.is_some() {
            return Err(ServiceError::AlreadySignedUp);
        }

        let enrolled = enrollments.count_for_activity(activity.id).await?;
        if enrolled >= capacity(&activity) {
            return Err(ServiceError::ActivityFull);
        }

        match enrollments
            .insert_within_capacity(activity.id, email, activity.max_participants)
            .await
        {
            Ok(Some(enrollment)) => {
                info!(
                    enrollment_id = enrollment.id,
                    activity_id = activity.id,
                    "student signed up"
                );
            }
            // Another request took the last seat between the count and the insert
            Ok(None) => return Err(ServiceError::ActivityFull),
            Err(RepositoryError::UniqueViolation(_)) => {
                return Err(ServiceError::AlreadySignedUp);
            }
            Err(err) => return Err(err.into()),
        }

        Ok(format!("Signed up {} for {}", email, activity.name))
    }

    async fn try_unregister(&self, activity_name: &str, email: &str) -> Result<String, ServiceError> {
        let activity = self.find_activity(activity_name).await?;
        let enrollments = EnrollmentRepository::new(&self.db);

        let enrollment = enrollments
            .find(activity.id, email)
            .await?
            .ok_or(ServiceError::NotSignedUp)?;
        let enrollment_id = enrollment.id;

        if !enrollments.delete(enrollment).await? {
            return Err(ServiceError::NotSignedUp);
        }

        info!(enrollment_id, activity_id = activity.id, "student unregistered");

        Ok(format!("Unregistered {} from {}", email, activity.name))
    }

    async fn find_activity(&self, activity_name: &str) -> Result<ActivityModel, ServiceError> {
        ActivityRepository::new(&self.db)
            .find_by_name(activity_name)
            .await?
            .ok_or_else(|| ServiceError::ActivityNotFound {
                name: activity_name.to_string(),
            })
    }
}

fn capacity(activity: &ActivityModel) -> u64 {
    u64::try_from(activity.max_participants).unwrap_or(0)
}
