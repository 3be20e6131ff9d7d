//! # Activities API Handlers
//!
//! Listing, signup and unregistration endpoints. The activity name is taken
//! from the path (already percent-decoded) and the student email from the
//! `email` query parameter.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, validation_error};
use crate::models::ActivityDetails;
use crate::server::AppState;

/// Query parameters identifying a student
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Student email, matched exactly (an empty value is an ordinary email)
    pub email: Option<String>,
}

/// Confirmation returned by signup and unregister
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// All activities keyed by name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ActivitiesResponse(pub BTreeMap<String, ActivityDetails>);

/// List every activity with its current roster
#[utoipa::path(
    get,
    path = "/activities",
    responses(
        (status = 200, description = "Activities keyed by name", body = ActivitiesResponse, example = json!({
            "Chess Club": {
                "description": "Learn strategies and compete in chess tournaments",
                "schedule": "Fridays, 3:30 PM - 5:00 PM",
                "max_participants": 12,
                "participants": ["michael@mergington.edu", "daniel@mergington.edu"]
            }
        })),
        (status = 500, description = "Internal server error", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    ),
    tag = "activities"
)]
pub async fn list_activities(
    State(state): State<AppState>,
) -> Result<Json<ActivitiesResponse>, ApiError> {
    let activities = state.activities.list_activities().await?;
    Ok(Json(ActivitiesResponse(activities)))
}

/// Sign a student up for an activity
#[utoipa::path(
    post,
    path = "/activities/{activity_name}/signup",
    params(
        ("activity_name" = String, Path, description = "Exact activity name"),
        EmailQuery
    ),
    responses(
        (status = 200, description = "Student signed up", body = MessageResponse, example = json!({
            "message": "Signed up alex@mergington.edu for Chess Club"
        })),
        (status = 400, description = "Already signed up, activity full, or missing email parameter", body = ApiError),
        (status = 404, description = "Activity not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "activities"
)]
pub async fn signup_for_activity(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = required_email(query)?;
    let message = state.activities.signup(&activity_name, &email).await?;
    Ok(Json(MessageResponse { message }))
}

/// Remove a student from an activity
#[utoipa::path(
    delete,
    path = "/activities/{activity_name}/unregister",
    params(
        ("activity_name" = String, Path, description = "Exact activity name"),
        EmailQuery
    ),
    responses(
        (status = 200, description = "Student unregistered", body = MessageResponse, example = json!({
            "message": "Unregistered michael@mergington.edu from Chess Club"
        })),
        (status = 400, description = "Student not signed up, or missing email", body = ApiError),
        (status = 404, description = "Activity not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "activities"
)]
pub async fn unregister_from_activity(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = required_email(query)?;
    let message = state.activities.unregister(&activity_name, &email).await?;
    Ok(Json(MessageResponse { message }))
}

fn required_email(query: Result<Query<EmailQuery>, QueryRejection>) -> Result<String, ApiError> {
    let Query(EmailQuery { email }) = query?;

    email.ok_or_else(|| {
        validation_error(
            "email query parameter is required",
            json!({ "email": "is required" }),
        )
    })
}
