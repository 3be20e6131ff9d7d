//! # Tests for Handlers
//!
//! This module contains unit tests for the root and health handlers.

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use sea_orm::{Database, DatabaseConnection};

use crate::config::AppConfig;
use crate::handlers::{INDEX_PATH, healthz, root};
use crate::server::AppState;

#[tokio::test]
async fn test_root_handler_redirects_to_front_end() {
    let response = root().await.into_response();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), INDEX_PATH);
}

#[tokio::test]
async fn test_healthz_reports_ok_for_live_store() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let state = AppState::new(AppConfig::default(), db);

    let response = healthz(State(state)).await.unwrap();

    assert_eq!(response.status, "ok");
}

#[tokio::test]
async fn test_healthz_reports_unavailable_without_store() {
    // A default connection is disconnected and fails every query
    let state = AppState::new(AppConfig::default(), DatabaseConnection::default());

    let error = healthz(State(state)).await.unwrap_err();

    assert_eq!(error.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error.code, Box::from("SERVICE_UNAVAILABLE"));
}
