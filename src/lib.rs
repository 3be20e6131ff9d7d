//! # Activities API Library
//!
//! This library provides the core functionality for the Mergington High
//! School activities service, including handlers, models, and server
//! configuration.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod services;
pub mod telemetry;
pub use migration;
