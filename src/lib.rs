/// Basic application code
pub mod app;
/// Owner identity extraction for requests
pub mod auth;
/// Billing date scheduling and billing alerts
pub mod billing;
/// Controllers for REST endpoints
pub mod controller;
/// Cryptography-related objects
pub mod crypto;
/// Domain objects
pub mod domain;
/// Library error types
pub mod error;
/// Stored records and change sets
pub mod model;
/// Spending projections and overview stats
pub mod projection;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
