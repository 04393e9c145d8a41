//! DevCamper Server Library
//!
//! REST backend for a bootcamp directory: bootcamps, their courses and
//! reviews, and the users who publish and review them.
//!
//! # Overview
//!
//! - **API Endpoints**: resources under `/api/v1` with filtering, field
//!   selection, sorting and pagination on every list
//! - **Authentication**: JWT sessions in a bearer header or cookie, argon2
//!   password hashes, emailed password reset tokens
//! - **Storage**: a [`db::DocumentStore`] backed by MongoDB, or kept in
//!   memory for tests and local runs
//! - **Integrations**: geocoding for bootcamp addresses and radius search,
//!   transactional email for password resets
//! - **Middleware**: CORS, request tracing, compression, panic recovery and
//!   rate limiting
//!
//! # Architecture
//!
//! Each feature under [`features`] is a vertical slice of commands (writes)
//! and queries (reads), see [`cqrs`]. Handlers return feature-level error
//! enums that convert into [`AppError`], the single place that decides the
//! status code and error envelope.
//!
//! # Example
//!
//! ```no_run
//! use devcamper_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod geocoder;
pub mod mailer;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use error::{AppError, AppResult};
