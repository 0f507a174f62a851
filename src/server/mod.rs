//! HTTP server and shared wire types.
//!
//! This module provides:
//! - JSON bodies (`wire`) used by both server and client
//! - Configuration types (`config`, server-only)
//! - The JSON API (`routes`, server-only): `POST /predict`, `GET /health`, `GET /labels`, `GET /`
//! - The interactive dashboard (`dashboard`, server-only): `GET|POST /dashboard`
//! - Error rendering (`error`) and multipart upload extraction (`upload`), server-only
//!
//! Both front-ends call the same `PredictionPipeline`; handlers only
//! marshal requests and format responses.

#[cfg(feature = "server")]
mod app;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod dashboard;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod upload;
pub mod wire;

#[cfg(feature = "server")]
pub use app::{AppState, router, serve, serve_on};
#[cfg(feature = "server")]
pub use config::{Config, ServerConfig};
#[cfg(feature = "server")]
pub use error::ApiError;
