//! Client library for talking to cookd.
//!
//! Provides [`PredictClient`], which uploads images to a remote cookd
//! instance over HTTP and decodes its JSON responses.

mod predict_client;

pub use predict_client::PredictClient;
