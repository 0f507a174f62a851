//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `letthemcook_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Total predictions attempted.
///
/// Labels: `label` (predicted class, or "none" on error), `status` ("ok" | "error").
pub const PREDICTIONS_TOTAL: &str = "letthemcook_predictions_total";

/// End-to-end prediction duration in seconds (decode, inference, lookup).
pub const PREDICTION_DURATION_SECONDS: &str = "letthemcook_prediction_duration_seconds";

/// Predictions whose class had no recipe entry and fell back to placeholders.
///
/// Labels: `label`.
pub const RECIPE_MISSES_TOTAL: &str = "letthemcook_recipe_misses_total";

/// HTTP requests served.
///
/// Labels: `route`, `status` (numeric HTTP status).
pub const HTTP_REQUESTS_TOTAL: &str = "letthemcook_http_requests_total";
