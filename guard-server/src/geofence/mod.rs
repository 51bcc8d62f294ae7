//! Geofence Evaluation
//!
//! Pure, deterministic, no I/O. The registry feeds active zones in; the
//! evaluator answers with a [`Verdict`](crate::db::models::Verdict).

mod evaluator;

pub use evaluator::{evaluate, haversine_meters, EARTH_RADIUS_METERS, MIN_ACCURACY_METERS};
