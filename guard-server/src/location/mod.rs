//! Geolocation Provider Interface
//!
//! The positioning hardware/API is an external collaborator. In the HTTP
//! deployment the browser captures the fix and ships it in the request body;
//! this seam exists for embedded callers and tests, and enforces the hard
//! fetch timeout either way.

mod provider;

pub use provider::{fetch_location, LocationError, LocationProvider, DEFAULT_FETCH_TIMEOUT};
