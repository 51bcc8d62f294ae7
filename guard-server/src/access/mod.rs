//! Access Orchestration
//!
//! The per-login pipeline from the system overview, composed as explicit
//! stages rather than side-effect chains:
//!
//! ```text
//! active zones ─▶ evaluate ─▶ record attempt ─▶ grant
//!                                     │
//!                                     └─(invalid)─▶ approval on file? ─▶ grant
//!                                                        │
//!                                                        └─▶ find-or-create
//!                                                            pending + alert
//! ```

mod service;

pub use service::{AccessDecision, AccessGuard, AccessOutcome};
