//! # API Route Handlers
//!
//! The handlers are split into sub-modules by concern: general service
//! endpoints, the two upload pipelines and the weather lookup.

pub mod bank;
pub mod general;
pub mod sensor;
pub mod upload;
pub mod weather;

// Re-export the handlers so the router can reach them under `handlers::`.
pub use bank::*;
pub use general::*;
pub use sensor::*;
pub use weather::*;

use super::{errors::AppError, state::AppState};
