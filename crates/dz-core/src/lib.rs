//! dz-core: stable foundation for ductzone.
//!
//! Contains:
//! - ids (stable zone identifiers + name slugs)
//! - numeric (Real + float helpers)
//! - time (timestamps and dwell-window arithmetic)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DzError, DzResult};
pub use ids::*;
pub use numeric::*;
pub use time::*;
