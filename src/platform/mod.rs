//! Platform layer
//!
//! Executor-specific glue. Everything here is gated on the `embassy`
//! feature; host builds and tests use the mock traits in
//! [`crate::core::traits`] instead.

#[cfg(feature = "embassy")]
pub mod tasks;
