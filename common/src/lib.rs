pub mod config;

/// Common utilities shared across the receipt processor
///
/// This crate provides shared functionality used by both the `processing`
/// library and the `receipts` application, including:
///
/// - Configuration loading
/// - Shared test errors, assertions and request helpers

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{TestError, TestResult, generate_unique_id};
