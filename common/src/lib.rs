pub mod config;
pub mod telemetry;
pub mod yaml_include;

/// Common utilities shared across the catalog test infrastructure
///
/// - Configuration loading with `!include` support
/// - Tracing setup
/// - Shared test utilities and row fixtures

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, numbered_rows, row};
