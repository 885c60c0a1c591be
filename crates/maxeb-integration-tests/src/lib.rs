//! Integration test crate for the validator stake optimizer.
//!
//! This crate has no library code. It only contains end-to-end tests that
//! drive the engine through `maxeb_engine::calculate` and check the
//! properties of the published `ComparisonResult`.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p maxeb-integration-tests
//! ```
