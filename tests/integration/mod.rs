//! Integration tests for activity-query.

pub mod http_test;
pub mod listing_test;
pub mod live_test;
pub mod session_test;

use std::path::PathBuf;

/// Path of the Turtle fixture shared by the listing tests.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("activity.ttl")
}
