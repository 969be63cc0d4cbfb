//! Unified testing utilities for faceplate
//!
//! Consolidates fixtures and mock collaborators used by both unit tests and
//! integration tests (the latter behind the `testing` feature).
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built test data (settings, sessions)
//! - [`mock`] - Mock implementations of the remote boundaries

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockAuthGateway, MockGraphApi, ScriptedLogin};

/// Common test constants
pub mod constants {
    /// Default test application id
    pub const TEST_APP_ID: &str = "123";

    /// Default test user id
    pub const TEST_USER_ID: &str = "100234";

    /// Default test access token
    pub const TEST_ACCESS_TOKEN: &str = "EAAGtest-token";

    /// Default test page URL
    pub const TEST_PAGE_URL: &str = "https://app.test/";
}
