//! Redirect login module
//!
//! This module provides the redirect-based login flow: a registry of pending
//! continuations keyed by opaque tokens, and a coordinator that builds the
//! outbound authorization URL and resumes the stored continuation when the
//! browser returns from the provider.
//!
//! The state parameter carries only an encoded registry token, never
//! executable content. A decoded token is looked up and consumed at most
//! once; anything unknown or malformed is dropped with a debug log.

pub mod redirect;
pub mod registry;

pub use redirect::RedirectCoordinator;
pub use registry::{ContinuationRegistry, PendingLogin};

/// Literal prefix marking a state parameter produced by this library
pub const STATE_PREFIX: &str = "fb";

/// Outcome of inspecting a page URL for a returning redirect
///
/// An explicit discriminated result: callers can tell a resumed login apart
/// from a normal page load and from a state value this process no longer
/// (or never) knew about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDisposition {
    /// A pending continuation was found and resumed exactly once
    Resumed { success: bool },
    /// The state parameter carried our prefix but no pending continuation
    /// matched the decoded token; nothing fired
    StaleOrForeign,
    /// No state parameter with our prefix was present; a normal,
    /// non-redirect page load
    NotARedirect,
}
