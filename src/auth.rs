//! Seam for the platform's own login machinery
//!
//! Session validation and the popup login dialog belong to the external SDK;
//! this trait keeps them behind an async boundary so the rest of the library
//! never depends on their internals.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::Session;

/// Result of a session check or an interactive login attempt
#[derive(Debug, Clone)]
pub struct LoginStatus {
    pub connected: bool,
    pub session: Option<Session>,
}

impl LoginStatus {
    /// A connected status carrying the authenticated session
    #[must_use]
    pub fn connected(session: Session) -> Self {
        Self {
            connected: true,
            session: Some(session),
        }
    }

    /// Not authenticated; routed to interactive login, not an error
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            session: None,
        }
    }
}

/// External collaborator performing session checks and interactive logins
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Check whether an active session already exists
    ///
    /// # Errors
    ///
    /// Returns an error if the status check cannot be performed at all; an
    /// unauthenticated user is a disconnected status, not an error.
    async fn login_status(&self) -> Result<LoginStatus, ProviderError>;

    /// Run the interactive (popup dialog) login for the given scope
    ///
    /// # Errors
    ///
    /// Returns an error if the login machinery itself fails; a user decline
    /// is a disconnected status, not an error.
    async fn interactive_login(&self, scopes: &[String]) -> Result<LoginStatus, ProviderError>;
}
