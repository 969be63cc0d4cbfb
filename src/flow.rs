//! Contacts convenience flow
//!
//! Sequences the session check, the interactive login fallback, and the
//! contacts fetch as one triggered run. Each trigger produces exactly one
//! terminal outcome: either contacts are delivered or the close handler
//! fires, never both. A login that never resolves is bounded by the
//! configured timeout (set it to 0 to wait indefinitely); transport failures
//! after login surface as errors on the explicit result channel.

use log::{debug, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ContactFilter, DataProvider, GraphApi};
use crate::auth::AuthGateway;
use crate::error::ProviderError;
use crate::models::{Contact, Session};
use crate::settings::FaceplateSettings;

/// Why the flow terminated without delivering contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The user declined or cancelled the interactive login
    Declined,
    /// The interactive login did not resolve within the configured timeout
    TimedOut,
}

/// Terminal outcome of one triggered flow
#[derive(Debug)]
pub enum FlowOutcome {
    Contacts(Vec<Contact>),
    Closed(CloseReason),
}

/// One-shot orchestration of session check, login and contacts fetch
pub struct ContactFlow {
    gateway: Arc<dyn AuthGateway>,
    api: Arc<dyn GraphApi>,
    settings: FaceplateSettings,
    on_close: Option<Box<dyn FnOnce() + Send>>,
    filter: Option<Arc<dyn ContactFilter>>,
}

impl ContactFlow {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        api: Arc<dyn GraphApi>,
        settings: FaceplateSettings,
    ) -> Self {
        Self {
            gateway,
            api,
            settings,
            on_close: None,
            filter: None,
        }
    }

    /// Register the handler invoked when the user closes or interrupts the
    /// login. Panics from the handler are swallowed, not propagated.
    #[must_use]
    pub fn with_close_handler(mut self, handler: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(handler));
        self
    }

    /// Register an async post-filter over the fetched contacts
    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn ContactFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Run the flow to its single terminal outcome
    ///
    /// Consumes the flow: the close handler can only ever fire once, and a
    /// second trigger requires building a new flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the session check fails outright, or if the
    /// contacts fetch after a successful login fails. Login decline and
    /// login timeout are not errors; they terminate as
    /// [`FlowOutcome::Closed`].
    pub async fn trigger(mut self) -> Result<FlowOutcome, ProviderError> {
        let status = self.gateway.login_status().await?;

        let session = match status.session {
            Some(session) if status.connected => {
                debug!("Existing session is active; skipping interactive login");
                session
            }
            _ => match self.interactive_login().await {
                Ok(session) => session,
                Err(reason) => {
                    self.fire_close();
                    return Ok(FlowOutcome::Closed(reason));
                }
            },
        };

        let provider = DataProvider::new(
            session,
            Arc::clone(&self.api),
            self.settings.provider.graph_endpoint.clone(),
        )?;
        let contacts = match &self.filter {
            Some(filter) => provider.contacts_filtered(filter.as_ref()).await?,
            None => provider.contacts().await?,
        };
        Ok(FlowOutcome::Contacts(contacts))
    }

    /// Interactive login bounded by the configured timeout
    async fn interactive_login(&self) -> Result<Session, CloseReason> {
        let scopes = self.settings.provider.scopes.clone();
        let timeout_secs = self.settings.login.login_timeout_secs;

        let attempt = if timeout_secs == 0 {
            // Timeout disabled: wait as long as the login takes
            self.gateway.interactive_login(&scopes).await
        } else {
            match tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                self.gateway.interactive_login(&scopes),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    warn!("Interactive login did not resolve within {timeout_secs}s");
                    return Err(CloseReason::TimedOut);
                }
            }
        };

        match attempt {
            Ok(status) if status.connected => status.session.ok_or_else(|| {
                warn!("Login reported connected but carried no session");
                CloseReason::Declined
            }),
            Ok(_) => {
                debug!("Interactive login declined by user");
                Err(CloseReason::Declined)
            }
            Err(e) => {
                warn!("Interactive login failed: {e}");
                Err(CloseReason::Declined)
            }
        }
    }

    fn fire_close(&mut self) {
        if let Some(close) = self.on_close.take() {
            if catch_unwind(AssertUnwindSafe(close)).is_err() {
                debug!("Close handler panicked; swallowed");
            }
        }
    }
}
