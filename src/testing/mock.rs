//! Mock implementations of the remote boundaries
//!
//! [`MockGraphApi`] answers requests from a canned path-to-response map and
//! records every call; clones share state, so tests can keep a handle for
//! assertions after handing the mock to a facade. [`MockAuthGateway`] plays
//! back a scripted session status and login result.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::{ApiVerb, GraphApi};
use crate::auth::{AuthGateway, LoginStatus};
use crate::error::ProviderError;
use crate::models::Session;

/// One recorded request against the mock API
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub verb: ApiVerb,
    pub path: String,
    pub params: Vec<(String, String)>,
}

#[derive(Default)]
struct MockGraphInner {
    responses: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<RecordedCall>>,
    failure: Mutex<Option<(u16, String)>>,
}

/// Canned-response implementation of [`GraphApi`]
#[derive(Clone, Default)]
pub struct MockGraphApi {
    inner: Arc<MockGraphInner>,
}

impl MockGraphApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response delivered for `path`
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_response(self, path: impl Into<String>, response: Value) -> Self {
        self.inner
            .responses
            .lock()
            .unwrap()
            .insert(path.into(), response);
        self
    }

    /// Make every request fail with the given remote status
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn failing_with(self, status: u16, body: impl Into<String>) -> Self {
        *self.inner.failure.lock().unwrap() = Some((status, body.into()));
        self
    }

    /// All calls recorded so far
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphApi for MockGraphApi {
    async fn request(
        &self,
        verb: ApiVerb,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ProviderError> {
        self.inner.calls.lock().unwrap().push(RecordedCall {
            verb,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });

        if let Some((status, body)) = self.inner.failure.lock().unwrap().clone() {
            return Err(ProviderError::RemoteStatus(status, body));
        }

        // Unregistered paths answer with an empty listing so facade tests
        // only set up what they assert on
        Ok(self
            .inner
            .responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({ "data": [] })))
    }
}

/// Scripted result for [`MockAuthGateway::interactive_login`]
#[derive(Clone)]
pub enum ScriptedLogin {
    /// Login succeeds with this session
    Connected(Session),
    /// User declines or cancels
    Declined,
    /// The login never resolves
    Hang,
    /// The login machinery itself fails
    Error,
}

/// Playback implementation of [`AuthGateway`]
pub struct MockAuthGateway {
    status: LoginStatus,
    login: ScriptedLogin,
}

impl MockAuthGateway {
    /// Gateway reporting an already-connected session
    #[must_use]
    pub fn connected(session: Session) -> Self {
        Self {
            status: LoginStatus::connected(session),
            login: ScriptedLogin::Declined,
        }
    }

    /// Gateway reporting no active session
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            status: LoginStatus::disconnected(),
            login: ScriptedLogin::Declined,
        }
    }

    /// Script the result of the interactive login
    #[must_use]
    pub fn with_login(mut self, login: ScriptedLogin) -> Self {
        self.login = login;
        self
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login_status(&self) -> Result<LoginStatus, ProviderError> {
        Ok(self.status.clone())
    }

    async fn interactive_login(&self, _scopes: &[String]) -> Result<LoginStatus, ProviderError> {
        match &self.login {
            ScriptedLogin::Connected(session) => Ok(LoginStatus::connected(session.clone())),
            ScriptedLogin::Declined => Ok(LoginStatus::disconnected()),
            ScriptedLogin::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending future never resolves")
            }
            ScriptedLogin::Error => Err(ProviderError::Transport(
                "login machinery unavailable".to_string(),
            )),
        }
    }
}
