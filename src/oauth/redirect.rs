//! Redirect login coordinator
//!
//! Two states: **outbound**, where the coordinator registers a continuation
//! and builds the authorization URL the host application navigates to, and
//! **returning**, where the current page URL is inspected for an echoed state
//! parameter and the stored continuation is resumed with a success flag.
//!
//! Return URLs are parsed strictly by component (query and fragment; the
//! implicit grant delivers its data in the fragment) rather than by substring
//! search over the raw URL. A malformed URL, a foreign state value, or a
//! token with no pending continuation never panics and never fires anything.

use log::debug;
use std::borrow::Cow;
use std::sync::Arc;
use url::Url;

use crate::codec;
use crate::error::ProviderError;
use crate::oauth::registry::{ContinuationRegistry, PendingLogin};
use crate::oauth::{ReturnDisposition, STATE_PREFIX};
use crate::settings::ProviderSettings;

pub struct RedirectCoordinator {
    provider: ProviderSettings,
    registry: Arc<ContinuationRegistry>,
}

impl RedirectCoordinator {
    #[must_use]
    pub fn new(provider: ProviderSettings, registry: Arc<ContinuationRegistry>) -> Self {
        Self { provider, registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ContinuationRegistry> {
        &self.registry
    }

    /// Register `continuation` and build the authorization redirect URL
    ///
    /// The returned URL has the shape
    /// `<dialog_endpoint>?client_id=..&response_type=token&scope=..&state=..&redirect_uri=..`
    /// with `state` carrying the literal prefix plus the encoded registry
    /// token. Navigating to it is the caller's side effect and is
    /// irreversible once triggered; there is no cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider settings lack an application id.
    pub fn begin_login(
        &self,
        current_url: &str,
        continuation: impl FnOnce(bool) + Send + 'static,
    ) -> Result<String, ProviderError> {
        if self.provider.app_id.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "provider.app_id is required for redirect login".to_string(),
            ));
        }

        let token = self
            .registry
            .register(PendingLogin::new(current_url, continuation));
        let state = format!("{STATE_PREFIX}{}", codec::encode(&token));

        let url = format!(
            "{}?client_id={}&response_type=token&scope={}&state={}&redirect_uri={}",
            self.provider.dialog_endpoint,
            self.provider.app_id,
            urlencoding::encode(&self.provider.scope_csv()),
            urlencoding::encode(&state),
            urlencoding::encode(current_url),
        );
        debug!(
            "Built authorization redirect URL for app {} returning to {current_url}",
            self.provider.app_id
        );
        Ok(url)
    }

    /// Inspect a page URL for a returning redirect and resume the pending
    /// continuation at most once
    ///
    /// Success is determined by the presence of an `access_token` entry in
    /// the query or fragment. A URL without a prefixed state parameter is a
    /// normal page load and fires nothing.
    pub fn resume_from_return(&self, return_url: &str) -> ReturnDisposition {
        let parsed = match Url::parse(return_url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Return URL did not parse ({e}); treating as non-redirect load");
                return ReturnDisposition::NotARedirect;
            }
        };

        let mut state: Option<String> = None;
        let mut has_access_token = false;
        for (key, value) in Self::component_pairs(&parsed) {
            match key.as_ref() {
                "state" if state.is_none() => state = Some(value.into_owned()),
                "access_token" => has_access_token = true,
                _ => {}
            }
        }

        let Some(state) = state else {
            return ReturnDisposition::NotARedirect;
        };
        let Some(encoded_token) = state.strip_prefix(STATE_PREFIX) else {
            debug!("State parameter present but not ours; ignoring");
            return ReturnDisposition::NotARedirect;
        };

        // Lax decode: a mangled state yields a token that simply matches
        // nothing in the registry
        let token = codec::decode(encoded_token);
        if self.registry.resume(&token, has_access_token) {
            ReturnDisposition::Resumed {
                success: has_access_token,
            }
        } else {
            debug!("Decoded state token has no pending continuation");
            ReturnDisposition::StaleOrForeign
        }
    }

    /// Key-value pairs from the query string followed by the fragment
    fn component_pairs(url: &Url) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        let fragment_pairs = url
            .fragment()
            .map(|fragment| url::form_urlencoded::parse(fragment.as_bytes()))
            .into_iter()
            .flatten();
        url.query_pairs().chain(fragment_pairs)
    }
}
