//! Error types shared across the library
//!
//! Every remote interaction reports failure through [`ProviderError`] rather
//! than through the shape of the delivered response. Field absence inside a
//! successful response is not an error and stays `Option` on the model side.

use std::fmt;

/// Failures surfaced by login flows and remote data access
#[derive(Debug)]
pub enum ProviderError {
    /// Settings are incomplete or inconsistent (e.g. missing app id)
    Configuration(String),
    /// The HTTP request could not be performed
    Transport(String),
    /// The remote API answered with a non-success status
    RemoteStatus(u16, String),
    /// The response body could not be decoded into the expected shape
    Decode(String),
    /// An operation requiring an authenticated session was attempted without one
    NotConnected,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            ProviderError::Transport(msg) => write!(f, "Transport error: {msg}"),
            ProviderError::RemoteStatus(status, body) => {
                write!(f, "Remote API returned status {status}: {body}")
            }
            ProviderError::Decode(msg) => write!(f, "Response decoding failed: {msg}"),
            ProviderError::NotConnected => write!(f, "No connected session"),
        }
    }
}

impl std::error::Error for ProviderError {}
