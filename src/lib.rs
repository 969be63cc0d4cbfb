#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the faceplate library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod api;
pub mod auth;
pub mod codec;
pub mod error;
pub mod flow;
pub mod models;
pub mod oauth;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use api::{ApiVerb, DataProvider, GraphApi, HttpGraphClient};
pub use auth::{AuthGateway, LoginStatus};
pub use error::ProviderError;
pub use flow::{CloseReason, ContactFlow, FlowOutcome};
pub use models::Session;
pub use oauth::{ContinuationRegistry, RedirectCoordinator, ReturnDisposition};
pub use settings::FaceplateSettings;
