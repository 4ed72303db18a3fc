//! API Module
//!
//! The transport seam and the dispatcher that turns commands into cache
//! events.
//!
//! # Components
//! - [`ApiClient`] - performs one request and decodes the response
//! - [`HttpClient`] - reqwest-backed implementation
//! - [`Dispatcher`] - issues commands as fire-and-forget tasks

mod dispatcher;
mod http;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Envelope, Request};

pub use dispatcher::Dispatcher;
pub use http::HttpClient;

// == Api Client ==
/// Performs requests on behalf of the cache.
///
/// Implementations resolve to the decoded response or to an [`ApiError`];
/// they never touch cache state themselves.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn call(&self, request: Request) -> Result<Envelope, ApiError>;
}
