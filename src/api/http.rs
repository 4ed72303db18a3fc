//! HTTP transport
//!
//! [`ApiClient`] implementation over reqwest.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::{ApiError, CacheError, Result};
use crate::models::{Envelope, Method, Request, ResponseShape};

// == Http Client ==
/// JSON-over-HTTP transport rooted at a base path.
///
/// Request paths are appended to the base path verbatim, params become the
/// query string and the optional body is sent as JSON. Successful bodies
/// are decoded with the configured [`ResponseShape`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_path: String,
    client: Client,
    methods: Vec<Method>,
    shape: ResponseShape,
}

impl HttpClient {
    /// Creates a client accepting every method.
    ///
    /// # Arguments
    /// * `base_path` - URL prefix for every request, e.g. `http://host/api`
    ///
    /// # Returns
    /// `CacheError::InvalidConfig` if `base_path` is empty.
    pub fn new(base_path: impl Into<String>) -> Result<Self> {
        let base_path = base_path.into();
        if base_path.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "HttpClient requires a base path".to_string(),
            ));
        }

        Ok(Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            client: Client::new(),
            methods: Method::all(),
            shape: ResponseShape::default(),
        })
    }

    /// Restricts the methods this client will send.
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_response_shape(mut self, shape: ResponseShape) -> Self {
        self.shape = shape;
        self
    }

    /// Uses a preconfigured reqwest client (timeouts, headers, TLS).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{}", self.base_path, path)
        } else {
            format!("{}/{}", self.base_path, path)
        }
    }

    async fn handle(&self, resp: Response) -> std::result::Result<Envelope, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?
        };
        Ok(self.shape.decode(body))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn call(&self, request: Request) -> std::result::Result<Envelope, ApiError> {
        if !self.methods.contains(&request.method) {
            return Err(ApiError::UnsupportedMethod(request.method.to_string()));
        }

        let url = self.url(&request.path);
        debug!(method = %request.method, url = %url, "sending request");

        let mut req = self
            .client
            .request(to_reqwest_method(request.method), url)
            .header(ACCEPT, "application/json");
        if !request.params.is_empty() {
            req = req.query(&request.params.query_pairs());
        }
        if let Some(data) = &request.data {
            req = req.json(data);
        }

        let resp = req.send().await?;
        self.handle(resp).await
    }
}
