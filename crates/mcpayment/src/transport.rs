//! The "perform an authenticated call" capability the gateway depends on.
//!
//! [`crate::HttpTransport`] is the production implementation; tests plug in
//! in-memory fakes.

use std::fmt;

use crate::error::McPaymentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call to the recurring API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the recurring base URL: empty for the collection,
    /// otherwise `/`-prefixed with the id segment already percent-encoded.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_json<T: serde::Serialize>(mut self, body: &T) -> Result<Self, McPaymentError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

/// Status and body as received. Interpreting them is the gateway's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends authenticated requests to the recurring API.
///
/// Implementations return `Err` only when no response was obtained
/// (connectivity, timeout). Any HTTP status, including 4xx/5xx, is a
/// successful `RawResponse`.
///
/// Dropping the returned future cancels the call.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<RawResponse, McPaymentError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<RawResponse, McPaymentError>> + Send {
        (**self).send(request)
    }
}

/// Percent-encode one path segment (a `register_id`).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
