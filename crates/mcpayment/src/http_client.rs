use crate::config::Config;
use crate::constants::SIGNATURE_HEADER;
use crate::error::McPaymentError;
use crate::hmac::sign_request;
use crate::transport::{ApiRequest, HttpMethod, RawResponse, Transport};

/// `reqwest`-backed transport for the recurring API.
///
/// Every request carries an `x-req-signature` header: the HMAC-SHA256 of
/// `"{METHOD}:{path}:{body}"` keyed by the client's sign key, where `path`
/// is the full URL path. Redirects are never followed.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: Config,
}

impl HttpTransport {
    pub fn new(config: Config) -> Result<Self, McPaymentError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| McPaymentError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Use a caller-provided `reqwest::Client` (shared pool, custom TLS).
    pub fn with_http_client(config: Config, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, McPaymentError> {
        let url = self.config.endpoint(&request.path);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| McPaymentError::Http(format!("invalid request URL {url}: {e}")))?;

        let body = request.body.unwrap_or_default();
        let signature = sign_request(
            self.config.sign_key(),
            request.method.as_str(),
            parsed.path(),
            &body,
        );

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };

        let mut builder = self
            .http
            .request(method, parsed)
            .header(SIGNATURE_HEADER, signature)
            .header("accept", "application/json");
        if !body.is_empty() {
            builder = builder.header("content-type", "application/json").body(body);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                McPaymentError::Http(format!("request to {url} timed out"))
            } else {
                McPaymentError::Http(format!("request to {url} failed: {e}"))
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| McPaymentError::Http(format!("failed to read response body: {e}")))?;

        tracing::debug!(method = %request.method, url = %url, status, "recurring API call");

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
