//! Recurring subscription lifecycle: create, get, update, enable, disable,
//! finish, and callback signature checks.
//!
//! The gateway holds no subscription state. Each call validates its input,
//! makes one request through the [`Transport`], and classifies the answer:
//!
//! | Response                          | Result                                   |
//! |-----------------------------------|------------------------------------------|
//! | 2xx, `error: false`               | `Ok(Outcome::Accepted)`                  |
//! | 2xx, `error: true`                | `Ok(Outcome::Rejected(BusinessRule))`    |
//! | 404                               | `Ok(Outcome::Rejected(NotFound))`        |
//! | 409                               | `Ok(Outcome::Rejected(Conflict))`        |
//! | 400, 422                          | `Ok(Outcome::Rejected(BusinessRule))`    |
//! | 401, 403                          | `Err(Authentication)`                    |
//! | anything else                     | `Err(UnexpectedStatus)`                  |
//! | 2xx with an undecodable body      | `Err(Decode)`                            |
//!
//! Missing snapshot fields decode to their defaults, so a state change
//! answered with partial `data` is still accepted. Only `get` insists on a
//! snapshot that names its `register_id`.

use crate::callback::{self, CallbackPayload};
use crate::config::Config;
use crate::constants::{DISABLE_PATH, ENABLE_PATH, FINISH_PATH, MAX_ERROR_BODY_LEN};
use crate::error::McPaymentError;
use crate::outcome::{Outcome, Rejection, RejectionKind};
use crate::recurring::{
    CreateRecurringRequest, RecurringResponse, Subscription, UpdateRecurringRequest,
};
use crate::transport::{encode_segment, ApiRequest, HttpMethod, RawResponse, Transport};
use crate::validation;

/// Client for the recurring-payments API.
pub struct RecurringGateway<T: Transport> {
    config: Config,
    transport: T,
}

#[cfg(feature = "full")]
impl RecurringGateway<crate::http_client::HttpTransport> {
    /// Gateway over HTTP, configured entirely by `config`.
    pub fn from_config(config: Config) -> Result<Self, McPaymentError> {
        let transport = crate::http_client::HttpTransport::new(config.clone())?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> RecurringGateway<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a new recurring schedule.
    ///
    /// A duplicate `register_id` or an unschedulable start time is a
    /// rejection, not an error.
    pub async fn create(
        &self,
        req: &CreateRecurringRequest,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        validation::validate_create(req, self.config.environment())?;

        let request = ApiRequest::new(HttpMethod::Post, "").with_json(req)?;
        self.call("create", &req.register_id, request).await
    }

    /// Current remote state of `register_id`.
    pub async fn get(&self, register_id: &str) -> Result<Outcome<Subscription>, McPaymentError> {
        validation::validate_register_id(register_id)?;

        let request = ApiRequest::new(HttpMethod::Get, item_path(register_id, None));
        match self.call("get", register_id, request).await? {
            Outcome::Accepted(resp) => match resp.data {
                Some(subscription) if !subscription.register_id.is_empty() => {
                    Ok(Outcome::Accepted(subscription))
                }
                _ => Err(McPaymentError::MissingData),
            },
            Outcome::Rejected(r) => Ok(Outcome::Rejected(r)),
        }
    }

    /// Replace the mutable fields of `register_id`.
    pub async fn update(
        &self,
        register_id: &str,
        req: &UpdateRecurringRequest,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        validation::validate_update(req)?;
        validation::validate_register_id(register_id)?;

        let request =
            ApiRequest::new(HttpMethod::Put, item_path(register_id, None)).with_json(req)?;
        self.call("update", register_id, request).await
    }

    /// Request Disabled → Active.
    pub async fn enable(
        &self,
        register_id: &str,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        self.transition(register_id, ENABLE_PATH).await
    }

    /// Request Active → Disabled.
    pub async fn disable(
        &self,
        register_id: &str,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        self.transition(register_id, DISABLE_PATH).await
    }

    /// Request termination. Finished is terminal.
    pub async fn finish(
        &self,
        register_id: &str,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        self.transition(register_id, FINISH_PATH).await
    }

    /// Whether a callback's `signature_key` was produced with this client's
    /// sign key. Never errors; anything unverifiable is `false`.
    pub fn validate_sign_key(&self, payload: &CallbackPayload) -> bool {
        callback::validate_sign_key(self.config.sign_key(), payload)
    }

    /// Same check as [`Self::validate_sign_key`], on a raw callback body.
    pub fn validate_sign_key_json(&self, body: &[u8]) -> bool {
        callback::validate_sign_key_json(self.config.sign_key(), body)
    }

    /// Parse and verify a raw callback body.
    pub fn verify_callback(&self, body: &[u8]) -> Option<CallbackPayload> {
        callback::verify_callback(self.config.sign_key(), body)
    }

    /// The signature the gateway is expected to attach for `register_id`.
    pub fn expected_signature(&self, register_id: &str) -> String {
        callback::expected_signature(self.config.sign_key(), register_id)
    }

    async fn transition(
        &self,
        register_id: &str,
        action: &'static str,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        validation::validate_register_id(register_id)?;

        let request = ApiRequest::new(HttpMethod::Post, item_path(register_id, Some(action)));
        self.call(action, register_id, request).await
    }

    async fn call(
        &self,
        operation: &'static str,
        register_id: &str,
        request: ApiRequest,
    ) -> Result<Outcome<RecurringResponse>, McPaymentError> {
        let raw = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(operation, register_id, error = %e, "recurring call failed");
            e
        })?;

        let outcome = classify(raw)?;
        match &outcome {
            Outcome::Accepted(_) => {
                tracing::info!(operation, register_id, "recurring call accepted")
            }
            Outcome::Rejected(r) => tracing::info!(
                operation,
                register_id,
                status = r.status,
                reason = r.message.as_deref().unwrap_or(""),
                "recurring call rejected"
            ),
        }
        Ok(outcome)
    }
}

fn item_path(register_id: &str, action: Option<&str>) -> String {
    match action {
        Some(action) => format!("/{}/{}", encode_segment(register_id), action),
        None => format!("/{}", encode_segment(register_id)),
    }
}

/// Map a raw response onto the two-tier result.
pub(crate) fn classify(raw: RawResponse) -> Result<Outcome<RecurringResponse>, McPaymentError> {
    let kind = match raw.status {
        200..=299 if raw.body.iter().all(u8::is_ascii_whitespace) => {
            return Ok(Outcome::Accepted(RecurringResponse::default()));
        }
        200..=299 => {
            let resp: RecurringResponse = serde_json::from_slice(&raw.body)?;
            if resp.error {
                return Ok(Outcome::Rejected(Rejection {
                    kind: RejectionKind::BusinessRule,
                    status: raw.status,
                    message: resp.message,
                }));
            }
            return Ok(Outcome::Accepted(resp));
        }
        404 => RejectionKind::NotFound,
        409 => RejectionKind::Conflict,
        400 | 422 => RejectionKind::BusinessRule,
        401 | 403 => return Err(McPaymentError::Authentication { status: raw.status }),
        status => {
            return Err(McPaymentError::UnexpectedStatus {
                status,
                body: truncated_body(&raw.body),
            })
        }
    };

    // The status decides the rejection; the body only contributes a message.
    let message = serde_json::from_slice::<RecurringResponse>(&raw.body)
        .ok()
        .and_then(|r| r.message);

    Ok(Outcome::Rejected(Rejection {
        kind,
        status: raw.status,
        message,
    }))
}

fn truncated_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_ERROR_BODY_LEN {
        return text.into_owned();
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
