//! Request validation. Runs before any network call.

use chrono::{DateTime, Utc};
use url::Url;

use crate::config::Environment;
use crate::error::ValidationError;
use crate::recurring::{CreateRecurringRequest, IntervalUnit, UpdateRecurringRequest};

/// Validate a create request against the current time.
pub fn validate_create(
    req: &CreateRecurringRequest,
    environment: Environment,
) -> Result<(), ValidationError> {
    validate_create_at(req, environment, Utc::now())
}

/// Validate a create request against an explicit `now`.
///
/// The past-start-time rule only applies in production.
pub fn validate_create_at(
    req: &CreateRecurringRequest,
    environment: Environment,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    validate_register_id(&req.register_id)?;
    require_text("name", &req.name)?;
    if req.amount == 0 {
        return Err(ValidationError::MissingField("amount"));
    }
    require_text("token", &req.token)?;
    validate_callback_url(&req.callback_url)?;
    validate_interval(req.schedule.interval, req.schedule.interval_unit)?;

    require_text("schedule.start_time", &req.schedule.start_time)?;
    let raw = req.schedule.start_time.as_str();
    let start_time = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| ValidationError::StartTimeFormat(raw.to_string()))?
        .with_timezone(&Utc);

    if environment.is_production() && start_time < now {
        return Err(ValidationError::StartTimeInPast {
            start_time: raw.to_string(),
        });
    }

    Ok(())
}

/// Validate an update request. The target id is checked separately with
/// [`validate_register_id`].
pub fn validate_update(req: &UpdateRecurringRequest) -> Result<(), ValidationError> {
    require_text("name", &req.name)?;
    if req.amount == Some(0) {
        return Err(ValidationError::InvalidField {
            field: "amount",
            reason: "must be positive".to_string(),
        });
    }
    require_text("token", &req.token)?;
    validate_callback_url(&req.callback_url)?;
    validate_interval(req.schedule.interval, req.schedule.interval_unit)
}

/// The identifier every operation targets must be non-blank.
pub fn validate_register_id(register_id: &str) -> Result<(), ValidationError> {
    require_text("register_id", register_id)
}

/// Non-blank, and sent exactly as checked: surrounding whitespace is an
/// error rather than something to trim.
fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    if trimmed.len() != value.len() {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must not have leading or trailing whitespace".to_string(),
        });
    }
    Ok(())
}

fn validate_interval(interval: u32, unit: Option<IntervalUnit>) -> Result<(), ValidationError> {
    if interval == 0 {
        return Err(ValidationError::MissingField("schedule.interval"));
    }
    if unit.is_none() {
        return Err(ValidationError::MissingField("schedule.interval_unit"));
    }
    Ok(())
}

fn validate_callback_url(raw: &str) -> Result<(), ValidationError> {
    require_text("callback_url", raw)?;
    let parsed = Url::parse(raw).map_err(|e| ValidationError::InvalidField {
        field: "callback_url",
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "https" | "http" => {}
        other => {
            return Err(ValidationError::InvalidField {
                field: "callback_url",
                reason: format!("unsupported scheme '{other}'"),
            })
        }
    }
    if parsed.host().is_none() {
        return Err(ValidationError::InvalidField {
            field: "callback_url",
            reason: "must have a host".to_string(),
        });
    }
    Ok(())
}
