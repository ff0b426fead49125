use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Unit of a schedule's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Year => "year",
        })
    }
}

impl std::str::FromStr for IntervalUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(IntervalUnit::Day),
            "week" => Ok(IntervalUnit::Week),
            "month" => Ok(IntervalUnit::Month),
            "year" => Ok(IntervalUnit::Year),
            other => Err(format!("unknown interval unit '{other}'")),
        }
    }
}

/// What the gateway does when a scheduled charge cannot be collected.
/// Absent means the gateway's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissedChargeAction {
    Ignore,
    Stop,
}

impl std::str::FromStr for MissedChargeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(MissedChargeAction::Ignore),
            "stop" => Ok(MissedChargeAction::Stop),
            other => Err(format!("unknown missed charge action '{other}'")),
        }
    }
}

/// Server-owned lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Disabled,
    Finished,
    /// Absent, or a status this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Disabled => "disabled",
            SubscriptionStatus::Finished => "finished",
            SubscriptionStatus::Unknown => "unknown",
        })
    }
}

/// Schedule of a new subscription.
///
/// `start_time` stays a string so malformed input reaches the validator
/// instead of failing at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSchedule {
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_unit: Option<IntervalUnit>,
    pub start_time: String,
}

impl CreateSchedule {
    pub fn new(interval: u32, interval_unit: IntervalUnit, start_time: DateTime<Utc>) -> Self {
        Self {
            interval,
            interval_unit: Some(interval_unit),
            start_time: format_start_time(start_time),
        }
    }
}

/// Schedule fields accepted on update. The start time is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSchedule {
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_unit: Option<IntervalUnit>,
}

impl UpdateSchedule {
    pub fn new(interval: u32, interval_unit: IntervalUnit) -> Self {
        Self {
            interval,
            interval_unit: Some(interval_unit),
        }
    }
}

/// Body of the create call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecurringRequest {
    pub register_id: String,
    pub name: String,
    pub amount: u64,
    pub token: String,
    pub callback_url: String,
    pub schedule: CreateSchedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_charge_action: Option<MissedChargeAction>,
}

/// Body of the update call. The target `register_id` travels in the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecurringRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub token: String,
    pub callback_url: String,
    pub schedule: UpdateSchedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_charge_action: Option<MissedChargeAction>,
}

/// Schedule as reported back by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_unit: Option<IntervalUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// Current remote state of one subscription.
///
/// State-change calls may answer with a partial snapshot, so every field
/// decodes to its default when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub register_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missed_charge_action: Option<MissedChargeAction>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_charge_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Envelope every recurring endpoint answers with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Subscription>,
}

/// Format a start time the way the gateway expects it (RFC 3339, seconds, `Z`).
pub fn format_start_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
