//! In-memory stand-in for the remote recurring API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use mcpayment::{
    ApiRequest, Config, CreateRecurringRequest, HttpMethod, McPaymentError, RawResponse,
    RecurringResponse, ScheduleSnapshot, Subscription, SubscriptionStatus, Transport,
    UpdateRecurringRequest,
};
use rand::{distr::Alphanumeric, Rng};

pub const SECRET: &str = "unit-test-sign-key-0123456789abcdef";
pub const REGISTERED_ID: &str = "registered-fixture";
pub const REGISTERED_TOKEN: &str = "registered-card-token";
pub const CALLBACK_URL: &str = "https://merchant.example.com/callback";

pub fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn sandbox_config() -> Config {
    Config::new("https://api.example.com/recurring", SECRET).unwrap()
}

/// Fake remote that enforces the lifecycle the real gateway does.
#[derive(Default)]
pub struct FakeRemote {
    subscriptions: Mutex<HashMap<String, Subscription>>,
    calls: AtomicUsize,
    /// When set, every call answers with this status and body.
    forced: Mutex<Option<(u16, String)>>,
    /// When set, every call fails before a response.
    offline: Mutex<bool>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote pre-seeded with an active subscription under [`REGISTERED_ID`].
    pub fn with_fixture() -> Self {
        let remote = Self::new();
        remote.insert(REGISTERED_ID, SubscriptionStatus::Active);
        remote
    }

    pub fn insert(&self, register_id: &str, status: SubscriptionStatus) {
        let sub = Subscription {
            register_id: register_id.to_string(),
            name: "Fixture plan".to_string(),
            amount: 10000,
            token: REGISTERED_TOKEN.to_string(),
            callback_url: CALLBACK_URL.to_string(),
            schedule: Some(ScheduleSnapshot {
                interval: 1,
                interval_unit: Some(mcpayment::IntervalUnit::Month),
                start_time: Some("2026-01-01T00:00:00Z".to_string()),
            }),
            missed_charge_action: None,
            status,
            next_charge_time: None,
            created_at: None,
            updated_at: None,
        };
        self.subscriptions
            .lock()
            .unwrap()
            .insert(register_id.to_string(), sub);
    }

    pub fn status_of(&self, register_id: &str) -> Option<SubscriptionStatus> {
        self.subscriptions
            .lock()
            .unwrap()
            .get(register_id)
            .map(|s| s.status)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn force_response(&self, status: u16, body: &str) {
        *self.forced.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    fn handle(&self, request: &ApiRequest) -> (u16, RecurringResponse) {
        let segments: Vec<String> = request
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::decode(s).unwrap().into_owned())
            .collect();

        let mut subs = self.subscriptions.lock().unwrap();

        match (request.method, segments.as_slice()) {
            (HttpMethod::Post, []) => {
                let body = request.body.as_deref().unwrap_or_default();
                let req: CreateRecurringRequest = match serde_json::from_slice(body) {
                    Ok(r) => r,
                    Err(_) => return (400, rejected("malformed body")),
                };
                if subs.contains_key(&req.register_id) {
                    return (409, rejected("register_id already exists"));
                }
                let sub = Subscription {
                    register_id: req.register_id.clone(),
                    name: req.name,
                    amount: req.amount,
                    token: req.token,
                    callback_url: req.callback_url,
                    schedule: req.schedule.interval_unit.map(|unit| ScheduleSnapshot {
                        interval: req.schedule.interval,
                        interval_unit: Some(unit),
                        start_time: Some(req.schedule.start_time.clone()),
                    }),
                    missed_charge_action: req.missed_charge_action,
                    status: SubscriptionStatus::Pending,
                    next_charge_time: Some(req.schedule.start_time),
                    created_at: None,
                    updated_at: None,
                };
                subs.insert(req.register_id, sub.clone());
                (200, accepted(sub))
            }
            (HttpMethod::Get, [id]) => match subs.get(id) {
                Some(sub) => (200, accepted(sub.clone())),
                None => (404, rejected("register_id not found")),
            },
            (HttpMethod::Put, [id]) => {
                let Some(sub) = subs.get_mut(id) else {
                    return (404, rejected("register_id not found"));
                };
                if sub.status == SubscriptionStatus::Finished {
                    return (409, rejected("subscription is finished"));
                }
                let body = request.body.as_deref().unwrap_or_default();
                let req: UpdateRecurringRequest = match serde_json::from_slice(body) {
                    Ok(r) => r,
                    Err(_) => return (400, rejected("malformed body")),
                };
                sub.name = req.name;
                if let Some(amount) = req.amount {
                    sub.amount = amount;
                }
                sub.token = req.token;
                sub.callback_url = req.callback_url;
                if let Some(action) = req.missed_charge_action {
                    sub.missed_charge_action = Some(action);
                }
                (200, accepted(sub.clone()))
            }
            (HttpMethod::Post, [id, action]) => {
                let Some(sub) = subs.get_mut(id) else {
                    return (404, rejected("register_id not found"));
                };
                let next = match (action.as_str(), sub.status) {
                    ("enable", SubscriptionStatus::Disabled) => SubscriptionStatus::Active,
                    ("disable", SubscriptionStatus::Active | SubscriptionStatus::Pending) => {
                        SubscriptionStatus::Disabled
                    }
                    ("finish", s) if s != SubscriptionStatus::Finished => {
                        SubscriptionStatus::Finished
                    }
                    ("enable" | "disable" | "finish", _) => {
                        return (409, rejected("transition not allowed"))
                    }
                    _ => return (405, rejected("unknown action")),
                };
                sub.status = next;
                (200, accepted(sub.clone()))
            }
            _ => (405, rejected("method not allowed")),
        }
    }
}

fn accepted(sub: Subscription) -> RecurringResponse {
    RecurringResponse {
        error: false,
        message: Some("success".to_string()),
        data: Some(sub),
    }
}

fn rejected(message: &str) -> RecurringResponse {
    RecurringResponse {
        error: true,
        message: Some(message.to_string()),
        data: None,
    }
}

impl Transport for FakeRemote {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, McPaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if *self.offline.lock().unwrap() {
            return Err(McPaymentError::Http("connection refused".to_string()));
        }
        if let Some((status, body)) = self.forced.lock().unwrap().clone() {
            return Ok(RawResponse {
                status,
                body: body.into_bytes(),
            });
        }

        let (status, body) = self.handle(&request);
        Ok(RawResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        })
    }
}
