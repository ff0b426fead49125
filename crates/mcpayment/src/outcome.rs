//! Domain-level result of a completed gateway call.

use std::fmt;

use serde::Serialize;

/// Why the gateway answered negatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The `register_id` is unknown to the gateway.
    NotFound,
    /// Duplicate `register_id`, or a state transition that does not apply
    /// to the subscription's current state.
    Conflict,
    /// Any other business rule the gateway enforces (unschedulable start
    /// time, rejected token, ...).
    BusinessRule,
}

/// A negative but successfully determined answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    /// HTTP status the gateway answered with.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            RejectionKind::NotFound => "not found",
            RejectionKind::Conflict => "conflict",
            RejectionKind::BusinessRule => "rejected",
        };
        match &self.message {
            Some(msg) => write!(f, "{kind} (status {}): {msg}", self.status),
            None => write!(f, "{kind} (status {})", self.status),
        }
    }
}

/// Result of a call that reached the gateway and was understood.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    /// The gateway's `error` flag: true for any negative answer.
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Outcome::Rejected(Rejection {
                kind: RejectionKind::NotFound,
                ..
            })
        )
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(r) => Some(r),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Accepted(value) => Outcome::Accepted(f(value)),
            Outcome::Rejected(r) => Outcome::Rejected(r),
        }
    }
}
