//! Client SDK for MCPayment recurring payment schedules.
//!
//! Manages the lifecycle of a recurring charge (create, get, update, enable,
//! disable, finish) against the remote gateway, and verifies the signature
//! attached to the gateway's webhook callbacks.
//!
//! # Two tiers of failure
//!
//! Every gateway operation returns `Result<Outcome<T>, McPaymentError>`:
//!
//! - `Err(McPaymentError)`: the call never completed: the request failed
//!   validation, the network failed, or the response could not be decoded
//! - `Ok(Outcome::Rejected(_))`: the remote answered, and the answer is
//!   negative (unknown `register_id`, transition not applicable, duplicate)
//! - `Ok(Outcome::Accepted(_))`: the remote answered positively
//!
//! # Quick example
//!
//! ```no_run
//! use mcpayment::{Config, RecurringGateway};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), mcpayment::McPaymentError> {
//! let config = Config::new("https://api.example.com/recurring", "x-sign-key")?;
//! let gateway = RecurringGateway::from_config(config)?;
//!
//! match gateway.get("subscription-42").await? {
//!     mcpayment::Outcome::Accepted(sub) => println!("status: {}", sub.status),
//!     mcpayment::Outcome::Rejected(r) => println!("rejected: {r}"),
//! }
//! # Ok(())
//! # }
//! ```

// Core types
pub mod callback;
pub mod config;
pub mod constants;
pub mod error;
pub mod outcome;
pub mod recurring;

// Pure logic
pub mod hmac;
pub mod validation;

// Orchestration
pub mod gateway;
pub mod transport;

// HTTP transport
#[cfg(feature = "full")]
pub mod http_client;

// Re-exports
pub use callback::CallbackPayload;
pub use config::{Config, ConfigError, Environment, LogLevel};
pub use error::{McPaymentError, ValidationError};
pub use gateway::RecurringGateway;
pub use outcome::{Outcome, Rejection, RejectionKind};
pub use recurring::*;
pub use transport::{ApiRequest, HttpMethod, RawResponse, Transport};

#[cfg(feature = "full")]
pub use http_client::HttpTransport;
