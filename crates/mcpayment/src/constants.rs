use std::time::Duration;

/// Header carrying the request signature on every outbound call.
pub const SIGNATURE_HEADER: &str = "x-req-signature";

/// Path suffixes of the state-transition endpoints.
pub const ENABLE_PATH: &str = "enable";
pub const DISABLE_PATH: &str = "disable";
pub const FINISH_PATH: &str = "finish";

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared secrets shorter than this trigger a warning at config load.
pub const MIN_SIGN_KEY_LEN: usize = 32;

/// Unexpected response bodies are truncated to this many bytes in errors.
pub const MAX_ERROR_BODY_LEN: usize = 512;

/// Environment variable names read by [`crate::Config::from_env`].
pub const ENV_BASE_URL_RECURRING: &str = "MCPAYMENT_BASE_URL_RECURRING";
pub const ENV_X_SIGN_KEY: &str = "MCPAYMENT_X_SIGN_KEY";
pub const ENV_ENVIRONMENT: &str = "MCPAYMENT_ENV";
pub const ENV_LOG_LEVEL: &str = "MCPAYMENT_LOG_LEVEL";
pub const ENV_TIMEOUT_SECS: &str = "MCPAYMENT_TIMEOUT_SECS";
