//! Backend response envelope `{ code, msg, data }`

use serde::Deserialize;
use serde_json::Value;

/// Business code meaning success
pub const SUCCESS_CODE: i64 = 1;

const FALLBACK_MESSAGE: &str = "Error";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// A decoded envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    AuthExpired,
    BusinessError { code: i64, message: String },
}

impl Outcome {
    pub fn decode(envelope: ApiEnvelope, expired_code: i64) -> Self {
        match envelope.code {
            SUCCESS_CODE => Outcome::Success(envelope.data),
            code if code == expired_code => Outcome::AuthExpired,
            code => Outcome::BusinessError {
                code,
                message: envelope
                    .msg
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            },
        }
    }
}
