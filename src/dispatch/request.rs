//! Outbound request description

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;

/// Per-call timeout selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// The dispatcher's ordinary timeout
    #[default]
    Default,
    /// The extended timeout for long-running calls
    Long,
    Custom(Duration),
}

/// A call to the backend, addressed by its API path (e.g. `/admin/department/page`)
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Timeout,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            timeout: Timeout::Default,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Use the extended timeout, e.g. for AI report generation
    pub fn long_running(mut self) -> Self {
        self.timeout = Timeout::Long;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Timeout::Custom(timeout);
        self
    }
}
