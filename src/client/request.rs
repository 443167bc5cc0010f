//! Request and response values exchanged with the API under test

use std::fmt;
use serde_json::{Map, Value};

/// HTTP methods the battery issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Whether a JSON body is sent with this method
    pub fn carries_body(self) -> bool {
        matches!(self, Method::Post | Method::Patch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to the API under test, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, without a leading slash (`admin/games`)
    pub path: String,
    pub body: Option<Value>,
    /// Bearer token for the `Authorization` header
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            token: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    /// Join the request path onto `base_url` with exactly one `/`
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Raw response as seen by the check primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parsed JSON body, or an empty object when the body is empty or not JSON
    pub fn json_or_empty(&self) -> Value {
        if self.body.trim().is_empty() {
            return empty_payload();
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| empty_payload())
    }

    /// Body rendered for failure diagnostics: compact JSON when it parses, raw text otherwise
    pub fn diagnostic_body(&self) -> String {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(value) => value.to_string(),
            Err(_) => self.body.clone(),
        }
    }
}

/// The empty JSON object used wherever a case has no payload
pub fn empty_payload() -> Value {
    Value::Object(Map::new())
}
