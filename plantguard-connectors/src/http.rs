//! Blocking HTTP client shared by the connectors
//!
//! ## Design Decisions
//!
//! The monitor loop runs one request at a time and waits for it, so the
//! client is a thin blocking wrapper around a `ureq` agent:
//! - Authentication and fixed headers applied to every request
//! - JSON and form bodies
//! - Retries with exponential backoff for transport failures, 429 and 5xx
//! - Counters in [`ConnectionStats`]
//!
//! Client errors (4xx other than 429) are never retried. Retries default
//! to zero: a failed alert send must not be repeated within a cycle.
//!
//! ## Example Usage
//!
//! ```no_run
//! use plantguard_connectors::http::{HttpClient, HttpConfig};
//!
//! let config = HttpConfig::new("https://project.supabase.co/rest/v1")
//!     .header("apikey", "service-key")
//!     .bearer_token("service-key")
//!     .timeout_secs(5)
//!     .max_retries(2);
//!
//! let mut client = HttpClient::new(config)?;
//! let rows = client.get_json("/plant_data?select=*&id=eq.7")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::thread;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use thiserror::Error;

use crate::ConnectionStats;

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL, prepended to every path
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Headers sent with every request
    pub headers: Vec<(String, String)>,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry, doubled for each further retry
    pub retry_base: Duration,
    /// User agent string
    pub user_agent: String,
}

/// Authentication methods
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic { username: String, password: String },
}

impl HttpConfig {
    /// Create new configuration with base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            auth: AuthMethod::None,
            headers: Vec::new(),
            max_retries: 0,
            retry_base: Duration::from_millis(200),
            user_agent: format!("PlantGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set how many times a retryable failure is retried
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the first retry backoff
    pub fn retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `Authorization` header value for the configured method
    pub fn authorization(&self) -> Option<String> {
        match &self.auth {
            AuthMethod::None => None,
            AuthMethod::Bearer(token) => Some(format!("Bearer {}", token)),
            AuthMethod::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", credentials))
            }
        }
    }
}

enum Body<'a> {
    Empty,
    Json(String),
    Form(&'a [(&'a str, &'a str)]),
}

impl Body<'_> {
    fn len(&self) -> usize {
        match self {
            Body::Empty => 0,
            Body::Json(json) => json.len(),
            Body::Form(fields) => fields.iter().map(|(k, v)| k.len() + v.len() + 2).sum(),
        }
    }
}

/// Blocking HTTP client using the lightweight ureq agent
pub struct HttpClient {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpClient {
    /// Create new HTTP client
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(HttpError::Config("Base URL must start with http:// or https://".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Request counters
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Send GET request, decode the JSON response
    pub fn get_json(&mut self, path: &str) -> Result<serde_json::Value, HttpError> {
        let request = self.build_request("GET", path, &[]);
        self.execute(request, Body::Empty)
    }

    /// Send POST request with a JSON body
    pub fn post_json<T: Serialize>(
        &mut self,
        path: &str,
        data: &T,
        extra_headers: &[(&str, &str)],
    ) -> Result<serde_json::Value, HttpError> {
        let json = serde_json::to_string(data).map_err(|e| HttpError::Decode(e.to_string()))?;
        let request = self
            .build_request("POST", path, extra_headers)
            .set("Content-Type", "application/json");
        self.execute(request, Body::Json(json))
    }

    /// Send POST request with a form-encoded body
    pub fn post_form(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<serde_json::Value, HttpError> {
        let request = self.build_request("POST", path, &[]);
        self.execute(request, Body::Form(fields))
    }

    /// Build request with authentication and headers
    fn build_request(&self, method: &str, path: &str, extra_headers: &[(&str, &str)]) -> ureq::Request {
        let url = format!("{}{}", self.config.base_url, path);
        let mut request = self.agent.request(method, &url).set("Accept", "application/json");

        if let Some(auth) = self.config.authorization() {
            request = request.set("Authorization", &auth);
        }
        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }
        for (name, value) in extra_headers {
            request = request.set(name, value);
        }

        request
    }

    /// Execute request with retry logic
    fn execute(&mut self, request: ureq::Request, body: Body<'_>) -> Result<serde_json::Value, HttpError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_base * (1 << (attempt - 1).min(8));
                log::debug!("Retrying {} in {:?} (attempt {})", request.url(), delay, attempt + 1);
                self.stats.retries += 1;
                thread::sleep(delay);
            }

            let response = match &body {
                Body::Empty => request.clone().call(),
                Body::Json(json) => request.clone().send_string(json),
                Body::Form(fields) => request.clone().send_form(fields),
            };

            match response {
                Ok(resp) => {
                    let text = match resp.into_string() {
                        Ok(text) => text,
                        Err(e) => return Err(self.fail(HttpError::Request(e.to_string()))),
                    };
                    self.stats.requests_sent += 1;
                    self.stats.bytes_sent += body.len() as u64;

                    if text.trim().is_empty() {
                        return Ok(serde_json::Value::Null);
                    }
                    return serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()));
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let err = HttpError::Status {
                        status: code,
                        message: resp.into_string().unwrap_or_default(),
                    };
                    if !is_retryable(code) {
                        return Err(self.fail(err));
                    }
                    last_error = Some(err);
                }
                Err(ureq::Error::Transport(e)) => {
                    last_error = Some(HttpError::Request(e.to_string()));
                }
            }
        }

        let err = last_error.unwrap_or_else(|| HttpError::Request("Unknown error".into()));
        Err(self.fail(err))
    }

    fn fail(&mut self, err: HttpError) -> HttpError {
        self.stats.requests_failed += 1;
        self.stats.last_error = Some(err.to_string());
        err
    }
}

/// Rate limits and server errors are worth another attempt
pub fn is_retryable(status: u16) -> bool {
    status == 429 || status >= 500
}
