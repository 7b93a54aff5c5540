use crate::model::User;
use std::time::Duration;

/// Failure modes of a directory fetch. All three surface to the store the
/// same way (as `error_msg` text); the variant only matters for tests and
/// transcript detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout).
    Network(String),
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The response body was not a well-formed user list.
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "request failed: {}", msg),
            FetchError::Status(code) => write!(f, "HTTP error: status {}", code),
            FetchError::Decode(msg) => write!(f, "malformed response body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Trait for the user-list endpoint to allow mocking and abstraction
pub trait UserApi {
    fn fetch_users(&self) -> Result<Vec<User>, FetchError>;
}

/// ureq-backed client for the remote read endpoint. One GET per call, no
/// auth, no pagination; the configured timeout is the only transport knob.
pub struct HttpApi {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpApi {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl UserApi for HttpApi {
    fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let resp = self.agent.get(&self.endpoint).call();

        match resp {
            Ok(r) => r
                .into_json::<Vec<User>>()
                .map_err(|e| FetchError::Decode(e.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
            Err(e) => Err(FetchError::Network(e.to_string())),
        }
    }
}
