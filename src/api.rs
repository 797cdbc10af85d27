use std::fmt;
use std::time::Duration;

use ureq::Agent;

use crate::models::proposal::NewProposal;
use crate::models::tender::Tender;

/// Upstream requests share one agent with a bounded timeout so a hung
/// backend cannot pin a worker indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error from the tender backend API.
#[derive(Debug)]
pub enum ApiError {
    /// The backend answered with a non-success HTTP status.
    Status(u16),
    /// The request never produced a response (connect, TLS, decode, ...).
    Transport(ureq::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if it has one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(code) => Some(*code),
            ApiError::Transport(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status(code) => write!(f, "Backend returned status {code}"),
            ApiError::Transport(e) => write!(f, "Backend request failed: {e}"),
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => ApiError::Status(code),
            other => ApiError::Transport(other),
        }
    }
}

/// Client for the tender backend, the system of record for tenders and
/// proposals.
#[derive(Clone)]
pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET /tenders — all published tenders.
    pub fn list_tenders(&self) -> Result<Vec<Tender>, ApiError> {
        let url = format!("{}/tenders", self.base_url);
        let tenders = self.agent.get(&url).call()?.body_mut().read_json()?;
        Ok(tenders)
    }

    /// GET /tenders/{id} — a single tender.
    pub fn find_tender(&self, id: i64) -> Result<Tender, ApiError> {
        let url = format!("{}/tenders/{id}", self.base_url);
        let tender = self.agent.get(&url).call()?.body_mut().read_json()?;
        Ok(tender)
    }

    /// POST /proposal — submit a proposal for a tender. The backend's
    /// success body is not strictly typed; it is returned as raw JSON.
    pub fn create_proposal(&self, proposal: &NewProposal) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/proposal", self.base_url);
        let mut response = self.agent.post(&url).send_json(proposal)?;
        // Tolerate non-JSON success bodies.
        let body = response
            .body_mut()
            .read_json()
            .unwrap_or(serde_json::Value::Null);
        Ok(body)
    }
}
