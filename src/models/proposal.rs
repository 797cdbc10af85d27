use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};

/// Form input from the proposal page.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalForm {
    pub description: String,
    /// Entered as text, coerced to a number on validation.
    pub offer: String,
    pub csrf_token: String,
}

/// Payload sent to the proposal-creation endpoint. The tender id is copied
/// from the page's loaded tender, never from form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProposal {
    #[serde(rename = "Tender_ID")]
    pub tender_id: i64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Offer")]
    pub offer: f64,
}

impl ProposalForm {
    /// Validate and coerce into a creation payload for `tender_id`.
    /// Returns the collected error messages when any field is invalid.
    pub fn into_payload(&self, tender_id: i64) -> Result<NewProposal, Vec<String>> {
        let description = self.description.trim();
        let offer = self.offer.trim();
        let mut errors = vec![];

        if description.is_empty() {
            errors.push("Description is required".to_string());
        }

        let parsed_offer = if offer.is_empty() {
            errors.push("Offer is required".to_string());
            None
        } else {
            match offer.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    errors.push("Offer must be a number".to_string());
                    None
                }
            }
        };

        match parsed_offer {
            Some(offer) if errors.is_empty() => Ok(NewProposal {
                tender_id,
                description: description.to_string(),
                offer,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug)]
pub enum SubmitError {
    /// A submission for the same tender is already running.
    InFlight,
    Api(ApiError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InFlight => write!(f, "A submission is already in flight"),
            SubmitError::Api(e) => write!(f, "{e}"),
        }
    }
}

/// Single-flight gate around the proposal-creation endpoint.
///
/// The tender id is marked in flight immediately before the request is
/// issued and cleared after it settles, success or failure, so repeated
/// submits cannot create duplicates. No queueing, retry, or cancellation.
#[derive(Clone)]
pub struct Submitter {
    api: ApiClient,
    in_flight: Arc<Mutex<HashSet<i64>>>,
}

impl Submitter {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Whether a submission for the given tender is currently running.
    pub fn is_in_flight(&self, tender_id: i64) -> bool {
        let busy = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        busy.contains(&tender_id)
    }

    pub fn submit(&self, proposal: &NewProposal) -> Result<serde_json::Value, SubmitError> {
        {
            let mut busy = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            if !busy.insert(proposal.tender_id) {
                return Err(SubmitError::InFlight);
            }
        }

        let result = self.api.create_proposal(proposal);

        {
            let mut busy = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            busy.remove(&proposal.tender_id);
        }

        match result {
            Ok(body) => {
                log::info!(
                    "Proposal accepted for tender {}: {}",
                    proposal.tender_id,
                    body
                );
                Ok(body)
            }
            Err(e) => {
                log::error!("Proposal submission failed for tender {}: {}", proposal.tender_id, e);
                Err(SubmitError::Api(e))
            }
        }
    }
}
