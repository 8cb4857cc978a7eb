use std::rc::Rc;

use futures::future::LocalBoxFuture;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use crate::lead_form::LeadPayload;
use crate::random::RandomSource;

pub const MOCK_DELAY_MS: u32 = 1_500;
pub const MOCK_FAILURE_RATE: f64 = 0.1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Network error. Please try again.")]
    Network,
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Rejected { message: String },
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Whoever ends up receiving the lead.
pub trait LeadSubmitter {
    fn submit(&self, payload: LeadPayload) -> LocalBoxFuture<'static, Result<SubmitReceipt, SubmitError>>;
}

/// Stand-in collaborator: waits a moment and usually succeeds.
pub struct MockSubmitter {
    delay_ms: u32,
    failure_rate: f64,
    random: Rc<dyn RandomSource>,
}

impl MockSubmitter {
    pub fn new(random: Rc<dyn RandomSource>) -> Self {
        Self {
            delay_ms: MOCK_DELAY_MS,
            failure_rate: MOCK_FAILURE_RATE,
            random,
        }
    }

    fn settle(roll: f64, failure_rate: f64) -> Result<SubmitReceipt, SubmitError> {
        if roll > failure_rate {
            Ok(SubmitReceipt {
                message: "Form submitted successfully".to_string(),
            })
        } else {
            Err(SubmitError::Network)
        }
    }
}

impl LeadSubmitter for MockSubmitter {
    fn submit(&self, payload: LeadPayload) -> LocalBoxFuture<'static, Result<SubmitReceipt, SubmitError>> {
        let delay_ms = self.delay_ms;
        let failure_rate = self.failure_rate;
        let roll = self.random.next_f64();
        Box::pin(async move {
            log::debug!("mock submission for tariff {}", payload.tariff);
            gloo_timers::future::TimeoutFuture::new(delay_ms).await;
            Self::settle(roll, failure_rate)
        })
    }
}

/// Posts the lead as JSON to a configured endpoint.
pub struct HttpSubmitter {
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl LeadSubmitter for HttpSubmitter {
    fn submit(&self, payload: LeadPayload) -> LocalBoxFuture<'static, Result<SubmitReceipt, SubmitError>> {
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            let request = Request::post(&endpoint)
                .json(&payload)
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            let response = request
                .send()
                .await
                .map_err(|e| SubmitError::Transport(e.to_string()))?;

            if response.ok() {
                // An empty or non-JSON 2xx body still counts as accepted.
                Ok(response.json::<SubmitReceipt>().await.unwrap_or_default())
            } else {
                let status = response.status();
                log::warn!("lead endpoint answered with status {}", status);
                let message = match response.json::<ErrorResponse>().await {
                    Ok(body) => body.error,
                    Err(_) => format!("Server responded with status {}", status),
                };
                Err(SubmitError::Rejected { message })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_fails_roughly_one_in_ten() {
        assert!(MockSubmitter::settle(0.95, MOCK_FAILURE_RATE).is_ok());
        assert!(MockSubmitter::settle(0.11, MOCK_FAILURE_RATE).is_ok());
        assert_eq!(
            MockSubmitter::settle(0.1, MOCK_FAILURE_RATE),
            Err(SubmitError::Network)
        );
        assert!(MockSubmitter::settle(0.0, MOCK_FAILURE_RATE).is_err());
    }

    #[test]
    fn errors_read_well_to_users() {
        assert_eq!(SubmitError::Network.to_string(), "Network error. Please try again.");
        assert_eq!(
            SubmitError::Rejected {
                message: "phone already registered".into()
            }
            .to_string(),
            "phone already registered"
        );
        assert_eq!(
            SubmitError::Transport("offline".into()).to_string(),
            "Request failed: offline"
        );
    }

    #[test]
    fn payload_serializes_with_lowercase_tariff() {
        let payload = LeadPayload {
            name: "Ivan".into(),
            phone: "+7 (123) 456-78-90".into(),
            tariff: crate::lead_form::Tariff::Premium,
        };
        let json = serde_json::to_value(&payload).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ivan",
                "phone": "+7 (123) 456-78-90",
                "tariff": "premium"
            })
        );
    }

    #[test]
    fn receipt_tolerates_missing_message() {
        let receipt: SubmitReceipt = serde_json::from_str("{}").expect("decodes");
        assert_eq!(receipt, SubmitReceipt::default());
    }
}
