use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use super::{AssignmentResponse, OptimizationRequest, SolverClient};
use crate::error::FlowplanError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/optimize";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Blocking HTTP client for the optimization service.
///
/// Submits the three original files as one multipart form and validates
/// the JSON body it gets back. A request always terminates: the whole
/// round-trip is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpSolverClient {
    client: Client,
    endpoint: String,
}

impl HttpSolverClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FlowplanError> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FlowplanError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlowplanError::Transport(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl SolverClient for HttpSolverClient {
    fn optimize(&self, request: &OptimizationRequest) -> Result<AssignmentResponse, FlowplanError> {
        let mut form = Form::new();
        for part in &request.parts {
            let file = Part::bytes(part.bytes.clone()).file_name(part.file_name.clone());
            form = form.part(part.field_name, file);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| FlowplanError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlowplanError::Transport(format!(
                "service returned HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| FlowplanError::Transport(e.to_string()))?;
        AssignmentResponse::from_json(&body)
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
