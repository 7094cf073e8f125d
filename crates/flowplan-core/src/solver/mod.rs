pub mod http;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FlowplanError;
use crate::model::Role;
use crate::registry::DatasetRegistry;

/// One file payload of the outbound optimization request.
#[derive(Debug, Clone)]
pub struct RequestPart {
    pub field_name: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The outbound request: the three original upload payloads.
///
/// Built fresh for every run and never persisted. Carries the raw files,
/// not the decoded rows — previews are a UI concern and must not diverge
/// from what the service actually receives.
#[derive(Debug, Clone)]
pub struct OptimizationRequest {
    pub parts: Vec<RequestPart>,
}

impl OptimizationRequest {
    /// Assemble the request from the registry.
    ///
    /// Refuses with NotReady, naming every unset role, before any network
    /// activity can happen.
    pub fn from_registry(registry: &DatasetRegistry) -> Result<Self, FlowplanError> {
        let mut parts = Vec::with_capacity(Role::ALL.len());
        let mut missing = Vec::new();

        for role in Role::ALL {
            match registry.get(role) {
                Some(dataset) => parts.push(RequestPart {
                    field_name: role.field_name(),
                    file_name: dataset.file.name.clone(),
                    bytes: dataset.file.bytes.clone(),
                }),
                None => missing.push(role.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(FlowplanError::NotReady(missing.join(", ")));
        }
        Ok(Self { parts })
    }
}

/// One assignment entry as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub factory: String,
    pub demand: Decimal,
    pub cost: Decimal,
}

/// The raw response body, loosely shaped on purpose.
///
/// Validated into [`AssignmentResponse`] at the boundary so nothing
/// untyped travels further into the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub assignations: Option<BTreeMap<String, Assignment>>,
    #[serde(default, rename = "usines_ouvertes")]
    pub opened_factories: Option<Vec<String>>,
    #[serde(default, rename = "cout_total")]
    pub objective_cost: Option<Decimal>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A validated optimization response (the success shape only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub assignations: BTreeMap<String, Assignment>,
    #[serde(default)]
    pub opened_factories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_cost: Option<Decimal>,
}

impl AssignmentResponse {
    /// Validate a wire body: an explicit error wins, then the assignment
    /// map is required; any other shape is a service fault.
    pub fn from_wire(wire: WireResponse) -> Result<Self, FlowplanError> {
        if let Some(message) = wire.error {
            return Err(FlowplanError::Service(message));
        }
        match wire.assignations {
            Some(assignations) => Ok(Self {
                assignations,
                opened_factories: wire.opened_factories.unwrap_or_default(),
                objective_cost: wire.objective_cost,
            }),
            None => Err(FlowplanError::Service(
                "response carried neither assignations nor an error".into(),
            )),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, FlowplanError> {
        let wire: WireResponse = serde_json::from_slice(bytes)
            .map_err(|e| FlowplanError::Service(format!("malformed response body: {e}")))?;
        Self::from_wire(wire)
    }
}

/// Boundary to the optimization service.
pub trait SolverClient: Send + Sync {
    /// Submit a request and return the validated response.
    fn optimize(&self, request: &OptimizationRequest) -> Result<AssignmentResponse, FlowplanError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
