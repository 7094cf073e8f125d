pub mod error;
pub mod ingest;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod solver;
pub mod view;

use error::FlowplanError;
use model::Role;
use reconcile::outcome::ReconciledPlan;
use registry::DatasetRegistry;
use solver::{OptimizationRequest, SolverClient};

/// Main API entry point: run one optimization round against a ready
/// registry and reconcile the response into a plan.
///
/// Refuses before any network activity when a dataset is missing. Service
/// and transport faults surface as errors; the caller decides what keeps
/// showing (a failed re-run preserves the previous plan).
pub fn run_optimization(
    registry: &DatasetRegistry,
    client: &dyn SolverClient,
) -> Result<ReconciledPlan, FlowplanError> {
    let request = OptimizationRequest::from_registry(registry)?;

    tracing::info!(
        backend = client.backend_name(),
        "submitting optimization request"
    );
    let response = client.optimize(&request)?;

    let (sites, markets) = match (registry.get(Role::Sites), registry.get(Role::Markets)) {
        (Some(sites), Some(markets)) => (&sites.sheet, &markets.sheet),
        _ => return Err(FlowplanError::NotReady("sites, markets".into())),
    };

    Ok(reconcile::reconcile(&response, sites, markets))
}
