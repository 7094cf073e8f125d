use std::path::PathBuf;

use flowplan_core::error::FlowplanError;
use flowplan_core::reconcile::outcome::ReconciledPlan;
use flowplan_core::view::{PlanView, SortDirection, SortField};

use crate::output;

pub fn run(
    plan_file: PathBuf,
    output_format: &str,
    export: Option<PathBuf>,
    search: Option<String>,
    sort: Option<(SortField, SortDirection)>,
) -> Result<(), FlowplanError> {
    let bytes = std::fs::read(&plan_file)?;
    let plan: ReconciledPlan = serde_json::from_slice(&bytes)?;

    let mut view = PlanView::with_plan(plan);
    crate::commands::apply_view_controls(&mut view, search, sort);

    if let Some(path) = &export {
        std::fs::write(path, view.export_csv())?;
        eprintln!("Results exported to {}", path.display());
    }

    match output_format {
        "json" => output::json::print_plan(view.plan())?,
        _ => output::table::print_plan(&view),
    }

    Ok(())
}
