use std::path::{Path, PathBuf};
use std::time::Duration;

use flowplan_core::error::FlowplanError;
use flowplan_core::ingest;
use flowplan_core::model::Role;
use flowplan_core::registry::{DatasetRegistry, SourceFile};
use flowplan_core::solver::http::HttpSolverClient;
use flowplan_core::view::{PlanView, SortDirection, SortField};

use crate::output;

pub struct OptimizeArgs {
    pub sites: PathBuf,
    pub markets: PathBuf,
    pub transport: PathBuf,
    pub endpoint: String,
    pub timeout: u64,
    pub output: String,
    pub out: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub search: Option<String>,
    pub sort: Option<(SortField, SortDirection)>,
}

pub fn run(args: OptimizeArgs) -> Result<(), FlowplanError> {
    let mut registry = DatasetRegistry::new();
    load_into(&mut registry, Role::Sites, &args.sites)?;
    load_into(&mut registry, Role::Markets, &args.markets)?;
    load_into(&mut registry, Role::Transport, &args.transport)?;

    let client =
        HttpSolverClient::with_timeout(args.endpoint.as_str(), Duration::from_secs(args.timeout))?;
    let plan = flowplan_core::run_optimization(&registry, &client)?;

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(&plan)?;
        std::fs::write(path, json)?;
        eprintln!("Plan written to {}", path.display());
    }

    let mut view = PlanView::with_plan(plan);
    crate::commands::apply_view_controls(&mut view, args.search, args.sort);

    if let Some(path) = &args.export {
        std::fs::write(path, view.export_csv())?;
        eprintln!("Results exported to {}", path.display());
    }

    match args.output.as_str() {
        "json" => output::json::print_plan(view.plan())?,
        _ => output::table::print_plan(&view),
    }

    if !view.plan().join_faults.is_empty() {
        eprintln!(
            "  {} connection(s) skipped during reconciliation",
            view.plan().join_fault_count()
        );
    }

    Ok(())
}

fn load_into(
    registry: &mut DatasetRegistry,
    role: Role,
    path: &Path,
) -> Result<(), FlowplanError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sheet = ingest::decode_file(&name, &bytes)?;
    registry.set(role, SourceFile { name, bytes }, sheet);
    Ok(())
}
