use flowplan_core::error::FlowplanError;
use flowplan_core::reconcile::outcome::ReconciledPlan;

pub fn print_plan(plan: &ReconciledPlan) -> Result<(), FlowplanError> {
    let json = serde_json::to_string_pretty(plan)?;
    println!("{json}");
    Ok(())
}
