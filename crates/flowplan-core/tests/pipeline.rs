//! Integration tests for the upload → optimize → reconcile pipeline.
//!
//! Uses a MockSolver implementing the SolverClient boundary, so no
//! optimization service is needed; xlsx fixtures are built in memory.

use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal_macros::dec;
use rust_xlsxwriter::Workbook;

use flowplan_core::error::FlowplanError;
use flowplan_core::ingest;
use flowplan_core::model::{NodeKind, Role};
use flowplan_core::registry::{DatasetRegistry, SourceFile};
use flowplan_core::run_optimization;
use flowplan_core::solver::{AssignmentResponse, OptimizationRequest, SolverClient};
use flowplan_core::view::PlanView;

struct MockSolver {
    body: &'static str,
    called: AtomicBool,
}

impl MockSolver {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            called: AtomicBool::new(false),
        }
    }

    fn was_called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }
}

impl SolverClient for MockSolver {
    fn optimize(
        &self,
        _request: &OptimizationRequest,
    ) -> Result<AssignmentResponse, FlowplanError> {
        self.called.store(true, Ordering::SeqCst);
        AssignmentResponse::from_json(self.body.as_bytes())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn sheet_bytes(header: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            match value.parse::<f64>() {
                Ok(n) => sheet.write_number((r + 1) as u32, c as u16, n).unwrap(),
                Err(_) => sheet.write_string((r + 1) as u32, c as u16, *value).unwrap(),
            };
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn load(registry: &mut DatasetRegistry, role: Role, name: &str, bytes: Vec<u8>) {
    let sheet = ingest::decode_file(name, &bytes).unwrap();
    registry.set(
        role,
        SourceFile {
            name: name.to_string(),
            bytes,
        },
        sheet,
    );
}

fn ready_registry() -> DatasetRegistry {
    let mut registry = DatasetRegistry::new();
    load(
        &mut registry,
        Role::Sites,
        "sites.xlsx",
        sheet_bytes(
            &["id", "name", "lat", "lng", "capacity", "fixed_cost"],
            &[
                &["F1", "Factory A", "40.7", "-74.0", "1000", "50000"],
                &["F2", "Factory B", "34.0", "-118.2", "800", "45000"],
            ],
        ),
    );
    load(
        &mut registry,
        Role::Markets,
        "markets.xlsx",
        sheet_bytes(
            &["id", "name", "lat", "lng", "demand"],
            &[
                &["M1", "Market 1", "41.8", "-87.6", "500"],
                &["M2", "Market 2", "29.7", "-95.3", "300"],
            ],
        ),
    );
    load(
        &mut registry,
        Role::Transport,
        "transport.csv",
        b"from,to,cost_per_unit\nF1,M1,25\nF1,M2,30\nF2,M1,28\n".to_vec(),
    );
    registry
}

// ---------------------------------------------------------------------------
// Test 1: worked example — both joins resolve, one edge per assignment
// ---------------------------------------------------------------------------
#[test]
fn full_pipeline_worked_example() {
    let registry = ready_registry();
    let solver = MockSolver::new(
        r#"{
            "assignations": {
                "M1": {"factory": "Factory A", "demand": 500, "cost": 12500}
            },
            "usines_ouvertes": ["Factory A"],
            "cout_total": 62500
        }"#,
    );

    let plan = run_optimization(&registry, &solver).unwrap();

    assert_eq!(plan.results.len(), 1);
    let row = &plan.results[0];
    assert_eq!(row.id, "M1");
    assert_eq!(row.factory, "Factory A");
    assert_eq!(row.market, "M1");
    assert_eq!(row.quantity, dec!(500));
    assert_eq!(row.cost, dec!(12500));

    assert_eq!(plan.edges.len(), 1);
    assert_eq!(plan.edges[0].from, "F1");
    assert_eq!(plan.edges[0].to, "M1");
    assert_eq!(plan.edges[0].quantity, dec!(500));
    assert!(plan.join_faults.is_empty());

    assert_eq!(plan.opened_factories, vec!["Factory A"]);
    assert_eq!(plan.objective_cost, Some(dec!(62500)));
}

// ---------------------------------------------------------------------------
// Test 2: unknown factory name — row survives, edge dropped, fault counted
// ---------------------------------------------------------------------------
#[test]
fn unknown_factory_is_a_soft_join_fault() {
    let registry = ready_registry();
    let solver = MockSolver::new(
        r#"{
            "assignations": {
                "M1": {"factory": "Factory A", "demand": 500, "cost": 12500},
                "M2": {"factory": "Unknown Factory", "demand": 300, "cost": 9000}
            }
        }"#,
    );

    let plan = run_optimization(&registry, &solver).unwrap();

    assert_eq!(plan.results.len(), 2);
    assert_eq!(plan.edges.len(), 1);
    assert_eq!(plan.join_fault_count(), 1);
    assert_eq!(plan.join_faults[0].market, "M2");
    assert_eq!(plan.join_faults[0].factory, "Unknown Factory");
}

// ---------------------------------------------------------------------------
// Test 3: not ready — refused before the solver is ever reached
// ---------------------------------------------------------------------------
#[test]
fn missing_dataset_refuses_before_any_network_use() {
    let mut registry = ready_registry();
    registry.clear(Role::Transport);

    let solver = MockSolver::new("{}");
    let err = run_optimization(&registry, &solver).unwrap_err();

    match err {
        FlowplanError::NotReady(missing) => assert_eq!(missing, "transport"),
        other => panic!("expected NotReady, got {other:?}"),
    }
    assert!(!solver.was_called());
}

// ---------------------------------------------------------------------------
// Test 4: service error — surfaced verbatim, prior plan preserved
// ---------------------------------------------------------------------------
#[test]
fn service_error_preserves_the_previous_plan() {
    let registry = ready_registry();

    let ok_solver = MockSolver::new(
        r#"{"assignations": {"M1": {"factory": "Factory A", "demand": 500, "cost": 12500}}}"#,
    );
    let failing_solver = MockSolver::new(r#"{"error": "No feasible solution found"}"#);

    let mut view = PlanView::new();
    let token = view.begin_run().unwrap();
    let plan = run_optimization(&registry, &ok_solver).unwrap();
    assert!(view.commit(token, plan));

    let token = view.begin_run().unwrap();
    match run_optimization(&registry, &failing_solver) {
        Err(FlowplanError::Service(message)) => {
            assert_eq!(message, "No feasible solution found");
            assert!(view.fail(token));
        }
        other => panic!("expected Service fault, got {other:?}"),
    }

    // The failed re-run left the first plan showing.
    assert_eq!(view.plan().results.len(), 1);
    assert_eq!(view.plan().results[0].factory, "Factory A");
}

// ---------------------------------------------------------------------------
// Test 5: response with neither assignations nor error is a fault
// ---------------------------------------------------------------------------
#[test]
fn shapeless_response_is_a_service_fault() {
    let registry = ready_registry();
    let solver = MockSolver::new(r#"{"status": 3}"#);

    assert!(matches!(
        run_optimization(&registry, &solver),
        Err(FlowplanError::Service(_))
    ));
}

// ---------------------------------------------------------------------------
// Test 6: mixed xlsx/csv uploads land in one coherent plan
// ---------------------------------------------------------------------------
#[test]
fn csv_and_xlsx_datasets_mix() {
    let mut registry = DatasetRegistry::new();
    load(
        &mut registry,
        Role::Sites,
        "sites.csv",
        b"id,name,lat,lng\nF1,Factory A,40.7,-74.0\n".to_vec(),
    );
    load(
        &mut registry,
        Role::Markets,
        "markets.xlsx",
        sheet_bytes(
            &["id", "name", "demand"],
            &[&["M1", "Market 1", "500"]],
        ),
    );
    load(
        &mut registry,
        Role::Transport,
        "transport.csv",
        b"from,to,cost_per_unit\nF1,M1,25\n".to_vec(),
    );

    let solver = MockSolver::new(
        r#"{"assignations": {"M1": {"factory": "Factory A", "demand": 500, "cost": 12500}}}"#,
    );
    let plan = run_optimization(&registry, &solver).unwrap();

    assert_eq!(plan.edges.len(), 1);
    assert_eq!(plan.edges[0].from, "F1");
    assert_eq!(plan.edges[0].to, "M1");

    let factory = plan
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Factory)
        .unwrap();
    assert_eq!(factory.id, "F1");
    assert!((factory.lat - 40.7).abs() < 1e-9);

    let market = plan
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Market)
        .unwrap();
    assert_eq!(market.is_served, Some(true));
}

// ---------------------------------------------------------------------------
// Test 7: view over a reconciled plan — totals, export, filtering
// ---------------------------------------------------------------------------
#[test]
fn view_totals_and_export_over_a_reconciled_plan() {
    let registry = ready_registry();
    let solver = MockSolver::new(
        r#"{
            "assignations": {
                "M1": {"factory": "Factory A", "demand": 500, "cost": 12500},
                "M2": {"factory": "Factory B", "demand": 300, "cost": 9000}
            }
        }"#,
    );

    let plan = run_optimization(&registry, &solver).unwrap();
    let mut view = PlanView::with_plan(plan);

    let totals = view.totals();
    assert_eq!(totals.assignments, 2);
    assert_eq!(totals.total_quantity, dec!(800));
    assert_eq!(totals.total_cost, dec!(21500));
    assert_eq!(totals.avg_cost_per_unit, dec!(26.875));

    view.set_search("factory b");
    assert_eq!(view.visible_rows().len(), 1);
    // Export stays canonical no matter the view state.
    assert_eq!(
        view.export_csv(),
        "Factory,Market,Quantity,Cost\nFactory A,M1,500,12500\nFactory B,M2,300,9000"
    );
}
