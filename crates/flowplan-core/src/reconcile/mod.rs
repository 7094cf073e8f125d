pub mod index;
pub mod outcome;

use rust_decimal::prelude::ToPrimitive;

use crate::model::{row_value, DecodedSheet, MapEdge, MapNode, NodeKind, RawRow, ResultRow};
use crate::solver::AssignmentResponse;
use index::RefIndex;
use outcome::{JoinFault, JoinSide, ReconciledPlan};

const LAT_COLUMNS: &[&str] = &["lat", "latitude"];
const LNG_COLUMNS: &[&str] = &["lng", "lon", "longitude"];

/// Join an optimization response against the uploaded reference datasets.
///
/// Produces one ResultRow per assignment entry, map nodes from the
/// datasets, and one edge per assignment whose factory and market both
/// resolve to stored identifiers. A failed lookup drops the edge and
/// records a JoinFault; it never fails the run. Reconciliation is pure:
/// identical inputs give identical plans.
pub fn reconcile(
    response: &AssignmentResponse,
    sites: &DecodedSheet,
    markets: &DecodedSheet,
) -> ReconciledPlan {
    let site_index = RefIndex::from_sheet(sites);
    let market_index = RefIndex::from_sheet(markets);
    reconcile_with(response, sites, markets, &site_index, &market_index)
}

/// Same as [`reconcile`] with caller-provided lookup tables.
pub fn reconcile_with(
    response: &AssignmentResponse,
    sites: &DecodedSheet,
    markets: &DecodedSheet,
    site_index: &RefIndex,
    market_index: &RefIndex,
) -> ReconciledPlan {
    let mut results = Vec::with_capacity(response.assignations.len());
    let mut edges = Vec::new();
    let mut join_faults = Vec::new();

    for (market_key, assignment) in &response.assignations {
        let row = ResultRow {
            id: market_key.clone(),
            factory: assignment.factory.clone(),
            market: market_key.clone(),
            quantity: assignment.demand,
            cost: assignment.cost,
        };

        match (
            site_index.resolve(&row.factory),
            market_index.resolve(&row.market),
        ) {
            (Some(from), Some(to)) => edges.push(MapEdge {
                from: from.to_string(),
                to: to.to_string(),
                quantity: row.quantity,
            }),
            (from, _) => {
                let missing = if from.is_none() {
                    JoinSide::Factory
                } else {
                    JoinSide::Market
                };
                tracing::warn!(
                    factory = %row.factory,
                    market = %row.market,
                    missing = %missing,
                    "connection skipped: endpoint did not resolve"
                );
                join_faults.push(JoinFault {
                    market: row.market.clone(),
                    factory: row.factory.clone(),
                    missing,
                });
            }
        }

        results.push(row);
    }

    let nodes = build_nodes(sites, markets, response);

    tracing::debug!(
        results = results.len(),
        edges = edges.len(),
        join_faults = join_faults.len(),
        "reconciliation complete"
    );

    ReconciledPlan {
        results,
        nodes,
        edges,
        join_faults,
        opened_factories: response.opened_factories.clone(),
        objective_cost: response.objective_cost,
    }
}

/// Map nodes come from the uploaded rows; the response only decorates
/// them (opened factories, served markets).
fn build_nodes(
    sites: &DecodedSheet,
    markets: &DecodedSheet,
    response: &AssignmentResponse,
) -> Vec<MapNode> {
    let mut nodes = Vec::new();

    for row in &sites.rows {
        if let Some(mut node) = node_from_row(row, NodeKind::Factory) {
            // An empty opened list means the service did not report one.
            if !response.opened_factories.is_empty() {
                let open = response
                    .opened_factories
                    .iter()
                    .any(|f| f.eq_ignore_ascii_case(&node.name) || f == &node.id);
                node.is_open = Some(open);
            }
            nodes.push(node);
        }
    }

    for row in &markets.rows {
        if let Some(mut node) = node_from_row(row, NodeKind::Market) {
            let served = response
                .assignations
                .keys()
                .any(|k| k.eq_ignore_ascii_case(&node.name) || k == &node.id);
            node.is_served = Some(served);
            nodes.push(node);
        }
    }

    nodes
}

fn node_from_row(row: &RawRow, kind: NodeKind) -> Option<MapNode> {
    let (id, name) = index::identify(row)?;
    Some(MapNode {
        id,
        name,
        lat: coordinate(row, LAT_COLUMNS),
        lng: coordinate(row, LNG_COLUMNS),
        kind,
        is_open: None,
        is_served: None,
    })
}

fn coordinate(row: &RawRow, candidates: &[&str]) -> f64 {
    row_value(row, candidates)
        .and_then(|v| v.as_decimal())
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use crate::solver::Assignment;
    use rust_decimal_macros::dec;

    fn sheet(rows: &[&[(&str, &str)]]) -> DecodedSheet {
        DecodedSheet {
            columns: rows
                .first()
                .map(|r| r.iter().map(|(k, _)| k.to_string()).collect())
                .unwrap_or_default(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|(k, v)| (k.to_string(), CellValue::Text(v.to_string())))
                        .collect()
                })
                .collect(),
        }
    }

    fn response(entries: &[(&str, &str, i64, i64)]) -> AssignmentResponse {
        AssignmentResponse {
            assignations: entries
                .iter()
                .map(|(market, factory, demand, cost)| {
                    (
                        market.to_string(),
                        Assignment {
                            factory: factory.to_string(),
                            demand: rust_decimal::Decimal::from(*demand),
                            cost: rust_decimal::Decimal::from(*cost),
                        },
                    )
                })
                .collect(),
            opened_factories: Vec::new(),
            objective_cost: None,
        }
    }

    #[test]
    fn resolved_joins_emit_edges() {
        let sites = sheet(&[&[("id", "F1"), ("name", "Factory A")]]);
        let markets = sheet(&[&[("id", "M1"), ("name", "Market 1")]]);
        let plan = reconcile(&response(&[("M1", "Factory A", 500, 12500)]), &sites, &markets);

        assert_eq!(plan.results.len(), 1);
        assert_eq!(plan.results[0].id, "M1");
        assert_eq!(plan.results[0].market, "M1");
        assert_eq!(plan.results[0].factory, "Factory A");
        assert_eq!(
            plan.edges,
            vec![MapEdge {
                from: "F1".into(),
                to: "M1".into(),
                quantity: dec!(500),
            }]
        );
        assert!(plan.join_faults.is_empty());
    }

    #[test]
    fn unresolved_factory_drops_edge_but_keeps_row() {
        let sites = sheet(&[&[("id", "F1"), ("name", "Factory A")]]);
        let markets = sheet(&[&[("id", "M2"), ("name", "Market 2")]]);
        let plan = reconcile(
            &response(&[("M2", "Unknown Factory", 300, 9000)]),
            &sites,
            &markets,
        );

        assert_eq!(plan.results.len(), 1);
        assert_eq!(plan.results[0].id, "M2");
        assert!(plan.edges.is_empty());
        assert_eq!(plan.join_fault_count(), 1);
        assert_eq!(plan.join_faults[0].missing, JoinSide::Factory);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let sites = sheet(&[
            &[("id", "F1"), ("name", "Factory A")],
            &[("id", "F2"), ("name", "Factory B")],
        ]);
        let markets = sheet(&[
            &[("id", "M1"), ("name", "Market 1")],
            &[("id", "M2"), ("name", "Market 2")],
        ]);
        let resp = response(&[
            ("M1", "Factory A", 500, 12500),
            ("M2", "Factory B", 300, 9000),
        ]);

        let first = reconcile(&resp, &sites, &markets);
        let second = reconcile(&resp, &sites, &markets);
        assert_eq!(first, second);
    }

    #[test]
    fn nodes_are_decorated_from_the_response() {
        let sites = sheet(&[
            &[("id", "F1"), ("name", "Factory A"), ("lat", "40.7"), ("lng", "-74.0")],
            &[("id", "F2"), ("name", "Factory B"), ("lat", "34.0"), ("lng", "-118.2")],
        ]);
        let markets = sheet(&[&[("id", "M1"), ("name", "Market 1")]]);

        let mut resp = response(&[("M1", "Factory A", 500, 12500)]);
        resp.opened_factories = vec!["Factory A".to_string()];

        let plan = reconcile(&resp, &sites, &markets);
        assert_eq!(plan.nodes.len(), 3);

        let f1 = plan.nodes.iter().find(|n| n.id == "F1").unwrap();
        assert_eq!(f1.kind, NodeKind::Factory);
        assert_eq!(f1.is_open, Some(true));
        assert!((f1.lat - 40.7).abs() < 1e-9);

        let f2 = plan.nodes.iter().find(|n| n.id == "F2").unwrap();
        assert_eq!(f2.is_open, Some(false));

        let m1 = plan.nodes.iter().find(|n| n.id == "M1").unwrap();
        assert_eq!(m1.kind, NodeKind::Market);
        assert_eq!(m1.is_served, Some(true));
    }
}
