use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{MapEdge, MapNode, ResultRow};

/// Which endpoint of a factory→market join failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSide {
    Factory,
    Market,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSide::Factory => write!(f, "factory"),
            JoinSide::Market => write!(f, "market"),
        }
    }
}

/// A dropped connection: one endpoint resolved to no known identifier.
///
/// Soft by design — the result row survives, only the edge is lost, and
/// the loss is counted instead of vanishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinFault {
    /// Assignment key the fault belongs to.
    pub market: String,
    pub factory: String,
    pub missing: JoinSide,
}

/// The reconciled plan for one optimization run.
///
/// Replaced atomically per run; consumers never merge two plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledPlan {
    pub results: Vec<ResultRow>,
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_faults: Vec<JoinFault>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opened_factories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_cost: Option<Decimal>,
}

impl ReconciledPlan {
    pub fn join_fault_count(&self) -> usize {
        self.join_faults.len()
    }
}
