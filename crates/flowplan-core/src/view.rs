use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::ResultRow;
use crate::reconcile::outcome::ReconciledPlan;

pub const EXPORT_HEADER: &str = "Factory,Market,Quantity,Cost";

/// Column the result table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Factory,
    Market,
    Quantity,
    Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// View lifecycle. Results keep showing through a failed re-run; only a
/// first-run failure lands back in Empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Empty,
    Loading,
    Populated,
}

/// Token for one optimization run.
///
/// A commit or failure carrying a token from a superseded run is ignored,
/// so a late-arriving outcome can never clobber a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// Aggregates over the unfiltered result set: they describe the whole
/// plan, not the rows currently displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub assignments: usize,
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
    pub avg_cost_per_unit: Decimal,
}

/// Search/sort/aggregate state over the latest reconciled plan.
///
/// Holds the canonical result order as reconciliation produced it; search
/// and sort only shape [`PlanView::visible_rows`], never the plan itself.
#[derive(Debug, Clone)]
pub struct PlanView {
    phase: ViewPhase,
    plan: ReconciledPlan,
    search: String,
    sort_field: SortField,
    sort_direction: SortDirection,
    run_seq: u64,
    pending: Option<u64>,
}

impl Default for PlanView {
    fn default() -> Self {
        Self {
            phase: ViewPhase::Empty,
            plan: ReconciledPlan::default(),
            search: String::new(),
            sort_field: SortField::Factory,
            sort_direction: SortDirection::Asc,
            run_seq: 0,
            pending: None,
        }
    }
}

impl PlanView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view already populated with a reconciled plan.
    pub fn with_plan(plan: ReconciledPlan) -> Self {
        let mut view = Self::default();
        view.plan = plan;
        view.phase = ViewPhase::Populated;
        view
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn plan(&self) -> &ReconciledPlan {
        &self.plan
    }

    /// Start a run. Refused (None) while another run is in flight.
    pub fn begin_run(&mut self) -> Option<RunToken> {
        if self.phase == ViewPhase::Loading {
            return None;
        }
        self.run_seq += 1;
        self.pending = Some(self.run_seq);
        self.phase = ViewPhase::Loading;
        Some(RunToken(self.run_seq))
    }

    /// Commit a successful reconciliation, replacing the whole plan.
    ///
    /// Returns false (and changes nothing) for a stale token.
    pub fn commit(&mut self, token: RunToken, plan: ReconciledPlan) -> bool {
        if self.pending != Some(token.0) {
            tracing::warn!(run = token.0, "stale run outcome dropped");
            return false;
        }
        self.pending = None;
        self.plan = plan;
        self.phase = ViewPhase::Populated;
        true
    }

    /// Record a failed run. Prior results keep showing; a first-run
    /// failure returns to Empty and resets search and sort.
    pub fn fail(&mut self, token: RunToken) -> bool {
        if self.pending != Some(token.0) {
            tracing::warn!(run = token.0, "stale run failure dropped");
            return false;
        }
        self.pending = None;
        if self.plan.results.is_empty() {
            self.reset_controls();
            self.phase = ViewPhase::Empty;
        } else {
            self.phase = ViewPhase::Populated;
        }
        true
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn sort(&self) -> (SortField, SortDirection) {
        (self.sort_field, self.sort_direction)
    }

    /// Toggle direction on the active field, ascending on a new field.
    pub fn sort_by(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = match self.sort_direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.sort_field = field;
        self.sort_direction = direction;
    }

    /// Rows for display: filtered by the search query, then stably
    /// sorted. Filtering happens strictly before sorting.
    pub fn visible_rows(&self) -> Vec<&ResultRow> {
        let query = self.search.to_lowercase();
        let mut rows: Vec<&ResultRow> = self
            .plan
            .results
            .iter()
            .filter(|row| {
                query.is_empty()
                    || row.factory.to_lowercase().contains(&query)
                    || row.market.to_lowercase().contains(&query)
            })
            .collect();
        rows.sort_by(|a, b| compare(a, b, self.sort_field, self.sort_direction));
        rows
    }

    /// Totals always cover the unfiltered set.
    pub fn totals(&self) -> PlanTotals {
        totals_of(&self.plan.results)
    }

    /// Canonical export: unfiltered, unsorted, fixed header, no quoting.
    pub fn export_csv(&self) -> String {
        export_csv(&self.plan.results)
    }

    fn reset_controls(&mut self) {
        self.search.clear();
        self.sort_field = SortField::Factory;
        self.sort_direction = SortDirection::Asc;
    }
}

fn compare(a: &ResultRow, b: &ResultRow, field: SortField, direction: SortDirection) -> Ordering {
    let ordering = match field {
        SortField::Factory => compare_text(&a.factory, &b.factory),
        SortField::Market => compare_text(&a.market, &b.market),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::Cost => a.cost.cmp(&b.cost),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// String columns order case-insensitively.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn totals_of(rows: &[ResultRow]) -> PlanTotals {
    let total_quantity: Decimal = rows.iter().map(|r| r.quantity).sum();
    let total_cost: Decimal = rows.iter().map(|r| r.cost).sum();
    let avg_cost_per_unit = if total_quantity.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / total_quantity
    };
    PlanTotals {
        assignments: rows.len(),
        total_quantity,
        total_cost,
        avg_cost_per_unit,
    }
}

/// Serialize results in canonical order: fixed header, one unquoted line
/// per row.
pub fn export_csv(rows: &[ResultRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    for row in rows {
        lines.push(format!(
            "{},{},{},{}",
            row.factory, row.market, row.quantity, row.cost
        ));
    }
    lines.join("\n")
}
