pub mod optimize;
pub mod parse;
pub mod report;

use flowplan_core::view::{PlanView, SortDirection, SortField};

/// Apply the shared search/sort flags to a populated view.
pub fn apply_view_controls(
    view: &mut PlanView,
    search: Option<String>,
    sort: Option<(SortField, SortDirection)>,
) {
    if let Some(query) = search {
        view.set_search(query);
    }
    if let Some((field, direction)) = sort {
        view.set_sort(field, direction);
    }
}
