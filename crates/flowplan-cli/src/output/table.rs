use flowplan_core::model::{DecodedSheet, RawRow};
use flowplan_core::view::PlanView;

/// Render a decoded sheet: columns plus the bounded preview.
pub fn print_sheet(name: &str, sheet: &DecodedSheet) {
    println!("=== {name} ===\n");

    if sheet.rows.is_empty() {
        println!("  (no data rows)");
        return;
    }

    println!(
        "  {} row(s), {} column(s)\n",
        sheet.rows.len(),
        sheet.columns.len()
    );

    let preview = sheet.preview();
    let widths: Vec<usize> = sheet
        .columns
        .iter()
        .map(|column| {
            preview
                .iter()
                .map(|row| cell_text(row, column).len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = sheet
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{column:<w$}", w = *width))
        .collect();
    println!("  {}", header.join("  "));

    for row in preview {
        let cells: Vec<String> = sheet
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{:<w$}", cell_text(row, column), w = *width))
            .collect();
        println!("  {}", cells.join("  "));
    }

    if sheet.rows.len() > preview.len() {
        println!("\n  ... {} more row(s)", sheet.rows.len() - preview.len());
    }
}

/// Render a reconciled plan: summary metrics, then the visible rows.
pub fn print_plan(view: &PlanView) {
    let plan = view.plan();
    let totals = view.totals();

    println!("=== Optimization Results ===\n");
    println!("  Assignments:    {}", totals.assignments);
    println!("  Total demand:   {}", totals.total_quantity);
    println!("  Total cost:     {}", totals.total_cost);
    println!("  Avg cost/unit:  {:.2}", totals.avg_cost_per_unit);
    if let Some(cost) = plan.objective_cost {
        println!("  Objective:      {cost}");
    }
    if !plan.opened_factories.is_empty() {
        println!("  Opened sites:   {}", plan.opened_factories.join(", "));
    }
    if !plan.join_faults.is_empty() {
        println!("  Skipped links:  {}", plan.join_fault_count());
    }
    println!();

    let rows = view.visible_rows();
    if rows.is_empty() {
        if plan.results.is_empty() {
            println!("  No results yet — upload files and run optimization");
        } else {
            println!("  No matching results");
        }
        return;
    }

    let factory_width = rows
        .iter()
        .map(|r| r.factory.len())
        .chain(std::iter::once("Factory".len()))
        .max()
        .unwrap_or(0);
    let market_width = rows
        .iter()
        .map(|r| r.market.len())
        .chain(std::iter::once("Market".len()))
        .max()
        .unwrap_or(0);

    println!(
        "  {:<factory_width$}  {:<market_width$}  {:>10}  {:>12}",
        "Factory", "Market", "Quantity", "Cost"
    );
    for row in &rows {
        println!(
            "  {:<factory_width$}  {:<market_width$}  {:>10}  {:>12}",
            row.factory,
            row.market,
            row.quantity.to_string(),
            row.cost.to_string()
        );
    }

    if !plan.join_faults.is_empty() {
        println!("\n  Skipped connections:");
        for fault in &plan.join_faults {
            println!(
                "    {} -> {}  (unknown {})",
                fault.factory, fault.market, fault.missing
            );
        }
    }
}

fn cell_text(row: &RawRow, column: &str) -> String {
    row.get(column).map(ToString::to_string).unwrap_or_default()
}
