use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use feed_model::Severity;

use feed_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    let outcome = &result.outcome;
    println!("Input: {}", result.input.display());
    match (&result.location, result.dry_run) {
        (Some(location), false) => println!("Feed: {}", location.uri),
        (Some(_), true) => println!("Feed: not written (dry run)"),
        (None, _) if outcome.is_blocked() => println!("Feed: blocked by validation errors"),
        (None, _) => {}
    }
    if let Some(digest) = outcome.digest() {
        println!("SHA-256: {digest}");
    }
    if let Some(path) = &result.report_path {
        println!("Issue report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Rejected"),
        header_cell("Complexes"),
        header_cell("Buildings"),
        header_cell("Units"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Feed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);
    table.add_row(vec![
        Cell::new(outcome.rows_read),
        count_cell(outcome.rejected_rows, Color::Red),
        Cell::new(outcome.catalog.complexes.len()),
        Cell::new(outcome.catalog.building_count()),
        Cell::new(outcome.records()),
        count_cell(outcome.report.error_count(), Color::Red),
        count_cell(outcome.report.warning_count(), Color::Yellow),
        feed_cell(result),
    ]);
    println!("{table}");

    print_field_error_table(result);
    print_kind_table(result);
    print_issue_table(result);
}

fn print_kind_table(result: &RunResult) {
    let report = &result.outcome.report;
    let counts = report.counts_by_kind();
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Severity"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for (kind, count) in counts {
        // One policy grades every issue of a kind the same way.
        let severity = report
            .issues
            .iter()
            .find(|issue| issue.kind == kind)
            .map_or_else(|| kind.default_severity(), |issue| issue.severity);
        table.add_row(vec![
            Cell::new(kind.code()),
            severity_cell(severity),
            Cell::new(count),
        ]);
    }
    println!();
    println!("Issues by kind:");
    println!("{table}");
}

fn print_field_error_table(result: &RunResult) {
    let errors = &result.outcome.field_errors;
    if errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in errors {
        table.add_row(vec![
            Cell::new(error.row),
            Cell::new(&error.field),
            Cell::new(&error.value).fg(Color::Red),
            Cell::new(&error.message),
        ]);
    }
    println!();
    println!("Rejected rows:");
    println!("{table}");
}

fn print_issue_table(result: &RunResult) {
    let issues = &result.outcome.report.issues;
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Scope"),
        header_cell("Location"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.kind.code()),
            dim_cell(issue.scope.label()),
            Cell::new(issue.source_ref.to_string()),
            Cell::new(issue.field.as_deref().unwrap_or("-")),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(30)),
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn feed_cell(result: &RunResult) -> Cell {
    if result.outcome.is_blocked() {
        Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
    } else if result.location.is_some() && !result.dry_run {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
