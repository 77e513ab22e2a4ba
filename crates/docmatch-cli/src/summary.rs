use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use docmatch_map::MappingSource;
use docmatch_model::{FieldMatch, FieldStatus, MatchType, RowValidationResult};
use docmatch_schemas::SchemaDefect;

use crate::types::DetectResult;

pub fn print_summary(result: &DetectResult, max_errors: usize) {
    let run = &result.run;
    println!("Input: {}", result.input.display());
    println!(
        "Schema: {} ({}) {} {:.2}%",
        run.schema_name,
        run.document_type,
        source_label(run.source),
        run.match_score
    );
    if let Some(path) = &result.mapping_written {
        println!("Mapping: {}", path.display());
    }
    if let Some(path) = &result.output_written {
        println!("Result: {}", path.display());
    }

    print_candidate_table(result);
    print_field_table(result);
    print_error_table(&run.rows, max_errors);

    let report = &run.report;
    println!(
        "Rows: {} total, {} valid, {} invalid ({:.2}% valid)",
        report.total_rows, report.valid_rows, report.invalid_rows, report.success_rate
    );
    if !result.missing_required.is_empty() {
        eprintln!("Required fields without a column:");
        for field in &result.missing_required {
            eprintln!("- {field}");
        }
    }
}

pub fn print_defects(defects: &[SchemaDefect]) {
    if defects.is_empty() {
        return;
    }
    eprintln!("Schema problems:");
    for defect in defects {
        eprintln!("- {defect}");
    }
}

fn print_candidate_table(result: &DetectResult) {
    let candidates = &result.run.candidates;
    if candidates.len() < 2 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Schema"),
        header_cell("Document type"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for candidate in candidates {
        let selected = candidate.schema_name == result.run.schema_name;
        let name = if selected {
            Cell::new(&candidate.schema_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&candidate.schema_name)
        };
        table.add_row(vec![
            name,
            Cell::new(&candidate.document_type),
            score_cell(candidate.score),
        ]);
    }
    println!("{table}");
}

fn print_field_table(result: &DetectResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Match"),
        header_cell("Score"),
        header_cell("Valid"),
        header_cell("Sample errors"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for found in result.run.field_matches.iter() {
        table.add_row(vec![
            Cell::new(&found.field).add_attribute(Attribute::Bold),
            column_cell(found),
            match_cell(found.match_type),
            score_cell(found.score),
            valid_cell(found),
            example_cell(&found.validation.errors),
        ]);
    }
    println!("{table}");
}

fn print_error_table(rows: &[RowValidationResult], max_errors: usize) {
    let invalid: Vec<&RowValidationResult> = rows.iter().filter(|r| !r.valid).collect();
    if invalid.is_empty() || max_errors == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Status"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for row in invalid.iter().take(max_errors) {
        for outcome in row.errors() {
            table.add_row(vec![
                Cell::new(row.row_id),
                Cell::new(&outcome.field),
                status_cell(outcome.status),
                Cell::new(outcome.errors.join("; ")),
            ]);
        }
    }
    println!();
    println!("Invalid rows:");
    println!("{table}");
    if invalid.len() > max_errors {
        println!("... and {} more", invalid.len() - max_errors);
    }
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn source_label(source: MappingSource) -> &'static str {
    match source {
        MappingSource::Detected => "detected",
        MappingSource::Forced => "forced",
        MappingSource::Manual => "from mapping",
    }
}

fn column_cell(found: &FieldMatch) -> Cell {
    match &found.column {
        Some(column) => Cell::new(column),
        None => dim_cell("-"),
    }
}

fn match_cell(match_type: MatchType) -> Cell {
    match match_type {
        MatchType::None | MatchType::NotMapped => Cell::new(match_type).fg(Color::Red),
        MatchType::Fuzzy | MatchType::ContentValidation => {
            Cell::new(match_type).fg(Color::Yellow)
        }
        _ => Cell::new(match_type).fg(Color::Green),
    }
}

fn score_cell(score: f64) -> Cell {
    let color = if score >= 90.0 {
        Color::Green
    } else if score >= 60.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{score:.2}")).fg(color)
}

fn valid_cell(found: &FieldMatch) -> Cell {
    let summary = &found.validation;
    if summary.total_count == 0 {
        return dim_cell("-");
    }
    let text = format!("{}/{}", summary.valid_count, summary.total_count);
    if summary.all_valid() {
        Cell::new(text).fg(Color::Green)
    } else {
        Cell::new(text).fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn status_cell(status: FieldStatus) -> Cell {
    match status {
        FieldStatus::Match => Cell::new("OK").fg(Color::Green),
        FieldStatus::Mismatch => Cell::new("MISMATCH").fg(Color::Red),
        FieldStatus::MissingData => Cell::new("MISSING DATA").fg(Color::Yellow),
        FieldStatus::MissingColumn => Cell::new("NO COLUMN")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn example_cell(errors: &[String]) -> Cell {
    match errors.first() {
        Some(first) if errors.len() > 1 => Cell::new(format!("{first} (+{})", errors.len() - 1)),
        Some(first) => Cell::new(first),
        None => dim_cell("-"),
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
