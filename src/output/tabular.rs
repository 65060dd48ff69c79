//! Tabular output: one `;`-delimited row per task.
//!
//! Failed tasks are emitted as rows with `N/A` markers and a failure
//! reason, never silently dropped, so row count always equals task count.
//! Writing appends to an existing file; the header is only written when
//! the file is created.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::domain::outcome::Outcome;
use crate::domain::schema::Schema;
use crate::error::Result;
use crate::template::TemplatePair;

/// Marker written into value columns of a failed row.
const FAILURE_MARKER: &str = "N/A";

/// Append all outcomes to the output file, creating it with a header row
/// when it does not exist yet.
pub fn write_rows(
    path: &Path,
    outcomes: &[Outcome],
    pairs: &[TemplatePair],
    schema: &Schema,
) -> Result<()> {
    let write_header = !path.exists() || path.metadata().map(|m| m.len() == 0).unwrap_or(true);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if write_header {
        writeln!(file, "{}", header(schema))?;
    }
    for outcome in outcomes {
        writeln!(file, "{}", format_row(outcome, pairs, schema))?;
    }
    file.flush()?;
    Ok(())
}

/// Column header matching [`format_row`].
pub fn header(schema: &Schema) -> String {
    let mut columns = vec![
        "binomial_name".to_string(),
        "model".to_string(),
        "template".to_string(),
        "num_genes".to_string(),
    ];
    columns.extend(schema.field_names().map(ToString::to_string));
    columns.extend([
        "status".to_string(),
        "failure_reason".to_string(),
        "date".to_string(),
    ]);
    join(&columns)
}

/// Render one outcome as a `;`-delimited row.
pub fn format_row(outcome: &Outcome, pairs: &[TemplatePair], schema: &Schema) -> String {
    let task = outcome.task();
    let template_label = pairs
        .get(task.pair_index)
        .map(|p| p.label.as_str())
        .unwrap_or("");

    let mut cells = vec![
        task.entity.name.as_str().to_string(),
        task.model.clone(),
        template_label.to_string(),
        task.entity.gene_count().to_string(),
    ];

    match outcome {
        Outcome::Success { record, .. } => {
            for field in schema.field_names() {
                cells.push(
                    record
                        .get(field)
                        .map(|v| v.to_cell())
                        .unwrap_or_else(|| FAILURE_MARKER.to_string()),
                );
            }
            cells.push("success".to_string());
            cells.push(String::new());
        }
        Outcome::Failure { kind, reason, .. } => {
            for _ in schema.field_names() {
                cells.push(FAILURE_MARKER.to_string());
            }
            cells.push("failure".to_string());
            cells.push(format!("{}: {}", kind.as_str(), reason));
        }
    }

    cells.push(Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    join(&cells)
}

fn join(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| quote(c))
        .collect::<Vec<_>>()
        .join(";")
}

/// Quote a cell when it contains the delimiter, a quote, or a newline.
fn quote(cell: &str) -> String {
    if cell.contains(';') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{BinomialName, Entity};
    use crate::domain::outcome::FailureKind;
    use crate::domain::schema::{stock_schema, FieldValue, Record};
    use crate::domain::task::Task;

    fn pair() -> TemplatePair {
        TemplatePair::new("templates/system/phenotype.txt", "sys", "{binomial_name}")
    }

    fn task() -> Task {
        Task {
            index: 0,
            entity: Entity::new(BinomialName::parse("Escherichia coli").unwrap()),
            model: "stub-model".to_string(),
            pair_index: 0,
        }
    }

    #[test]
    fn header_lists_schema_fields_in_order() {
        let header = header(&stock_schema());
        assert!(header.starts_with("binomial_name;model;template;num_genes;gram_staining;"));
        assert!(header.ends_with("status;failure_reason;date"));
    }

    #[test]
    fn success_row_carries_values_and_status() {
        let mut record = Record::new();
        for field in stock_schema().fields {
            record.insert(
                field.name,
                FieldValue::Scalar("TRUE".to_string()),
            );
        }
        let outcome = Outcome::Success {
            task: task(),
            record,
            attempts: 1,
        };
        let row = format_row(&outcome, &[pair()], &stock_schema());
        assert!(row.starts_with("Escherichia coli;stub-model;templates/system/phenotype.txt;0;"));
        assert!(row.contains(";success;;"));
    }

    #[test]
    fn failure_row_marks_all_value_columns() {
        let outcome = Outcome::Failure {
            task: task(),
            kind: FailureKind::Validation,
            reason: "missing field: motility".to_string(),
            attempts: 4,
            last_response: None,
        };
        let schema = stock_schema();
        let row = format_row(&outcome, &[pair()], &schema);
        assert_eq!(row.matches("N/A").count(), schema.fields.len());
        assert!(row.contains(";failure;validation: missing field: motility;"));
    }

    #[test]
    fn cells_with_delimiter_are_quoted() {
        assert_eq!(quote("alpha;beta"), "\"alpha;beta\"");
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
