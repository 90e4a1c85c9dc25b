//! Command execution
//!
//! Runs one parsed [`Command`] against a loaded [`Session`] and writes the
//! user-facing result to `output`. Diagnostics go through `tracing`, never
//! to `output`.

use crate::cli::{Command, OutputFormat};
use crate::io::{self, render, ExportSummary};
use crate::persistence::Session;
use crate::types::{BookError, Transaction};
use chrono::{Local, Utc};
use std::fs;
use std::io::Write;

/// Execute a command
///
/// # Arguments
///
/// * `command` - The parsed subcommand
/// * `session` - A session whose store has already been loaded
/// * `output` - Destination for tables, CSV, JSON and confirmations
///
/// # Errors
///
/// Returns the first `BookError` raised by validation, persistence or file
/// access. Nothing is written to `output` for a failed command.
pub async fn run(
    command: &Command,
    session: &mut Session,
    output: &mut dyn Write,
) -> Result<(), BookError> {
    match command {
        Command::Add(add) => {
            let today = Local::now().date_naive();
            let id = session.create(add.to_new_transaction(today)).await?;
            writeln!(output, "Added transaction {}", id)?;
        }
        Command::Edit(edit) => {
            let patch = edit.to_patch();
            if patch.is_empty() {
                return Err(BookError::validation("edit", "no fields to change"));
            }
            session.update(edit.id, &patch).await?;
            writeln!(output, "Updated transaction {}", edit.id)?;
        }
        Command::Delete { id } => match session.delete(*id).await? {
            Some(_) => writeln!(output, "Deleted transaction {}", id)?,
            None => writeln!(output, "No transaction {}; nothing deleted", id)?,
        },
        Command::List(list) => {
            let visible = session.filter(&list.to_criteria());
            write_list(&visible, list.format, output)?;
        }
        Command::Summary { format } => {
            let totals = session.totals();
            match format {
                OutputFormat::Table => output.write_all(render::totals_table(&totals).as_bytes())?,
                OutputFormat::Csv => io::write_totals_csv(&totals, output)?,
                OutputFormat::Json => write_json(&ExportSummary::from(totals), output)?,
            }
        }
        Command::Monthly { format } => {
            let breakdown = session.monthly_breakdown();
            match format {
                OutputFormat::Table => {
                    output.write_all(render::monthly_chart(&breakdown).as_bytes())?
                }
                OutputFormat::Csv => io::write_monthly_csv(&breakdown, output)?,
                OutputFormat::Json => write_json(&breakdown, output)?,
            }
        }
        Command::Export { file } => {
            let document = session.export(Utc::now());
            fs::write(file, document.to_json()?)?;
            tracing::info!("Exported to {}", file.display());
            writeln!(
                output,
                "Exported {} transactions to {}",
                document.transactions.len(),
                file.display()
            )?;
        }
        Command::Import { file } => {
            let text = fs::read_to_string(file)?;
            let transactions = io::parse_import(&text)?;
            let count = session.import(transactions).await?;
            writeln!(output, "Imported {} transactions from {}", count, file.display())?;
        }
        Command::ImportCsv { file } => {
            let report = session.import_csv(file).await?;
            writeln!(
                output,
                "Imported {} rows, skipped {}",
                report.imported.len(),
                report.skipped.len()
            )?;
            for message in &report.skipped {
                writeln!(output, "  {}", message)?;
            }
        }
    }

    Ok(())
}

fn write_list(
    visible: &[&Transaction],
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), BookError> {
    match format {
        OutputFormat::Table => output.write_all(render::transactions_table(visible).as_bytes())?,
        OutputFormat::Csv => io::write_transactions_csv(visible.iter().copied(), output)?,
        OutputFormat::Json => write_json(&visible, output)?,
    }
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(
    value: &T,
    output: &mut dyn Write,
) -> Result<(), BookError> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    Ok(())
}
