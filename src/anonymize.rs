use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::AnonymizeArgs,
    config::{AnonymizeConfig, PipelineConfig, TableTransfer},
    frame::Frame,
    io_utils,
    pseudonymize::{PseudonymReport, pseudonymize},
};

pub const PNL_TABLE: &str = "P&L";
pub const PROJECT_TABLE: &str = "Project";

#[derive(Debug, Clone)]
pub struct AnonymizeSummary {
    pub outputs: Vec<PathBuf>,
    pub reports: Vec<PseudonymReport>,
}

pub fn execute(args: &AnonymizeArgs) -> Result<()> {
    let config = PipelineConfig::resolve(args.config.as_deref())?;
    let summary = run(&args.dir, &config.anonymize)?;
    println!("Processed files saved:");
    for output in &summary.outputs {
        println!("- {}", output.display());
    }
    Ok(())
}

pub fn run(dir: &Path, config: &AnonymizeConfig) -> Result<AnonymizeSummary> {
    let pnl_input = io_utils::resolve_in(dir, &config.pnl.input);
    let project_input = io_utils::resolve_in(dir, &config.project.input);
    io_utils::require_file(&pnl_input)?;
    io_utils::require_file(&project_input)?;

    let (pnl, pnl_report) = anonymize_table(&pnl_input, PNL_TABLE, &config.pnl)?;
    let (project, project_report) =
        anonymize_table(&project_input, PROJECT_TABLE, &config.project)?;

    let pnl_output = io_utils::resolve_in(dir, &config.pnl.output);
    let project_output = io_utils::resolve_in(dir, &config.project.output);
    io_utils::write_workbook(&pnl_output, &pnl, None)
        .with_context(|| format!("Writing anonymized P&L to {pnl_output:?}"))?;
    io_utils::write_workbook(&project_output, &project, None)
        .with_context(|| format!("Writing anonymized project listing to {project_output:?}"))?;

    Ok(AnonymizeSummary {
        outputs: vec![pnl_output, project_output],
        reports: vec![pnl_report, project_report],
    })
}

fn anonymize_table(
    path: &Path,
    table: &str,
    transfer: &TableTransfer,
) -> Result<(Frame, PseudonymReport)> {
    info!("Anonymizing {table} table from {path:?}");
    let frame = io_utils::read_workbook(path, table)?;
    let (anonymized, report) = pseudonymize(&frame, &transfer.columns)
        .with_context(|| format!("Pseudonymizing {table} table from {path:?}"))?;
    for column in &report.columns {
        info!(
            "{table}: '{}' -> {} pseudonym(s), {} TOTAL cell(s) kept, {} empty cell(s)",
            column.column, column.distinct, column.sentinels, column.nulls
        );
    }
    info!("{table}: {} row(s) anonymized", report.rows);
    Ok((anonymized, report))
}
