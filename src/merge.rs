use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;

use crate::{
    anonymize::{PNL_TABLE, PROJECT_TABLE},
    cli::MergeArgs,
    config::{MergeConfig, PipelineConfig},
    discovery::{DirectoryLocator, FileLocator},
    error::PipelineError,
    format::{column_letters, strip_artifact_row},
    frame::Frame,
    io_utils,
    join::{JoinStats, join_and_select},
    normalize::normalize,
};

#[derive(Debug, Clone)]
pub struct MergeSummary {
    pub pnl_input: PathBuf,
    pub project_input: PathBuf,
    pub output: PathBuf,
    pub rows_written: usize,
    pub join: JoinStats,
}

pub fn execute(args: &MergeArgs) -> Result<()> {
    let mut config = PipelineConfig::resolve(args.config.as_deref())?;
    if let Some(output) = &args.output {
        config.merge.output = output.clone();
    }
    let locator = DirectoryLocator::new(args.dir.clone());
    let summary = run(&args.dir, &config.merge, &locator)?;
    println!("Processed file saved as: {}", summary.output.display());
    Ok(())
}

pub fn run(dir: &Path, config: &MergeConfig, locator: &dyn FileLocator) -> Result<MergeSummary> {
    let (pnl_input, project_input) = locate_inputs(dir, config, locator)?;
    info!(
        "Merging {:?} with {:?} on '{}'",
        pnl_input, project_input, config.join_key
    );

    let pnl = io_utils::read_workbook(&pnl_input, PNL_TABLE)?;
    let project = io_utils::read_workbook(&project_input, PROJECT_TABLE)?;
    let (merged, join) = merge_frames(&pnl, &project, config)?;

    let formatting = &config.formatting;
    let plan = formatting.plan()?;
    for (column, kind) in plan.entries() {
        debug!("Column {} formatted as {:?}", column_letters(column), kind);
    }
    let output_frame = if formatting.drop_artifact_row {
        strip_artifact_row(&merged)
    } else {
        merged
    };

    let output = io_utils::resolve_in(dir, &config.output);
    io_utils::write_workbook(&output, &output_frame, Some(&plan))
        .with_context(|| format!("Writing merged workbook to {output:?}"))?;
    info!(
        "Wrote {} row(s) x {} column(s) to {:?}",
        output_frame.len(),
        output_frame.headers().len(),
        output
    );

    Ok(MergeSummary {
        pnl_input,
        project_input,
        output,
        rows_written: output_frame.len(),
        join,
    })
}

pub fn merge_frames(
    pnl: &Frame,
    project: &Frame,
    config: &MergeConfig,
) -> Result<(Frame, JoinStats)> {
    let pnl = normalize(pnl, &config.pnl).context("Cleaning P&L table")?;
    let project = normalize(project, &config.project).context("Cleaning project table")?;
    info!(
        "Cleaned tables: {} P&L row(s), {} project row(s)",
        pnl.len(),
        project.len()
    );
    let (merged, stats) =
        join_and_select(&pnl, &project, &config.join_key, &config.final_columns)
            .context("Joining P&L and project tables")?;
    Ok((merged, stats))
}

fn locate_inputs(
    dir: &Path,
    config: &MergeConfig,
    locator: &dyn FileLocator,
) -> Result<(PathBuf, PathBuf)> {
    let pattern = Regex::new(&config.pnl_pattern)
        .with_context(|| format!("Compiling P&L pattern '{}'", config.pnl_pattern))?;
    let pnl_input = locator
        .find(&pattern)?
        .ok_or_else(|| PipelineError::NoMatchingFile {
            pattern: config.pnl_pattern.clone(),
            dir: dir.to_path_buf(),
        })?;
    let project_input = io_utils::resolve_in(dir, &config.project_input);
    io_utils::require_file(&project_input)?;
    Ok((pnl_input, project_input))
}
