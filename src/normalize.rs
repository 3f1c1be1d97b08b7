use crate::{
    config::TableCleanup,
    data::is_sentinel_cell,
    error::PipelineError,
    frame::Frame,
};

pub fn normalize(frame: &Frame, cleanup: &TableCleanup) -> Result<Frame, PipelineError> {
    let renamed = frame
        .rename_columns(&cleanup.rename_pairs())
        .drop_columns(&cleanup.drop_columns);
    match &cleanup.total_filter_column {
        Some(column) => remove_total_rows(&renamed, column),
        None => Ok(renamed),
    }
}

pub fn remove_total_rows(frame: &Frame, column: &str) -> Result<Frame, PipelineError> {
    let idx = frame.require_column(column)?;
    Ok(frame.filter_rows(|row| !is_sentinel_cell(&row[idx])))
}
