use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("The file '{}' was not found.", path.display())]
    MissingFile { path: PathBuf },

    #[error("Column '{column}' not found in {table} table (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        table: String,
        available: Vec<String>,
    },

    #[error("No file matching pattern '{pattern}' was found in {}", dir.display())]
    NoMatchingFile { pattern: String, dir: PathBuf },

    #[error("Invalid spreadsheet column letter '{0}'")]
    InvalidColumnLetter(String),

    #[error("Workbook {} does not contain any worksheet", path.display())]
    EmptyWorkbook { path: PathBuf },
}

impl PipelineError {
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingFile { .. } | PipelineError::NoMatchingFile { .. }
        )
    }
}
