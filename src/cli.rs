use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Anonymize and merge P&L and project-listing workbooks",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace identity columns in the raw exports with sequential pseudonyms
    Anonymize(AnonymizeArgs),
    /// Join the anonymized exports into the formatted final workbook
    Merge(MergeArgs),
    /// Preview the first few rows of a workbook in a formatted table
    Preview(PreviewArgs),
    /// Write the default pipeline profile as YAML for editing
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct AnonymizeArgs {
    /// Directory holding the raw exports; outputs are written here too
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub dir: PathBuf,
    /// YAML pipeline profile overriding the built-in file names and columns
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Directory holding the anonymized exports; the final workbook is written here
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub dir: PathBuf,
    /// YAML pipeline profile overriding the built-in file names and columns
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Final workbook path; relative paths resolve against --dir (defaults to the profile's output name)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Workbook to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Destination YAML file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}
