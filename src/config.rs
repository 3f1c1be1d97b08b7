//! Pipeline configuration and YAML persistence.
//!
//! [`PipelineConfig::default()`] reproduces the fixed file names, column
//! designations, renames, output order and formats of the monthly report
//! workflow. A YAML profile can override any of them.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::format::{FormatCodes, FormatKind, FormatPlan};

pub const PNL_SOURCE: &str = "P L By Account Manager _PL By AM.xlsx";
pub const PROJECT_SOURCE: &str = "ProjectListing.xlsx";
pub const PNL_PROCESSED: &str = "Processed_PNL.xlsx";
pub const PROJECT_PROCESSED: &str = "Processed_ProjectListing.xlsx";
pub const PNL_PATTERN: &str = r"Processed_PNL.*\.xlsx";
pub const MERGED_OUTPUT: &str = "PL_By_AM_Final.xlsx";

const PNL_DESIGNATIONS: &[(&str, &str)] = &[
    ("PROJECT NAME", "Project"),
    ("ACCOUNT MANAGER", "Account Manager"),
    ("CUSTOMER", "Customer"),
];

const PROJECT_DESIGNATIONS: &[(&str, &str)] = &[
    ("Project Name", "Project"),
    ("Customer", "Customer"),
    ("Project Manager", "Project Manager"),
];

const PNL_RENAMES: &[(&str, &str)] = &[
    ("LABOR", "LABOR (COGS)"),
    ("NON-BILLABLE", "NON-BILLABLE EXPENSES"),
    ("CONT", "CONT (MARGIN)"),
    ("CONT.1", "CONT MARGIN %"),
];

const PROJECT_RENAMES: &[(&str, &str)] = &[
    ("Project Name", "PROJECT NAME"),
    ("Start Date", "START DATE"),
    ("Finish Date", "END DATE"),
    ("Project Status", "STATUS"),
];

pub const FINAL_COLUMNS: &[&str] = &[
    "ACCOUNT MANAGER",
    "CUSTOMER",
    "PROJECT NAME",
    "START DATE",
    "END DATE",
    "STATUS",
    "LINE OF BUSINESS",
    "REVENUE",
    "INVESTMENT",
    "LABOR (COGS)",
    "NON-BILLABLE EXPENSES",
    "CONT (MARGIN)",
    "CONT MARGIN %",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    pub column: String,
    pub prefix: String,
}

impl Designation {
    pub fn new(column: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            prefix: prefix.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTransfer {
    pub input: PathBuf,
    pub output: PathBuf,
    pub columns: Vec<Designation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizeConfig {
    pub pnl: TableTransfer,
    pub project: TableTransfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCleanup {
    #[serde(default)]
    pub renames: Vec<Rename>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_filter_column: Option<String>,
}

impl TableCleanup {
    pub fn rename_pairs(&self) -> Vec<(String, String)> {
        self.renames
            .iter()
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingConfig {
    #[serde(default = "default_true")]
    pub drop_artifact_row: bool,
    pub currency_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub percentage_columns: Vec<String>,
    #[serde(default)]
    pub codes: FormatCodes,
}

impl FormattingConfig {
    pub fn plan(&self) -> Result<FormatPlan> {
        let mut plan = FormatPlan::new(self.codes.clone());
        for (letters, kind) in [
            (&self.currency_columns, FormatKind::Currency),
            (&self.date_columns, FormatKind::Date),
            (&self.percentage_columns, FormatKind::Percentage),
        ] {
            for letter in letters {
                plan.assign_letter(letter, kind)?;
            }
        }
        Ok(plan)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    pub pnl_pattern: String,
    pub project_input: PathBuf,
    pub output: PathBuf,
    pub pnl: TableCleanup,
    pub project: TableCleanup,
    pub join_key: String,
    pub final_columns: Vec<String>,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub anonymize: AnonymizeConfig,
    pub merge: MergeConfig,
}

fn default_true() -> bool {
    true
}

fn designations(pairs: &[(&str, &str)]) -> Vec<Designation> {
    pairs
        .iter()
        .map(|(column, prefix)| Designation::new(*column, *prefix))
        .collect()
}

fn renames(pairs: &[(&str, &str)]) -> Vec<Rename> {
    pairs
        .iter()
        .map(|(from, to)| Rename {
            from: from.to_string(),
            to: to.to_string(),
        })
        .collect()
}

fn letters(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            anonymize: AnonymizeConfig {
                pnl: TableTransfer {
                    input: PathBuf::from(PNL_SOURCE),
                    output: PathBuf::from(PNL_PROCESSED),
                    columns: designations(PNL_DESIGNATIONS),
                },
                project: TableTransfer {
                    input: PathBuf::from(PROJECT_SOURCE),
                    output: PathBuf::from(PROJECT_PROCESSED),
                    columns: designations(PROJECT_DESIGNATIONS),
                },
            },
            merge: MergeConfig {
                pnl_pattern: PNL_PATTERN.to_string(),
                project_input: PathBuf::from(PROJECT_PROCESSED),
                output: PathBuf::from(MERGED_OUTPUT),
                pnl: TableCleanup {
                    renames: renames(PNL_RENAMES),
                    drop_columns: vec!["Unnamed: 9".to_string()],
                    total_filter_column: Some("ACCOUNT MANAGER".to_string()),
                },
                project: TableCleanup {
                    renames: renames(PROJECT_RENAMES),
                    drop_columns: Vec::new(),
                    total_filter_column: None,
                },
                join_key: "PROJECT NAME".to_string(),
                final_columns: FINAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
                formatting: FormattingConfig {
                    drop_artifact_row: true,
                    currency_columns: letters(&["H", "I", "J", "K", "L"]),
                    date_columns: letters(&["D", "E"]),
                    percentage_columns: letters(&["M"]),
                    codes: FormatCodes::default(),
                },
            },
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config: PipelineConfig =
            serde_yaml::from_reader(reader).context("Parsing config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing config YAML")
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing config to YAML string")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.merge.join_key.is_empty(),
            "merge.join_key cannot be empty"
        );
        ensure!(
            !self.merge.final_columns.is_empty(),
            "merge.final_columns must list at least one column"
        );
        regex::Regex::new(&self.merge.pnl_pattern)
            .with_context(|| format!("Invalid P&L pattern '{}'", self.merge.pnl_pattern))?;
        for designation in self
            .anonymize
            .pnl
            .columns
            .iter()
            .chain(self.anonymize.project.columns.iter())
        {
            ensure!(
                !designation.prefix.trim().is_empty(),
                "Pseudonym prefix for column '{}' cannot be empty",
                designation.column
            );
        }
        self.merge.formatting.plan().map(|_| ())
    }
}
