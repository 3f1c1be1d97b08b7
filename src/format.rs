use std::collections::BTreeMap;

use rust_xlsxwriter::Format;
use serde::{Deserialize, Serialize};

use crate::{error::PipelineError, frame::Frame};

pub const CURRENCY_FORMAT: &str = "R$ #,##0.00";
pub const DATE_FORMAT: &str = "DD/MM/YYYY";
pub const PERCENTAGE_FORMAT: &str = "0.00%";
pub const PLAIN_DATE_FORMAT: &str = "yyyy-mm-dd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Currency,
    Date,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCodes {
    pub currency: String,
    pub date: String,
    pub percentage: String,
}

impl Default for FormatCodes {
    fn default() -> Self {
        Self {
            currency: CURRENCY_FORMAT.to_string(),
            date: DATE_FORMAT.to_string(),
            percentage: PERCENTAGE_FORMAT.to_string(),
        }
    }
}

impl FormatCodes {
    pub fn code(&self, kind: FormatKind) -> &str {
        match kind {
            FormatKind::Currency => &self.currency,
            FormatKind::Date => &self.date,
            FormatKind::Percentage => &self.percentage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatPlan {
    codes: FormatCodes,
    columns: BTreeMap<u16, FormatKind>,
}

impl FormatPlan {
    pub fn new(codes: FormatCodes) -> Self {
        Self {
            codes,
            columns: BTreeMap::new(),
        }
    }

    pub fn assign(&mut self, column: u16, kind: FormatKind) {
        self.columns.insert(column, kind);
    }

    pub fn assign_letter(&mut self, letters: &str, kind: FormatKind) -> Result<(), PipelineError> {
        let column = column_index_from_letters(letters)?;
        self.assign(column, kind);
        Ok(())
    }

    pub fn kind_for(&self, column: u16) -> Option<FormatKind> {
        self.columns.get(&column).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (u16, FormatKind)> + '_ {
        self.columns.iter().map(|(col, kind)| (*col, *kind))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn number_format(&self, kind: FormatKind) -> Format {
        Format::new().set_num_format(self.codes.code(kind))
    }
}

pub fn strip_artifact_row(frame: &Frame) -> Frame {
    frame.skip_rows(1)
}

pub fn column_index_from_letters(letters: &str) -> Result<u16, PipelineError> {
    let trimmed = letters.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(PipelineError::InvalidColumnLetter(letters.to_string()));
    }
    let mut index: u32 = 0;
    for ch in trimmed.chars() {
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index * 26 + digit;
        // Excel stops at XFD (16384 columns).
        if index > 16_384 {
            return Err(PipelineError::InvalidColumnLetter(letters.to_string()));
        }
    }
    Ok((index - 1) as u16)
}

pub fn column_letters(mut index: u16) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_convert_to_indices() {
        assert_eq!(column_index_from_letters("A").unwrap(), 0);
        assert_eq!(column_index_from_letters("D").unwrap(), 3);
        assert_eq!(column_index_from_letters("m").unwrap(), 12);
        assert_eq!(column_index_from_letters("Z").unwrap(), 25);
        assert_eq!(column_index_from_letters("AA").unwrap(), 26);
        assert_eq!(column_index_from_letters("XFD").unwrap(), 16_383);
    }

    #[test]
    fn invalid_letters_are_rejected() {
        for bad in ["", "1", "A1", "XFE", "É"] {
            assert!(column_index_from_letters(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn indices_convert_back_to_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(12), "M");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
    }

    #[test]
    fn artifact_row_is_the_first_data_row() {
        use crate::data::Value;
        let frame = Frame::new(
            "merged",
            vec!["A".to_string()],
            vec![vec![Some(Value::from("$"))], vec![Some(Value::from("Project 1"))]],
        );
        let stripped = strip_artifact_row(&frame);
        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped.cell(0, "A"), Some(&Value::from("Project 1")));
        assert!(strip_artifact_row(&stripped.skip_rows(1)).is_empty());
    }

    #[test]
    fn plan_assigns_kinds_by_letter() {
        let mut plan = FormatPlan::new(FormatCodes::default());
        plan.assign_letter("H", FormatKind::Currency).unwrap();
        plan.assign_letter("D", FormatKind::Date).unwrap();
        assert_eq!(plan.kind_for(7), Some(FormatKind::Currency));
        assert_eq!(plan.kind_for(3), Some(FormatKind::Date));
        assert_eq!(plan.kind_for(0), None);
        assert_eq!(plan.entries().count(), 2);
    }
}
