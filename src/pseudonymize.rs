//! Replaces identity values with sequential per-column pseudonyms.
//!
//! Each designated column gets its own [`PseudonymMap`]: distinct non-null
//! values are numbered in order of first appearance and rewritten to
//! `"<prefix> <n>"`. Values starting with `TOTAL` are report subtotals and are
//! neither numbered nor rewritten. Nulls stay null.

use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

use crate::{
    config::Designation,
    data::Value,
    error::PipelineError,
    frame::{Cell, Frame},
};

#[derive(Debug, Clone, Default)]
pub struct PseudonymMap {
    prefix: String,
    labels: HashMap<Value, String>,
    order: Vec<Value>,
}

impl PseudonymMap {
    pub fn build<'a, I>(prefix: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let order: Vec<Value> = cells
            .into_iter()
            .flatten()
            .filter(|value| !value.is_sentinel())
            .unique()
            .cloned()
            .collect();
        let labels = order
            .iter()
            .enumerate()
            .map(|(idx, value)| (value.clone(), format!("{prefix} {}", idx + 1)))
            .collect();
        Self {
            prefix: prefix.to_string(),
            labels,
            order,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn label(&self, value: &Value) -> Option<&str> {
        self.labels.get(value).map(String::as_str)
    }

    pub fn originals(&self) -> &[Value] {
        &self.order
    }

    pub fn apply(&self, cell: &Cell) -> Cell {
        match cell {
            None => None,
            Some(value) if value.is_sentinel() => Some(value.clone()),
            Some(value) => self
                .label(value)
                .map(|label| Value::String(label.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReport {
    pub column: String,
    pub distinct: usize,
    pub sentinels: usize,
    pub nulls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PseudonymReport {
    pub table: String,
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
}

pub fn pseudonymize(
    frame: &Frame,
    designations: &[Designation],
) -> Result<(Frame, PseudonymReport), PipelineError> {
    // Fail before touching any column when a designation is unknown.
    for designation in designations {
        frame.require_column(&designation.column)?;
    }

    let mut current = frame.clone();
    let mut report = PseudonymReport {
        table: frame.name().to_string(),
        rows: frame.len(),
        columns: Vec::with_capacity(designations.len()),
    };
    for designation in designations {
        let cells = current.column(&designation.column)?;
        let map = PseudonymMap::build(&designation.prefix, cells.iter().copied());
        let sentinels = cells.iter().filter(|c| crate::data::is_sentinel_cell(c)).count();
        let nulls = cells.iter().filter(|c| c.is_none()).count();
        let rewritten: Vec<Cell> = cells.iter().map(|cell| map.apply(cell)).collect();
        debug!(
            "{}: column '{}' mapped {} distinct value(s) to prefix '{}'",
            frame.name(),
            designation.column,
            map.len(),
            map.prefix()
        );
        report.columns.push(ColumnReport {
            column: designation.column.clone(),
            distinct: map.len(),
            sentinels,
            nulls,
        });
        current = current.with_column(&designation.column, rewritten)?;
    }
    Ok((current, report))
}
