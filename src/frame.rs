use std::collections::{HashMap, HashSet};

use crate::{data::Value, error::PipelineError};

pub type Cell = Option<Value>;
pub type Row = Vec<Cell>;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    name: String,
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Frame {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Row>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn empty(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self::new(name, headers, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
                table: self.name.clone(),
                available: self.headers.clone(),
            })
    }

    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, PipelineError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    pub fn with_column(&self, name: &str, cells: Vec<Cell>) -> Result<Self, PipelineError> {
        let idx = self.require_column(name)?;
        let mut rows = self.rows.clone();
        for (row, cell) in rows.iter_mut().zip(cells) {
            row[idx] = cell;
        }
        Ok(Self {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows,
        })
    }

    pub fn rename_columns(&self, mapping: &[(String, String)]) -> Self {
        let lookup: HashMap<&str, &str> = mapping
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect();
        let headers = self
            .headers
            .iter()
            .map(|h| lookup.get(h.as_str()).map(|s| s.to_string()).unwrap_or_else(|| h.clone()))
            .collect();
        Self {
            name: self.name.clone(),
            headers,
            rows: self.rows.clone(),
        }
    }

    pub fn drop_columns(&self, columns: &[String]) -> Self {
        let dropped: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let keep: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !dropped.contains(h.as_str()))
            .map(|(idx, _)| idx)
            .collect();
        self.project(&keep)
    }

    pub fn select(&self, columns: &[String]) -> Result<Self, PipelineError> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.project(&indices))
    }

    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        Self {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    pub fn skip_rows(&self, count: usize) -> Self {
        Self {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self.rows.iter().skip(count).cloned().collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn project(&self, indices: &[usize]) -> Self {
        let headers = indices.iter().map(|&idx| self.headers[idx].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Self {
            name: self.name.clone(),
            headers,
            rows,
        }
    }
}
