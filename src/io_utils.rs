//! Workbook I/O for the pipeline stages.
//!
//! All spreadsheet reading and writing flows through this module:
//!
//! - **Reading**: the first worksheet of an `.xlsx` file is loaded with
//!   `calamine`. Sheet row 1 becomes the header; blank header cells are
//!   named `Unnamed: <i>` and repeated headers get `.1`, `.2` suffixes, the
//!   naming the report exports already rely on (`CONT.1`, `Unnamed: 9`).
//! - **Writing**: frames are written with `rust_xlsxwriter`. The workbook is
//!   assembled in memory and saved once, so a failed run leaves no partial
//!   output behind.
//! - **Presence checks**: [`require_file`] raises the typed missing-file error.

use std::{
    collections::HashSet,
    iter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::NaiveDateTime;
use log::debug;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::{
    data::{Value, excel_serial, normalize_datetime},
    error::PipelineError,
    format::{FormatKind, FormatPlan, PLAIN_DATE_FORMAT},
    frame::{Cell, Frame, Row},
};

pub fn require_file(path: &Path) -> Result<(), PipelineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

pub fn resolve_in(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

pub fn read_workbook(path: &Path, table: &str) -> Result<Frame> {
    require_file(path)?;
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .with_context(|| format!("Reading first worksheet of {path:?}"))?;

    // The range starts at the first used cell; pad it back to A1.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let lead = start_col as usize;
    let width = lead + range.width();
    let mut rows = range.rows();
    let raw_headers: Vec<String> = if start_row > 0 {
        vec![String::new(); width]
    } else {
        match rows.next() {
            Some(header) => iter::repeat_n(String::new(), lead)
                .chain(header.iter().map(header_text))
                .collect(),
            None => Vec::new(),
        }
    };
    let headers = normalize_headers(&raw_headers);
    let blank_row: Row = vec![None; width];
    let leading_blank = (start_row as usize).saturating_sub(1);
    let body: Vec<Row> = iter::repeat_n(blank_row, leading_blank)
        .chain(rows.map(|row| -> Row {
            iter::repeat_n(None, lead)
                .chain(row.iter().map(convert_cell))
                .collect()
        }))
        .collect();
    debug!(
        "Read {} row(s) x {} column(s) from {:?}",
        body.len(),
        headers.len(),
        path
    );
    Ok(Frame::new(table, headers, body))
}

pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, name) in raw.iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.clone()
        };
        let mut candidate = base.clone();
        let mut counter = 1usize;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{counter}");
            counter += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}

fn header_text(cell: &Data) -> String {
    convert_cell(cell)
        .map(|value| value.as_display())
        .unwrap_or_default()
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) => Some(Value::Float(*f)),
        Data::Bool(b) => Some(Value::Boolean(*b)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(parsed) => Some(normalize_datetime(parsed)),
            None => Some(Value::Float(dt.as_f64())),
        },
        Data::DateTimeIso(s) => Some(
            parse_iso_datetime(s)
                .map(normalize_datetime)
                .unwrap_or_else(|| Value::String(s.clone())),
        ),
        Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

pub fn write_workbook(path: &Path, frame: &Frame, plan: Option<&FormatPlan>) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Sheet1")
        .context("Naming output worksheet")?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    for (col, header) in frame.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .with_context(|| format!("Writing header '{header}'"))?;
    }

    let formats = CellFormats::new(plan);
    for (row_idx, row) in frame.rows().iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            write_cell(worksheet, sheet_row, col, cell, &formats)
                .with_context(|| format!("Writing row {} column {}", sheet_row + 1, col + 1))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Saving workbook {path:?}"))?;
    debug!("Wrote {} row(s) to {:?}", frame.len(), path);
    Ok(())
}

struct CellFormats<'a> {
    plan: Option<&'a FormatPlan>,
    plain_date: Format,
    currency: Option<Format>,
    date: Option<Format>,
    percentage: Option<Format>,
}

impl<'a> CellFormats<'a> {
    fn new(plan: Option<&'a FormatPlan>) -> Self {
        let build = |kind: FormatKind| plan.map(|p| p.number_format(kind));
        Self {
            plan,
            plain_date: Format::new().set_num_format(PLAIN_DATE_FORMAT),
            currency: build(FormatKind::Currency),
            date: build(FormatKind::Date),
            percentage: build(FormatKind::Percentage),
        }
    }

    fn for_column(&self, col: u16) -> Option<&Format> {
        match self.plan?.kind_for(col)? {
            FormatKind::Currency => self.currency.as_ref(),
            FormatKind::Date => self.date.as_ref(),
            FormatKind::Percentage => self.percentage.as_ref(),
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &CellFormats<'_>,
) -> Result<()> {
    let column_format = formats.for_column(col);
    match (cell, column_format) {
        (None, None) => {}
        (None, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (Some(Value::String(s)), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (Some(Value::String(s)), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        (Some(Value::Integer(i)), format) => {
            write_number(worksheet, row, col, *i as f64, format)?;
        }
        (Some(Value::Float(f)), format) => {
            write_number(worksheet, row, col, *f, format)?;
        }
        (Some(Value::Boolean(b)), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (Some(Value::Boolean(b)), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        (Some(value @ (Value::Date(_) | Value::DateTime(_))), format) => {
            let serial = value.as_datetime().map(excel_serial).unwrap_or_default();
            let format = format.unwrap_or(&formats.plain_date);
            worksheet.write_number_with_format(row, col, serial, format)?;
        }
    }
    Ok(())
}

fn write_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: f64,
    format: Option<&Format>,
) -> Result<()> {
    match format {
        Some(format) => worksheet.write_number_with_format(row, col, value, format)?,
        None => worksheet.write_number(row, col, value)?,
    };
    Ok(())
}
