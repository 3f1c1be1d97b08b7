#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pnl_merge::{
    config::{PNL_SOURCE, PROJECT_SOURCE},
    data::{Value, excel_serial},
};
use rust_xlsxwriter::{Format, Workbook};
use tempfile::{TempDir, tempdir};

pub type Cell = Option<Value>;

pub fn text(value: &str) -> Cell {
    Some(Value::from(value))
}

pub fn num(value: f64) -> Cell {
    Some(Value::Float(value))
}

pub fn date(year: i32, month: u32, day: u32) -> Cell {
    Some(Value::Date(NaiveDate::from_ymd_opt(year, month, day).expect("valid date")))
}

/// Reads a date back whether the reader saw a date-formatted cell or a serial.
pub fn as_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::Date(d) => Some(*d),
        Value::DateTime(dt) => Some(dt.date()),
        Value::Float(serial) => {
            NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(chrono::Days::new(*serial as u64))
        }
        _ => None,
    }
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes a single-sheet workbook the way the reporting system exports it.
    pub fn write_workbook(&self, name: &str, headers: &[&str], rows: &[Vec<Cell>]) -> PathBuf {
        let path = self.file(name);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        for (col, header) in headers.iter().enumerate() {
            if !header.is_empty() {
                sheet.write_string(0, col as u16, *header).expect("header");
            }
        }
        for (row_idx, row) in rows.iter().enumerate() {
            let r = row_idx as u32 + 1;
            for (col_idx, cell) in row.iter().enumerate() {
                let c = col_idx as u16;
                match cell {
                    None => {}
                    Some(Value::String(s)) => {
                        sheet.write_string(r, c, s).expect("string");
                    }
                    Some(Value::Float(f)) => {
                        sheet.write_number(r, c, *f).expect("number");
                    }
                    Some(Value::Integer(i)) => {
                        sheet.write_number(r, c, *i as f64).expect("number");
                    }
                    Some(Value::Boolean(b)) => {
                        sheet.write_boolean(r, c, *b).expect("boolean");
                    }
                    Some(other) => {
                        let serial = excel_serial(other.as_datetime().expect("date value"));
                        sheet
                            .write_number_with_format(r, c, serial, &date_format)
                            .expect("date");
                    }
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }

    /// Raw P&L export: a sub-header row, three projects and a TOTAL line.
    pub fn write_raw_pnl(&self) -> PathBuf {
        self.write_workbook(PNL_SOURCE, PNL_HEADERS, &raw_pnl_rows())
    }

    /// Raw project listing with one project the P&L never mentions.
    pub fn write_raw_projects(&self) -> PathBuf {
        self.write_workbook(PROJECT_SOURCE, PROJECT_HEADERS, &raw_project_rows())
    }
}

pub const PNL_HEADERS: &[&str] = &[
    "ACCOUNT MANAGER",
    "CUSTOMER",
    "PROJECT NAME",
    "LINE OF BUSINESS",
    "REVENUE",
    "INVESTMENT",
    "LABOR",
    "NON-BILLABLE",
    "CONT",
    "",
    "CONT",
];

pub const PROJECT_HEADERS: &[&str] = &[
    "Project Name",
    "Customer",
    "Project Manager",
    "Start Date",
    "Finish Date",
    "Project Status",
];

pub fn raw_pnl_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![
            None,
            None,
            None,
            None,
            text("$"),
            text("$"),
            text("$"),
            text("$"),
            text("$"),
            None,
            text("%"),
        ],
        vec![
            text("Jane Doe"),
            text("Acme"),
            text("Alpha"),
            text("Consulting"),
            num(1000.0),
            num(0.0),
            num(400.0),
            num(50.0),
            num(550.0),
            None,
            num(0.55),
        ],
        vec![
            text("Jane Doe"),
            text("Globex"),
            text("Beta"),
            text("Support"),
            num(500.0),
            num(100.0),
            num(200.0),
            num(0.0),
            num(300.0),
            None,
            num(0.6),
        ],
        vec![
            text("John Roe"),
            text("Acme"),
            text("Gamma"),
            text("Consulting"),
            num(800.0),
            num(0.0),
            num(500.0),
            num(20.0),
            num(280.0),
            None,
            num(0.35),
        ],
        vec![
            text("TOTAL"),
            None,
            None,
            None,
            num(2300.0),
            num(100.0),
            num(1100.0),
            num(70.0),
            num(1130.0),
            None,
            num(0.49),
        ],
    ]
}

pub fn raw_project_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![
            text("Alpha"),
            text("Acme"),
            text("Pat Lee"),
            date(2024, 1, 1),
            date(2024, 6, 30),
            text("Active"),
        ],
        vec![
            text("Beta"),
            text("Globex"),
            text("Sam Fox"),
            date(2024, 2, 1),
            date(2024, 12, 31),
            text("Closed"),
        ],
        vec![
            text("Delta"),
            text("Initech"),
            text("Pat Lee"),
            date(2024, 3, 15),
            None,
            text("Active"),
        ],
    ]
}
