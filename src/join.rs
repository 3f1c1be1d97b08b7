use std::collections::{HashMap, HashSet};

use log::info;

use crate::{
    data::Value,
    error::PipelineError,
    frame::{Frame, Row},
};

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinStats {
    pub left_rows: usize,
    pub output_rows: usize,
    pub matched_rows: usize,
    pub unmatched_left_rows: usize,
}

pub fn left_join(left: &Frame, right: &Frame, key: &str) -> Result<(Frame, JoinStats), PipelineError> {
    let left_key = left.require_column(key)?;
    let right_key = right.require_column(key)?;

    let lookup = build_right_lookup(right, right_key);
    let (headers, right_columns) = build_output_headers(left.headers(), right.headers(), right_key);

    let mut rows: Vec<Row> = Vec::with_capacity(left.len());
    let mut stats = JoinStats {
        left_rows: left.len(),
        ..JoinStats::default()
    };
    for record in left.rows() {
        let matches = record[left_key]
            .as_ref()
            .and_then(|value| lookup.get(value));
        match matches {
            Some(bucket) => {
                for right_row in bucket {
                    let mut combined = record.clone();
                    combined.extend(right_columns.iter().map(|&idx| right_row[idx].clone()));
                    rows.push(combined);
                    stats.matched_rows += 1;
                }
            }
            None => {
                let mut combined = record.clone();
                combined.extend(right_columns.iter().map(|_| None));
                rows.push(combined);
                stats.unmatched_left_rows += 1;
            }
        }
    }
    stats.output_rows = rows.len();
    info!(
        "Join complete: {} output row(s), {} matched row(s), {} unmatched left row(s)",
        stats.output_rows, stats.matched_rows, stats.unmatched_left_rows
    );
    Ok((Frame::new("merged", headers, rows), stats))
}

pub fn join_and_select(
    left: &Frame,
    right: &Frame,
    key: &str,
    columns: &[String],
) -> Result<(Frame, JoinStats), PipelineError> {
    let (joined, stats) = left_join(left, right, key)?;
    Ok((joined.select(columns)?, stats))
}

fn build_right_lookup(right: &Frame, key_idx: usize) -> HashMap<&Value, Vec<&Row>> {
    let mut map: HashMap<&Value, Vec<&Row>> = HashMap::new();
    // Null keys never match.
    for row in right.rows() {
        if let Some(key) = row[key_idx].as_ref() {
            map.entry(key).or_default().push(row);
        }
    }
    map
}

fn build_output_headers(
    left_headers: &[String],
    right_headers: &[String],
    right_key_idx: usize,
) -> (Vec<String>, Vec<usize>) {
    let right_names: HashSet<&str> = right_headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != right_key_idx)
        .map(|(_, name)| name.as_str())
        .collect();
    let left_names: HashSet<&str> = left_headers.iter().map(String::as_str).collect();
    let key = &right_headers[right_key_idx];

    let mut headers: Vec<String> = left_headers
        .iter()
        .map(|name| {
            if name != key && right_names.contains(name.as_str()) {
                format!("{name}{LEFT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect();

    let mut right_columns = Vec::new();
    for (idx, name) in right_headers.iter().enumerate() {
        if idx == right_key_idx {
            continue;
        }
        if left_names.contains(name.as_str()) {
            headers.push(format!("{name}{RIGHT_SUFFIX}"));
        } else {
            headers.push(name.clone());
        }
        right_columns.push(idx);
    }
    (headers, right_columns)
}
