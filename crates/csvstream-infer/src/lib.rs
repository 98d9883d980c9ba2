#![forbid(unsafe_code)]
//! csvstream-infer: column-type inference over a materialized `Table`.
//!
//! Each cell is classified on its own, then a column's type is the widening
//! of all its cells. Columns are independent, so they are split across
//! scoped worker threads; every worker reads the shared table and owns only
//! its own slice of results.

use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::thread;

use csvstream_core::error::{Error, Result};
use csvstream_core::types::Table;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static IS_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid int regex"));
static IS_FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*\.[0-9]+$").expect("valid float regex"));
static IS_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// No non-empty cell seen.
    None,
    Int,
    Float,
    /// `YYYY-MM-DD`
    Date,
    String,
}

impl ColumnType {
    /// Classify a single cell.
    pub fn of(cell: &[u8]) -> Self {
        if cell.is_empty() {
            ColumnType::None
        } else if IS_INT.is_match(cell) {
            ColumnType::Int
        } else if IS_FLOAT.is_match(cell) {
            ColumnType::Float
        } else if IS_DATE.is_match(cell) {
            ColumnType::Date
        } else {
            ColumnType::String
        }
    }

    /// Smallest type that holds values of both `self` and `other`.
    pub fn widen(self, other: ColumnType) -> ColumnType {
        use ColumnType::*;
        match (self, other) {
            (None, t) | (t, None) => t,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            _ => String,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::None => "none",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferOptions {
    /// Leave the first row out of the scan.
    pub skip_header: bool,
    /// Upper bound on worker threads; defaults to the available parallelism.
    pub max_workers: Option<usize>,
}

/// Infer one type per column with default options.
pub fn infer_csv(table: &Table) -> Vec<ColumnType> {
    let ncols = table.num_columns();
    let workers = default_workers().min(ncols.max(1));
    scan(table, 0, ncols, workers)
}

/// Infer one type per column. The column count is the widest row; cells
/// missing from shorter rows count as empty.
pub fn infer_columns(table: &Table, opts: &InferOptions) -> Result<Vec<ColumnType>> {
    let workers = match opts.max_workers {
        Some(0) => {
            return Err(Error::Config(
                "max_workers must be at least 1 for column inference".into(),
            ))
        }
        Some(n) => n,
        None => default_workers(),
    };
    let skip = usize::from(opts.skip_header);
    let ncols = table
        .rows
        .iter()
        .skip(skip)
        .map(|r| r.len())
        .max()
        .unwrap_or(0);
    Ok(scan(table, skip, ncols, workers.min(ncols.max(1))))
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn scan(table: &Table, skip: usize, ncols: usize, workers: usize) -> Vec<ColumnType> {
    if ncols == 0 {
        return Vec::new();
    }
    debug!(columns = ncols, workers, rows = table.num_rows(), "inferring column types");

    if workers <= 1 {
        return scan_range(table, skip, 0..ncols);
    }

    let chunk = ncols.div_ceil(workers);
    thread::scope(|s| {
        let handles: Vec<_> = (0..ncols)
            .step_by(chunk)
            .map(|start| {
                let cols = start..(start + chunk).min(ncols);
                s.spawn(move || scan_range(table, skip, cols))
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

fn scan_range(table: &Table, skip: usize, cols: Range<usize>) -> Vec<ColumnType> {
    cols.map(|col| {
        table
            .rows
            .iter()
            .skip(skip)
            .filter_map(|row| row.get(col))
            .fold(ColumnType::None, |acc, cell| acc.widen(ColumnType::of(cell)))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvstream_core::types::Row;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(rows.iter().map(|r| Row::from(*r)).collect())
    }

    #[test]
    fn classifies_cells() {
        assert_eq!(ColumnType::of(b""), ColumnType::None);
        assert_eq!(ColumnType::of(b"42"), ColumnType::Int);
        assert_eq!(ColumnType::of(b"2.0"), ColumnType::Float);
        assert_eq!(ColumnType::of(b".5"), ColumnType::Float);
        assert_eq!(ColumnType::of(b"2015-10-10"), ColumnType::Date);
        assert_eq!(ColumnType::of(b"-1"), ColumnType::String);
        assert_eq!(ColumnType::of(b"1."), ColumnType::String);
        assert_eq!(ColumnType::of("٣".as_bytes()), ColumnType::String);
        assert_eq!(ColumnType::of(&[0xff, 0x31]), ColumnType::String);
    }

    #[test]
    fn widening_lattice() {
        use ColumnType::*;
        assert_eq!(None.widen(Date), Date);
        assert_eq!(Int.widen(None), Int);
        assert_eq!(Int.widen(Float), Float);
        assert_eq!(Float.widen(Int), Float);
        assert_eq!(Int.widen(Date), String);
        assert_eq!(Date.widen(String), String);
        assert_eq!(Date.widen(Date), Date);
    }

    #[test]
    fn infers_mixed_table() {
        let t = table(&[
            &["a", "1", "c", "1", ""],
            &["1", "2.0", "2015-10-10", "1", ""],
        ]);
        use ColumnType::*;
        assert_eq!(infer_csv(&t), vec![String, Float, String, Int, None]);
    }

    #[test]
    fn header_can_be_skipped() {
        let t = table(&[&["id", "when"], &["1", "2020-01-01"], &["2", ""]]);
        let opts = InferOptions {
            skip_header: true,
            max_workers: Some(2),
        };
        assert_eq!(
            infer_columns(&t, &opts).unwrap(),
            vec![ColumnType::Int, ColumnType::Date]
        );
    }

    #[test]
    fn ragged_rows_treat_missing_cells_as_empty() {
        let t = table(&[&["1"], &["2", "x"], &["3"]]);
        assert_eq!(infer_csv(&t), vec![ColumnType::Int, ColumnType::String]);
    }

    #[test]
    fn many_columns_across_workers_keep_order() {
        let cells: Vec<&str> = (0..37).map(|i| if i % 2 == 0 { "7" } else { "x" }).collect();
        let t = table(&[cells.as_slice(), cells.as_slice()]);
        let opts = InferOptions {
            skip_header: false,
            max_workers: Some(4),
        };
        let got = infer_columns(&t, &opts).unwrap();
        assert_eq!(got.len(), 37);
        for (i, ty) in got.iter().enumerate() {
            let want = if i % 2 == 0 { ColumnType::Int } else { ColumnType::String };
            assert_eq!(*ty, want, "column {i}");
        }
    }

    #[test]
    fn zero_workers_is_rejected() {
        let opts = InferOptions {
            skip_header: false,
            max_workers: Some(0),
        };
        assert!(infer_columns(&table(&[&["1"]]), &opts).is_err());
    }

    #[test]
    fn empty_table_has_no_columns() {
        assert!(infer_csv(&Table::default()).is_empty());
        let opts = InferOptions {
            skip_header: true,
            ..Default::default()
        };
        assert!(infer_columns(&table(&[&["only", "header"]]), &opts)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ColumnType::Float).unwrap(), "\"float\"");
    }
}
