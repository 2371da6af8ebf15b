//! ObservationStore — date-indexed table of per-city values.
//!
//! Loaded once from CSV, immutable afterwards. One column holds dates, every
//! other column is one city's series. Cells that do not parse as a finite
//! number are stored as missing and never take part in a computation.
//!
//! Policy on bad rows: an unparseable date rejects the whole load. Skipping
//! a row would silently shift what a date range covers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use super::dates::parse_date;
use crate::domain::{Point, Window};

/// Errors from loading or querying the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("line {line}: cannot parse date '{value}'")]
    MalformedRow { line: u64, value: String },

    #[error("header has no '{column}' date column")]
    MissingDateColumn { column: String },

    #[error("line {line}: duplicate date {date}")]
    DuplicateDate { line: u64, date: NaiveDate },

    #[error("column '{column}' has {found} values for {expected} dates")]
    RaggedSeries {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("no data column named '{0}'")]
    UnknownColumn(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options controlling how a CSV source is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header of the date column.
    pub date_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "Date".into(),
        }
    }
}

/// Immutable observation table.
///
/// Dates are unique and ascending. Values are stored column-major; each
/// column has exactly one slot per date.
#[derive(Debug, Clone)]
pub struct ObservationStore {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    values: Vec<Vec<Option<f64>>>,
}

struct ParsedRow {
    line: u64,
    date: NaiveDate,
    cells: Vec<Option<f64>>,
}

impl ObservationStore {
    /// Load from a CSV file.
    pub fn load(path: &Path, opts: &LoadOptions) -> Result<Self, StoreError> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => StoreError::Io(e),
        })?;
        let store = Self::from_reader(file, opts)?;
        debug!(
            path = %path.display(),
            rows = store.row_count(),
            columns = store.columns.len(),
            "loaded observation table"
        );
        Ok(store)
    }

    /// Load from any CSV reader.
    pub fn from_reader<R: Read>(reader: R, opts: &LoadOptions) -> Result<Self, StoreError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = headers
            .iter()
            .position(|h| h == opts.date_column)
            .or_else(|| {
                headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(&opts.date_column))
            })
            .ok_or_else(|| StoreError::MissingDateColumn {
                column: opts.date_column.clone(),
            })?;

        // (field index, column name) for every data column we keep.
        let mut data_fields: Vec<(usize, String)> = Vec::new();
        for (i, name) in headers.iter().enumerate() {
            if i == date_idx || name.is_empty() {
                continue;
            }
            if data_fields.iter().any(|(_, n)| n == name) {
                warn!(column = name, "duplicate column header, keeping the first");
                continue;
            }
            data_fields.push((i, name.to_string()));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let raw_date = record.get(date_idx).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| StoreError::MalformedRow {
                line,
                value: raw_date.to_string(),
            })?;
            let cells = data_fields
                .iter()
                .map(|(i, _)| record.get(*i).and_then(parse_cell))
                .collect();
            rows.push(ParsedRow { line, date, cells });
        }

        let columns = data_fields.into_iter().map(|(_, name)| name).collect();
        Self::assemble(columns, rows)
    }

    /// Build from in-memory series, one `Vec` per column aligned with `dates`.
    pub fn from_series(
        dates: Vec<NaiveDate>,
        series: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, StoreError> {
        for (name, values) in &series {
            if values.len() != dates.len() {
                return Err(StoreError::RaggedSeries {
                    column: name.clone(),
                    expected: dates.len(),
                    found: values.len(),
                });
            }
        }

        let columns: Vec<String> = series.iter().map(|(name, _)| name.clone()).collect();
        let rows = dates
            .iter()
            .enumerate()
            .map(|(r, &date)| ParsedRow {
                line: r as u64 + 1,
                date,
                cells: series
                    .iter()
                    .map(|(_, values)| values[r].filter(|v| v.is_finite()))
                    .collect(),
            })
            .collect();

        Self::assemble(columns, rows)
    }

    fn assemble(columns: Vec<String>, mut rows: Vec<ParsedRow>) -> Result<Self, StoreError> {
        rows.sort_by_key(|r| r.date);
        if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(StoreError::DuplicateDate {
                line: pair[0].line.max(pair[1].line),
                date: pair[1].date,
            });
        }

        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(rows.len()); columns.len()];
        let mut dates = Vec::with_capacity(rows.len());
        for row in rows {
            dates.push(row.date);
            for (c, column) in values.iter_mut().enumerate() {
                column.push(row.cells.get(c).copied().flatten());
            }
        }

        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            dates,
            columns,
            column_index,
            values,
        })
    }

    /// Present observations for `entity` with `start <= date <= end`.
    ///
    /// An empty result is not an error.
    pub fn slice(
        &self,
        entity: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Window, StoreError> {
        let column = self.column(entity)?;

        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);

        let points = self.dates[lo..hi]
            .iter()
            .zip(&column[lo..hi])
            .filter_map(|(&date, value)| value.map(|v| Point::new(date, v)))
            .collect();

        Ok(Window::new(entity, start, end, points))
    }

    /// The whole present series for `entity`.
    pub fn series(&self, entity: &str) -> Result<Window, StoreError> {
        let (start, end) = self
            .date_range()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MIN));
        self.slice(entity, start, end)
    }

    fn column(&self, entity: &str) -> Result<&[Option<f64>], StoreError> {
        self.column_index
            .get(entity)
            .map(|&i| self.values[i].as_slice())
            .ok_or_else(|| StoreError::UnknownColumn(entity.to_string()))
    }

    pub fn has_column(&self, entity: &str) -> bool {
        self.column_index.contains_key(entity)
    }

    /// Data columns in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// First and last date, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Number of present (non-missing) cells in a column.
    pub fn present_count(&self, entity: &str) -> Result<usize, StoreError> {
        Ok(self.column(entity)?.iter().filter(|v| v.is_some()).count())
    }

    /// Write the table as CSV, date column first.
    pub fn write_csv<W: Write>(&self, writer: W, date_column: &str) -> Result<(), StoreError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(date_column.to_string());
        header.extend(self.columns.iter().cloned());
        wtr.write_record(&header)?;

        for (r, date) in self.dates.iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(date.format("%Y-%m-%d").to_string());
            record.extend(
                self.values
                    .iter()
                    .map(|column| column[r].map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Content hash of the parsed table (dates, headers, values).
    ///
    /// Two loads of equivalent data give the same fingerprint regardless of
    /// row order or whitespace in the source file.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for date in &self.dates {
            hasher.update(date.to_string().as_bytes());
            hasher.update(b"\n");
        }
        for (name, column) in self.columns.iter().zip(&self.values) {
            hasher.update(name.as_bytes());
            hasher.update(b"\0");
            for value in column {
                match value {
                    Some(v) => hasher.update(&v.to_bits().to_le_bytes()),
                    None => hasher.update(b"-"),
                };
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Numeric cell, or `None` for anything missing or non-finite.
fn parse_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Date,Paris,London
2024-06-01,1.5,2.0
2024-06-02,,3.0
2024-06-03,n/a,4.0
2024-06-04,2.5,
";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store() -> ObservationStore {
        ObservationStore::from_reader(CSV.as_bytes(), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn loads_columns_in_header_order() {
        let s = store();
        assert_eq!(s.columns(), &["Paris".to_string(), "London".to_string()]);
        assert_eq!(s.row_count(), 4);
        assert_eq!(s.date_range(), Some((d(2024, 6, 1), d(2024, 6, 4))));
    }

    #[test]
    fn non_numeric_cells_are_missing() {
        let s = store();
        assert_eq!(s.present_count("Paris").unwrap(), 2);
        assert_eq!(s.present_count("London").unwrap(), 3);
    }

    #[test]
    fn slice_drops_missing_and_respects_bounds() {
        let s = store();
        let w = s.slice("Paris", d(2024, 6, 1), d(2024, 6, 3)).unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w.points()[0], Point::new(d(2024, 6, 1), 1.5));

        let w = s.slice("London", d(2024, 6, 2), d(2024, 6, 4)).unwrap();
        let dates: Vec<_> = w.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 6, 2), d(2024, 6, 3)]);
    }

    #[test]
    fn slice_outside_range_is_empty_not_error() {
        let s = store();
        let w = s.slice("Paris", d(2023, 1, 1), d(2023, 2, 1)).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn inverted_bounds_are_empty() {
        let s = store();
        let w = s.slice("Paris", d(2024, 6, 4), d(2024, 6, 1)).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn unknown_column_is_error() {
        let s = store();
        let err = s.slice("Tokyo", d(2024, 6, 1), d(2024, 6, 4)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn(ref c) if c == "Tokyo"));
    }

    #[test]
    fn malformed_date_rejects_load() {
        let csv = "Date,Paris\n2024-06-01,1.0\nnot-a-date,2.0\n";
        let err = ObservationStore::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();
        match err {
            StoreError::MalformedRow { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_date_rejects_load() {
        let csv = "Date,Paris\n2024-06-01,1.0\n2024-06-01,2.0\n";
        let err = ObservationStore::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateDate { line: 3, .. }));
    }

    #[test]
    fn missing_date_column() {
        let csv = "Day,Paris\n2024-06-01,1.0\n";
        let err = ObservationStore::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, StoreError::MissingDateColumn { .. }));
    }

    #[test]
    fn date_column_match_is_case_insensitive_fallback() {
        let csv = "date,Paris\n2024-06-01,1.0\n";
        let s = ObservationStore::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(s.row_count(), 1);
    }

    #[test]
    fn unsorted_rows_are_sorted() {
        let csv = "Date,Paris\n2024-06-03,3.0\n2024-06-01,1.0\n2024-06-02,2.0\n";
        let s = ObservationStore::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(s.dates(), &[d(2024, 6, 1), d(2024, 6, 2), d(2024, 6, 3)]);
        let w = s.series("Paris").unwrap();
        let values: Vec<f64> = w.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn short_rows_pad_with_missing() {
        let csv = "Date,Paris,London\n2024-06-01,1.0\n";
        let s = ObservationStore::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(s.present_count("London").unwrap(), 0);
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let err = ObservationStore::load(
            Path::new("/nonexistent/tourlens/ts_stream_data.csv"),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::SourceNotFound { .. }));
    }

    #[test]
    fn from_series_rejects_ragged_columns() {
        let err = ObservationStore::from_series(
            vec![d(2024, 6, 1), d(2024, 6, 2)],
            vec![("Paris".into(), vec![Some(1.0)])],
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::RaggedSeries { found: 1, expected: 2, .. }));
    }

    #[test]
    fn write_then_reload_is_identical() {
        let s = store();
        let mut buf = Vec::new();
        s.write_csv(&mut buf, "Date").unwrap();
        let reloaded = ObservationStore::from_reader(buf.as_slice(), &LoadOptions::default()).unwrap();
        assert_eq!(reloaded.columns(), s.columns());
        assert_eq!(reloaded.fingerprint(), s.fingerprint());
    }

    #[test]
    fn fingerprint_ignores_row_order() {
        let a = "Date,Paris\n2024-06-01,1.0\n2024-06-02,2.0\n";
        let b = "Date,Paris\n2024-06-02,2.0\n2024-06-01,1.0\n";
        let sa = ObservationStore::from_reader(a.as_bytes(), &LoadOptions::default()).unwrap();
        let sb = ObservationStore::from_reader(b.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(sa.fingerprint(), sb.fingerprint());

        let c = "Date,Paris\n2024-06-01,1.0\n2024-06-02,2.5\n";
        let sc = ObservationStore::from_reader(c.as_bytes(), &LoadOptions::default()).unwrap();
        assert_ne!(sa.fingerprint(), sc.fingerprint());
    }
}
