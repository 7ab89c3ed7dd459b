//! Hourly consumption dataset: CSV loading, ordering and the global horizon.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use crate::error::{HorizonError, Result};

/// Timestamp layouts accepted in the time column, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Value cells read as missing, besides the empty cell.
const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "#N/A", "#N/A N/A", "#NA", "<NA>", "NULL", "null", "None", "NaN", "nan",
    "-NaN", "-nan", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

fn is_missing_token(raw: &str) -> bool {
    raw.is_empty() || MISSING_TOKENS.contains(&raw)
}

/// One hourly reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Local wall-clock time of the reading.
    pub timestamp: NaiveDateTime,
    /// Consumption in MW. `NaN` marks a missing cell.
    pub value_mw: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, value_mw: f64) -> Self {
        Self {
            timestamp,
            value_mw,
        }
    }

    /// Calendar date of the reading.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour of day, 0–23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Returns `true` when the value cell was empty or non-finite.
    pub fn is_missing(&self) -> bool {
        !self.value_mw.is_finite()
    }
}

/// Names of the time and value columns in the input CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub time: String,
    pub value: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            time: "Datetime".to_string(),
            value: "AEP_MW".to_string(),
        }
    }
}

/// Observations sorted ascending by timestamp. Never empty.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Builds a dataset from unsorted observations.
    ///
    /// The sort is stable, so repeated timestamps (daylight-saving fall-back
    /// hours) keep their input order.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError::EmptyDataset`] if `observations` is empty.
    pub fn from_observations(mut observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(HorizonError::EmptyDataset);
        }
        observations.sort_by_key(|o| o.timestamp);
        Ok(Self { observations })
    }

    /// Loads a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a cell cannot be parsed,
    /// a column is missing, or the file holds no rows.
    pub fn from_path(path: &Path, columns: &Columns) -> Result<Self> {
        let file = File::open(path).map_err(|e| HorizonError::io(path, e))?;
        let dataset = Self::from_reader(file, columns)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            "loaded consumption dataset"
        );
        Ok(dataset)
    }

    /// Parses a dataset from any CSV source with a header row.
    ///
    /// Columns are looked up by name. When neither name is present and the
    /// header has exactly two fields, they are taken as (time, value).
    ///
    /// # Errors
    ///
    /// See [`Dataset::from_path`].
    pub fn from_reader<R: Read>(reader: R, columns: &Columns) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = rdr.headers()?.clone();
        if header.is_empty() {
            return Err(HorizonError::EmptyDataset);
        }
        let (time_idx, value_idx) = resolve_columns(&header, columns)?;
        debug!(time_idx, value_idx, "resolved CSV columns");

        let mut observations = Vec::new();
        let mut missing = 0_usize;
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let raw_time = record.get(time_idx).unwrap_or("");
            let timestamp = parse_timestamp(raw_time).ok_or_else(|| HorizonError::Timestamp {
                line,
                raw: raw_time.to_string(),
            })?;
            let raw_value = record.get(value_idx).unwrap_or("");
            let value_mw = if is_missing_token(raw_value) {
                missing += 1;
                f64::NAN
            } else {
                raw_value.parse::<f64>().map_err(|_| HorizonError::Value {
                    line,
                    raw: raw_value.to_string(),
                })?
            };
            observations.push(Observation::new(timestamp, value_mw));
        }

        if missing > 0 {
            warn!(missing, "missing value cells are excluded from the horizon");
        }
        Self::from_observations(observations)
    }

    /// All observations in timestamp order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// A loaded dataset holds at least one observation, so this is `false`.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Arithmetic mean of every finite value in the dataset.
    ///
    /// Returns `NaN` when no finite value exists.
    pub fn global_horizon(&self) -> f64 {
        let (sum, count) = self
            .observations
            .iter()
            .filter(|o| !o.is_missing())
            .fold((0.0_f64, 0_usize), |(s, n), o| (s + o.value_mw, n + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }

    /// Distinct calendar dates, ascending.
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.observations.iter().map(Observation::date).collect();
        dates.dedup();
        dates
    }
}

fn resolve_columns(header: &csv::StringRecord, columns: &Columns) -> Result<(usize, usize)> {
    let find = |name: &str| header.iter().position(|h| h == name);
    match (find(&columns.time), find(&columns.value)) {
        (Some(t), Some(v)) => Ok((t, v)),
        (None, None) if header.len() == 2 => Ok((0, 1)),
        (t, _) => {
            let column = if t.is_none() {
                &columns.time
            } else {
                &columns.value
            };
            Err(HorizonError::MissingColumn {
                column: column.clone(),
                header: header.iter().collect::<Vec<_>>().join(", "),
            })
        }
    }
}

/// Parses a timestamp cell. A bare date maps to midnight; RFC 3339 values
/// with an offset keep their local wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<Dataset> {
        Dataset::from_reader(csv.as_bytes(), &Columns::default())
    }

    #[test]
    fn rows_are_sorted_by_timestamp() {
        let ds = load(
            "Datetime,AEP_MW\n\
             2004-10-02 01:00:00,300\n\
             2004-10-01 01:00:00,100\n\
             2004-10-01 02:00:00,200\n",
        )
        .expect("valid csv");
        let values: Vec<f64> = ds.observations().iter().map(|o| o.value_mw).collect();
        assert_eq!(values, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let err = load("Datetime,AEP_MW\n").unwrap_err();
        assert!(matches!(err, HorizonError::EmptyDataset));
    }

    #[test]
    fn blank_input_is_empty_dataset() {
        let err = load("").unwrap_err();
        assert!(matches!(err, HorizonError::EmptyDataset));
    }

    #[test]
    fn horizon_is_mean_of_all_values() {
        let ds = load(
            "Datetime,AEP_MW\n\
             2004-10-01 00:00:00,10\n\
             2004-10-01 01:00:00,20\n\
             2004-10-02 00:00:00,60\n",
        )
        .expect("valid csv");
        assert!((ds.global_horizon() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn empty_value_cells_are_skipped_by_mean() {
        let ds = load(
            "Datetime,AEP_MW\n\
             2004-10-01 00:00:00,10\n\
             2004-10-01 01:00:00,\n\
             2004-10-01 02:00:00,30\n",
        )
        .expect("valid csv");
        assert_eq!(ds.len(), 3);
        assert!(ds.observations()[1].is_missing());
        assert!((ds.global_horizon() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn missing_value_markers_are_skipped_by_mean() {
        for marker in ["NA", "N/A", "null", "NULL", "None", "#N/A", "<NA>", "-nan"] {
            let csv = format!(
                "Datetime,AEP_MW\n\
                 2004-10-01 00:00:00,10\n\
                 2004-10-01 01:00:00,{marker}\n\
                 2004-10-01 02:00:00,30\n"
            );
            let ds = load(&csv).unwrap_or_else(|e| panic!("{marker} should load: {e}"));
            assert_eq!(ds.len(), 3);
            assert!(ds.observations()[1].is_missing(), "{marker}");
            assert!((ds.global_horizon() - 20.0).abs() < 1e-9, "{marker}");
        }
    }

    #[test]
    fn bad_value_reports_line() {
        let err = load("Datetime,AEP_MW\n2004-10-01 00:00:00,abc\n").unwrap_err();
        match err {
            HorizonError::Value { line, raw } => {
                assert_eq!(line, 2);
                assert_eq!(raw, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let err = load("Datetime,AEP_MW\nyesterday,5\n").unwrap_err();
        assert!(matches!(err, HorizonError::Timestamp { .. }));
    }

    #[test]
    fn two_unnamed_columns_are_positional() {
        let ds = load("when,mw\n2004-10-01 00:00:00,5\n").expect("positional columns");
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn missing_named_column_is_reported() {
        let err = load("Datetime,PJM_MW,extra\n2004-10-01 00:00:00,5,1\n").unwrap_err();
        match err {
            HorizonError::MissingColumn { column, .. } => assert_eq!(column, "AEP_MW"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn distinct_dates_are_sorted_and_unique() {
        let ds = load(
            "Datetime,AEP_MW\n\
             2004-10-03 05:00:00,1\n\
             2004-10-01 00:00:00,1\n\
             2004-10-01 23:00:00,1\n\
             2004-10-02 12:00:00,1\n",
        )
        .expect("valid csv");
        let dates: Vec<String> = ds.distinct_dates().iter().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2004-10-01", "2004-10-02", "2004-10-03"]);
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2004-10-01 01:00:00").is_some());
        assert!(parse_timestamp("2004-10-01T01:00:00").is_some());
        assert!(parse_timestamp("2004-10-01 01:00").is_some());
        assert!(parse_timestamp("2004-10-01T01:00:00+02:00").is_some());
        let midnight = parse_timestamp("2004-10-01").expect("bare date");
        assert_eq!(midnight.hour(), 0);
        assert!(parse_timestamp("01/10/2004").is_none());
    }
}
