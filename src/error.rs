//! Error type shared by loading, week selection and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or drawing a horizon graph.
///
/// The four data-validation variants (`EmptyDataset`, `NoValidDates`,
/// `WeekOutOfRange`, `EmptyWeek`) carry user-facing messages; the rest wrap
/// the underlying I/O, CSV and rendering failures with enough context to
/// locate the problem.
#[derive(Error, Debug)]
pub enum HorizonError {
    /// The input file contained a header but no observations.
    #[error("No s'han trobat dades al dataset.")]
    EmptyDataset,

    /// No calendar date could be derived from the observations.
    #[error("No hi ha dates vàlides al dataset.")]
    NoValidDates,

    /// The requested week lies outside `[1, total_weeks]`.
    #[error("El número de setmana ha d'estar entre 1 i {total_weeks}. Valor rebut: {requested}")]
    WeekOutOfRange { total_weeks: usize, requested: i64 },

    /// The week slice resolved to no dates.
    #[error("No hi ha dades per a la setmana indicada.")]
    EmptyWeek,

    /// Band count must be at least one.
    #[error("invalid band count {0}: must be >= 1")]
    InvalidBands(usize),

    /// A required column is missing from the CSV header.
    #[error("column \"{column}\" not found in header [{header}]")]
    MissingColumn { column: String, header: String },

    /// A timestamp cell could not be parsed.
    #[error("line {line}: cannot parse timestamp \"{raw}\"")]
    Timestamp { line: u64, raw: String },

    /// A consumption cell could not be parsed as a number.
    #[error("line {line}: cannot parse value \"{raw}\"")]
    Value { line: u64, raw: String },

    /// Failure opening or writing a file.
    #[error("cannot access \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The plotting backend failed to draw or encode the figure.
    #[error("render error: {0}")]
    Render(String),

    /// The interactive display could not set up, draw to or restore the terminal.
    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),
}

impl HorizonError {
    /// Wraps an `io::Error` with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, HorizonError>;
