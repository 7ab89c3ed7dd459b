//! CSV export of a week's folded band heights.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::bands::Polarity;
use crate::error::{HorizonError, Result};
use crate::week::WeekView;

/// Fixed leading columns; band columns follow.
const LEADING_COLUMNS: [&str; 4] = ["date", "hour", "value_mw", "deviation_mw"];

/// Header for a layout with `bands` bands per polarity.
pub fn header(bands: usize) -> Vec<String> {
    let mut cols: Vec<String> = LEADING_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    for prefix in ["pos", "neg"] {
        cols.extend((1..=bands).map(|i| format!("{prefix}_band_{i}")));
    }
    cols
}

/// Exports the week's per-hour band heights to a CSV file at `path`.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(view: &WeekView, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| HorizonError::io(path, e))?;
    write_csv(view, io::BufWriter::new(file))?;
    info!(path = %path.display(), "exported band heights");
    Ok(())
}

/// Writes the week's per-hour band heights as CSV to any writer.
///
/// One row per observation, in day then hour order. Missing values are
/// written as empty cells; their band heights are zero.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(view: &WeekView, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let layout = &view.layout;

    wtr.write_record(header(layout.bands()))?;

    for day in &view.days {
        let date = day.date.to_string();
        for p in &day.points {
            let mut row = vec![
                date.clone(),
                p.hour.to_string(),
                fmt_opt(p.value_mw),
                fmt_opt(p.deviation),
            ];
            for polarity in Polarity::BOTH {
                let magnitude = polarity.magnitude(p.deviation);
                row.extend(
                    layout
                        .decompose(magnitude)
                        .into_iter()
                        .map(|h| format!("{h:.4}")),
                );
            }
            wtr.write_record(&row)?;
        }
    }

    wtr.flush().map_err(|e| HorizonError::Csv(e.into()))?;
    Ok(())
}

fn fmt_opt(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.4}")
    } else {
        String::new()
    }
}
