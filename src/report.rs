//! Plain-text week summary, printed when no interactive display runs.

use std::fmt;

use chrono::NaiveDate;

use crate::week::WeekView;

/// Per-day deviation extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub samples: usize,
    /// Most negative deviation (MW), `None` if every value is missing.
    pub min_deviation: Option<f64>,
    /// Most positive deviation (MW).
    pub max_deviation: Option<f64>,
}

/// Headline numbers of one rendered week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub week_number: usize,
    pub total_weeks: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub horizon_mw: f64,
    pub max_dev_mw: f64,
    pub bands: usize,
    pub band_size_mw: f64,
    pub days: Vec<DaySummary>,
}

impl WeekSummary {
    /// Collects the summary of a built week view.
    pub fn from_view(view: &WeekView) -> Self {
        let days = view
            .days
            .iter()
            .map(|d| {
                let range = d.deviation_range();
                DaySummary {
                    date: d.date,
                    samples: d.points.len(),
                    min_deviation: range.map(|r| r.0),
                    max_deviation: range.map(|r| r.1),
                }
            })
            .collect();
        Self {
            week_number: view.week_number(),
            total_weeks: view.total_weeks(),
            first_date: view.selection.first_date(),
            last_date: view.selection.last_date(),
            horizon_mw: view.horizon,
            max_dev_mw: view.layout.max_dev(),
            bands: view.layout.bands(),
            band_size_mw: view.layout.band_size(),
            days,
        }
    }
}

impl fmt::Display for WeekSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--- Horizon Graph: setmana {}/{} ({} a {}) ---",
            self.week_number, self.total_weeks, self.first_date, self.last_date
        )?;
        writeln!(f, "Horitzó (mitja):   {} MW", format_thousands(self.horizon_mw))?;
        writeln!(f, "Desviació màxima:  {} MW", format_thousands(self.max_dev_mw))?;
        writeln!(
            f,
            "Bandes:            {} x {} MW",
            self.bands,
            format_thousands(self.band_size_mw)
        )?;
        for (i, d) in self.days.iter().enumerate() {
            let fmt_dev = |v: Option<f64>| v.map_or_else(|| "-".to_string(), format_signed);
            write!(
                f,
                "{}  n={:>2}  min={:>9}  max={:>9}",
                d.date,
                d.samples,
                fmt_dev(d.min_deviation),
                fmt_dev(d.max_deviation)
            )?;
            if i + 1 < self.days.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Prints the summary of `view` to stdout.
pub fn print_week_summary(view: &WeekView) {
    println!("{}", WeekSummary::from_view(view));
}

/// Rounds to whole units and groups thousands with commas: `15499.6` → `15,500`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_signed(value: f64) -> String {
    if value > 0.0 && format!("{value:.0}") != "0" {
        format!("+{}", format_thousands(value))
    } else {
        format_thousands(value)
    }
}
