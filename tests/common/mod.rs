//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// First day of every fixture (2004-10-01).
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2004, 10, 1).expect("valid date")
}

/// Day (1-indexed) and hour of the single spike in [`spike_csv`].
pub const SPIKE_DAY: usize = 3;
pub const SPIKE_HOUR: u32 = 12;

/// Hourly `Datetime,AEP_MW` text for `days` days, valued by `value(day, hour)`.
pub fn hourly_csv_text(days: usize, value: impl Fn(usize, u32) -> f64) -> String {
    let mut out = String::from("Datetime,AEP_MW\n");
    for (d, date) in start_date().iter_days().take(days).enumerate() {
        for h in 0..24 {
            let _ = writeln!(out, "{date} {h:02}:00:00,{}", value(d + 1, h));
        }
    }
    out
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture should be writable");
    path
}

/// 14 days at a constant 100 MW, except one 200 MW hour on day 3.
pub fn spike_csv(dir: &Path) -> PathBuf {
    let text = hourly_csv_text(14, |day, hour| {
        if day == SPIKE_DAY && hour == SPIKE_HOUR {
            200.0
        } else {
            100.0
        }
    });
    write_file(dir, "spike.csv", &text)
}

/// Expected horizon of [`spike_csv`]: one extra 100 MW over 336 samples.
pub fn spike_horizon() -> f64 {
    100.0 + 100.0 / 336.0
}
