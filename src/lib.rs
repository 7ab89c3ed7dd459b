//! Horizon graphs of hourly electricity consumption.
//!
//! Deviations from the dataset-wide mean are folded into stacked color bands,
//! one strip per day, and rendered a week at a time.

pub mod bands;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod palette;
pub mod render;
pub mod report;
/// Seeded synthetic load for demos and tests.
pub mod synthetic;
#[cfg(feature = "tui")]
pub mod tui;
pub mod week;
