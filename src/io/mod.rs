//! File export of computed week data.

pub mod export;
