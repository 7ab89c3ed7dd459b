use chrono::{Datelike, NaiveDate, Weekday};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::dataset::{Dataset, Observation};
use crate::error::Result;

/// A generator of hourly regional consumption shaped like a utility load curve.
///
/// The profile is a daily sinusoid around `base_mw` with a weekend drop and
/// Gaussian noise, enough to exercise every band of a horizon graph without
/// shipping a real dataset.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use horizon_graph::synthetic::SyntheticLoad;
///
/// let start = NaiveDate::from_ymd_opt(2004, 10, 1).unwrap();
/// let ds = SyntheticLoad::default().dataset(start, 14).unwrap();
/// assert_eq!(ds.len(), 14 * 24);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticLoad {
    /// Mean consumption in MW
    pub base_mw: f64,

    /// Amplitude of the daily swing in MW
    pub amp_mw: f64,

    /// Phase offset of the daily sinusoid in radians
    pub phase_rad: f64,

    /// Drop applied on Saturdays and Sundays in MW
    pub weekend_drop_mw: f64,

    /// Standard deviation of the Gaussian noise in MW
    pub noise_std: f64,

    /// Seed for reproducible noise
    pub seed: u64,
}

impl Default for SyntheticLoad {
    fn default() -> Self {
        Self {
            base_mw: 15_500.0,
            amp_mw: 2_500.0,
            phase_rad: -2.0,
            weekend_drop_mw: 1_200.0,
            noise_std: 300.0,
            seed: 42,
        }
    }
}

impl SyntheticLoad {
    /// Consumption at `hour` of `date`, without noise.
    pub fn profile_mw(&self, date: NaiveDate, hour: u32) -> f64 {
        let day_pos = f64::from(hour % 24) / 24.0;
        let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let drop = if weekend { self.weekend_drop_mw } else { 0.0 };
        self.base_mw + self.amp_mw * angle.sin() - drop
    }

    /// Hourly observations for `days` consecutive days starting at `start`.
    pub fn observations(&self, start: NaiveDate, days: usize) -> Vec<Observation> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut out = Vec::with_capacity(days * 24);
        for date in start.iter_days().take(days) {
            for hour in 0..24 {
                let Some(ts) = date.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let noise = if self.noise_std > 0.0 {
                    // Box-Muller
                    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
                    let u2: f64 = rng.random::<f64>();
                    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * self.noise_std
                } else {
                    0.0
                };
                let mw = (self.profile_mw(date, hour) + noise).max(0.0);
                out.push(Observation::new(ts, mw));
            }
        }
        out
    }

    /// Builds a dataset of `days` full days.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::HorizonError::EmptyDataset`] when `days` is zero.
    pub fn dataset(&self, start: NaiveDate, days: usize) -> Result<Dataset> {
        Dataset::from_observations(self.observations(start, days))
    }
}
