//! Band layout: folding deviations into equal-width slices of the week's range.

use tracing::warn;

use crate::error::{HorizonError, Result};

/// Which side of the horizon a band set represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Above the horizon.
    Positive,
    /// Below the horizon, drawn as a mirrored magnitude.
    Negative,
}

impl Polarity {
    pub const BOTH: [Self; 2] = [Self::Positive, Self::Negative];

    /// Magnitude of `deviation` on this side, zero on the other side.
    /// Missing (`NaN`) deviations map to zero.
    pub fn magnitude(self, deviation: f64) -> f64 {
        match self {
            Self::Positive => deviation.max(0.0),
            Self::Negative => (-deviation).max(0.0),
        }
    }
}

/// One slice `[lower, upper]` of the deviation range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Zero-based index, 0 is nearest the horizon.
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    /// Height of `magnitude` inside this band, in `[0, upper - lower]`.
    pub fn fold(&self, magnitude: f64) -> f64 {
        if magnitude.is_nan() {
            return 0.0;
        }
        magnitude.clamp(self.lower, self.upper) - self.lower
    }
}

/// Equal-width partition of `[0, max_dev]` into `bands` slices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    max_dev: f64,
    bands: usize,
    band_size: f64,
}

impl BandLayout {
    /// Creates a layout for the largest absolute deviation of a week.
    ///
    /// A non-finite or zero `max_abs_deviation` (a flat or empty week) falls
    /// back to `1.0` so the band size never divides by zero.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError::InvalidBands`] when `bands` is zero.
    pub fn new(max_abs_deviation: f64, bands: usize) -> Result<Self> {
        if bands == 0 {
            return Err(HorizonError::InvalidBands(bands));
        }
        let max_dev = if !max_abs_deviation.is_finite() || max_abs_deviation == 0.0 {
            warn!(
                max_abs_deviation,
                "degenerate week: every value sits on the horizon, using unit range"
            );
            1.0
        } else {
            max_abs_deviation
        };
        Ok(Self {
            max_dev,
            bands,
            band_size: max_dev / bands as f64,
        })
    }

    pub fn max_dev(&self) -> f64 {
        self.max_dev
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Height of one band, also the y-extent of every strip.
    pub fn band_size(&self) -> f64 {
        self.band_size
    }

    /// The band at `index` (0-based).
    pub fn band(&self, index: usize) -> Band {
        Band {
            index,
            lower: index as f64 * self.band_size,
            upper: (index + 1) as f64 * self.band_size,
        }
    }

    /// All bands, nearest the horizon first.
    pub fn iter(&self) -> impl Iterator<Item = Band> + '_ {
        (0..self.bands).map(|i| self.band(i))
    }

    /// Per-band heights of `magnitude`.
    pub fn decompose(&self, magnitude: f64) -> Vec<f64> {
        self.iter().map(|b| b.fold(magnitude)).collect()
    }
}
