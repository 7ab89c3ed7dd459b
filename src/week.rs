//! Week selection and per-day deviation series.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::bands::{BandLayout, Polarity};
use crate::dataset::Dataset;
use crate::error::{HorizonError, Result};

/// Distinct dates per week slice.
pub const DAYS_PER_WEEK: usize = 7;

/// Number of week slices covering `date_count` distinct dates.
pub fn total_weeks(date_count: usize) -> usize {
    date_count.div_ceil(DAYS_PER_WEEK)
}

/// A validated week slice of the dataset's dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSelection {
    /// 1-indexed week number.
    pub week_number: usize,
    pub total_weeks: usize,
    /// Up to seven consecutive distinct dates, ascending. The last week may
    /// be shorter.
    pub dates: Vec<NaiveDate>,
}

impl WeekSelection {
    /// Picks week `week_number` from sorted distinct `dates`.
    ///
    /// # Errors
    ///
    /// - [`HorizonError::NoValidDates`] if `dates` is empty
    /// - [`HorizonError::WeekOutOfRange`] if `week_number` is outside `[1, total_weeks]`
    /// - [`HorizonError::EmptyWeek`] if the slice is empty
    pub fn select(dates: &[NaiveDate], week_number: i64) -> Result<Self> {
        if dates.is_empty() {
            return Err(HorizonError::NoValidDates);
        }
        let total = total_weeks(dates.len());
        let week = usize::try_from(week_number)
            .ok()
            .filter(|w| (1..=total).contains(w))
            .ok_or(HorizonError::WeekOutOfRange {
                total_weeks: total,
                requested: week_number,
            })?;

        let start = (week - 1) * DAYS_PER_WEEK;
        let end = (start + DAYS_PER_WEEK).min(dates.len());
        let slice = dates.get(start..end).unwrap_or_default();
        if slice.is_empty() {
            return Err(HorizonError::EmptyWeek);
        }
        Ok(Self {
            week_number: week,
            total_weeks: total,
            dates: slice.to_vec(),
        })
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }
}

/// One hourly sample of a day, relative to the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourPoint {
    pub hour: u32,
    pub value_mw: f64,
    /// `value_mw - horizon`; `NaN` for a missing value.
    pub deviation: f64,
}

/// All samples of one calendar day, sorted by hour.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySeries {
    pub date: NaiveDate,
    pub points: Vec<HourPoint>,
}

impl DaySeries {
    /// Smallest and largest finite deviation of the day.
    pub fn deviation_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| p.deviation)
            .filter(|d| d.is_finite())
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }

    /// Folded `(hour, height)` polylines, one per band, for one polarity.
    pub fn band_heights(&self, layout: &BandLayout, polarity: Polarity) -> Vec<Vec<(f64, f64)>> {
        layout
            .iter()
            .map(|band| {
                self.points
                    .iter()
                    .map(|p| (f64::from(p.hour), band.fold(polarity.magnitude(p.deviation))))
                    .collect()
            })
            .collect()
    }
}

/// Everything needed to draw one week: horizon, daily series and bands.
#[derive(Debug, Clone)]
pub struct WeekView {
    pub selection: WeekSelection,
    /// Global mean of the whole dataset.
    pub horizon: f64,
    pub days: Vec<DaySeries>,
    pub layout: BandLayout,
}

impl WeekView {
    /// Selects week `week_number` of `dataset` and folds it into `bands` slices.
    ///
    /// # Errors
    ///
    /// Propagates selection errors from [`WeekSelection::select`] and
    /// [`HorizonError::InvalidBands`] for `bands == 0`.
    pub fn build(dataset: &Dataset, week_number: i64, bands: usize) -> Result<Self> {
        let horizon = dataset.global_horizon();
        let selection = WeekSelection::select(&dataset.distinct_dates(), week_number)?;
        info!(
            week = selection.week_number,
            total_weeks = selection.total_weeks,
            first = %selection.first_date(),
            last = %selection.last_date(),
            horizon,
            "selected week"
        );

        let mut days: Vec<DaySeries> = selection
            .dates
            .iter()
            .map(|&date| DaySeries {
                date,
                points: Vec::new(),
            })
            .collect();
        for obs in dataset.observations() {
            let Ok(idx) = selection.dates.binary_search(&obs.date()) else {
                continue;
            };
            days[idx].points.push(HourPoint {
                hour: obs.hour(),
                value_mw: obs.value_mw,
                deviation: obs.value_mw - horizon,
            });
        }
        for day in &mut days {
            day.points.sort_by_key(|p| p.hour);
            debug!(date = %day.date, samples = day.points.len(), "day series");
        }

        let max_abs = days
            .iter()
            .flat_map(|d| d.points.iter())
            .map(|p| p.deviation.abs())
            .filter(|d| !d.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);
        let layout = BandLayout::new(max_abs, bands)?;

        Ok(Self {
            selection,
            horizon,
            days,
            layout,
        })
    }

    pub fn week_number(&self) -> usize {
        self.selection.week_number
    }

    pub fn total_weeks(&self) -> usize {
        self.selection.total_weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Observation;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2004, 10, day).expect("valid date")
    }

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n).map(date).collect()
    }

    fn hourly(days: u32, value: impl Fn(u32, u32) -> f64) -> Dataset {
        let mut obs = Vec::new();
        for d in 1..=days {
            for h in 0..24 {
                let ts = date(d).and_hms_opt(h, 0, 0).expect("valid time");
                obs.push(Observation::new(ts, value(d, h)));
            }
        }
        Dataset::from_observations(obs).expect("non-empty")
    }

    #[test]
    fn total_weeks_is_ceiling() {
        assert_eq!(total_weeks(1), 1);
        assert_eq!(total_weeks(7), 1);
        assert_eq!(total_weeks(8), 2);
        assert_eq!(total_weeks(14), 2);
        assert_eq!(total_weeks(15), 3);
    }

    #[test]
    fn week_bounds_are_enforced() {
        let all = dates(10);
        assert!(matches!(
            WeekSelection::select(&all, 0),
            Err(HorizonError::WeekOutOfRange { total_weeks: 2, requested: 0 })
        ));
        assert!(matches!(
            WeekSelection::select(&all, 3),
            Err(HorizonError::WeekOutOfRange { total_weeks: 2, requested: 3 })
        ));
        assert!(WeekSelection::select(&all, -1).is_err());
        assert!(WeekSelection::select(&all, 1).is_ok());
        assert!(WeekSelection::select(&all, 2).is_ok());
    }

    #[test]
    fn no_dates_is_an_error() {
        assert!(matches!(
            WeekSelection::select(&[], 1),
            Err(HorizonError::NoValidDates)
        ));
    }

    #[test]
    fn last_week_is_truncated() {
        let sel = WeekSelection::select(&dates(10), 2).expect("week 2");
        assert_eq!(sel.dates.len(), 3);
        assert_eq!(sel.first_date(), date(8));
        assert_eq!(sel.last_date(), date(10));
    }

    #[test]
    fn horizon_is_independent_of_week() {
        let ds = hourly(14, |d, h| f64::from(d * 10 + h));
        let w1 = WeekView::build(&ds, 1, 3).expect("week 1");
        let w2 = WeekView::build(&ds, 2, 3).expect("week 2");
        assert_eq!(w1.horizon, w2.horizon);
        assert!((w1.horizon - ds.global_horizon()).abs() < 1e-12);
    }

    #[test]
    fn flat_week_uses_unit_range() {
        let ds = hourly(7, |_, _| 250.0);
        let view = WeekView::build(&ds, 1, 3).expect("flat week");
        assert_eq!(view.layout.max_dev(), 1.0);
        assert!(view.layout.band_size().is_finite());
        for day in &view.days {
            for heights in day.band_heights(&view.layout, Polarity::Positive) {
                assert!(heights.iter().all(|&(_, h)| h == 0.0));
            }
        }
    }

    #[test]
    fn day_points_sorted_by_hour_with_deviation() {
        let mut obs = Vec::new();
        for h in [5_u32, 1, 3] {
            let ts = date(1).and_hms_opt(h, 0, 0).expect("valid time");
            obs.push(Observation::new(ts, f64::from(h)));
        }
        let ds = Dataset::from_observations(obs).expect("non-empty");
        let view = WeekView::build(&ds, 1, 2).expect("week");
        let day = &view.days[0];
        let hours: Vec<u32> = day.points.iter().map(|p| p.hour).collect();
        assert_eq!(hours, vec![1, 3, 5]);
        // horizon = 3
        assert_eq!(day.deviation_range(), Some((-2.0, 2.0)));
        assert_eq!(view.layout.max_dev(), 2.0);
    }

    #[test]
    fn negative_deviation_folds_into_negative_bands() {
        let ds = hourly(1, |_, h| if h == 0 { 0.0 } else { 24.0 });
        // horizon = 23, hour 0 deviates by -23, others by +1
        let view = WeekView::build(&ds, 1, 1).expect("week");
        let neg = view.days[0].band_heights(&view.layout, Polarity::Negative);
        assert_eq!(neg.len(), 1);
        assert!((neg[0][0].1 - 23.0).abs() < 1e-9);
        assert_eq!(neg[0][1].1, 0.0);
    }
}
