//! Dated rate series used for charting.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Points ordered by date, at most one per date. Later inserts for the same
/// date replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateSeries {
    points: BTreeMap<NaiveDate, f64>,
}

impl RateSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat series of `value` on every weekday in `start..=end`.
    pub fn business_days(start: NaiveDate, end: NaiveDate, value: f64) -> Self {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .map(|d| (d, value))
            .collect()
    }

    pub fn insert(&mut self, date: NaiveDate, rate: f64) {
        self.points.insert(date, rate);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.points.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().map(|(d, r)| (*d, *r))
    }

    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.first_key_value().map(|(d, r)| (*d, *r))
    }

    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.last_key_value().map(|(d, r)| (*d, *r))
    }

    pub fn min(&self) -> Option<f64> {
        self.points.values().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.points.values().copied().reduce(f64::max)
    }

    /// Keeps only positive, finite points.
    pub fn valid_only(&self) -> Self {
        self.iter()
            .filter(|(_, r)| r.is_finite() && *r > 0.0)
            .collect()
    }

    /// `1 / rate` per point. Non-positive or non-finite points are dropped.
    pub fn inverted(&self) -> Self {
        self.iter()
            .filter(|(_, r)| r.is_finite() && *r > 0.0)
            .map(|(d, r)| (d, 1.0 / r))
            .collect()
    }

    /// `self / other` on the dates present in both series. Dates where the
    /// divisor is not a positive number are dropped.
    pub fn divided_by(&self, other: &RateSeries) -> Self {
        self.iter()
            .filter_map(|(d, num)| {
                other
                    .get(&d)
                    .filter(|den| den.is_finite() && *den > 0.0 && num.is_finite())
                    .map(|den| (d, num / den))
            })
            .collect()
    }
}

impl FromIterator<(NaiveDate, f64)> for RateSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut series = RateSeries::new();
        for (date, rate) in iter {
            series.insert(date, rate);
        }
        series
    }
}
