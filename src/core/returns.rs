//! Rolling and trailing return calculators over NAV histories.
//!
//! All results are percentages (`0.2` growth is `20.0`) and are not rounded.

use crate::core::nav::{NavPoint, NavSeries};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

const DAYS_PER_YEAR: i64 = 365;

/// Slack, in days, allowed between a window's actual length and the requested one.
pub const WINDOW_TOLERANCE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum TrailingPeriod {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    FiveYears,
    Inception,
}

impl TrailingPeriod {
    pub const ALL: [TrailingPeriod; 8] = [
        TrailingPeriod::OneWeek,
        TrailingPeriod::OneMonth,
        TrailingPeriod::ThreeMonths,
        TrailingPeriod::SixMonths,
        TrailingPeriod::OneYear,
        TrailingPeriod::ThreeYears,
        TrailingPeriod::FiveYears,
        TrailingPeriod::Inception,
    ];

    /// Look-back from the latest NAV; `None` for inception, which starts at the first NAV.
    pub fn to_duration(&self) -> Option<Duration> {
        match self {
            TrailingPeriod::OneWeek => Some(Duration::days(7)),
            TrailingPeriod::OneMonth => Some(Duration::days(30)),
            TrailingPeriod::ThreeMonths => Some(Duration::days(90)),
            TrailingPeriod::SixMonths => Some(Duration::days(180)),
            TrailingPeriod::OneYear => Some(Duration::days(DAYS_PER_YEAR)),
            TrailingPeriod::ThreeYears => Some(Duration::days(DAYS_PER_YEAR * 3)),
            TrailingPeriod::FiveYears => Some(Duration::days(DAYS_PER_YEAR * 5)),
            TrailingPeriod::Inception => None,
        }
    }
}

impl Display for TrailingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TrailingPeriod::OneWeek => "1W",
                TrailingPeriod::OneMonth => "1M",
                TrailingPeriod::ThreeMonths => "3M",
                TrailingPeriod::SixMonths => "6M",
                TrailingPeriod::OneYear => "1Y",
                TrailingPeriod::ThreeYears => "3Y",
                TrailingPeriod::FiveYears => "5Y",
                TrailingPeriod::Inception => "Inception",
            }
        )
    }
}

impl FromStr for TrailingPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1W" => Ok(TrailingPeriod::OneWeek),
            "1M" => Ok(TrailingPeriod::OneMonth),
            "3M" => Ok(TrailingPeriod::ThreeMonths),
            "6M" => Ok(TrailingPeriod::SixMonths),
            "1Y" => Ok(TrailingPeriod::OneYear),
            "3Y" => Ok(TrailingPeriod::ThreeYears),
            "5Y" => Ok(TrailingPeriod::FiveYears),
            "INCEPTION" => Ok(TrailingPeriod::Inception),
            _ => Err(anyhow::anyhow!("Invalid trailing period: {}", s)),
        }
    }
}

/// Outcome of a trailing return lookup. A short history is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrailingReturn {
    Value(f64),
    InsufficientHistory,
}

impl TrailingReturn {
    pub fn value(&self) -> Option<f64> {
        match self {
            TrailingReturn::Value(v) => Some(*v),
            TrailingReturn::InsufficientHistory => None,
        }
    }
}

/// Compound annual growth between two NAVs `days` apart, as a percentage.
pub fn cagr(start_nav: f64, end_nav: f64, days: i64) -> f64 {
    ((end_nav / start_nav).powf(DAYS_PER_YEAR as f64 / days as f64) - 1.0) * 100.0
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Mean CAGR over every `years`-long window in the series.
///
/// A window ends at each NAV in turn and starts at the earliest NAV not before
/// `end - years * 365` days. Windows whose real length misses the target by more than
/// [`WINDOW_TOLERANCE_DAYS`], or that start at a non-positive NAV, are ignored. Returns `0.0`
/// when no window qualifies.
pub fn rolling_return(series: &NavSeries, years: u32) -> f64 {
    let points = series.points();
    let window_days = i64::from(years) * DAYS_PER_YEAR;
    let mut window_cagrs = Vec::new();
    let mut start_idx = 0;

    let Some(window) = Duration::try_days(window_days) else {
        return 0.0;
    };

    for (end_idx, end) in points.iter().enumerate() {
        let Some(target_date) = end.date.checked_sub_signed(window) else {
            continue;
        };
        while start_idx < end_idx && points[start_idx].date < target_date {
            start_idx += 1;
        }
        if start_idx >= end_idx {
            continue;
        }

        let start = &points[start_idx];
        let days = days_between(start.date, end.date);
        if (days - window_days).abs() <= WINDOW_TOLERANCE_DAYS && start.nav > 0.0 && days > 0 {
            window_cagrs.push(cagr(start.nav, end.nav, days));
        }
    }

    if window_cagrs.is_empty() {
        return 0.0;
    }
    window_cagrs.iter().sum::<f64>() / window_cagrs.len() as f64
}

/// First point with the smallest absolute day distance to `target`.
fn closest_to(points: &[NavPoint], target: NaiveDate) -> Option<&NavPoint> {
    let mut closest = None;
    let mut min_diff = i64::MAX;
    for point in points {
        let diff = days_between(target, point.date).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = Some(point);
        }
    }
    closest
}

/// Return from the NAV closest to `latest - period` up to the latest NAV.
///
/// Periods of a year or more are annualised (CAGR); shorter ones are simple returns.
pub fn trailing_return(series: &NavSeries, period: TrailingPeriod) -> TrailingReturn {
    let (Some(first), Some(latest)) = (series.first(), series.latest()) else {
        return TrailingReturn::InsufficientHistory;
    };

    let target_date = match period.to_duration() {
        Some(duration) => latest.date - duration,
        None => first.date,
    };

    if period != TrailingPeriod::Inception
        && days_between(first.date, latest.date) < days_between(target_date, latest.date)
    {
        return TrailingReturn::InsufficientHistory;
    }

    let Some(start) = closest_to(series.points(), target_date) else {
        return TrailingReturn::InsufficientHistory;
    };

    let days = days_between(start.date, latest.date);
    if days == 0 {
        return TrailingReturn::Value(0.0);
    }
    if start.nav <= 0.0 {
        return TrailingReturn::InsufficientHistory;
    }

    if days >= DAYS_PER_YEAR {
        TrailingReturn::Value(cagr(start.nav, latest.nav, days))
    } else {
        TrailingReturn::Value((latest.nav - start.nav) / start.nav * 100.0)
    }
}

/// Trailing returns for every supported period.
pub fn trailing_returns(series: &NavSeries) -> BTreeMap<TrailingPeriod, TrailingReturn> {
    TrailingPeriod::ALL
        .iter()
        .map(|period| (*period, trailing_return(series, *period)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::RawNavEntry;

    fn day0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    fn point(offset: i64, nav: f64) -> NavPoint {
        NavPoint {
            date: day0() + Duration::days(offset),
            nav,
        }
    }

    /// Daily NAVs compounding at `rate` a year, without gaps.
    fn constant_growth(days: i64, rate: f64) -> NavSeries {
        NavSeries::new(
            (0..=days)
                .map(|d| point(d, 100.0 * (1.0 + rate).powf(d as f64 / 365.0)))
                .collect(),
        )
    }

    #[test]
    fn test_rolling_return_converges_to_constant_rate() {
        let series = constant_growth(365 * 5, 0.12);

        for years in [1, 3] {
            let rolling = rolling_return(&series, years);
            assert!(
                (rolling - 12.0).abs() < 1e-6,
                "{years}Y rolling return was {rolling}"
            );
        }
    }

    #[test]
    fn test_rolling_return_without_enough_history_is_zero() {
        let series = constant_growth(365, 0.10);
        assert_eq!(rolling_return(&series, 3), 0.0);
        assert_eq!(rolling_return(&NavSeries::default(), 3), 0.0);
    }

    #[test]
    fn test_rolling_return_accepts_windows_within_tolerance() {
        // The only start candidate is 5 days short of a full year before the end
        let series = NavSeries::new(vec![point(0, 100.0), point(360, 110.0)]);
        let expected = cagr(100.0, 110.0, 360);
        assert!((rolling_return(&series, 1) - expected).abs() < 1e-9);

        let series = NavSeries::new(vec![point(0, 100.0), point(350, 110.0)]);
        assert_eq!(rolling_return(&series, 1), 0.0);
    }

    #[test]
    fn test_rolling_return_skips_non_positive_start() {
        let series = NavSeries::new(vec![point(0, 0.0), point(365, 110.0)]);
        assert_eq!(rolling_return(&series, 1), 0.0);
    }

    #[test]
    fn test_rolling_return_from_unsorted_raw_entries() {
        let raw = vec![
            RawNavEntry::new("31-12-2019", 121.0),
            RawNavEntry::new("garbage", 1.0),
            RawNavEntry::new("01-01-2019", 110.0),
            RawNavEntry::new("01-01-2018", 100.0),
        ];
        let series = NavSeries::from_raw(&raw);

        // Windows end on 01-01-2019 (365 days) and 31-12-2019 (364 days)
        let expected = (cagr(100.0, 110.0, 365) + cagr(110.0, 121.0, 364)) / 2.0;
        assert!((rolling_return(&series, 1) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_return_one_year_boundary() {
        let series = NavSeries::new(vec![point(0, 100.0), point(365, 120.0)]);
        match trailing_return(&series, TrailingPeriod::OneYear) {
            TrailingReturn::Value(v) => assert!((v - 20.0).abs() < 1e-9),
            other => panic!("Expected a value, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_return_insufficient_history() {
        let series = constant_growth(200, 0.10);

        assert_eq!(
            trailing_return(&series, TrailingPeriod::OneYear),
            TrailingReturn::InsufficientHistory
        );
        assert!(
            trailing_return(&series, TrailingPeriod::Inception)
                .value()
                .is_some()
        );
        assert!(
            trailing_return(&series, TrailingPeriod::SixMonths)
                .value()
                .is_some()
        );
    }

    #[test]
    fn test_trailing_return_short_period_is_simple_return() {
        let series = NavSeries::new(vec![point(0, 100.0), point(23, 102.0), point(30, 105.0)]);
        let value = trailing_return(&series, TrailingPeriod::OneWeek).value().unwrap();
        assert!((value - (105.0 - 102.0) / 102.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_return_window_beyond_calendar_range() {
        let series = NavSeries::new(vec![point(0, 10.0), point(1, 10.1)]);

        assert_eq!(rolling_return(&series, 1_000_000), 0.0);
        assert_eq!(rolling_return(&series, u32::MAX), 0.0);
    }

    #[test]
    fn test_trailing_return_first_closest_wins_ties() {
        // Target is day 10; days 8 and 12 are equally close, day 8 comes first
        let series = NavSeries::new(vec![
            point(0, 90.0),
            point(8, 100.0),
            point(12, 200.0),
            point(40, 110.0),
        ]);
        let value = trailing_return(&series, TrailingPeriod::OneMonth).value().unwrap();
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_return_single_point_is_zero() {
        let series = NavSeries::new(vec![point(0, 100.0)]);
        assert_eq!(
            trailing_return(&series, TrailingPeriod::Inception),
            TrailingReturn::Value(0.0)
        );
        assert_eq!(
            trailing_return(&NavSeries::default(), TrailingPeriod::Inception),
            TrailingReturn::InsufficientHistory
        );
    }

    #[test]
    fn test_trailing_returns_covers_all_periods() {
        let returns = trailing_returns(&constant_growth(365 * 2, 0.08));

        assert_eq!(returns.len(), TrailingPeriod::ALL.len());
        assert!(returns[&TrailingPeriod::OneYear].value().is_some());
        assert_eq!(
            returns[&TrailingPeriod::ThreeYears],
            TrailingReturn::InsufficientHistory
        );
        let inception = returns[&TrailingPeriod::Inception].value().unwrap();
        assert!((inception - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_period_round_trips_through_strings() {
        for period in TrailingPeriod::ALL {
            assert_eq!(period.to_string().parse::<TrailingPeriod>().unwrap(), period);
        }
        assert!("2Y".parse::<TrailingPeriod>().is_err());
    }
}
