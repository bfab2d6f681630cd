//! NAV time series as delivered by market-data providers, and their parsed, date-ordered form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%Y-%m-%d", "%d-%b-%Y"];

/// NAV values arrive either as JSON strings ("123.45") or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNav {
    Number(f64),
    Text(String),
}

impl RawNav {
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawNav::Number(n) => *n,
            RawNav::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// One unparsed `{date, nav}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNavEntry {
    pub date: String,
    pub nav: RawNav,
}

impl RawNavEntry {
    pub fn new(date: impl Into<String>, nav: f64) -> Self {
        Self {
            date: date.into(),
            nav: RawNav::Number(nav),
        }
    }
}

pub fn parse_nav_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub nav: f64,
}

/// A NAV history sorted ascending by date. Construction drops records whose date or value
/// cannot be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSeries {
    points: Vec<NavPoint>,
}

impl NavSeries {
    pub fn new(mut points: Vec<NavPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn from_raw(entries: &[RawNavEntry]) -> Self {
        let points = entries
            .iter()
            .filter_map(|entry| {
                let parsed = parse_nav_date(&entry.date).zip(entry.nav.parse());
                if parsed.is_none() {
                    debug!(date = %entry.date, nav = ?entry.nav, "Skipping malformed NAV entry");
                }
                parsed.map(|(date, nav)| NavPoint { date, nav })
            })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[NavPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&NavPoint> {
        self.points.first()
    }

    pub fn latest(&self) -> Option<&NavPoint> {
        self.points.last()
    }
}
