use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Coordinates plus the label shown to the user ("Værvarsel for: ...").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub coordinates: Coordinates,
    pub label: String,
}

/// Hour of day used to pick the forecast slot, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourOfDay {
    hour: u32,
    minute: u32,
}

impl HourOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn noon() -> Self {
        Self { hour: 12, minute: 0 }
    }
}

impl Default for HourOfDay {
    fn default() -> Self {
        Self::noon()
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for HourOfDay {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|e| anyhow::anyhow!("Invalid hour of day '{s}' (expected HH:MM): {e}"))?;
        Ok(Self { hour: time.hour(), minute: time.minute() })
    }
}

/// Readings valid at a single instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstantReading {
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub wind_description: Option<String>,
}

/// Readings accumulated over the entry's validity window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalReading {
    pub symbol_code: Option<u32>,
    pub precipitation_mm: Option<f64>,
}

/// The feed splits instantaneous and interval readings into separate
/// `time` entries; each entry carries exactly one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Instant(InstantReading),
    Interval(IntervalReading),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Kept as the feed's text (`YYYY-MM-DDTHH:MM:SSZ`); matched by string equality.
    pub valid_from: String,
    pub valid_to: String,
    pub reading: Reading,
}

impl TimeEntry {
    pub fn instant(&self) -> Option<&InstantReading> {
        match &self.reading {
            Reading::Instant(r) => Some(r),
            Reading::Interval(_) => None,
        }
    }

    pub fn interval(&self) -> Option<&IntervalReading> {
        match &self.reading {
            Reading::Interval(r) => Some(r),
            Reading::Instant(_) => None,
        }
    }
}

/// Ordered sequence of time entries, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    pub entries: Vec<TimeEntry>,
}

impl ForecastDocument {
    pub fn new(entries: Vec<TimeEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One card of the forecast strip.
///
/// An empty `weekday_label` means there was no data for the requested day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub weekday_label: String,
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub icon_ref: Option<String>,
}

impl DaySummary {
    pub fn is_empty(&self) -> bool {
        self.weekday_label.is_empty()
    }
}

/// "Right now" view: first reading of each kind in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub wind_description: Option<String>,
    pub icon_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub place: ResolvedPlace,
    pub current: CurrentConditions,
    pub days: Vec<DaySummary>,
}
