//! Time series attached to components.
//!
//! Series are stored per owner (component name) and signal name. A
//! [`TimeSeries::Single`] holds one realized trajectory; a
//! [`TimeSeries::Forecast`] holds several candidate trajectories, one per
//! forecast window. Consumers read the store through [`TimeSeriesSource`].

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    #[error("window start {start} precedes series start {initial}")]
    BeforeStart {
        start: NaiveDateTime,
        initial: NaiveDateTime,
    },
    #[error("window start {start} is not aligned to the {resolution_minutes}-minute resolution")]
    Misaligned {
        start: NaiveDateTime,
        resolution_minutes: u32,
    },
    #[error("window of {requested} steps from offset {offset} exceeds {available} samples")]
    TooShort {
        offset: usize,
        requested: usize,
        available: usize,
    },
}

/// One realized trajectory sampled at a fixed resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleTimeSeries {
    pub initial_timestamp: NaiveDateTime,
    pub resolution_minutes: u32,
    pub data: Vec<f64>,
}

impl SingleTimeSeries {
    pub fn resolution(&self) -> Duration {
        Duration::minutes(i64::from(self.resolution_minutes))
    }

    /// Contiguous slice of `len` samples starting at `start`.
    pub fn window(&self, start: NaiveDateTime, len: usize) -> Result<&[f64], WindowError> {
        let elapsed = start - self.initial_timestamp;
        if elapsed < Duration::zero() {
            return Err(WindowError::BeforeStart {
                start,
                initial: self.initial_timestamp,
            });
        }

        let step = self.resolution().num_milliseconds();
        if step <= 0 || elapsed.num_milliseconds() % step != 0 {
            return Err(WindowError::Misaligned {
                start,
                resolution_minutes: self.resolution_minutes,
            });
        }

        let offset = (elapsed.num_milliseconds() / step) as usize;
        let end = offset.saturating_add(len);
        if end > self.data.len() {
            return Err(WindowError::TooShort {
                offset,
                requested: len,
                available: self.data.len(),
            });
        }
        Ok(&self.data[offset..end])
    }
}

/// Candidate trajectories, one per forecast window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub initial_timestamp: NaiveDateTime,
    pub resolution_minutes: u32,
    pub horizon: usize,
    pub windows: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeSeries {
    Single(SingleTimeSeries),
    Forecast(Forecast),
}

/// Read access to stored series, keyed by owner name and signal name
pub trait TimeSeriesSource {
    fn time_series(&self, owner: &str, signal: &str) -> Option<&TimeSeries>;

    /// Earliest initial timestamp over all realized trajectories
    fn earliest_timestamp(&self) -> Option<NaiveDateTime>;
}

/// Flat serialized form of one stored series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    pub owner: String,
    pub name: String,
    #[serde(flatten)]
    pub series: TimeSeries,
}

/// In-memory store. Serializes as a flat list of [`TimeSeriesEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TimeSeriesEntry>", into = "Vec<TimeSeriesEntry>")]
pub struct TimeSeriesStore {
    series: BTreeMap<String, BTreeMap<String, TimeSeries>>,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a series; a series with the same owner and name is replaced.
    pub fn insert(&mut self, owner: impl Into<String>, name: impl Into<String>, series: TimeSeries) {
        self.series
            .entry(owner.into())
            .or_default()
            .insert(name.into(), series);
    }

    pub fn len(&self) -> usize {
        self.series.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TimeSeriesSource for TimeSeriesStore {
    fn time_series(&self, owner: &str, signal: &str) -> Option<&TimeSeries> {
        self.series.get(owner).and_then(|signals| signals.get(signal))
    }

    fn earliest_timestamp(&self) -> Option<NaiveDateTime> {
        self.series
            .values()
            .flat_map(BTreeMap::values)
            .filter_map(|ts| match ts {
                TimeSeries::Single(single) => Some(single.initial_timestamp),
                TimeSeries::Forecast(_) => None,
            })
            .min()
    }
}

impl From<Vec<TimeSeriesEntry>> for TimeSeriesStore {
    fn from(entries: Vec<TimeSeriesEntry>) -> Self {
        let mut store = TimeSeriesStore::new();
        for entry in entries {
            store.insert(entry.owner, entry.name, entry.series);
        }
        store
    }
}

impl From<TimeSeriesStore> for Vec<TimeSeriesEntry> {
    fn from(store: TimeSeriesStore) -> Self {
        store
            .series
            .into_iter()
            .flat_map(|(owner, signals)| {
                signals.into_iter().map(move |(name, series)| TimeSeriesEntry {
                    owner: owner.clone(),
                    name,
                    series,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn hourly(len: usize) -> SingleTimeSeries {
        SingleTimeSeries {
            initial_timestamp: ts(0),
            resolution_minutes: 60,
            data: (0..len).map(|i| i as f64).collect(),
        }
    }

    #[test]
    fn test_window_from_start() {
        let series = hourly(48);
        let window = series.window(ts(0), 24).unwrap();
        assert_eq!(window.len(), 24);
        assert_eq!(window[0], 0.0);
        assert_eq!(window[23], 23.0);
    }

    #[test]
    fn test_window_with_offset() {
        let series = hourly(48);
        let window = series.window(ts(5), 3).unwrap();
        assert_eq!(window, &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_window_exactly_fits() {
        let series = hourly(24);
        assert_eq!(series.window(ts(0), 24).unwrap().len(), 24);
        assert!(matches!(
            series.window(ts(1), 24),
            Err(WindowError::TooShort { offset: 1, .. })
        ));
    }

    #[test]
    fn test_window_before_start() {
        let mut series = hourly(24);
        series.initial_timestamp = ts(2);
        assert!(matches!(
            series.window(ts(1), 4),
            Err(WindowError::BeforeStart { .. })
        ));
    }

    #[test]
    fn test_window_misaligned() {
        let series = hourly(24);
        let start = ts(1) + Duration::minutes(30);
        assert!(matches!(
            series.window(start, 4),
            Err(WindowError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_window_sub_second_offset_is_misaligned() {
        let series = hourly(24);
        let start = ts(1) + Duration::milliseconds(500);
        assert!(matches!(
            series.window(start, 4),
            Err(WindowError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_store_lookup_and_earliest() {
        let mut store = TimeSeriesStore::new();
        store.insert("Load_1", "max_active_power", TimeSeries::Single(hourly(24)));
        let mut later = hourly(24);
        later.initial_timestamp = ts(6);
        store.insert("Wind_1", "max_active_power", TimeSeries::Single(later));

        assert_eq!(store.len(), 2);
        assert!(store.time_series("Load_1", "max_active_power").is_some());
        assert!(store.time_series("Load_1", "requirement").is_none());
        assert_eq!(store.earliest_timestamp(), Some(ts(0)));
    }

    #[test]
    fn test_store_serializes_as_entry_list() {
        let mut store = TimeSeriesStore::new();
        store.insert("Reg_Up", "requirement", TimeSeries::Single(hourly(2)));

        let json = serde_json::to_value(&store).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["owner"], "Reg_Up");
        assert_eq!(entries[0]["type"], "single");
        assert_eq!(entries[0]["initial_timestamp"], "2020-01-01T00:00:00");

        let back: TimeSeriesStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }
}
