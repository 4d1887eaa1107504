//! Time-series windower.
//!
//! Reads one named signal per component from a [`TimeSeriesSource`] and cuts
//! a window of exactly `steps` samples out of it. Generators and loads read
//! the capacity signal, reserves the requirement signal; nothing else has a
//! series record.

use bidds_core::{Component, TimeSeries, TimeSeriesSource};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::encoders::{EncodeError, EncodeResult};
use super::schema::{DeviceSeriesRecord, ReserveSeriesRecord, TimeSeriesRecord};

/// Signal names read by the windower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSignals {
    /// Active-power capacity of generators and loads
    pub capacity: String,
    /// Requirement of reserve products
    pub requirement: String,
}

impl Default for SeriesSignals {
    fn default() -> Self {
        Self {
            capacity: "max_active_power".to_string(),
            requirement: "requirement".to_string(),
        }
    }
}

/// Start, length and sampling of the exported horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub steps: usize,
    pub resolution_minutes: u32,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, steps: usize, resolution_minutes: u32) -> Self {
        Self {
            start,
            steps,
            resolution_minutes,
        }
    }

    /// Interval length in hours
    pub fn interval_duration(&self) -> f64 {
        f64::from(self.resolution_minutes) / 60.0
    }
}

/// Series record of one component, or `None` if it has no matching signal.
pub fn window_component<S: TimeSeriesSource + ?Sized>(
    component: &Component,
    source: &S,
    window: &TimeWindow,
    signals: &SeriesSignals,
) -> EncodeResult<Option<TimeSeriesRecord>> {
    let record = match component {
        Component::Generator(gen) => read_window(source, gen.name(), &signals.capacity, window)?
            .map(|data| TimeSeriesRecord::Device(device_series(gen.name(), Some(data), None))),
        Component::Load(load) => read_window(source, &load.name, &signals.capacity, window)?
            .map(|data| {
                let negated = data.into_iter().map(|v| -v).collect();
                TimeSeriesRecord::Device(device_series(&load.name, None, Some(negated)))
            }),
        Component::Reserve(reserve) => {
            read_window(source, &reserve.name, &signals.requirement, window)?.map(|data| {
                TimeSeriesRecord::Reserve(ReserveSeriesRecord {
                    uid: reserve.name.clone(),
                    reserve_requirement: data,
                })
            })
        }
        Component::Bus(_)
        | Component::Battery(_)
        | Component::Line(_)
        | Component::TapTransformer(_)
        | Component::DcLine(_)
        | Component::Unsupported(_) => None,
    };
    Ok(record)
}

fn device_series(
    uid: &str,
    pg_ub: Option<Vec<f64>>,
    pg_lb: Option<Vec<f64>>,
) -> DeviceSeriesRecord {
    let steps = pg_ub.as_ref().or(pg_lb.as_ref()).map_or(0, Vec::len);
    DeviceSeriesRecord {
        uid: uid.to_string(),
        pg_ub,
        pg_lb,
        on_status_ub: vec![1; steps],
        on_status_lb: vec![0; steps],
    }
}

/// A series sampled at another resolution counts as absent.
fn read_window<S: TimeSeriesSource + ?Sized>(
    source: &S,
    owner: &str,
    signal: &str,
    window: &TimeWindow,
) -> EncodeResult<Option<Vec<f64>>> {
    let single = match source.time_series(owner, signal) {
        None => return Ok(None),
        Some(TimeSeries::Forecast(_)) => {
            return Err(EncodeError::ForecastUnsupported {
                signal: signal.to_string(),
            })
        }
        Some(TimeSeries::Single(single)) => single,
    };
    if single.resolution_minutes != window.resolution_minutes {
        return Ok(None);
    }

    single
        .window(window.start, window.steps)
        .map(|data| Some(data.to_vec()))
        .map_err(|source| EncodeError::WindowOutOfRange {
            signal: signal.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidds_core::{
        Forecast, Generator, PowerLoad, RenewableFix, Reserve, SingleTimeSeries, TimeSeriesStore,
        WindowError,
    };
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hourly(data: Vec<f64>) -> TimeSeries {
        TimeSeries::Single(SingleTimeSeries {
            initial_timestamp: t0(),
            resolution_minutes: 60,
            data,
        })
    }

    fn pv() -> Component {
        Component::Generator(Generator::RenewableFixed(RenewableFix {
            name: "PV_1".into(),
            bus: "Abel".into(),
            max_active_power: 1.0,
            reactive_power_limits: None,
        }))
    }

    fn load() -> Component {
        Component::Load(PowerLoad {
            name: "Load_1".into(),
            bus: "Abel".into(),
            max_active_power: 2.0,
            max_reactive_power: 0.0,
        })
    }

    fn day_window() -> TimeWindow {
        TimeWindow::new(t0(), 24, 60)
    }

    #[test]
    fn test_generator_window_has_exact_length() {
        let mut store = TimeSeriesStore::new();
        store.insert("PV_1", "max_active_power", hourly((0..48).map(f64::from).collect()));

        let record = window_component(&pv(), &store, &day_window(), &SeriesSignals::default())
            .unwrap()
            .unwrap();
        let TimeSeriesRecord::Device(device) = record else {
            panic!("expected a device record");
        };
        let pg_ub = device.pg_ub.unwrap();
        assert_eq!(pg_ub.len(), 24);
        assert_eq!(pg_ub[23], 23.0);
        assert!(device.pg_lb.is_none());
        assert_eq!(device.on_status_ub, vec![1; 24]);
        assert_eq!(device.on_status_lb, vec![0; 24]);
    }

    #[test]
    fn test_window_starts_at_offset() {
        let mut store = TimeSeriesStore::new();
        store.insert("PV_1", "max_active_power", hourly((0..48).map(f64::from).collect()));
        let window = TimeWindow::new(t0() + chrono::Duration::hours(6), 24, 60);

        let Some(TimeSeriesRecord::Device(device)) =
            window_component(&pv(), &store, &window, &SeriesSignals::default()).unwrap()
        else {
            panic!("expected a device record");
        };
        assert_eq!(device.pg_ub.unwrap()[0], 6.0);
    }

    #[test]
    fn test_load_window_is_negated() {
        let mut store = TimeSeriesStore::new();
        store.insert("Load_1", "max_active_power", hourly(vec![1.5; 24]));

        let Some(TimeSeriesRecord::Device(device)) =
            window_component(&load(), &store, &day_window(), &SeriesSignals::default()).unwrap()
        else {
            panic!("expected a device record");
        };
        assert!(device.pg_ub.is_none());
        assert_eq!(device.pg_lb.unwrap(), vec![-1.5; 24]);
    }

    #[test]
    fn test_reserve_requirement_window() {
        let mut store = TimeSeriesStore::new();
        store.insert("Reg_Up", "requirement", hourly(vec![0.3; 30]));
        let reserve = Component::Reserve(Reserve {
            name: "Reg_Up".into(),
            requirement: 0.3,
        });

        let record = window_component(&reserve, &store, &day_window(), &SeriesSignals::default())
            .unwrap();
        assert_eq!(
            record,
            Some(TimeSeriesRecord::Reserve(ReserveSeriesRecord {
                uid: "Reg_Up".into(),
                reserve_requirement: vec![0.3; 24],
            }))
        );
    }

    #[test]
    fn test_missing_signal_yields_nothing() {
        let store = TimeSeriesStore::new();
        let record =
            window_component(&pv(), &store, &day_window(), &SeriesSignals::default()).unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_other_resolution_counts_as_missing() {
        let mut store = TimeSeriesStore::new();
        store.insert(
            "PV_1",
            "max_active_power",
            TimeSeries::Single(SingleTimeSeries {
                initial_timestamp: t0(),
                resolution_minutes: 5,
                data: vec![1.0; 400],
            }),
        );
        let record =
            window_component(&pv(), &store, &day_window(), &SeriesSignals::default()).unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_forecast_fails_fast() {
        let mut store = TimeSeriesStore::new();
        store.insert(
            "PV_1",
            "max_active_power",
            TimeSeries::Forecast(Forecast {
                initial_timestamp: t0(),
                resolution_minutes: 60,
                horizon: 24,
                windows: vec![vec![1.0; 24], vec![0.9; 24]],
            }),
        );
        let err =
            window_component(&pv(), &store, &day_window(), &SeriesSignals::default()).unwrap_err();
        assert_eq!(
            err,
            EncodeError::ForecastUnsupported {
                signal: "max_active_power".into()
            }
        );
    }

    #[test]
    fn test_short_series_is_out_of_range() {
        let mut store = TimeSeriesStore::new();
        store.insert("PV_1", "max_active_power", hourly(vec![1.0; 12]));
        let err =
            window_component(&pv(), &store, &day_window(), &SeriesSignals::default()).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::WindowOutOfRange {
                source: WindowError::TooShort { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_custom_signal_names() {
        let mut store = TimeSeriesStore::new();
        store.insert("PV_1", "available_power", hourly(vec![0.7; 24]));
        let signals = SeriesSignals {
            capacity: "available_power".into(),
            ..SeriesSignals::default()
        };
        let record = window_component(&pv(), &store, &day_window(), &signals).unwrap();
        assert!(record.is_some());
    }

    #[test]
    fn test_interval_duration_in_hours() {
        assert_eq!(TimeWindow::new(t0(), 288, 5).interval_duration(), 5.0 / 60.0);
        assert_eq!(day_window().interval_duration(), 1.0);
    }
}
