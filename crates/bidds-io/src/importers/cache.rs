//! Serialized-system cache written next to a descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bidds_core::System;

const CACHE_SUFFIX: &str = ".system.json";

/// `<source>.system.json`
pub fn cache_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push(CACHE_SUFFIX);
    PathBuf::from(name)
}

pub fn write_system_cache(system: &System, path: &Path) -> Result<()> {
    let json = serde_json::to_string(system).context("serializing system cache")?;
    fs::write(path, json).with_context(|| format!("writing system cache '{}'", path.display()))
}

/// A cache is current when it exists and the descriptor was not modified after
/// it was written. With the descriptor gone the cache is all there is.
pub fn cache_is_current(source: &Path, cache: &Path) -> bool {
    let Ok(cached_at) = fs::metadata(cache).and_then(|m| m.modified()) else {
        return false;
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(edited_at) => edited_at <= cached_at,
        Err(_) => true,
    }
}

pub fn load_system_cache(path: &Path) -> Result<System> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading system cache '{}'", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing system cache '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidds_core::{
        Component, CostCurve, Generator, MegavoltAmperes, MinMax, OperationalCost,
        SingleTimeSeries, ThermalGen, TimeSeries, UnsupportedComponent, VariableCost,
    };
    use chrono::NaiveDate;
    use std::time::Duration;

    #[test]
    fn test_cache_path_appends_suffix() {
        assert_eq!(
            cache_path(Path::new("data/rts.json")),
            PathBuf::from("data/rts.json.system.json")
        );
    }

    #[test]
    fn test_cache_round_trip_keeps_components_and_series() {
        let mut system = System::new("cached", MegavoltAmperes(100.0));
        system
            .add_component(Component::Generator(Generator::Thermal(ThermalGen {
                name: "101_STEAM_3".into(),
                bus: "Abel".into(),
                active_power_limits: MinMax::new(0.3, 0.76),
                reactive_power_limits: None,
                ramp_limits: None,
                time_limits: None,
                operation_cost: OperationalCost {
                    variable: VariableCost::Curve(
                        CostCurve::from_pairs(&[(600.0, 30.0), (1500.0, 76.0)]).unwrap(),
                    ),
                    ..OperationalCost::default()
                },
                services: vec!["Reg_Up".into()],
            })))
            .unwrap();
        system
            .add_component(Component::Unsupported(UnsupportedComponent {
                name: "SC_1".into(),
                kind: "synchronous_condenser".into(),
            }))
            .unwrap();
        system
            .add_time_series(
                "101_STEAM_3",
                "max_active_power",
                TimeSeries::Single(SingleTimeSeries {
                    initial_timestamp: NaiveDate::from_ymd_opt(2020, 1, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    resolution_minutes: 60,
                    data: vec![0.76; 4],
                }),
            )
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rts.json.system.json");
        write_system_cache(&system, &path).unwrap();
        let restored = load_system_cache(&path).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.time_series().len(), 1);
        assert_eq!(
            restored.component("101_STEAM_3"),
            system.component("101_STEAM_3")
        );
        assert_eq!(restored.component("SC_1"), system.component("SC_1"));
    }

    #[test]
    fn test_cache_older_than_descriptor_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("rts.json");
        let cache = cache_path(&source);
        fs::write(&source, "{}").unwrap();
        fs::write(&cache, "{}").unwrap();
        assert!(cache_is_current(&source, &cache));

        let cached_at = fs::metadata(&cache).unwrap().modified().unwrap();
        fs::OpenOptions::new()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(cached_at + Duration::from_secs(60))
            .unwrap();
        assert!(!cache_is_current(&source, &cache));

        fs::remove_file(&source).unwrap();
        assert!(cache_is_current(&source, &cache));
        assert!(!cache_is_current(&source, &dir.path().join("absent.system.json")));
    }

    #[test]
    fn test_missing_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_system_cache(&dir.path().join("absent.system.json")).is_err());
    }
}
