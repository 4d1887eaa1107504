//! Schema assembler: the network and time-series documents.
//!
//! Each document is built by one linear scan of the system's components.
//! Records land in their bucket in encounter order; a component that fails
//! to encode is reported in the returned [`Diagnostics`] and left out, and
//! the scan carries on.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bidds_core::{Diagnostics, System, TimeSeriesSource};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::classify::classify;
use super::encoders::{encode_component, EncodeContext};
use super::schema::{
    AcLineRecord, BusRecord, DcLineRecord, DeviceRecord, DeviceSeriesRecord, NetworkRecord,
    NoSeries, ReserveRecord, ReserveSeriesRecord, ShuntRecord, TimeSeriesRecord,
    TransformerRecord,
};
use super::time_series::{window_component, SeriesSignals, TimeWindow};

/// Format of `time_data.start_time`
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A built document together with what went wrong building it
#[derive(Debug, Clone)]
pub struct Translation<T> {
    pub document: T,
    pub diagnostics: Diagnostics,
}

/// Fixed penalty curves for constraint violations, as `[cost, width]` pairs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationCost {
    pub p_vio_cost: Vec<[f64; 2]>,
    pub q_vio_cost: Vec<[f64; 2]>,
    pub p_bus_vio_cost: Vec<[f64; 2]>,
    pub q_bus_vio_cost: Vec<[f64; 2]>,
    pub v_bus_vio_cost: Vec<[f64; 2]>,
    pub mva_branch_vio_cost: Vec<[f64; 2]>,
}

impl Default for ViolationCost {
    fn default() -> Self {
        Self {
            p_vio_cost: vec![[1000.0, 0.001], [1_000_000.0, 100.0]],
            q_vio_cost: vec![[500.0, 0.001], [500_000.0, 100.0]],
            p_bus_vio_cost: vec![[0.0, 0.001], [1_000_000.0, 2.0]],
            q_bus_vio_cost: vec![[0.0, 0.001], [1_000_000.0, 1.0]],
            v_bus_vio_cost: vec![[0.0, 0.00001], [1_000_000.0, 0.5]],
            mva_branch_vio_cost: vec![[500.0, 2.0]],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkSection {
    pub bus: Vec<BusRecord>,
    pub dispatchable_device: Vec<DeviceRecord>,
    pub shunt: Vec<ShuntRecord>,
    pub ac_line: Vec<AcLineRecord>,
    pub two_winding_transformer: Vec<TransformerRecord>,
    pub dc_line: Vec<DcLineRecord>,
    pub regional_reserve: Vec<ReserveRecord>,
    pub violation_cost: ViolationCost,
}

impl NetworkSection {
    fn push(&mut self, record: NetworkRecord) {
        match record {
            NetworkRecord::Bus(bus) => self.bus.push(bus),
            NetworkRecord::Device(device) => self.dispatchable_device.push(device),
            NetworkRecord::AcLine(line, shunts) => {
                self.ac_line.push(line);
                self.shunt.extend(shunts);
            }
            NetworkRecord::Transformer(tx) => self.two_winding_transformer.push(tx),
            NetworkRecord::DcLine(dc) => self.dc_line.push(dc),
            NetworkRecord::Reserve(reserve) => self.regional_reserve.push(reserve),
        }
    }
}

/// `{"network": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkDocument {
    pub network: NetworkSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeData {
    pub start_time: String,
    /// Number of intervals in the horizon
    pub time_period: usize,
    /// Interval length in hours
    pub interval_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesSection {
    pub time_data: TimeData,
    pub dispatchable_device: Vec<DeviceSeriesRecord>,
    pub ac_line: Vec<NoSeries>,
    pub two_winding_transformer: Vec<NoSeries>,
    pub dc_line: Vec<NoSeries>,
    pub regional_reserve: Vec<ReserveSeriesRecord>,
}

impl TimeSeriesSection {
    fn new(time_data: TimeData) -> Self {
        Self {
            time_data,
            dispatchable_device: Vec::new(),
            ac_line: Vec::new(),
            two_winding_transformer: Vec::new(),
            dc_line: Vec::new(),
            regional_reserve: Vec::new(),
        }
    }

    fn push(&mut self, record: TimeSeriesRecord) {
        match record {
            TimeSeriesRecord::Device(device) => self.dispatchable_device.push(device),
            TimeSeriesRecord::Reserve(reserve) => self.regional_reserve.push(reserve),
        }
    }
}

/// `{"time_series_input": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesDocument {
    pub time_series_input: TimeSeriesSection,
}

/// Horizon and signal selection for the series pass
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesOptions {
    /// Window length `T`
    pub steps: usize,
    pub resolution_minutes: u32,
    /// Defaults to the earliest single series in the system
    pub start_time: Option<NaiveDateTime>,
    pub signals: SeriesSignals,
}

impl Default for TimeSeriesOptions {
    fn default() -> Self {
        Self {
            steps: 24,
            resolution_minutes: 60,
            start_time: None,
            signals: SeriesSignals::default(),
        }
    }
}

impl TimeSeriesOptions {
    /// Resolve the window start against the system's series
    pub fn window(&self, source: &impl TimeSeriesSource) -> TimeWindow {
        // NaiveDateTime::default() is the Unix epoch
        let start = self
            .start_time
            .or_else(|| source.earliest_timestamp())
            .unwrap_or_default();
        TimeWindow::new(start, self.steps, self.resolution_minutes)
    }
}

/// Build the network document.
pub fn build_network_document(system: &System) -> Translation<NetworkDocument> {
    let ctx = EncodeContext::new(system);
    let mut section = NetworkSection::default();
    let mut diagnostics = Diagnostics::new();

    for component in system.components() {
        let Some(bucket) = classify(component) else {
            diagnostics.add_warning_with_entity(
                "unclassified",
                &format!("no encoder for category '{}', excluded", component.kind()),
                component.name(),
            );
            continue;
        };

        match encode_component(component, &ctx) {
            Ok(record) => section.push(record),
            Err(err) => diagnostics.add_error_with_entity(
                err.category(),
                &format!("{} {bucket} record not written: {err}", component.kind()),
                component.name(),
            ),
        }
    }

    Translation {
        document: NetworkDocument { network: section },
        diagnostics,
    }
}

/// Build the time-series document.
pub fn build_time_series_document(
    system: &System,
    options: &TimeSeriesOptions,
) -> Translation<TimeSeriesDocument> {
    let store = system.time_series();
    let window = options.window(store);
    let mut section = TimeSeriesSection::new(TimeData {
        start_time: window.start.format(START_TIME_FORMAT).to_string(),
        time_period: window.steps,
        interval_duration: window.interval_duration(),
    });
    let mut diagnostics = Diagnostics::new();

    for component in system.components() {
        match window_component(component, store, &window, &options.signals) {
            Ok(Some(record)) => section.push(record),
            Ok(None) => {}
            Err(err) => diagnostics.add_error_with_entity(
                err.category(),
                &format!("{} series record not written: {err}", component.kind()),
                component.name(),
            ),
        }
    }

    Translation {
        document: TimeSeriesDocument {
            time_series_input: section,
        },
        diagnostics,
    }
}

/// Serialize a document as pretty-printed JSON
pub fn document_to_string<T: Serialize>(document: &T) -> Result<String> {
    serde_json::to_string_pretty(document).context("serializing document")
}

/// Write a document as pretty-printed JSON, creating parent directories.
pub fn write_document<T: Serialize>(document: &T, output_path: impl AsRef<Path>) -> Result<()> {
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    let json = document_to_string(document)?;
    fs::write(output_path, json).with_context(|| format!("writing {}", output_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidds_core::{
        Arc, Bus, BusNumber, BusType, Component, CostCurve, FromTo, Generator, Kilovolts, Line,
        MegavoltAmperes, MinMax, OperationalCost, Reserve, Severity, SingleTimeSeries,
        ThermalGen, TimeSeries, UnsupportedComponent, VariableCost,
    };
    use chrono::NaiveDate;

    fn bus(number: u32, name: &str) -> Component {
        Component::Bus(Bus {
            number: BusNumber::new(number),
            name: name.into(),
            base_voltage: Kilovolts(138.0),
            bus_type: BusType::Pq,
            voltage_limits: MinMax::new(0.95, 1.05),
            area: None,
            load_zone: None,
        })
    }

    fn thermal(name: &str, curve: &[(f64, f64)]) -> Component {
        Component::Generator(Generator::Thermal(ThermalGen {
            name: name.into(),
            bus: "Abel".into(),
            active_power_limits: MinMax::new(0.0, 1.5),
            reactive_power_limits: None,
            ramp_limits: None,
            time_limits: None,
            operation_cost: OperationalCost {
                variable: VariableCost::Curve(CostCurve::from_pairs(curve).unwrap()),
                ..OperationalCost::default()
            },
            services: vec![],
        }))
    }

    fn system() -> System {
        let mut system = System::new("test", MegavoltAmperes(100.0));
        system.add_component(bus(101, "Abel")).unwrap();
        system.add_component(bus(102, "Adams")).unwrap();
        system
            .add_component(Component::Line(Line {
                name: "A1".into(),
                arc: Arc::new("Abel", "Adams"),
                r: 0.003,
                x: 0.014,
                b: FromTo {
                    from: 0.23,
                    to: 0.23,
                },
                rate: 1.75,
            }))
            .unwrap();
        system
            .add_component(thermal(
                "101_CT_1",
                &[(500.0, 50.0), (800.0, 100.0), (1200.0, 150.0)],
            ))
            .unwrap();
        system
            .add_component(Component::Reserve(Reserve {
                name: "Reg_Up".into(),
                requirement: 0.35,
            }))
            .unwrap();
        system
    }

    #[test]
    fn test_buckets_keep_encounter_order() {
        let translation = build_network_document(&system());
        let network = &translation.document.network;

        let uids: Vec<u32> = network.bus.iter().map(|b| b.uid.value()).collect();
        assert_eq!(uids, vec![101, 102]);
        assert_eq!(network.ac_line.len(), 1);
        assert_eq!(network.shunt.len(), 2);
        assert_eq!(network.dispatchable_device.len(), 1);
        assert_eq!(network.regional_reserve.len(), 1);
        assert!(network.two_winding_transformer.is_empty());
        assert!(!translation.diagnostics.has_issues());
    }

    #[test]
    fn test_failed_component_is_excluded_and_reported() {
        let mut system = system();
        system
            .add_component(thermal("Broken", &[(500.0, 50.0), (800.0, 50.0)]))
            .unwrap();
        system
            .add_component(Component::Unsupported(UnsupportedComponent {
                name: "SC_1".into(),
                kind: "synchronous_condenser".into(),
            }))
            .unwrap();

        let translation = build_network_document(&system);
        assert_eq!(translation.document.network.dispatchable_device.len(), 1);
        assert_eq!(translation.diagnostics.error_count(), 1);
        assert_eq!(translation.diagnostics.warning_count(), 1);

        let error = translation.diagnostics.errors().next().unwrap();
        assert_eq!(error.category, "encode");
        assert_eq!(error.entity.as_deref(), Some("Broken"));

        let warning = translation.diagnostics.warnings().next().unwrap();
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.category, "unclassified");
    }

    #[test]
    fn test_violation_cost_literals() {
        let json = serde_json::to_value(build_network_document(&system()).document).unwrap();
        let costs = &json["network"]["violation_cost"];
        assert_eq!(costs["p_vio_cost"], serde_json::json!([[1000.0, 0.001], [1e6, 100.0]]));
        assert_eq!(costs["v_bus_vio_cost"][0][1], 0.00001);
        assert_eq!(costs["mva_branch_vio_cost"], serde_json::json!([[500.0, 2.0]]));
    }

    #[test]
    fn test_time_series_document_header() {
        let mut system = system();
        let t0 = NaiveDate::from_ymd_opt(2020, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        system
            .add_time_series(
                "101_CT_1",
                "max_active_power",
                TimeSeries::Single(SingleTimeSeries {
                    initial_timestamp: t0,
                    resolution_minutes: 60,
                    data: vec![1.5; 48],
                }),
            )
            .unwrap();

        let translation = build_time_series_document(&system, &TimeSeriesOptions::default());
        let section = &translation.document.time_series_input;
        assert_eq!(section.time_data.start_time, "2020-07-01T00:00:00");
        assert_eq!(section.time_data.time_period, 24);
        assert_eq!(section.time_data.interval_duration, 1.0);
        assert_eq!(section.dispatchable_device.len(), 1);
        // static requirement only, no series
        assert!(section.regional_reserve.is_empty());
        assert!(!translation.diagnostics.has_issues());

        let json = serde_json::to_value(&translation.document).unwrap();
        assert_eq!(json["time_series_input"]["ac_line"], serde_json::json!([]));
        assert_eq!(json["time_series_input"]["dc_line"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_store_starts_at_epoch() {
        let translation = build_time_series_document(&system(), &TimeSeriesOptions::default());
        assert_eq!(
            translation.document.time_series_input.time_data.start_time,
            "1970-01-01T00:00:00"
        );
    }

    #[test]
    fn test_documents_are_deterministic() {
        let system = system();
        let first = document_to_string(&build_network_document(&system).document).unwrap();
        let second = document_to_string(&build_network_document(&system).document).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_document_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("network.json");
        write_document(&build_network_document(&system()).document, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"network\""));
    }
}
