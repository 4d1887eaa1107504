//! # bidds-core: component model for solver-input translation
//!
//! Holds the in-memory grid model that the translation engine in `bidds-io`
//! walks: a [`System`] owning a flat, ordered list of [`Component`]s plus a
//! [`TimeSeriesStore`] of signals attached to them.
//!
//! ## Design Philosophy
//!
//! The component categories form a **closed enum**. Every consumer matches on
//! [`Component`] exhaustively, and the only wildcard is
//! [`Component::Unsupported`], which the loader produces for categories it
//! does not know. Adding a category is a compile error everywhere it matters.
//!
//! ## Units
//!
//! - Power ratings and limits: per-unit on the system base (`f64`)
//! - Cost curve break points: `($/h, MW)`, see [`cost::CostCurve`]
//! - System base power: [`MegavoltAmperes`]
//! - Bus nominal voltage: [`Kilovolts`]
//!
//! ## Quick Start
//!
//! ```rust
//! use bidds_core::*;
//!
//! let mut system = System::new("demo", MegavoltAmperes(100.0));
//! system.add_component(Component::Bus(Bus {
//!     number: BusNumber::new(101),
//!     name: "Abel".to_string(),
//!     base_voltage: Kilovolts(138.0),
//!     bus_type: BusType::Ref,
//!     voltage_limits: MinMax::new(0.95, 1.05),
//!     area: Some("1".to_string()),
//!     load_zone: None,
//! }))?;
//!
//! assert_eq!(system.bus_number("Abel"), Some(BusNumber::new(101)));
//! # Ok::<(), BiddsError>(())
//! ```
//!
//! ## Modules
//!
//! - [`cost`] - operating costs and the cumulative-to-marginal conversion
//! - [`time_series`] - series storage and window extraction
//! - [`diagnostics`] - per-component issue reporting
//! - [`units`] - unit newtypes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod cost;
pub mod diagnostics;
pub mod error;
pub mod time_series;
pub mod units;

pub use cost::{BreakPoint, CostCurve, CostCurveError, MarginalBlock, OperationalCost, VariableCost};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{BiddsError, BiddsResult};
pub use time_series::{
    Forecast, SingleTimeSeries, TimeSeries, TimeSeriesEntry, TimeSeriesSource, TimeSeriesStore,
    WindowError,
};
pub use units::{Kilovolts, MegavoltAmperes, Megawatts, PerUnit};

/// Numeric bus identifier, used for every cross-reference in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusNumber(u32);

impl BusNumber {
    #[inline]
    pub fn new(value: u32) -> Self {
        BusNumber(value)
    }
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BusNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpDown {
    pub up: f64,
    pub down: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FromTo {
    pub from: f64,
    pub to: f64,
}

/// Charge/discharge efficiency pair of a storage device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InOut {
    #[serde(rename = "in")]
    pub input: f64,
    #[serde(rename = "out")]
    pub output: f64,
}

/// Directed endpoint pair of a branch, by bus name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    pub from: String,
    pub to: String,
}

impl Arc {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusType {
    Ref,
    #[serde(rename = "PV")]
    Pv,
    #[serde(rename = "PQ")]
    Pq,
    Isolated,
}

impl BusType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusType::Ref => "REF",
            BusType::Pv => "PV",
            BusType::Pq => "PQ",
            BusType::Isolated => "ISOLATED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub number: BusNumber,
    pub name: String,
    pub base_voltage: Kilovolts,
    #[serde(rename = "bustype")]
    pub bus_type: BusType,
    /// Voltage magnitude bounds (per-unit)
    pub voltage_limits: MinMax,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub load_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalGen {
    pub name: String,
    pub bus: String,
    pub active_power_limits: MinMax,
    #[serde(default)]
    pub reactive_power_limits: Option<MinMax>,
    /// Ramp limits (per-unit per minute)
    #[serde(default)]
    pub ramp_limits: Option<UpDown>,
    /// Minimum up/down time (hours)
    #[serde(default)]
    pub time_limits: Option<UpDown>,
    #[serde(default)]
    pub operation_cost: OperationalCost,
    /// Names of the reserve products this unit contributes to
    #[serde(default)]
    pub services: Vec<String>,
}

/// Renewable unit with no dispatch range (e.g. rooftop PV)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewableFix {
    pub name: String,
    pub bus: String,
    pub max_active_power: f64,
    #[serde(default)]
    pub reactive_power_limits: Option<MinMax>,
}

/// Curtailable renewable unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewableDispatch {
    pub name: String,
    pub bus: String,
    pub max_active_power: f64,
    #[serde(default)]
    pub reactive_power_limits: Option<MinMax>,
    #[serde(default)]
    pub operation_cost: OperationalCost,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroDispatch {
    pub name: String,
    pub bus: String,
    pub active_power_limits: MinMax,
    #[serde(default)]
    pub reactive_power_limits: Option<MinMax>,
    #[serde(default)]
    pub ramp_limits: Option<UpDown>,
    #[serde(default)]
    pub time_limits: Option<UpDown>,
    #[serde(default)]
    pub operation_cost: OperationalCost,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroEnergyReservoir {
    pub name: String,
    pub bus: String,
    pub active_power_limits: MinMax,
    #[serde(default)]
    pub reactive_power_limits: Option<MinMax>,
    #[serde(default)]
    pub ramp_limits: Option<UpDown>,
    #[serde(default)]
    pub time_limits: Option<UpDown>,
    #[serde(default)]
    pub operation_cost: OperationalCost,
    #[serde(default)]
    pub services: Vec<String>,
    /// Reservoir energy capacity (per-unit hours)
    pub storage_capacity: f64,
    /// External inflow into the reservoir (per-unit)
    #[serde(default)]
    pub inflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "technology", rename_all = "snake_case")]
pub enum Generator {
    Thermal(ThermalGen),
    RenewableFixed(RenewableFix),
    RenewableDispatch(RenewableDispatch),
    HydroDispatch(HydroDispatch),
    HydroEnergyReservoir(HydroEnergyReservoir),
}

impl Generator {
    pub fn name(&self) -> &str {
        match self {
            Generator::Thermal(g) => &g.name,
            Generator::RenewableFixed(g) => &g.name,
            Generator::RenewableDispatch(g) => &g.name,
            Generator::HydroDispatch(g) => &g.name,
            Generator::HydroEnergyReservoir(g) => &g.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerLoad {
    pub name: String,
    pub bus: String,
    pub max_active_power: f64,
    #[serde(default)]
    pub max_reactive_power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub name: String,
    pub bus: String,
    pub input_active_power_limits: MinMax,
    pub output_active_power_limits: MinMax,
    #[serde(default)]
    pub reactive_power_limits: Option<MinMax>,
    pub efficiency: InOut,
    /// Energy bounds (per-unit hours)
    pub state_of_charge_limits: MinMax,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub name: String,
    pub arc: Arc,
    /// Series resistance (per-unit)
    pub r: f64,
    /// Series reactance (per-unit)
    pub x: f64,
    /// Half-line charging susceptance on each side (per-unit)
    pub b: FromTo,
    /// Nominal thermal rating (per-unit)
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapTransformer {
    pub name: String,
    pub arc: Arc,
    pub r: f64,
    pub x: f64,
    pub tap: f64,
    pub rate: f64,
}

/// Two-terminal HVDC link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcLine {
    pub name: String,
    pub arc: Arc,
    pub active_power_limits_from: MinMax,
    pub reactive_power_limits_from: MinMax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reserve {
    pub name: String,
    /// Static requirement (per-unit)
    pub requirement: f64,
}

/// Component whose category the loader did not recognize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedComponent {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Component {
    Bus(Bus),
    Generator(Generator),
    Load(PowerLoad),
    Battery(Battery),
    Line(Line),
    TapTransformer(TapTransformer),
    DcLine(DcLine),
    Reserve(Reserve),
    Unsupported(UnsupportedComponent),
}

impl Component {
    /// Category tags understood by the loader; anything else is unsupported
    pub const CATEGORIES: &'static [&'static str] = &[
        "bus",
        "generator",
        "load",
        "battery",
        "line",
        "tap_transformer",
        "dc_line",
        "reserve",
    ];

    pub fn name(&self) -> &str {
        match self {
            Component::Bus(bus) => &bus.name,
            Component::Generator(gen) => gen.name(),
            Component::Load(load) => &load.name,
            Component::Battery(battery) => &battery.name,
            Component::Line(line) => &line.name,
            Component::TapTransformer(tx) => &tx.name,
            Component::DcLine(dc) => &dc.name,
            Component::Reserve(reserve) => &reserve.name,
            Component::Unsupported(other) => &other.name,
        }
    }

    /// Human-readable category, used in diagnostics
    pub fn kind(&self) -> &str {
        match self {
            Component::Bus(_) => "bus",
            Component::Generator(Generator::Thermal(_)) => "thermal generator",
            Component::Generator(Generator::RenewableFixed(_)) => "fixed renewable generator",
            Component::Generator(Generator::RenewableDispatch(_)) => {
                "dispatchable renewable generator"
            }
            Component::Generator(Generator::HydroDispatch(_)) => "dispatchable hydro generator",
            Component::Generator(Generator::HydroEnergyReservoir(_)) => "hydro reservoir",
            Component::Load(_) => "load",
            Component::Battery(_) => "battery",
            Component::Line(_) => "line",
            Component::TapTransformer(_) => "tap transformer",
            Component::DcLine(_) => "dc line",
            Component::Reserve(_) => "reserve",
            Component::Unsupported(other) => &other.kind,
        }
    }
}

/// Serialized form of [`System`]; the name index is rebuilt on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SystemData {
    name: String,
    base_power: MegavoltAmperes,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    time_series: TimeSeriesStore,
}

/// The component collection translated in one run.
///
/// Components keep insertion order, which is the encounter order of every
/// output bucket. Names are unique across the system, and so are bus numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SystemData", into = "SystemData")]
pub struct System {
    pub name: String,
    pub base_power: MegavoltAmperes,
    components: Vec<Component>,
    time_series: TimeSeriesStore,
    by_name: HashMap<String, usize>,
}

impl System {
    pub fn new(name: impl Into<String>, base_power: MegavoltAmperes) -> Self {
        Self {
            name: name.into(),
            base_power,
            components: Vec::new(),
            time_series: TimeSeriesStore::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn add_component(&mut self, component: Component) -> BiddsResult<()> {
        let name = component.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(BiddsError::Validation(format!(
                "duplicate component name '{}'",
                name
            )));
        }
        if let Component::Bus(bus) = &component {
            if self.bus_by_number(bus.number).is_some() {
                return Err(BiddsError::Validation(format!(
                    "duplicate bus number {} on bus '{}'",
                    bus.number, name
                )));
            }
        }
        self.by_name.insert(name, self.components.len());
        self.components.push(component);
        Ok(())
    }

    /// Attach a series to an existing component
    pub fn add_time_series(
        &mut self,
        owner: &str,
        signal: &str,
        series: TimeSeries,
    ) -> BiddsResult<()> {
        if !self.by_name.contains_key(owner) {
            return Err(BiddsError::Validation(format!(
                "time series '{}' references unknown component '{}'",
                signal, owner
            )));
        }
        self.time_series.insert(owner, signal, series);
        Ok(())
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.by_name.get(name).map(|&idx| &self.components[idx])
    }

    /// Number of a bus looked up by name
    pub fn bus_number(&self, name: &str) -> Option<BusNumber> {
        match self.component(name) {
            Some(Component::Bus(bus)) => Some(bus.number),
            _ => None,
        }
    }

    fn bus_by_number(&self, number: BusNumber) -> Option<&Bus> {
        self.components.iter().find_map(|component| match component {
            Component::Bus(bus) if bus.number == number => Some(bus),
            _ => None,
        })
    }

    pub fn time_series(&self) -> &TimeSeriesStore {
        &self.time_series
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn stats(&self) -> SystemStats {
        let mut stats = SystemStats::default();
        for component in &self.components {
            match component {
                Component::Bus(_) => stats.num_buses += 1,
                Component::Generator(_) => stats.num_generators += 1,
                Component::Load(_) => stats.num_loads += 1,
                Component::Battery(_) => stats.num_storage += 1,
                Component::Line(_) | Component::TapTransformer(_) | Component::DcLine(_) => {
                    stats.num_branches += 1
                }
                Component::Reserve(_) => stats.num_reserves += 1,
                Component::Unsupported(_) => stats.num_unsupported += 1,
            }
        }
        stats.num_time_series = self.time_series.len();
        stats
    }
}

impl TryFrom<SystemData> for System {
    type Error = BiddsError;

    fn try_from(data: SystemData) -> Result<Self, Self::Error> {
        let mut system = System::new(data.name, data.base_power);
        for component in data.components {
            system.add_component(component)?;
        }
        system.time_series = data.time_series;
        Ok(system)
    }
}

impl From<System> for SystemData {
    fn from(system: System) -> Self {
        Self {
            name: system.name,
            base_power: system.base_power,
            components: system.components,
            time_series: system.time_series,
        }
    }
}

/// Component counts of a system
#[derive(Debug, Clone, Default)]
pub struct SystemStats {
    pub num_buses: usize,
    pub num_generators: usize,
    pub num_loads: usize,
    pub num_storage: usize,
    pub num_branches: usize,
    pub num_reserves: usize,
    pub num_unsupported: usize,
    pub num_time_series: usize,
}

impl std::fmt::Display for SystemStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} buses, {} branches, {} generators, {} loads, {} storage, {} reserves, {} time series",
            self.num_buses,
            self.num_branches,
            self.num_generators,
            self.num_loads,
            self.num_storage,
            self.num_reserves,
            self.num_time_series
        )?;
        if self.num_unsupported > 0 {
            write!(f, " ({} unsupported)", self.num_unsupported)?;
        }
        Ok(())
    }
}
