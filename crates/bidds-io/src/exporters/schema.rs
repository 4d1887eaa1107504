//! Output record shapes of the target solver schema.
//!
//! Every record is built once by an encoder from fully resolved inputs and
//! never mutated afterwards. Nullable fields serialize as explicit `null`;
//! config-block fields that do not apply to a device kind are omitted.

use std::collections::BTreeMap;

use bidds_core::{BusNumber, MarginalBlock};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusRecord {
    pub uid: BusNumber,
    pub name: String,
    pub base_nom_volt: f64,
    #[serde(rename = "type")]
    pub bus_type: String,
    pub vm_lb: f64,
    pub vm_ub: f64,
    pub area: Option<String>,
    pub zone: Option<String>,
    /// Reserved, never populated
    pub latitude: Option<f64>,
    /// Reserved, never populated
    pub longitude: Option<f64>,
}

/// Cost of one operating configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CostRepr {
    /// `[cost, power]` average-cost pair
    Average([f64; 2]),
    /// Marginal `[cost, width]` blocks
    Blocks(Vec<MarginalBlock>),
}

/// One operating configuration of a dispatchable device
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigBlock {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg_lb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg_ub: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qg_lb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qg_ub: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostRepr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramp_up_ub: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramp_down_ub: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_up_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_down_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    /// Reserve contribution bounds keyed by reserve product name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub reserve_ub: BTreeMap<String, f64>,
}

impl ConfigBlock {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }
}

/// Generator, load or storage device in the `dispatchable_device` bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    pub uid: String,
    pub bus: BusNumber,
    pub vm_setpoint: Option<f64>,
    pub startup_cost: Option<f64>,
    pub shutdown_cost: Option<f64>,
    pub energy_lb: Option<f64>,
    pub energy_ub: Option<f64>,
    pub pg_ext: Option<f64>,
    pub storage_cap: bool,
    pub config_num: usize,
    pub config: Vec<ConfigBlock>,
}

impl DeviceRecord {
    /// Common fields; `config_num` always matches the block count
    pub fn new(uid: impl Into<String>, bus: BusNumber, config: Vec<ConfigBlock>) -> Self {
        Self {
            uid: uid.into(),
            bus,
            vm_setpoint: None,
            startup_cost: None,
            shutdown_cost: None,
            energy_lb: None,
            energy_ub: None,
            pg_ext: None,
            storage_cap: false,
            config_num: config.len(),
            config,
        }
    }

    pub fn with_start_stop_costs(mut self, startup: f64, shutdown: f64) -> Self {
        self.startup_cost = Some(startup);
        self.shutdown_cost = Some(shutdown);
        self
    }

    /// Mark as storage-capable with the given energy bounds
    pub fn with_storage(mut self, energy_lb: f64, energy_ub: f64) -> Self {
        self.storage_cap = true;
        self.energy_lb = Some(energy_lb);
        self.energy_ub = Some(energy_ub);
        self
    }

    pub fn with_external_injection(mut self, pg_ext: f64) -> Self {
        self.pg_ext = Some(pg_ext);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShuntRecord {
    pub uid: String,
    pub bus: BusNumber,
    pub bs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcLineRecord {
    pub uid: String,
    pub fr_bus: BusNumber,
    pub to_bus: BusNumber,
    pub r: f64,
    pub x: f64,
    pub mva_ub_nom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformerRecord {
    pub uid: String,
    pub fr_bus: BusNumber,
    pub to_bus: BusNumber,
    pub r: f64,
    pub x: f64,
    pub tap: f64,
    pub mva_ub_nom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcLineRecord {
    pub uid: String,
    pub fr_bus: BusNumber,
    pub to_bus: BusNumber,
    pub pdc_lb: f64,
    pub pdc_ub: f64,
    pub qdc_fr_lb: f64,
    pub qdc_fr_ub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReserveRecord {
    pub uid: String,
    #[serde(rename = "type")]
    pub reserve_type: String,
    pub requirement: f64,
}

/// Encoded static record of one component
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRecord {
    Bus(BusRecord),
    Device(DeviceRecord),
    /// A line always brings its two endpoint shunts along
    AcLine(AcLineRecord, [ShuntRecord; 2]),
    Transformer(TransformerRecord),
    DcLine(DcLineRecord),
    Reserve(ReserveRecord),
}

/// Per-device window of the capacity signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSeriesRecord {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg_ub: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg_lb: Option<Vec<f64>>,
    pub on_status_ub: Vec<u8>,
    pub on_status_lb: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReserveSeriesRecord {
    pub uid: String,
    pub reserve_requirement: Vec<f64>,
}

/// Branches carry no time-indexed signal; their series buckets stay empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NoSeries {}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeSeriesRecord {
    Device(DeviceSeriesRecord),
    Reserve(ReserveSeriesRecord),
}
