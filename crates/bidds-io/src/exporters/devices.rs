//! Generator and load encoders for the `dispatchable_device` bucket.

use std::collections::BTreeMap;

use bidds_core::{
    Generator, HydroDispatch, HydroEnergyReservoir, MinMax, OperationalCost, PerUnit, PowerLoad,
    RenewableDispatch, RenewableFix, ThermalGen, UpDown,
};

use super::encoders::{EncodeContext, EncodeResult};
use super::schema::{ConfigBlock, CostRepr, DeviceRecord};

/// Config tag of single-mode devices
pub const ON_CONFIG: &str = "on";

/// Penalty per unit of involuntary load curtailment, scaled by the base power
pub const CURTAILMENT_PENALTY: f64 = 3000.0;

pub fn encode_generator(gen: &Generator, ctx: &EncodeContext<'_>) -> EncodeResult<DeviceRecord> {
    match gen {
        Generator::Thermal(g) => encode_thermal(g, ctx),
        Generator::RenewableFixed(g) => encode_renewable_fixed(g, ctx),
        Generator::RenewableDispatch(g) => encode_renewable_dispatch(g, ctx),
        Generator::HydroDispatch(g) => encode_hydro_dispatch(g, ctx),
        Generator::HydroEnergyReservoir(g) => encode_hydro_reservoir(g, ctx),
    }
}

/// Each associated reserve product is bounded by the full rating.
fn reserve_bounds(services: &[String], max_active_power: f64) -> BTreeMap<String, f64> {
    services
        .iter()
        .map(|service| (service.clone(), max_active_power))
        .collect()
}

/// Block shared by the committable units (thermal and hydro)
fn unit_block(
    active: MinMax,
    reactive: Option<MinMax>,
    ramp: Option<UpDown>,
    time: Option<UpDown>,
    cost: CostRepr,
    operation_cost: &OperationalCost,
    services: &[String],
) -> ConfigBlock {
    ConfigBlock {
        pg_lb: Some(active.min),
        pg_ub: Some(active.max),
        qg_lb: reactive.map(|q| q.min),
        qg_ub: reactive.map(|q| q.max),
        cost: Some(cost),
        on_cost: Some(operation_cost.fixed),
        ramp_up_ub: ramp.map(|r| r.up),
        ramp_down_ub: ramp.map(|r| r.down),
        min_up_time: time.map(|t| t.up),
        min_down_time: time.map(|t| t.down),
        reserve_ub: reserve_bounds(services, active.max),
        ..ConfigBlock::new(ON_CONFIG)
    }
}

pub fn encode_thermal(gen: &ThermalGen, ctx: &EncodeContext<'_>) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&gen.bus)?;
    let blocks = gen
        .operation_cost
        .variable
        .marginal_blocks(ctx.base_power(), PerUnit(gen.active_power_limits.max))?;

    let block = unit_block(
        gen.active_power_limits,
        gen.reactive_power_limits,
        gen.ramp_limits,
        gen.time_limits,
        CostRepr::Blocks(blocks),
        &gen.operation_cost,
        &gen.services,
    );
    Ok(DeviceRecord::new(&gen.name, bus, vec![block])
        .with_start_stop_costs(gen.operation_cost.startup, gen.operation_cost.shutdown))
}

pub fn encode_renewable_fixed(
    gen: &RenewableFix,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&gen.bus)?;
    let block = ConfigBlock {
        pg_ub: Some(gen.max_active_power),
        qg_ub: gen.reactive_power_limits.map(|q| q.max),
        ..ConfigBlock::new(ON_CONFIG)
    };
    Ok(DeviceRecord::new(&gen.name, bus, vec![block]))
}

pub fn encode_renewable_dispatch(
    gen: &RenewableDispatch,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&gen.bus)?;
    let average = gen.operation_cost.variable.average()?;
    let block = ConfigBlock {
        pg_ub: Some(gen.max_active_power),
        qg_lb: gen.reactive_power_limits.map(|q| q.min),
        qg_ub: gen.reactive_power_limits.map(|q| q.max),
        cost: Some(CostRepr::Average([average, gen.max_active_power])),
        on_cost: Some(gen.operation_cost.fixed),
        reserve_ub: reserve_bounds(&gen.services, gen.max_active_power),
        ..ConfigBlock::new(ON_CONFIG)
    };
    Ok(DeviceRecord::new(&gen.name, bus, vec![block]))
}

pub fn encode_hydro_dispatch(
    gen: &HydroDispatch,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&gen.bus)?;
    let average = gen.operation_cost.variable.average()?;
    let block = unit_block(
        gen.active_power_limits,
        gen.reactive_power_limits,
        gen.ramp_limits,
        gen.time_limits,
        CostRepr::Average([average, gen.active_power_limits.max]),
        &gen.operation_cost,
        &gen.services,
    );
    Ok(DeviceRecord::new(&gen.name, bus, vec![block])
        .with_start_stop_costs(gen.operation_cost.startup, gen.operation_cost.shutdown))
}

pub fn encode_hydro_reservoir(
    gen: &HydroEnergyReservoir,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&gen.bus)?;
    let average = gen.operation_cost.variable.average()?;
    let block = unit_block(
        gen.active_power_limits,
        gen.reactive_power_limits,
        gen.ramp_limits,
        gen.time_limits,
        CostRepr::Average([average, gen.active_power_limits.max]),
        &gen.operation_cost,
        &gen.services,
    );
    Ok(DeviceRecord::new(&gen.name, bus, vec![block])
        .with_start_stop_costs(gen.operation_cost.startup, gen.operation_cost.shutdown)
        .with_storage(0.0, gen.storage_capacity)
        .with_external_injection(gen.inflow))
}

/// Loads are negative injections; dropping them costs the curtailment penalty.
pub fn encode_load(load: &PowerLoad, ctx: &EncodeContext<'_>) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&load.bus)?;
    let penalty = CURTAILMENT_PENALTY * ctx.base_power().value();
    let block = ConfigBlock {
        pg_lb: Some(-load.max_active_power),
        pg_ub: Some(0.0),
        qg_lb: Some(-load.max_reactive_power),
        qg_ub: Some(0.0),
        cost: Some(CostRepr::Average([penalty, -load.max_active_power])),
        ..ConfigBlock::new(ON_CONFIG)
    };
    Ok(DeviceRecord::new(&load.name, bus, vec![block]))
}
