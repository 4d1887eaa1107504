//! Battery encoder: one device, two operating modes.
//!
//! Charging is modelled as negative injection, so its bounds are the negated
//! input limits. Both blocks share the reactive limits and reserve bounds.

use bidds_core::Battery;

use super::encoders::{EncodeContext, EncodeResult};
use super::schema::{ConfigBlock, DeviceRecord};

pub const CHARGING_CONFIG: &str = "charging";
pub const DISCHARGING_CONFIG: &str = "discharging";

pub fn encode_battery(battery: &Battery, ctx: &EncodeContext<'_>) -> EncodeResult<DeviceRecord> {
    let bus = ctx.resolve_bus(&battery.bus)?;
    let input = battery.input_active_power_limits;
    let output = battery.output_active_power_limits;
    let reactive = battery.reactive_power_limits;

    let charging = ConfigBlock {
        pg_lb: Some(-input.max),
        pg_ub: Some(-input.min),
        qg_lb: reactive.map(|q| q.min),
        qg_ub: reactive.map(|q| q.max),
        efficiency: Some(battery.efficiency.input),
        reserve_ub: battery
            .services
            .iter()
            .map(|service| (service.clone(), input.max))
            .collect(),
        ..ConfigBlock::new(CHARGING_CONFIG)
    };
    let discharging = ConfigBlock {
        pg_lb: Some(output.min),
        pg_ub: Some(output.max),
        qg_lb: reactive.map(|q| q.min),
        qg_ub: reactive.map(|q| q.max),
        efficiency: Some(battery.efficiency.output),
        reserve_ub: battery
            .services
            .iter()
            .map(|service| (service.clone(), output.max))
            .collect(),
        ..ConfigBlock::new(DISCHARGING_CONFIG)
    };

    let soc = battery.state_of_charge_limits;
    Ok(DeviceRecord::new(&battery.name, bus, vec![charging, discharging])
        .with_storage(soc.min, soc.max))
}
