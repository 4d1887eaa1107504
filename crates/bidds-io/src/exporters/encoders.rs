//! Per-category encoders for the network document.
//!
//! Encoders are pure: they read one component plus the system it lives in
//! (for bus-number resolution) and return an immutable record or an
//! [`EncodeError`]. Device, storage and branch encoders live in sibling
//! modules; this module holds the shared context and the dispatch.

use bidds_core::{
    Bus, BusNumber, Component, CostCurveError, MegavoltAmperes, Reserve, System, WindowError,
};
use thiserror::Error;

use super::branches::{encode_dc_line, encode_line, encode_tap_transformer};
use super::devices::{encode_generator, encode_load};
use super::schema::{BusRecord, NetworkRecord, ReserveRecord};
use super::storage::encode_battery;

/// Reason a single component (or one of its records) was excluded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("no encoder for category '{kind}'")]
    Unsupported { kind: String },

    #[error("bus '{bus}' is not a bus of this system")]
    UnresolvedBus { bus: String },

    #[error("invalid cost curve: {0}")]
    CostCurve(#[from] CostCurveError),

    #[error("time series '{signal}' is a forecast; a single realized trajectory is required")]
    ForecastUnsupported { signal: String },

    #[error("time series '{signal}': {source}")]
    WindowOutOfRange {
        signal: String,
        #[source]
        source: WindowError,
    },
}

impl EncodeError {
    /// Diagnostic category this failure is reported under
    pub fn category(&self) -> &'static str {
        match self {
            EncodeError::Unsupported { .. } => "unclassified",
            EncodeError::UnresolvedBus { .. } => "reference",
            EncodeError::CostCurve(_) => "encode",
            EncodeError::ForecastUnsupported { .. } | EncodeError::WindowOutOfRange { .. } => {
                "time_series"
            }
        }
    }
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Inputs shared by every encoder in one pass
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    system: &'a System,
    base_power: MegavoltAmperes,
}

impl<'a> EncodeContext<'a> {
    pub fn new(system: &'a System) -> Self {
        Self {
            system,
            base_power: system.base_power,
        }
    }

    pub fn base_power(&self) -> MegavoltAmperes {
        self.base_power
    }

    pub fn resolve_bus(&self, name: &str) -> EncodeResult<BusNumber> {
        self.system
            .bus_number(name)
            .ok_or_else(|| EncodeError::UnresolvedBus {
                bus: name.to_string(),
            })
    }
}

/// Encode one component into its network record.
///
/// [`Component::Unsupported`] has no encoder; callers are expected to have
/// filtered it out through [`super::classify::classify`] already.
pub fn encode_component(
    component: &Component,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<NetworkRecord> {
    match component {
        Component::Bus(bus) => Ok(NetworkRecord::Bus(encode_bus(bus))),
        Component::Generator(gen) => encode_generator(gen, ctx).map(NetworkRecord::Device),
        Component::Load(load) => encode_load(load, ctx).map(NetworkRecord::Device),
        Component::Battery(battery) => encode_battery(battery, ctx).map(NetworkRecord::Device),
        Component::Line(line) => {
            encode_line(line, ctx).map(|(record, shunts)| NetworkRecord::AcLine(record, shunts))
        }
        Component::TapTransformer(tx) => {
            encode_tap_transformer(tx, ctx).map(NetworkRecord::Transformer)
        }
        Component::DcLine(dc) => encode_dc_line(dc, ctx).map(NetworkRecord::DcLine),
        Component::Reserve(reserve) => Ok(NetworkRecord::Reserve(encode_reserve(reserve))),
        Component::Unsupported(other) => Err(EncodeError::Unsupported {
            kind: other.kind.clone(),
        }),
    }
}

pub fn encode_bus(bus: &Bus) -> BusRecord {
    BusRecord {
        uid: bus.number,
        name: bus.name.clone(),
        base_nom_volt: bus.base_voltage.value(),
        bus_type: bus.bus_type.as_str().to_string(),
        vm_lb: bus.voltage_limits.min,
        vm_ub: bus.voltage_limits.max,
        area: bus.area.clone(),
        zone: bus.load_zone.clone(),
        latitude: None,
        longitude: None,
    }
}

pub fn encode_reserve(reserve: &Reserve) -> ReserveRecord {
    ReserveRecord {
        uid: reserve.name.clone(),
        reserve_type: reserve.name.clone(),
        requirement: reserve.requirement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidds_core::{BusType, Kilovolts, MinMax, UnsupportedComponent};

    fn abel() -> Bus {
        Bus {
            number: BusNumber::new(101),
            name: "Abel".into(),
            base_voltage: Kilovolts(138.0),
            bus_type: BusType::Pv,
            voltage_limits: MinMax::new(0.95, 1.05),
            area: Some("1".into()),
            load_zone: None,
        }
    }

    #[test]
    fn test_bus_record_fields() {
        let record = encode_bus(&abel());
        assert_eq!(record.uid, BusNumber::new(101));
        assert_eq!(record.bus_type, "PV");
        assert!(record.vm_lb <= record.vm_ub);
        assert_eq!(record.area.as_deref(), Some("1"));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["zone"].is_null());
        assert!(json["latitude"].is_null());
        assert!(json["longitude"].is_null());
        assert_eq!(json["base_nom_volt"], 138.0);
    }

    #[test]
    fn test_reserve_type_is_its_name() {
        let record = encode_reserve(&Reserve {
            name: "Reg_Up".into(),
            requirement: 0.35,
        });
        assert_eq!(record.uid, "Reg_Up");
        assert_eq!(record.reserve_type, "Reg_Up");
        assert_eq!(record.requirement, 0.35);
    }

    #[test]
    fn test_resolve_bus() {
        let mut system = System::new("test", MegavoltAmperes(100.0));
        system.add_component(Component::Bus(abel())).unwrap();
        let ctx = EncodeContext::new(&system);

        assert_eq!(ctx.resolve_bus("Abel"), Ok(BusNumber::new(101)));
        assert_eq!(
            ctx.resolve_bus("Nowhere"),
            Err(EncodeError::UnresolvedBus {
                bus: "Nowhere".into()
            })
        );
    }

    #[test]
    fn test_unsupported_has_no_encoder() {
        let system = System::new("test", MegavoltAmperes(100.0));
        let ctx = EncodeContext::new(&system);
        let other = Component::Unsupported(UnsupportedComponent {
            name: "SC_1".into(),
            kind: "synchronous_condenser".into(),
        });
        assert!(matches!(
            encode_component(&other, &ctx),
            Err(EncodeError::Unsupported { .. })
        ));
    }
}
