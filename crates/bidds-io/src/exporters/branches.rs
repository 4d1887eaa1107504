//! Branch encoders: AC lines (with their endpoint shunts), tap transformers
//! and DC links.

use bidds_core::{Arc, BusNumber, DcLine, Line, TapTransformer};

use super::encoders::{EncodeContext, EncodeResult};
use super::schema::{AcLineRecord, DcLineRecord, ShuntRecord, TransformerRecord};

fn resolve_arc(arc: &Arc, ctx: &EncodeContext<'_>) -> EncodeResult<(BusNumber, BusNumber)> {
    Ok((ctx.resolve_bus(&arc.from)?, ctx.resolve_bus(&arc.to)?))
}

/// Line record plus the `_fr`/`_to` half-line charging shunts.
pub fn encode_line(
    line: &Line,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<(AcLineRecord, [ShuntRecord; 2])> {
    let (fr_bus, to_bus) = resolve_arc(&line.arc, ctx)?;
    let record = AcLineRecord {
        uid: line.name.clone(),
        fr_bus,
        to_bus,
        r: line.r,
        x: line.x,
        mva_ub_nom: line.rate,
    };
    let shunts = [
        ShuntRecord {
            uid: format!("{}_fr", line.name),
            bus: fr_bus,
            bs: line.b.from,
        },
        ShuntRecord {
            uid: format!("{}_to", line.name),
            bus: to_bus,
            bs: line.b.to,
        },
    ];
    Ok((record, shunts))
}

pub fn encode_tap_transformer(
    tx: &TapTransformer,
    ctx: &EncodeContext<'_>,
) -> EncodeResult<TransformerRecord> {
    let (fr_bus, to_bus) = resolve_arc(&tx.arc, ctx)?;
    Ok(TransformerRecord {
        uid: tx.name.clone(),
        fr_bus,
        to_bus,
        r: tx.r,
        x: tx.x,
        tap: tx.tap,
        mva_ub_nom: tx.rate,
    })
}

/// Sending-side limits only
pub fn encode_dc_line(dc: &DcLine, ctx: &EncodeContext<'_>) -> EncodeResult<DcLineRecord> {
    let (fr_bus, to_bus) = resolve_arc(&dc.arc, ctx)?;
    Ok(DcLineRecord {
        uid: dc.name.clone(),
        fr_bus,
        to_bus,
        pdc_lb: dc.active_power_limits_from.min,
        pdc_ub: dc.active_power_limits_from.max,
        qdc_fr_lb: dc.reactive_power_limits_from.min,
        qdc_fr_ub: dc.reactive_power_limits_from.max,
    })
}
