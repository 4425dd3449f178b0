//! Fastener counts derived from panel, purlin, and base angle quantities.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::envelope::EnvelopeTakeoff;
use super::structure::StructuralTakeoff;
use super::{ceil_count, count_of, TakeoffContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastenerTakeoff {
    pub roof_tek: u32,
    pub wall_tek: u32,
    pub trim_tek: u32,
    pub roof_lap: u32,
    pub wall_lap: u32,
    pub trim_lap: u32,
    pub window_screws: u32,
    pub concrete_anchors: u32,
}

/// Compute fastener counts. Every fractional count rounds up.
pub fn quantify_fasteners(
    ctx: &TakeoffContext<'_>,
    structure: &StructuralTakeoff,
    envelope: &EnvelopeTakeoff,
) -> FastenerTakeoff {
    let c = ctx.constants;

    // Sloped panels cross each purlin line over a longer run than the plan length
    let roof_tek = ceil_count(ctx.length * structure.purlin_lines as f64 * ctx.geometry.slope_factor());
    let wall_tek = ceil_count(ctx.length * c.sidewall_fastening_points as f64);

    let roof_lap = envelope
        .roof_panels
        .saturating_mul(structure.purlin_lines)
        .saturating_mul(2);
    let wall_lap = envelope
        .sidewall_panels
        .saturating_mul(structure.sidewall_girt_levels.saturating_mul(2))
        .saturating_mul(2);

    let fasteners = FastenerTakeoff {
        roof_tek,
        wall_tek,
        trim_tek: c.trim_tek_screw_allowance,
        roof_lap,
        wall_lap,
        trim_lap: c.trim_lap_screw_allowance,
        window_screws: count_of(ctx.doc.windows.len()).saturating_mul(c.screws_per_window),
        concrete_anchors: ceil_count(structure.base_angle_length / c.anchor_spacing_ft),
    };
    debug!(?fasteners, "Quantified fasteners");
    fasteners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BuildingDocument, OpeningSize, RollUpDoor};
    use crate::constants::TakeoffConstants;
    use crate::takeoff::{quantify_envelope, quantify_structure};

    fn run(doc: &BuildingDocument) -> FastenerTakeoff {
        let constants = TakeoffConstants::default();
        let ctx = TakeoffContext::new(doc, &constants);
        let structure = quantify_structure(&ctx);
        let envelope = quantify_envelope(&ctx);
        quantify_fasteners(&ctx, &structure, &envelope)
    }

    #[test]
    fn test_standard_building() {
        let f = run(&BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0));
        // 40 * 10 lines * (20.6155 / 20) = 412.31
        assert_eq!(f.roof_tek, 413);
        assert_eq!(f.wall_tek, 160);
        assert_eq!(f.trim_tek, 250);
        assert_eq!(f.roof_lap, 560);
        assert_eq!(f.wall_lap, 224);
        assert_eq!(f.trim_lap, 250);
        assert_eq!(f.window_screws, 0);
        // 160 / 3 = 53.3
        assert_eq!(f.concrete_anchors, 54);
    }

    #[test]
    fn test_flat_roof_uses_plan_length() {
        let f = run(&BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(0.0));
        // 20' slope -> 4 purlins per side, 8 lines
        assert_eq!(f.roof_tek, 320);
    }

    #[test]
    fn test_windows_and_doors() {
        let mut doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
        doc.windows = vec![OpeningSize::new(3.0, 3.0); 3];
        doc.roll_up_doors = vec![RollUpDoor::new(16.0, 10.0), RollUpDoor::new(10.0, 10.0)];
        let f = run(&doc);
        assert_eq!(f.window_screws, 72);
        // (160 - 26) / 3 = 44.7
        assert_eq!(f.concrete_anchors, 45);
    }
}
