//! Insulation areas for walls and roof.
//!
//! Openings are cut out of the wall area only when flagged. An unflagged
//! door or window is cut out for spray foam (sprayed around the frame) but
//! left in for batts (the roll covers it anyway); bay doors and framed
//! openings are always cut out unless flagged otherwise.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::building::{parse_dimensions, InsulationType, WallSide};
use crate::units::{Feet, SqFt};

use super::TakeoffContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationTakeoff {
    pub kind: InsulationType,
    /// Gross wall area less subtracted openings, never negative
    pub wall_area: SqFt,
    pub roof_area: SqFt,
    /// Openings that could not be sized, e.g. "North door '3 by 7'"
    pub skipped: Vec<String>,
}

/// Insulation areas, or `None` when insulation is disabled.
pub fn quantify_insulation(ctx: &TakeoffContext<'_>) -> Option<InsulationTakeoff> {
    let insulation = ctx.doc.insulation;
    if !insulation.enabled {
        return None;
    }
    let spray = insulation.kind == InsulationType::Spray;

    let length = Feet(ctx.length);
    let width = Feet(ctx.width);
    let height = Feet(ctx.height);
    let gross = length * height * 2.0 + width * height * 2.0;

    let mut cutouts = 0.0;
    let mut skipped = Vec::new();

    for (side, wall) in ctx.doc.walls.iter() {
        for door in &wall.doors {
            if door.subtract_insulation.unwrap_or(spray) {
                cutouts += sized_cutout(side, "door", &door.dimensions, &mut skipped);
            }
        }
        for window in &wall.windows {
            if window.subtract_insulation.unwrap_or(spray) {
                cutouts += sized_cutout(side, "window", &window.dimensions, &mut skipped);
            }
        }
        for bay_door in &wall.bay_doors {
            if bay_door.subtract_insulation.unwrap_or(true) {
                cutouts += area(bay_door.width, bay_door.height);
            }
        }
        for opening in &wall.openings {
            if opening.subtract_insulation.unwrap_or(true) {
                cutouts += area(opening.width, opening.height);
            }
        }
    }

    let wall_area = SqFt((gross.value() - cutouts).max(0.0));
    let roof_area = SqFt(ctx.length * ctx.geometry.slope_length_per_side * ctx.roof_planes() as f64);

    debug!(
        kind = insulation.kind.display_name(),
        wall_area = wall_area.value(),
        roof_area = roof_area.value(),
        cutouts,
        "Quantified insulation"
    );

    Some(InsulationTakeoff {
        kind: insulation.kind,
        wall_area,
        roof_area,
        skipped,
    })
}

fn area(width: f64, height: f64) -> f64 {
    let a = width * height;
    if a.is_finite() && a > 0.0 {
        a
    } else {
        0.0
    }
}

fn sized_cutout(side: WallSide, what: &str, dimensions: &str, skipped: &mut Vec<String>) -> f64 {
    match parse_dimensions(dimensions) {
        Some((w, h)) => area(w, h),
        None => {
            warn!(wall = side.display_name(), what, dimensions, "Unreadable opening size, not subtracted");
            skipped.push(format!("{} {} '{}'", side.display_name(), what, dimensions));
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BayDoor, BuildingDocument, Insulation, Position, WallDoor, WallWindow};
    use crate::constants::TakeoffConstants;
    use uuid::Uuid;

    fn insulated(kind: InsulationType) -> BuildingDocument {
        let mut doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
        doc.insulation = Insulation { enabled: true, kind };
        doc
    }

    fn run(doc: &BuildingDocument) -> Option<InsulationTakeoff> {
        let constants = TakeoffConstants::default();
        let ctx = TakeoffContext::new(doc, &constants);
        quantify_insulation(&ctx)
    }

    fn door(dimensions: &str, subtract: Option<bool>) -> WallDoor {
        WallDoor {
            id: Uuid::new_v4(),
            dimensions: dimensions.to_string(),
            position: Position::default(),
            subtract_insulation: subtract,
        }
    }

    #[test]
    fn test_disabled_returns_none() {
        let doc = BuildingDocument::new(40.0, 40.0, 12.0, 2);
        assert!(run(&doc).is_none());
    }

    #[test]
    fn test_gross_areas() {
        let ins = run(&insulated(InsulationType::Batt)).unwrap();
        assert_eq!(ins.wall_area, SqFt(1920.0));
        // 40 * 20.6155 * 2
        assert!((ins.roof_area.value() - 1649.24).abs() < 0.01);
    }

    #[test]
    fn test_spray_subtracts_doors_by_default() {
        let mut doc = insulated(InsulationType::Spray);
        doc.walls.north.doors.push(door("3x7", None));
        doc.walls.east.windows.push(WallWindow {
            id: Uuid::new_v4(),
            dimensions: "4x4".to_string(),
            sill_height: 3.0,
            position: Position::default(),
            subtract_insulation: None,
        });
        let ins = run(&doc).unwrap();
        assert_eq!(ins.wall_area, SqFt(1920.0 - 21.0 - 16.0));
    }

    #[test]
    fn test_batt_keeps_doors_by_default() {
        let mut doc = insulated(InsulationType::Batt);
        doc.walls.north.doors.push(door("3x7", None));
        doc.walls.north.doors.push(door("3x7", Some(true)));
        doc.walls.south.bay_doors.push(BayDoor {
            id: Uuid::new_v4(),
            door_type: "roll-up".to_string(),
            width: 10.0,
            height: 10.0,
            position: Position::default(),
            subtract_insulation: None,
        });
        let ins = run(&doc).unwrap();
        assert_eq!(ins.wall_area, SqFt(1920.0 - 21.0 - 100.0));
    }

    #[test]
    fn test_unreadable_dimensions_are_skipped() {
        let mut doc = insulated(InsulationType::Spray);
        doc.walls.west.doors.push(door("three by seven", None));
        let ins = run(&doc).unwrap();
        assert_eq!(ins.wall_area, SqFt(1920.0));
        assert_eq!(ins.skipped, vec!["West door 'three by seven'".to_string()]);
    }

    #[test]
    fn test_wall_area_never_negative() {
        let mut doc = insulated(InsulationType::Spray);
        doc.walls.north.doors.push(door("100x100", None));
        let ins = run(&doc).unwrap();
        assert_eq!(ins.wall_area, SqFt(0.0));
    }
}
