//! # Envelope Quantities
//!
//! Roof and wall sheeting, panel closures, and exterior trim. Panels run
//! perpendicular to the eaves on a fixed coverage width, so every panel
//! count is a ceiling division of the wall length by that width.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::building::{PanelType, RoofType};
use crate::units::{format_feet_inches, Feet, SqFt};

use super::{ceil_count, floor_count, TakeoffContext};

/// Most end-wall panel heights listed individually
const ENDWALL_SCHEDULE_LIMIT: u32 = 500;

/// Gutters and their hardware, one run per sidewall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GutterTakeoff {
    pub gutters: u32,
    pub gutter_length: f64,
    pub straps: u32,
    pub downspouts: u32,
    pub downspout_length: f64,
    pub kickouts: u32,
    pub downspout_straps: u32,
    pub endcap_pairs: u32,
    pub corner_box_pairs: u32,
}

/// How the sidewall eaves are finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EaveFinish {
    EaveTrim { pieces: u32, length: f64 },
    Gutters(GutterTakeoff),
}

/// Exterior trim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimTakeoff {
    /// Ridge roll length; `None` on a single-slope roof
    pub ridge_roll: Option<f64>,
    pub peak_boxes: u32,
    pub rake_pieces: u32,
    pub rake_length: f64,
    pub corner_pieces: u32,
    pub corner_length: f64,
    pub drip_pieces: u32,
    pub drip_length: f64,
    pub eave: EaveFinish,
}

/// Sheeting, closures, and trim for one building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeTakeoff {
    pub panel_type: PanelType,
    /// Panel slots along one wall, `ceil(length / panel width)`
    pub panels_per_wall: u32,
    pub roof_panels: u32,
    pub roof_panel_length: f64,
    /// Both sidewalls
    pub sidewall_panels: u32,
    pub sidewall_panel_length: f64,
    /// End-wall panels on one end wall; front and back match
    pub endwall_panels_per_wall: u32,
    /// Panel lengths in order across one end wall, at most the first 500
    pub endwall_panel_heights: Vec<f64>,
    pub outside_closures: u32,
    pub inside_closures: u32,
    /// Gross wall sheeting area (sq ft), before waste
    pub wall_panel_area: SqFt,
    pub waste_factor: f64,
    pub trim: TrimTakeoff,
    pub notes: Vec<String>,
}

impl EnvelopeTakeoff {
    /// Wall sheeting area with the panel waste allowance applied.
    ///
    /// Advisory only: piece counts never include waste.
    pub fn wall_panel_area_with_waste(&self) -> SqFt {
        self.wall_panel_area * (1.0 + self.waste_factor)
    }
}

/// Compute sheeting and trim.
pub fn quantify_envelope(ctx: &TakeoffContext<'_>) -> EnvelopeTakeoff {
    let c = ctx.constants;
    let geom = &ctx.geometry;
    let panel_type = ctx.doc.panel();

    let panels_per_wall = ctx.panels_per_wall();
    let roof_panels = panels_per_wall.saturating_mul(ctx.roof_planes());
    let sidewall_panels = panels_per_wall.saturating_mul(2);
    let endwall_panel_heights = endwall_schedule(ctx, panels_per_wall.min(ENDWALL_SCHEDULE_LIMIT));
    let mut notes = Vec::new();

    // End walls take the sidewall panel count; slots beyond the end wall
    // width are sized at the corner height
    let past_corner = panels_per_wall.saturating_sub(ceil_count(ctx.width / c.panel_width_ft));
    if past_corner > 0 {
        warn!(past_corner, width = ctx.width, "End wall panel layout runs past the corner");
        notes.push(format!(
            "{} of {} end wall panels lie past the {} end wall width and are sized at the corner height",
            past_corner,
            panels_per_wall,
            format_feet_inches(ctx.width)
        ));
    }
    if panels_per_wall > ENDWALL_SCHEDULE_LIMIT {
        notes.push(format!(
            "End wall panel heights are listed for the first {} of {} panels",
            ENDWALL_SCHEDULE_LIMIT, panels_per_wall
        ));
    }

    let length = Feet(ctx.length);
    let width = Feet(ctx.width);
    let eave_height = Feet(ctx.height);
    let wall_panel_area = length * eave_height * 2.0 + width * eave_height * 2.0;

    let (ridge_roll, peak_boxes, rake_pieces) = match ctx.doc.roof_type {
        RoofType::Gable => (Some(ctx.length), 2, 4),
        RoofType::SingleSlope => (None, 0, 2),
    };

    let eave = if ctx.doc.gutters_enabled {
        let gutters = 2;
        let downspouts = ceil_count(ctx.length / c.downspout_spacing_ft).saturating_mul(gutters);
        EaveFinish::Gutters(GutterTakeoff {
            gutters,
            gutter_length: ctx.length,
            straps: floor_count(ctx.length / c.gutter_strap_spacing_ft).saturating_mul(gutters),
            downspouts,
            downspout_length: ctx.height,
            kickouts: downspouts,
            downspout_straps: downspouts.saturating_mul(2),
            endcap_pairs: gutters,
            corner_box_pairs: gutters,
        })
    } else {
        EaveFinish::EaveTrim {
            pieces: 2,
            length: ctx.length,
        }
    };

    let trim = TrimTakeoff {
        ridge_roll,
        peak_boxes,
        rake_pieces,
        rake_length: geom.roof_panel_length,
        corner_pieces: 4,
        corner_length: ctx.height,
        drip_pieces: 4,
        drip_length: ctx.length,
        eave,
    };

    debug!(
        roof_panels,
        sidewall_panels,
        endwall_panels = panels_per_wall,
        gutters = ctx.doc.gutters_enabled,
        "Quantified envelope"
    );

    EnvelopeTakeoff {
        waste_factor: panel_type.waste_factor(),
        panel_type,
        panels_per_wall,
        roof_panels,
        roof_panel_length: geom.roof_panel_length,
        sidewall_panels,
        sidewall_panel_length: ctx.height,
        endwall_panels_per_wall: panels_per_wall,
        endwall_panel_heights,
        outside_closures: roof_panels,
        inside_closures: roof_panels,
        wall_panel_area,
        trim,
        notes,
    }
}

/// Panel lengths across one end wall.
///
/// A gable panel takes the roofline height at its inner edge, the edge
/// nearer the ridge; a panel straddling the center takes the ridge height.
/// A single-slope panel takes the height at its high edge.
fn endwall_schedule(ctx: &TakeoffContext<'_>, slots: u32) -> Vec<f64> {
    let geom = &ctx.geometry;
    let pw = ctx.constants.panel_width_ft;
    let half = ctx.width / 2.0;

    (0..slots)
        .map(|i| {
            let left = i as f64 * pw;
            let right = left + pw;
            match geom.roof_type {
                RoofType::Gable if right <= half => geom.wall_height_at(ctx.height, ctx.width, right),
                RoofType::Gable if left >= half => geom.wall_height_at(ctx.height, ctx.width, left),
                RoofType::Gable => geom.ridge_height,
                RoofType::SingleSlope => geom.wall_height_at(ctx.height, ctx.width, right),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::BuildingDocument;
    use crate::constants::TakeoffConstants;

    fn run(doc: &BuildingDocument) -> EnvelopeTakeoff {
        let constants = TakeoffConstants::default();
        let ctx = TakeoffContext::new(doc, &constants);
        quantify_envelope(&ctx)
    }

    fn standard() -> BuildingDocument {
        BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0)
    }

    #[test]
    fn test_panel_counts() {
        let e = run(&standard());
        assert_eq!(e.panels_per_wall, 14);
        assert_eq!(e.roof_panels, 28);
        assert_eq!(e.sidewall_panels, 28);
        assert_eq!(e.outside_closures, 28);
        assert_eq!(e.inside_closures, 28);
        assert_eq!(e.sidewall_panel_length, 12.0);
        assert!((e.roof_panel_length - 20.7405).abs() < 1e-4);
    }

    #[test]
    fn test_endwall_schedule_rises_to_ridge() {
        let e = run(&standard());
        let h = &e.endwall_panel_heights;
        assert_eq!(h.len(), 14);
        // 3' slot ends at 3': 12 + 3 * 0.25
        assert_eq!(h[0], 12.75);
        assert_eq!(h[5], 16.5);
        // slot 6 spans 18'-21' and straddles the center
        assert_eq!(h[6], 17.0);
        assert_eq!(h[7], 16.75);
        // slots past the far corner never drop below the eave
        assert!(h.iter().all(|v| *v >= 12.0));
    }

    #[test]
    fn test_endwall_schedule_single_slope() {
        let doc = BuildingDocument::new(12.0, 30.0, 14.0, 2)
            .with_pitch(2.0)
            .with_roof_type(crate::building::RoofType::SingleSlope);
        let e = run(&doc);
        // 12' long -> 4 slots; slope 1/6 per foot
        assert_eq!(e.endwall_panel_heights.len(), 4);
        assert!((e.endwall_panel_heights[0] - 14.5).abs() < 1e-9);
        assert!((e.endwall_panel_heights[3] - 16.0).abs() < 1e-9);
        assert_eq!(e.roof_panels, 4);
        assert_eq!(e.trim.ridge_roll, None);
        assert_eq!(e.trim.peak_boxes, 0);
        assert_eq!(e.trim.rake_pieces, 2);
    }

    #[test]
    fn test_slots_past_the_corner_are_noted() {
        // 60' long, 30' wide: 20 slots against a 10-slot end wall
        let e = run(&BuildingDocument::new(60.0, 30.0, 12.0, 3).with_pitch(3.0));
        assert_eq!(e.endwall_panels_per_wall, 20);
        assert!(e.endwall_panel_heights[10..].iter().all(|h| *h == 12.0));
        assert_eq!(
            e.notes,
            vec!["10 of 20 end wall panels lie past the 30' end wall width and are sized at the corner height".to_string()]
        );

        assert!(run(&standard()).notes.is_empty());
    }

    #[test]
    fn test_huge_length_saturates() {
        let e = run(&BuildingDocument::new(1.0e10, 40.0, 12.0, 2).with_pitch(3.0));
        assert_eq!(e.panels_per_wall, 3_333_333_334);
        assert_eq!(e.roof_panels, u32::MAX);
        assert_eq!(e.sidewall_panels, u32::MAX);
        assert_eq!(e.endwall_panels_per_wall, 3_333_333_334);
        assert_eq!(e.endwall_panel_heights.len(), 500);
        assert!(e.notes.iter().any(|n| n.starts_with("End wall panel heights are listed for the first 500")));
        match &e.trim.eave {
            EaveFinish::Gutters(g) => assert_eq!(g.straps, u32::MAX),
            other => panic!("expected gutters, got {:?}", other),
        }
    }

    #[test]
    fn test_gutters() {
        let e = run(&standard());
        match &e.trim.eave {
            EaveFinish::Gutters(g) => {
                assert_eq!(g.gutters, 2);
                assert_eq!(g.gutter_length, 40.0);
                assert_eq!(g.straps, 40);
                assert_eq!(g.downspouts, 4);
                assert_eq!(g.downspout_length, 12.0);
                assert_eq!(g.kickouts, 4);
                assert_eq!(g.downspout_straps, 8);
                assert_eq!(g.endcap_pairs, 2);
                assert_eq!(g.corner_box_pairs, 2);
            }
            other => panic!("expected gutters, got {:?}", other),
        }
    }

    #[test]
    fn test_gutter_rounding_on_odd_length() {
        // 45': floor(22.5) straps and ceil(2.25) downspouts per gutter
        let e = run(&BuildingDocument::new(45.0, 40.0, 12.0, 3).with_pitch(3.0));
        match &e.trim.eave {
            EaveFinish::Gutters(g) => {
                assert_eq!(g.straps, 44);
                assert_eq!(g.downspouts, 6);
            }
            other => panic!("expected gutters, got {:?}", other),
        }
    }

    #[test]
    fn test_eave_trim_without_gutters() {
        let e = run(&standard().with_gutters(false));
        assert_eq!(e.trim.eave, EaveFinish::EaveTrim { pieces: 2, length: 40.0 });
    }

    #[test]
    fn test_trim_lengths() {
        let e = run(&standard());
        assert_eq!(e.trim.ridge_roll, Some(40.0));
        assert_eq!(e.trim.peak_boxes, 2);
        assert_eq!(e.trim.rake_pieces, 4);
        assert_eq!(e.trim.rake_length, e.roof_panel_length);
        assert_eq!(e.trim.corner_pieces, 4);
        assert_eq!(e.trim.corner_length, 12.0);
        assert_eq!(e.trim.drip_pieces, 4);
        assert_eq!(e.trim.drip_length, 40.0);
    }

    #[test]
    fn test_waste_is_advisory() {
        let doc = standard().with_panel_type(PanelType::StandingSeam);
        let e = run(&doc);
        assert_eq!(e.wall_panel_area, SqFt(1920.0));
        assert!((e.wall_panel_area_with_waste().value() - 2073.6).abs() < 1e-9);
        assert_eq!(e.roof_panels, 28);
    }
}
