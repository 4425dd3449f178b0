//! # Structural Quantities
//!
//! Frame columns and rafters, center columns on the gabled end walls,
//! roof purlins, wall girts with their clips and welded tabs, foundation
//! base angle, and the header/framing purlins around man doors and windows.
//!
//! ## Girt layout
//!
//! ```text
//!   sidewall            gabled end wall
//!   ────────  10'       /\        extra level when the peak
//!   ────────   5'      /──\       rises more than 7' above the eave
//!                     /────\
//!                     ──────  every 5' from grade to the eave
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::building::{RoofType, WallAssignment, WallSide};

use super::{ceil_count, count_of, floor_count, TakeoffContext};

/// Members of one size selection and how many of them are needed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberGroup {
    /// e.g. "I-beam W8x18"
    pub label: String,
    pub count: u32,
}

/// Structural quantities for one building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralTakeoff {
    pub bay_length: f64,
    /// Transverse frame lines (bays + 1)
    pub frame_lines: u32,
    /// Two columns per frame line
    pub frame_columns: u32,
    /// Two rafters per frame line
    pub rafters: u32,
    /// 0 or 1: omitted when a front gable roll-up door spans mid-width
    pub center_columns_front: u32,
    /// 0 or 1: omitted when a back gable roll-up door spans mid-width
    pub center_columns_back: u32,
    /// Column groups by member selection, in first-seen frame order.
    /// `None` when the document has no frame selections.
    pub column_groups: Option<Vec<MemberGroup>>,
    pub rafter_groups: Option<Vec<MemberGroup>>,
    pub purlins_per_side: u32,
    /// Purlin runs across all roof planes
    pub purlin_lines: u32,
    /// Purlin pieces, one per line per bay
    pub purlin_pieces: u32,
    pub sidewall_girt_levels: u32,
    /// End-wall levels including the extra peak level
    pub endwall_girt_levels: u32,
    /// Sidewall girt pieces, one per level per bay per sidewall
    pub sidewall_girt_pieces: u32,
    /// Full-width end-wall girt pieces
    pub endwall_girt_pieces: u32,
    /// Girt clips by girt size, each count rounded up to an even number
    pub girt_clips: BTreeMap<String, u32>,
    /// Tabs where end-wall girts terminate against roll-up door jambs
    pub welded_tabs: u32,
    /// Foundation base angle on the ground, roll-up door widths excluded (ft)
    pub base_angle_length: f64,
    pub base_angle_pieces: u32,
    pub roof_line_base_angle_pieces: u32,
    pub man_door_header_purlins: u32,
    pub window_framing_purlins: u32,
    /// Assumptions made while quantifying
    pub notes: Vec<String>,
}

impl StructuralTakeoff {
    pub fn center_columns(&self) -> u32 {
        self.center_columns_front.saturating_add(self.center_columns_back)
    }

    /// Frame columns plus center columns
    pub fn total_columns(&self) -> u32 {
        self.frame_columns.saturating_add(self.center_columns())
    }
}

/// Compute structural quantities.
pub fn quantify_structure(ctx: &TakeoffContext<'_>) -> StructuralTakeoff {
    let c = ctx.constants;
    let geom = &ctx.geometry;
    let mut notes = Vec::new();

    let bay_length = ctx.bay_length();
    let frame_lines = ctx.bays.saturating_add(1);
    let frame_columns = frame_lines.saturating_mul(2);
    let rafters = frame_lines.saturating_mul(2);

    let mid_width = ctx.width / 2.0;
    let center_columns_front = center_column(ctx, WallAssignment::FrontGable, mid_width);
    let center_columns_back = center_column(ctx, WallAssignment::BackGable, mid_width);

    let (column_groups, rafter_groups) = match ctx.doc.structural_frames.as_deref() {
        Some(frames) if !frames.is_empty() => {
            if frames.len() != frame_lines as usize {
                warn!(
                    frames = frames.len(),
                    expected = frame_lines,
                    "Frame selections do not match bay count"
                );
                notes.push(format!(
                    "{} frame selections given for {} frame lines; members were counted from the selections",
                    frames.len(),
                    frame_lines
                ));
            }
            let columns = group_members(frames.iter().map(|f| f.column_label()));
            let beams = group_members(frames.iter().map(|f| f.beam_label()));
            (Some(columns), Some(beams))
        }
        _ => (None, None),
    };

    let purlins_per_side = ceil_count(geom.slope_length_per_side / c.purlin_spacing_ft);
    let purlin_lines = purlins_per_side.saturating_mul(ctx.roof_planes());
    let purlin_pieces = purlin_lines.saturating_mul(ctx.bays);

    let sidewall_girt_levels = c.sidewall_girt_levels;
    let base_endwall_levels = floor_count(ctx.height / c.endwall_girt_spacing_ft).saturating_add(1);
    let endwall_girt_levels = if geom.peak_rise() > c.extra_girt_peak_threshold_ft {
        base_endwall_levels.saturating_add(1)
    } else {
        base_endwall_levels
    };
    let sidewall_girt_pieces = sidewall_girt_levels.saturating_mul(2).saturating_mul(ctx.bays);
    let endwall_girt_pieces = endwall_girt_levels.saturating_mul(2);

    let girt_clips = girt_clips(
        ctx,
        sidewall_girt_levels,
        endwall_girt_levels,
        center_columns_front,
        center_columns_back,
    );

    // Tabs only where a door replaces the center column; base levels only,
    // the peak level sits above any door
    let welded_tabs = [
        (WallAssignment::FrontGable, center_columns_front),
        (WallAssignment::BackGable, center_columns_back),
    ]
    .into_iter()
    .filter(|(_, center)| *center == 0)
    .map(|(wall, _)| count_of(ctx.doors_on(wall).count()).saturating_mul(2).saturating_mul(base_endwall_levels))
    .fold(0u32, u32::saturating_add);

    let door_widths: f64 = ctx
        .doors
        .iter()
        .map(|placed| placed.door.width)
        .filter(|w| w.is_finite() && *w > 0.0)
        .sum();
    let perimeter = 2.0 * (ctx.length + ctx.width);
    let base_angle_length = (perimeter - door_widths).max(0.0);
    let base_angle_pieces = ceil_count(base_angle_length / c.base_angle_piece_ft);

    let roof_line_base_angle_pieces = match ctx.doc.roof_type {
        RoofType::Gable => c.gabled_roof_line_pieces,
        RoofType::SingleSlope => c.gabled_roof_line_pieces / 2,
    };

    let man_door_header_purlins = count_of(ctx.doc.man_doors.len());
    let window_framing_purlins = count_of(ctx.doc.windows.len()).saturating_mul(2);

    debug!(
        frame_columns,
        center_columns = center_columns_front.saturating_add(center_columns_back),
        purlin_pieces,
        endwall_girt_levels,
        welded_tabs,
        base_angle_pieces,
        "Quantified structure"
    );

    StructuralTakeoff {
        bay_length,
        frame_lines,
        frame_columns,
        rafters,
        center_columns_front,
        center_columns_back,
        column_groups,
        rafter_groups,
        purlins_per_side,
        purlin_lines,
        purlin_pieces,
        sidewall_girt_levels,
        endwall_girt_levels,
        sidewall_girt_pieces,
        endwall_girt_pieces,
        girt_clips,
        welded_tabs,
        base_angle_length,
        base_angle_pieces,
        roof_line_base_angle_pieces,
        man_door_header_purlins,
        window_framing_purlins,
        notes,
    }
}

fn center_column(ctx: &TakeoffContext<'_>, wall: WallAssignment, mid_width: f64) -> u32 {
    if ctx.doors_on(wall).any(|placed| placed.door.spans(mid_width)) {
        0
    } else {
        1
    }
}

/// Count labels, keeping first-seen order.
fn group_members(labels: impl Iterator<Item = String>) -> Vec<MemberGroup> {
    let mut groups: Vec<MemberGroup> = Vec::new();
    for label in labels {
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.count = group.count.saturating_add(2),
            None => groups.push(MemberGroup { label, count: 2 }),
        }
    }
    groups
}

/// Clips attach each girt level to every column it crosses.
///
/// End walls cross the two corner columns and any center column. Sidewalls
/// cross every frame column. Counts are bucketed by the wall's girt size.
fn girt_clips(
    ctx: &TakeoffContext<'_>,
    sidewall_levels: u32,
    endwall_levels: u32,
    center_front: u32,
    center_back: u32,
) -> BTreeMap<String, u32> {
    let mut clips: BTreeMap<String, u32> = BTreeMap::new();

    for (side, wall) in ctx.doc.walls.iter() {
        let count = match side {
            WallSide::North => endwall_levels.saturating_mul(2 + center_front),
            WallSide::South => endwall_levels.saturating_mul(2 + center_back),
            WallSide::East | WallSide::West => sidewall_levels.saturating_mul(ctx.bays.saturating_add(1)),
        };
        let size = wall.girts.size.trim();
        let size = if size.is_empty() {
            ctx.constants.default_girt_size.clone()
        } else {
            size.to_string()
        };
        let total = clips.entry(size).or_insert(0);
        *total = total.saturating_add(count);
    }

    // Round up to even; an odd u32::MAX rounds down instead
    for count in clips.values_mut() {
        if *count % 2 == 1 {
            *count = if *count == u32::MAX { *count - 1 } else { *count + 1 };
        }
    }
    clips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BuildingDocument, OpeningSize, RollUpDoor, StructuralFrame};
    use crate::constants::TakeoffConstants;

    fn run(doc: &BuildingDocument) -> StructuralTakeoff {
        let constants = TakeoffConstants::default();
        let ctx = TakeoffContext::new(doc, &constants);
        quantify_structure(&ctx)
    }

    fn standard() -> BuildingDocument {
        BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0)
    }

    #[test]
    fn test_frame_members() {
        let s = run(&standard());
        assert_eq!(s.bay_length, 20.0);
        assert_eq!(s.frame_lines, 3);
        assert_eq!(s.frame_columns, 6);
        assert_eq!(s.rafters, 6);
        assert_eq!(s.center_columns(), 2);
        assert_eq!(s.total_columns(), 8);
        assert!(s.column_groups.is_none());
    }

    #[test]
    fn test_purlins() {
        // slope 20.6155 / 5 -> 5 per side, 10 lines, 20 pieces
        let s = run(&standard());
        assert_eq!(s.purlins_per_side, 5);
        assert_eq!(s.purlin_lines, 10);
        assert_eq!(s.purlin_pieces, 20);
    }

    #[test]
    fn test_girt_levels() {
        // 12' eave: floor(12/5)+1 = 3, peak rise 5' adds nothing
        let s = run(&standard());
        assert_eq!(s.sidewall_girt_levels, 2);
        assert_eq!(s.endwall_girt_levels, 3);
        assert_eq!(s.sidewall_girt_pieces, 8);
        assert_eq!(s.endwall_girt_pieces, 6);

        // 60' wide at 3/12 rises 7.5', adding a level
        let wide = run(&BuildingDocument::new(40.0, 60.0, 12.0, 2).with_pitch(3.0));
        assert_eq!(wide.endwall_girt_levels, 4);
    }

    #[test]
    fn test_girt_clips_even_buckets() {
        // north/south 3*(2+1)=9 each, east/west 2*3=6 each -> 30
        let s = run(&standard());
        assert_eq!(s.girt_clips.get("2x6"), Some(&30));

        let mut doc = standard();
        doc.walls.north.girts.size = "2x8".to_string();
        let s = run(&doc);
        assert_eq!(s.girt_clips.get("2x8"), Some(&10));
        assert_eq!(s.girt_clips.get("2x6"), Some(&22));
        assert!(s.girt_clips.values().all(|n| n % 2 == 0));
    }

    #[test]
    fn test_huge_bay_count_saturates() {
        let s = run(&BuildingDocument::new(40.0, 40.0, 12.0, 1_000_000_000).with_pitch(3.0));
        assert_eq!(s.frame_lines, 1_000_000_001);
        assert_eq!(s.frame_columns, 2_000_000_002);
        assert_eq!(s.purlin_pieces, u32::MAX);
        assert_eq!(s.sidewall_girt_pieces, 4_000_000_000);
        assert_eq!(s.girt_clips.get("2x6"), Some(&4_000_000_022));

        // An odd saturated clip count rounds down to stay even
        let s = run(&BuildingDocument::new(40.0, 40.0, 12.0, u32::MAX).with_pitch(3.0));
        assert_eq!(s.frame_lines, u32::MAX);
        assert_eq!(s.total_columns(), u32::MAX);
        assert_eq!(s.girt_clips.get("2x6"), Some(&(u32::MAX - 1)));
        assert_eq!(s.sidewall_girt_pieces, u32::MAX);
    }

    #[test]
    fn test_center_door_suppresses_front_center_column() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(16.0, 10.0).at(12.0)];
        let s = run(&doc);
        assert_eq!(s.center_columns_front, 0);
        assert_eq!(s.center_columns_back, 1);
        assert_eq!(s.total_columns(), 7);
    }

    #[test]
    fn test_door_at_default_start_keeps_center_column() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(10.0, 10.0)];
        let s = run(&doc);
        assert_eq!(s.center_columns_front, 1);
    }

    #[test]
    fn test_sidewall_door_never_suppresses_center_column() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(16.0, 10.0).at(12.0).on(WallAssignment::Sidewall)];
        let s = run(&doc);
        assert_eq!(s.center_columns(), 2);
        assert_eq!(s.welded_tabs, 0);
    }

    #[test]
    fn test_welded_tabs_use_base_levels() {
        let mut doc = BuildingDocument::new(40.0, 60.0, 12.0, 2).with_pitch(3.0);
        doc.roll_up_doors = vec![RollUpDoor::new(10.0, 10.0), RollUpDoor::new(16.0, 10.0).at(22.0)];
        let s = run(&doc);
        assert_eq!(s.endwall_girt_levels, 4);
        assert_eq!(s.center_columns_front, 0);
        // 2 front doors * 2 jambs * 3 base levels
        assert_eq!(s.welded_tabs, 12);
    }

    #[test]
    fn test_no_welded_tabs_while_center_column_stands() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(10.0, 10.0), RollUpDoor::new(10.0, 10.0).at(30.0)];
        let s = run(&doc);
        assert_eq!(s.center_columns_front, 1);
        assert_eq!(s.welded_tabs, 0);
    }

    #[test]
    fn test_base_angle_excludes_doors() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(16.0, 10.0), RollUpDoor::new(10.0, 10.0).at(20.0)];
        let s = run(&doc);
        assert_eq!(s.base_angle_length, 134.0);
        assert_eq!(s.base_angle_pieces, 7);
        assert_eq!(s.roof_line_base_angle_pieces, 4);
    }

    #[test]
    fn test_base_angle_never_negative() {
        let mut doc = BuildingDocument::new(10.0, 10.0, 12.0, 1).with_pitch(3.0);
        doc.roll_up_doors = vec![RollUpDoor::new(30.0, 10.0), RollUpDoor::new(30.0, 10.0)];
        let s = run(&doc);
        assert_eq!(s.base_angle_length, 0.0);
        assert_eq!(s.base_angle_pieces, 0);
    }

    #[test]
    fn test_frame_groups_first_seen_order() {
        let mut doc = standard();
        doc.structural_frames = Some(vec![
            StructuralFrame::new("I-beam", "W10x22", "I-beam", "W12x26"),
            StructuralFrame::new("I-beam", "W8x18", "I-beam", "W12x26"),
            StructuralFrame::new("I-beam", "W10x22", "I-beam", "W12x26"),
        ]);
        let s = run(&doc);
        let columns = s.column_groups.unwrap();
        assert_eq!(columns[0], MemberGroup { label: "I-beam W10x22".to_string(), count: 4 });
        assert_eq!(columns[1], MemberGroup { label: "I-beam W8x18".to_string(), count: 2 });
        let rafters = s.rafter_groups.unwrap();
        assert_eq!(rafters.len(), 1);
        assert_eq!(rafters[0].count, 6);
        assert!(s.notes.is_empty());
    }

    #[test]
    fn test_frame_count_mismatch_is_noted() {
        let mut doc = standard();
        doc.structural_frames = Some(vec![StructuralFrame::new("I-beam", "W8x18", "I-beam", "W10x22")]);
        let s = run(&doc);
        assert_eq!(s.notes.len(), 1);
        assert_eq!(s.column_groups.unwrap()[0].count, 2);
    }

    #[test]
    fn test_opening_purlins() {
        let mut doc = standard();
        doc.man_doors = vec![OpeningSize::new(3.0, 7.0); 2];
        doc.windows = vec![OpeningSize::new(3.0, 3.0); 3];
        let s = run(&doc);
        assert_eq!(s.man_door_header_purlins, 2);
        assert_eq!(s.window_framing_purlins, 6);
    }

    #[test]
    fn test_single_slope_planes() {
        let doc = BuildingDocument::new(40.0, 30.0, 14.0, 2)
            .with_pitch(1.0)
            .with_roof_type(RoofType::SingleSlope);
        let s = run(&doc);
        // slope ~30.10 -> 7 per side, one plane
        assert_eq!(s.purlins_per_side, 7);
        assert_eq!(s.purlin_lines, 7);
        assert_eq!(s.roof_line_base_angle_pieces, 2);
    }
}
