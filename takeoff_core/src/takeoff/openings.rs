//! # Opening Quantities
//!
//! Trim, jamb casing, and square tubing around man doors, roll-up doors,
//! and windows, plus awning frames. Pieces of equal length from different
//! openings are tallied together; lengths are compared to the hundredth of
//! a foot.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{count_of, TakeoffContext};

/// Pieces of one length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthCount {
    pub length: f64,
    pub count: u32,
}

/// Piece counts keyed by length, kept in ascending length order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LengthTally(Vec<LengthCount>);

fn length_key(length: f64) -> i64 {
    (length * 100.0).round() as i64
}

impl LengthTally {
    pub fn new() -> Self {
        LengthTally::default()
    }

    /// Add `count` pieces of `length`. Non-finite lengths are dropped.
    pub fn add(&mut self, length: f64, count: u32) {
        if !length.is_finite() {
            warn!(length, count, "Dropping trim pieces with invalid length");
            return;
        }
        let key = length_key(length);
        match self.0.binary_search_by_key(&key, |entry| length_key(entry.length)) {
            Ok(i) => self.0[i].count = self.0[i].count.saturating_add(count),
            Err(i) => self.0.insert(i, LengthCount { length, count }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LengthCount> {
        self.0.iter()
    }

    /// Pieces tallied at a length, 0 if none
    pub fn count_at(&self, length: f64) -> u32 {
        let key = length_key(length);
        self.0
            .iter()
            .find(|entry| length_key(entry.length) == key)
            .map_or(0, |entry| entry.count)
    }

    pub fn total(&self) -> u32 {
        self.0.iter().fold(0, |sum, entry| sum.saturating_add(entry.count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Jamb pairs for roll-up doors of one size and jamb height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorJambGroup {
    pub door_width: f64,
    pub door_height: f64,
    /// Average of the roofline heights at the two door edges
    pub jamb_height: f64,
    pub count: u32,
}

/// Opening trim and counts for one building.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpeningsTakeoff {
    pub man_doors: u32,
    pub roll_up_doors: u32,
    pub windows: u32,
    pub awnings: u32,
    /// Two sides and a front per awning
    pub awning_frames: u32,
    pub header_trim: LengthTally,
    pub jamb_casing: LengthTally,
    /// 4"x4" tubing, tall enough to meet the roofline at the higher door edge
    pub square_tubing: LengthTally,
    pub door_jambs: Vec<DoorJambGroup>,
}

/// Compute trim, casing, and tubing for every opening.
pub fn quantify_openings(ctx: &TakeoffContext<'_>) -> OpeningsTakeoff {
    let c = ctx.constants;
    let doc = ctx.doc;
    let mut out = OpeningsTakeoff {
        man_doors: count_of(doc.man_doors.len()),
        roll_up_doors: count_of(doc.roll_up_doors.len()),
        windows: count_of(doc.windows.len()),
        awnings: count_of(doc.awnings.len()),
        awning_frames: count_of(doc.awnings.len()).saturating_mul(3),
        ..OpeningsTakeoff::default()
    };

    // Man door trim is stock length, whatever the door size
    for _ in &doc.man_doors {
        out.header_trim.add(c.man_door_header_trim_ft, 1);
        out.header_trim.add(c.man_door_jamb_trim_ft, 1);
    }

    for placed in &ctx.doors {
        let door = placed.door;
        let (tubing, jamb) = if placed.wall.is_gable() {
            let at_start = ctx.geometry.wall_height_at(ctx.height, ctx.width, door.start_ft());
            let at_end = ctx.geometry.wall_height_at(ctx.height, ctx.width, door.end_ft());
            (at_start.max(at_end), (at_start + at_end) / 2.0)
        } else {
            (ctx.height, ctx.height)
        };

        out.square_tubing.add(tubing, 2);
        add_jamb_pair(&mut out.door_jambs, door.width, door.height, jamb);

        let header = door.width + c.roll_up_trim_allowance_ft;
        let side = door.height + c.roll_up_trim_allowance_ft;
        for tally in [&mut out.header_trim, &mut out.jamb_casing] {
            tally.add(header, 1);
            tally.add(side, 2);
        }
    }

    for window in &doc.windows {
        out.header_trim
            .add(window.width + window.height + c.window_trim_allowance_ft, 2);
    }

    debug!(
        header_trim = out.header_trim.total(),
        jamb_casing = out.jamb_casing.total(),
        square_tubing = out.square_tubing.total(),
        "Quantified openings"
    );
    out
}

fn add_jamb_pair(groups: &mut Vec<DoorJambGroup>, width: f64, height: f64, jamb: f64) {
    let key = (length_key(width), length_key(height), length_key(jamb));
    match groups.iter_mut().find(|g| {
        (length_key(g.door_width), length_key(g.door_height), length_key(g.jamb_height)) == key
    }) {
        Some(group) => group.count = group.count.saturating_add(2),
        None => groups.push(DoorJambGroup {
            door_width: width,
            door_height: height,
            jamb_height: jamb,
            count: 2,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BuildingDocument, OpeningSize, RollUpDoor, WallAssignment};
    use crate::constants::TakeoffConstants;

    fn run(doc: &BuildingDocument) -> OpeningsTakeoff {
        let constants = TakeoffConstants::default();
        let ctx = TakeoffContext::new(doc, &constants);
        quantify_openings(&ctx)
    }

    fn standard() -> BuildingDocument {
        BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0)
    }

    #[test]
    fn test_tally_aggregates_and_sorts() {
        let mut tally = LengthTally::new();
        tally.add(17.0, 2);
        tally.add(11.0, 1);
        tally.add(17.001, 1);
        tally.add(f64::NAN, 5);
        let lengths: Vec<f64> = tally.iter().map(|e| e.length).collect();
        assert_eq!(lengths, vec![11.0, 17.0]);
        assert_eq!(tally.count_at(17.0), 3);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_man_door_stock_trim() {
        let mut doc = standard();
        doc.man_doors = vec![OpeningSize::new(3.0, 7.0), OpeningSize::new(4.0, 8.0)];
        let o = run(&doc);
        assert_eq!(o.header_trim.count_at(11.0), 2);
        assert_eq!(o.header_trim.count_at(8.0), 2);
        assert!(o.jamb_casing.is_empty());
        assert!(o.square_tubing.is_empty());
    }

    #[test]
    fn test_gable_roll_up_door() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(10.0, 10.0).at(4.0)];
        let o = run(&doc);
        // edges at 4' and 14': 13' and 15.5'
        assert_eq!(o.square_tubing.count_at(15.5), 2);
        assert_eq!(o.door_jambs.len(), 1);
        assert_eq!(o.door_jambs[0].jamb_height, 14.25);
        assert_eq!(o.door_jambs[0].count, 2);
        assert_eq!(o.header_trim.count_at(11.0), 3);
        assert_eq!(o.jamb_casing.count_at(11.0), 3);
    }

    #[test]
    fn test_sidewall_roll_up_door_uses_eave_height() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(12.0, 10.0).at(14.0).on(WallAssignment::Sidewall)];
        let o = run(&doc);
        assert_eq!(o.square_tubing.count_at(12.0), 2);
        assert_eq!(o.door_jambs[0].jamb_height, 12.0);
        assert_eq!(o.header_trim.count_at(13.0), 1);
        assert_eq!(o.header_trim.count_at(11.0), 2);
    }

    #[test]
    fn test_identical_doors_aggregate() {
        let mut doc = standard();
        doc.roll_up_doors = vec![RollUpDoor::new(10.0, 10.0); 3];
        let o = run(&doc);
        // header 11' and jambs 11': 3 * (1 + 2)
        assert_eq!(o.header_trim.iter().count(), 1);
        assert_eq!(o.header_trim.count_at(11.0), 9);
        assert_eq!(o.door_jambs.len(), 1);
        assert_eq!(o.door_jambs[0].count, 6);
        assert_eq!(o.square_tubing.total(), 6);
    }

    #[test]
    fn test_window_trim() {
        let mut doc = standard();
        doc.windows = vec![OpeningSize::new(3.0, 3.0); 4];
        let o = run(&doc);
        assert_eq!(o.header_trim.count_at(7.0), 8);
        assert_eq!(o.windows, 4);
    }

    #[test]
    fn test_awning_frames() {
        let mut doc = standard();
        doc.awnings = vec![OpeningSize::new(10.0, 6.0); 2];
        let o = run(&doc);
        assert_eq!(o.awnings, 2);
        assert_eq!(o.awning_frames, 6);
    }
}
