//! # Takeoff Formatter
//!
//! Turns the raw quantities of one run into the ordered, categorized
//! materials list. Lengths are rendered in feet and inches. Items with a
//! quantity of zero that only apply to optional features (welded tabs,
//! awning frames, peak boxes on a single slope) are left out; the core
//! structural, paneling, and fastener lines are always present.

use crate::building::{BuildingDocument, RoofType};
use crate::constants::TakeoffConstants;
use crate::report::{Category, TakeoffLineItem, TakeoffResult};
use crate::units::format_feet_inches;

use super::envelope::EaveFinish;
use super::openings::LengthTally;
use super::TakeoffBreakdown;

const TEK_SCREW: &str = "#12 x 1-1/4\" Hex Washer Head TEK Screws";
const LAP_SCREW: &str = "#10 x 7/8\" Hex Washer Head LAP Screws with Bonded Sealing Washer";

/// Build the materials list from a breakdown.
pub fn format_takeoff(
    doc: &BuildingDocument,
    constants: &TakeoffConstants,
    breakdown: &TakeoffBreakdown,
) -> TakeoffResult {
    let mut items = Vec::new();
    structural(&mut items, doc, constants, breakdown);
    paneling(&mut items, doc, breakdown);
    trim(&mut items, doc, breakdown);
    doors_and_windows(&mut items, breakdown);
    accessories(&mut items, breakdown);
    fasteners(&mut items, breakdown);
    notes(&mut items, doc, constants, breakdown);
    TakeoffResult::new(items)
}

fn ft(value: f64) -> String {
    format_feet_inches(value)
}

/// Keep user-entered labels from breaking the `description: quantity` split
fn clean_label(label: &str) -> String {
    label.replace(':', "").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// User-entered text inside a `(notes)` group; parentheses would end it early
fn note_label(label: &str) -> String {
    clean_label(&label.replace(['(', ')'], ""))
}

fn color_note(color: Option<&String>) -> String {
    match color.map(|c| note_label(c)) {
        Some(c) if !c.is_empty() => format!("color: {}", c),
        _ => String::new(),
    }
}

fn structural(
    items: &mut Vec<TakeoffLineItem>,
    doc: &BuildingDocument,
    constants: &TakeoffConstants,
    b: &TakeoffBreakdown,
) {
    let s = &b.structure;
    let g = &b.geometry;
    let cat = Category::Structural;
    let height = ft(b.height);
    let slope = ft(g.slope_length_per_side);

    match (&s.column_groups, &s.rafter_groups) {
        (Some(columns), Some(rafters)) => {
            for group in columns {
                items.push(TakeoffLineItem::sized(
                    cat,
                    format!("{} Columns", clean_label(&group.label)),
                    group.count,
                    height.clone(),
                ));
            }
            if s.center_columns() > 0 {
                items.push(TakeoffLineItem::sized(cat, "Center Columns (I-beams)", s.center_columns(), height.clone()));
            }
            for group in rafters {
                items.push(TakeoffLineItem::sized(
                    cat,
                    format!("{} Rafters", clean_label(&group.label)),
                    group.count,
                    slope.clone(),
                ));
            }
        }
        _ => {
            items.push(TakeoffLineItem::sized(cat, "Columns (I-beams)", s.total_columns(), height.clone()));
            items.push(TakeoffLineItem::sized(cat, "Rafters (I-beams)", s.rafters, slope.clone()));
        }
    }

    let bay = ft(s.bay_length);
    items.push(
        TakeoffLineItem::sized(cat, "Roof Purlins", s.purlin_pieces, bay.clone()).with_notes(format!(
            "{} purlins per roof side, based on slope length of {}",
            s.purlins_per_side, slope
        )),
    );
    items.push(
        TakeoffLineItem::sized(cat, "Wall Girts (Sidewalls)", s.sidewall_girt_pieces, bay.clone())
            .with_notes(format!("{} levels per sidewall", s.sidewall_girt_levels)),
    );
    items.push(
        TakeoffLineItem::sized(cat, "Wall Girts (End Walls)", s.endwall_girt_pieces, ft(b.width))
            .with_notes(format!("{} levels per end wall", s.endwall_girt_levels)),
    );
    items.push(
        TakeoffLineItem::sized(
            cat,
            "Base Angle (4\"x2\") for Foundation",
            s.base_angle_pieces,
            ft(constants.base_angle_piece_ft),
        )
        .with_notes(format!(
            "{} on the ground; excludes roll-up door areas",
            ft(s.base_angle_length)
        )),
    );
    let roof_line = match doc.roof_type {
        RoofType::Gable => "Base Angle (4\"x2\") for Gabled End Wall Roof Lines",
        RoofType::SingleSlope => "Base Angle (4\"x2\") for End Wall Roof Lines",
    };
    items.push(
        TakeoffLineItem::sized(
            cat,
            roof_line,
            s.roof_line_base_angle_pieces,
            ft(constants.gabled_roof_line_piece_ft),
        )
        .with_notes(format!("single pieces to avoid splicing; cut to {}", slope)),
    );
    items.push(TakeoffLineItem::sized(cat, "Man Door Header Purlins", s.man_door_header_purlins, bay.clone()));
    items.push(TakeoffLineItem::sized(cat, "Window Framing Purlins", s.window_framing_purlins, bay));
}

fn paneling(items: &mut Vec<TakeoffLineItem>, doc: &BuildingDocument, b: &TakeoffBreakdown) {
    let e = &b.envelope;
    let cat = Category::Paneling;

    items.push(
        TakeoffLineItem::sized(
            cat,
            format!("Roof Panels ({})", clean_label(e.panel_type.display_name())),
            e.roof_panels,
            ft(e.roof_panel_length),
        )
        .with_notes(color_note(doc.roof_color.as_ref())),
    );
    items.push(
        TakeoffLineItem::sized(cat, "Side Wall Panels", e.sidewall_panels, ft(e.sidewall_panel_length))
            .with_notes(color_note(doc.wall_color.as_ref())),
    );

    let prefix = match doc.roof_type {
        RoofType::Gable => "Gabled End Wall Panels",
        RoofType::SingleSlope => "End Wall Panels",
    };
    let heights: Vec<String> = e.endwall_panel_heights.iter().map(|h| ft(*h)).collect();
    let mut schedule = if heights.is_empty() {
        String::new()
    } else {
        format!("heights {}", heights.join(", "))
    };
    let wall_color = color_note(doc.wall_color.as_ref());
    if !wall_color.is_empty() {
        if !schedule.is_empty() {
            schedule.push_str("; ");
        }
        schedule.push_str(&wall_color);
    }
    for side in ["Front", "Back"] {
        items.push(
            TakeoffLineItem::sized(cat, format!("{} ({})", prefix, side), e.endwall_panels_per_wall, "varies")
                .with_notes(schedule.clone()),
        );
    }

    items.push(TakeoffLineItem::count(cat, "Outside Panel Closures", e.outside_closures));
    items.push(TakeoffLineItem::count(cat, "Inside Panel Closures", e.inside_closures));
}

fn trim(items: &mut Vec<TakeoffLineItem>, doc: &BuildingDocument, b: &TakeoffBreakdown) {
    let t = &b.envelope.trim;
    let cat = Category::Trim;
    let color = color_note(doc.trim_color.as_ref());

    if let Some(length) = t.ridge_roll {
        items.push(TakeoffLineItem::sized(cat, "Ridge Roll", 1, ft(length)).with_notes(color.clone()));
    }
    if t.peak_boxes > 0 {
        items.push(TakeoffLineItem::count(cat, "Peak Boxes", t.peak_boxes));
    }
    items.push(
        TakeoffLineItem::sized(cat, "Sculpted Rake Trim", t.rake_pieces, ft(t.rake_length)).with_notes(color.clone()),
    );
    items.push(
        TakeoffLineItem::sized(cat, "Sculpted Corner Trim", t.corner_pieces, ft(t.corner_length))
            .with_notes(color.clone()),
    );
    items.push(TakeoffLineItem::sized(
        cat,
        "Drip Flashing (Base of Walls)",
        t.drip_pieces,
        ft(t.drip_length),
    ));

    match &t.eave {
        EaveFinish::EaveTrim { pieces, length } => {
            items.push(TakeoffLineItem::sized(cat, "Eave Trim", *pieces, ft(*length)).with_notes(color));
        }
        EaveFinish::Gutters(g) => {
            items.push(TakeoffLineItem::sized(cat, "Gutters", g.gutters, ft(g.gutter_length)).with_notes(color));
            items.push(TakeoffLineItem::count(cat, "Gutter Straps", g.straps));
            items.push(TakeoffLineItem::sized(cat, "Downspouts", g.downspouts, ft(g.downspout_length)));
            items.push(TakeoffLineItem::count(cat, "Downspout Kickouts", g.kickouts));
            items.push(TakeoffLineItem::count(cat, "Downspout Straps", g.downspout_straps));
            items.push(TakeoffLineItem::count(cat, "Gutter Endcap Pairs", g.endcap_pairs));
            items.push(TakeoffLineItem::count(cat, "Corner Box Pairs", g.corner_box_pairs));
        }
    }

    push_tally(items, cat, "Header Trim", &b.openings.header_trim, "");

    for jamb in &b.openings.door_jambs {
        items.push(TakeoffLineItem::sized(
            cat,
            format!(
                "Door Jambs (Square Tubing) for {}x{} Roll-Up Door",
                ft(jamb.door_width),
                ft(jamb.door_height)
            ),
            jamb.count,
            ft(jamb.jamb_height),
        ));
    }
}

fn push_tally(items: &mut Vec<TakeoffLineItem>, cat: Category, description: &str, tally: &LengthTally, notes: &str) {
    for entry in tally.iter() {
        items.push(TakeoffLineItem::sized(cat, description, entry.count, ft(entry.length)).with_notes(notes));
    }
}

fn doors_and_windows(items: &mut Vec<TakeoffLineItem>, b: &TakeoffBreakdown) {
    let o = &b.openings;
    let cat = Category::DoorsAndWindows;
    items.push(TakeoffLineItem::count(cat, "Man Doors", o.man_doors));
    items.push(TakeoffLineItem::count(cat, "Roll-Up Doors", o.roll_up_doors));
    items.push(TakeoffLineItem::count(cat, "Windows", o.windows));
    items.push(TakeoffLineItem::count(cat, "Awnings", o.awnings));
    if o.awning_frames > 0 {
        items.push(
            TakeoffLineItem::sized(cat, "Awning Frames", o.awning_frames, "varies")
                .with_notes("two sides and one front per awning"),
        );
    }
}

fn accessories(items: &mut Vec<TakeoffLineItem>, b: &TakeoffBreakdown) {
    let cat = Category::Accessories;
    let s = &b.structure;

    push_tally(
        items,
        cat,
        "4\"x4\"x14 Gauge Square Tubing",
        &b.openings.square_tubing,
        "for roll-up door jambs",
    );
    if s.welded_tabs > 0 {
        items.push(
            TakeoffLineItem::count(cat, "Welded Tabs for Girt Terminations", s.welded_tabs)
                .with_notes("for securing girts to roll-up door jambs"),
        );
    }
    push_tally(items, cat, "4\" Door Jamb Casing", &b.openings.jamb_casing, "");

    for (size, count) in &s.girt_clips {
        items.push(
            TakeoffLineItem::count(cat, format!("Girt Clips ({})", clean_label(size)), *count).with_notes(format!(
                "clips attaching {} girts to columns; rounded up to an even count",
                note_label(size)
            )),
        );
    }

    if let Some(ins) = &b.insulation {
        let kind = ins.kind.display_name();
        items.push(
            TakeoffLineItem::count(cat, format!("{} Insulation (Walls)", kind), round_area(ins.wall_area.value()))
                .with_notes("sq ft; flagged openings subtracted"),
        );
        items.push(
            TakeoffLineItem::count(cat, format!("{} Insulation (Roof)", kind), round_area(ins.roof_area.value()))
                .with_notes("sq ft"),
        );
    }
}

fn round_area(sq_ft: f64) -> u32 {
    if sq_ft.is_finite() && sq_ft > 0.0 {
        sq_ft.round() as u32
    } else {
        0
    }
}

fn fasteners(items: &mut Vec<TakeoffLineItem>, b: &TakeoffBreakdown) {
    let f = &b.fasteners;
    let cat = Category::Fasteners;
    items.push(
        TakeoffLineItem::count(cat, format!("{} (Roof)", TEK_SCREW), f.roof_tek)
            .with_notes("for roof panel-to-purlin fastening"),
    );
    items.push(
        TakeoffLineItem::count(cat, format!("{} (Walls)", TEK_SCREW), f.wall_tek).with_notes(
            "for wall panel-to-girt fastening; sidewalls fastened to base angle, 5' girt, 10' girt, eave strut",
        ),
    );
    items.push(TakeoffLineItem::count(cat, format!("{} (Trim)", TEK_SCREW), f.trim_tek).with_notes("for trim fastening"));
    items.push(
        TakeoffLineItem::count(cat, format!("{} (Roof)", LAP_SCREW), f.roof_lap).with_notes("for roof panel sidelaps"),
    );
    items.push(
        TakeoffLineItem::count(cat, format!("{} (Walls)", LAP_SCREW), f.wall_lap).with_notes("for wall panel sidelaps"),
    );
    items.push(TakeoffLineItem::count(cat, format!("{} (Trim)", LAP_SCREW), f.trim_lap).with_notes("for trim fastening"));
    items.push(
        TakeoffLineItem::count(cat, "#10 x 1\" Philips Head Pancake Screws", f.window_screws)
            .with_notes("for window and window header trim installation"),
    );
    items.push(
        TakeoffLineItem::count(cat, "2\" x 1/4\" Concrete Drive-In Anchors", f.concrete_anchors)
            .with_notes("for securing base angle to foundation; 1 per 3'; excludes roll-up door areas"),
    );
}

fn notes(
    items: &mut Vec<TakeoffLineItem>,
    doc: &BuildingDocument,
    constants: &TakeoffConstants,
    b: &TakeoffBreakdown,
) {
    let g = &b.geometry;
    let s = &b.structure;
    let e = &b.envelope;

    let peak = match doc.roof_type {
        RoofType::Gable => "ridge height",
        RoofType::SingleSlope => "high eave height",
    };
    items.push(TakeoffLineItem::note(format!(
        "Roof is {} at {}/12 pitch; slope length {} per side, {} {}",
        g.roof_type.display_name(),
        b.pitch,
        ft(g.slope_length_per_side),
        peak,
        ft(g.ridge_height)
    )));
    items.push(TakeoffLineItem::note(format!(
        "Roof panels include a {}\" overhang less half of the {}\" peak gap",
        doc.roof_overhang.unwrap_or(constants.default_roof_overhang_in),
        doc.roof_peak_gap.unwrap_or(constants.default_roof_peak_gap_in)
    )));
    items.push(TakeoffLineItem::note(format!(
        "Purlins every {} along the slope; {} girt levels on each sidewall",
        ft(constants.purlin_spacing_ft),
        constants.sidewall_girt_levels
    )));
    items.push(TakeoffLineItem::note(format!(
        "End wall girts every {} up to the eave, plus one more where the peak rises more than {} above the eave",
        ft(constants.endwall_girt_spacing_ft),
        ft(constants.extra_girt_peak_threshold_ft)
    )));
    items.push(TakeoffLineItem::note(format!(
        "Center columns stand at mid-width of each gabled end wall unless a roll-up door spans that point (front {}, back {})",
        kept_or_omitted(s.center_columns_front),
        kept_or_omitted(s.center_columns_back)
    )));

    if doc.roll_up_doors.iter().any(|door| door.wall.is_none()) {
        items.push(TakeoffLineItem::note(
            "Roll-up doors without a wall assignment are placed with the first two on the front gable wall and the rest on the back gable wall",
        ));
    }
    if s.column_groups.is_none() {
        items.push(TakeoffLineItem::note(
            "No frame member selections; columns and rafters are listed as generic I-beams",
        ));
    }

    let area = e.wall_panel_area.value();
    items.push(TakeoffLineItem::note(format!(
        "Wall panel area {} sq ft, {} sq ft with {:.0}% {} waste (advisory; piece counts exclude waste)",
        round_area(area),
        round_area(e.wall_panel_area_with_waste().value()),
        e.waste_factor * 100.0,
        e.panel_type.display_name()
    )));

    if let Some(ins) = &b.insulation {
        for skipped in &ins.skipped {
            items.push(TakeoffLineItem::note(format!(
                "Insulation: {} has an unreadable size and was not subtracted",
                skipped
            )));
        }
    }

    for note in s.notes.iter().chain(&e.notes).chain(&b.assumptions) {
        items.push(TakeoffLineItem::note(note.clone()));
    }
}

fn kept_or_omitted(count: u32) -> &'static str {
    if count > 0 {
        "kept"
    } else {
        "omitted"
    }
}
