//! # Takeoff Constants
//!
//! Every architectural constant the takeoff relies on, collected into one
//! auditable table. [`TakeoffConstants::default`] reproduces the shop rules
//! the estimator has always used; callers can override individual values
//! through [`crate::takeoff::TakeoffEngine::with_constants`].
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "panel_width_ft": 3.0,
//!   "purlin_spacing_ft": 5.0,
//!   "trim_tek_screw_allowance": 250
//! }
//! ```
//!
//! Missing keys fall back to their defaults, so a partial table is valid.

use serde::{Deserialize, Serialize};

/// Named policy table for the takeoff engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeoffConstants {
    /// Coverage width of one wall or roof panel (ft)
    pub panel_width_ft: f64,

    /// Purlin spacing measured along the roof slope (ft)
    pub purlin_spacing_ft: f64,

    /// Vertical girt spacing on gabled end walls (ft)
    pub endwall_girt_spacing_ft: f64,

    /// Number of girt levels on each sidewall; the default two sit at 5' and 10'
    pub sidewall_girt_levels: u32,

    /// Extra end-wall girt level is added when the peak rises more than this above the eave (ft)
    pub extra_girt_peak_threshold_ft: f64,

    /// Stock length of foundation base angle (ft)
    pub base_angle_piece_ft: f64,

    /// Base angle pieces along the gabled roof lines (2 per gabled end wall)
    pub gabled_roof_line_pieces: u32,

    /// Stock length of the gabled roof-line base angle (ft)
    pub gabled_roof_line_piece_ft: f64,

    /// Man door header trim stock: header plus one jamb (ft)
    pub man_door_header_trim_ft: f64,

    /// Man door trim stock for the second jamb (ft)
    pub man_door_jamb_trim_ft: f64,

    /// Allowance added to roll-up door width/height for trim and casing (ft)
    pub roll_up_trim_allowance_ft: f64,

    /// Allowance added to window width + height for header trim (ft)
    pub window_trim_allowance_ft: f64,

    /// Gutter strap spacing (ft)
    pub gutter_strap_spacing_ft: f64,

    /// One downspout per this much gutter (ft)
    pub downspout_spacing_ft: f64,

    /// Sidewall fastening points: base angle, 5' girt, 10' girt, eave strut
    pub sidewall_fastening_points: u32,

    /// Flat allowance of TEK screws for trim
    pub trim_tek_screw_allowance: u32,

    /// Flat allowance of LAP screws for trim
    pub trim_lap_screw_allowance: u32,

    /// Pancake screws per window
    pub screws_per_window: u32,

    /// One concrete anchor per this much base angle on the ground (ft)
    pub anchor_spacing_ft: f64,

    /// Girt size used when a wall has no girt configuration
    pub default_girt_size: String,

    /// Roof overhang used when the document omits it (in)
    pub default_roof_overhang_in: f64,

    /// Peak gap used when the document omits it (in)
    pub default_roof_peak_gap_in: f64,

    /// Roof pitch used when the document omits it (rise per 12)
    pub default_roof_pitch: f64,
}

impl Default for TakeoffConstants {
    fn default() -> Self {
        TakeoffConstants {
            panel_width_ft: 3.0,
            purlin_spacing_ft: 5.0,
            endwall_girt_spacing_ft: 5.0,
            sidewall_girt_levels: 2,
            extra_girt_peak_threshold_ft: 7.0,
            base_angle_piece_ft: 20.0,
            gabled_roof_line_pieces: 4,
            gabled_roof_line_piece_ft: 25.0,
            man_door_header_trim_ft: 11.0,
            man_door_jamb_trim_ft: 8.0,
            roll_up_trim_allowance_ft: 1.0,
            window_trim_allowance_ft: 1.0,
            gutter_strap_spacing_ft: 2.0,
            downspout_spacing_ft: 20.0,
            sidewall_fastening_points: 4,
            trim_tek_screw_allowance: 250,
            trim_lap_screw_allowance: 250,
            screws_per_window: 24,
            anchor_spacing_ft: 3.0,
            default_girt_size: "2x6".to_string(),
            default_roof_overhang_in: 2.0,
            default_roof_peak_gap_in: 1.0,
            default_roof_pitch: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shop_rules() {
        let c = TakeoffConstants::default();
        assert_eq!(c.panel_width_ft, 3.0);
        assert_eq!(c.base_angle_piece_ft, 20.0);
        assert_eq!(c.gabled_roof_line_pieces, 4);
        assert_eq!(c.gabled_roof_line_piece_ft, 25.0);
        assert_eq!(c.trim_tek_screw_allowance, 250);
        assert_eq!(c.trim_lap_screw_allowance, 250);
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let c: TakeoffConstants = serde_json::from_str(r#"{ "screws_per_window": 30 }"#).unwrap();
        assert_eq!(c.screws_per_window, 30);
        assert_eq!(c.panel_width_ft, 3.0);
        assert_eq!(c.default_girt_size, "2x6");
    }
}
