//! Roof geometry: run, rise, slope length, ridge height, and roof panel length.
//!
//! Every value here is guaranteed finite. When an input makes the math
//! degenerate (NaN width, infinite pitch, ...) a conservative fallback is
//! substituted and recorded in [`RoofGeometry::fallbacks`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::building::RoofType;
use crate::units::{Feet, Inches};

/// Roof geometry shared by every later stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofGeometry {
    pub roof_type: RoofType,
    /// Horizontal distance from eave to ridge on one roof plane (ft)
    pub run_per_side: f64,
    /// Vertical rise over that run (ft)
    pub rise_per_side: f64,
    /// Sloped length of one roof plane (ft)
    pub slope_length_per_side: f64,
    /// Ridge height for a gable, high-eave height for a single slope (ft)
    pub ridge_height: f64,
    /// Rise per foot of horizontal run
    pub slope_per_foot: f64,
    /// Cut length of one roof panel after overhang and peak gap (ft)
    pub roof_panel_length: f64,
    /// Human-readable description of each fallback that was applied
    pub fallbacks: Vec<String>,
}

/// Raw inputs to [`resolve_geometry`]. Overhang and peak gap are in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryInput {
    pub width: f64,
    pub height: f64,
    pub pitch: f64,
    pub roof_type: RoofType,
    pub overhang_in: f64,
    pub peak_gap_in: f64,
}

/// Resolve the roof geometry.
///
/// For a gable, each side runs half the width. A single slope runs the full
/// width. `roof_panel_length = slope + overhang/12 - peak_gap/24`: the peak
/// gap is shared between the two panels that meet at the ridge.
///
/// # Example
///
/// ```rust
/// use takeoff_core::building::RoofType;
/// use takeoff_core::takeoff::geometry::{resolve_geometry, GeometryInput};
///
/// let geom = resolve_geometry(&GeometryInput {
///     width: 40.0,
///     height: 12.0,
///     pitch: 3.0,
///     roof_type: RoofType::Gable,
///     overhang_in: 2.0,
///     peak_gap_in: 1.0,
/// });
/// assert_eq!(geom.run_per_side, 20.0);
/// assert_eq!(geom.rise_per_side, 5.0);
/// assert_eq!(geom.ridge_height, 17.0);
/// ```
pub fn resolve_geometry(input: &GeometryInput) -> RoofGeometry {
    let mut fallbacks = Vec::new();

    let span = match input.roof_type {
        RoofType::Gable => input.width / 2.0,
        RoofType::SingleSlope => input.width,
    };
    let run_per_side = if span.is_finite() && span > 0.0 { span } else { 0.0 };

    let pitch = if input.pitch.is_finite() {
        input.pitch
    } else {
        warn!(pitch = input.pitch, "Non-finite roof pitch, treating roof as flat");
        fallbacks.push("Roof pitch was not a number; the roof was treated as flat".to_string());
        0.0
    };

    let rise_per_side = (pitch / 12.0) * run_per_side;

    let mut slope_length_per_side = run_per_side.hypot(rise_per_side);
    if !slope_length_per_side.is_finite() {
        slope_length_per_side = run_per_side.max(10.0);
        warn!(slope_length_per_side, "Invalid slope length, using fallback");
        fallbacks.push(format!(
            "Slope length could not be computed; assumed {:.2}'",
            slope_length_per_side
        ));
    }

    let height = if input.height.is_finite() { input.height } else { 0.0 };
    let ridge_height = height + rise_per_side;

    let slope_per_foot = if run_per_side > 0.0 {
        rise_per_side / run_per_side
    } else {
        0.0
    };

    let overhang = Feet::from(Inches(input.overhang_in));
    let peak_gap = Feet::from(Inches(input.peak_gap_in)) / 2.0;
    let mut roof_panel_length = if input.overhang_in.is_finite() && input.peak_gap_in.is_finite() {
        (Feet(slope_length_per_side) + overhang - peak_gap).value()
    } else {
        let fallback = (input.width / 2.0).max(10.0);
        warn!(
            overhang_in = input.overhang_in,
            peak_gap_in = input.peak_gap_in,
            "Invalid roof panel adjustments, using half-width fallback"
        );
        fallbacks.push(format!(
            "Roof overhang or peak gap was invalid; roof panel length assumed {:.2}'",
            fallback
        ));
        fallback
    };
    if !roof_panel_length.is_finite() {
        roof_panel_length = 20.0;
        warn!("Roof panel length still invalid, using 20' fallback");
        fallbacks.push("Roof panel length could not be computed; assumed 20'".to_string());
    }

    debug!(
        run_per_side,
        rise_per_side,
        slope_length_per_side,
        ridge_height,
        roof_panel_length,
        "Resolved roof geometry"
    );

    RoofGeometry {
        roof_type: input.roof_type,
        run_per_side,
        rise_per_side,
        slope_length_per_side,
        ridge_height,
        slope_per_foot,
        roof_panel_length,
        fallbacks,
    }
}

impl RoofGeometry {
    /// Height of the roofline above grade at an offset along an end wall.
    ///
    /// Gable: rises from each eave toward the center. Single slope: rises
    /// from the low eave at offset 0. Offsets outside the wall are clamped,
    /// so the result never drops below the eave.
    pub fn wall_height_at(&self, eave_height: f64, wall_width: f64, offset: f64) -> f64 {
        let from_eave = match self.roof_type {
            RoofType::Gable => offset.min(wall_width - offset),
            RoofType::SingleSlope => offset.min(wall_width),
        };
        eave_height + from_eave.max(0.0) * self.slope_per_foot
    }

    /// Rise of the peak above the eave (ft)
    pub fn peak_rise(&self) -> f64 {
        self.rise_per_side
    }

    /// Ratio of sloped length to horizontal run (1.0 for a flat roof)
    pub fn slope_factor(&self) -> f64 {
        if self.run_per_side > 0.0 {
            self.slope_length_per_side / self.run_per_side
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gable(width: f64, height: f64, pitch: f64) -> GeometryInput {
        GeometryInput {
            width,
            height,
            pitch,
            roof_type: RoofType::Gable,
            overhang_in: 2.0,
            peak_gap_in: 1.0,
        }
    }

    #[test]
    fn test_standard_gable() {
        let geom = resolve_geometry(&gable(40.0, 12.0, 3.0));
        assert_eq!(geom.run_per_side, 20.0);
        assert_eq!(geom.rise_per_side, 5.0);
        // sqrt(20^2 + 5^2) = 20.6155
        assert!((geom.slope_length_per_side - 20.6155).abs() < 1e-4);
        assert_eq!(geom.ridge_height, 17.0);
        assert_eq!(geom.slope_per_foot, 0.25);
        // 20.6155 + 2/12 - 1/24
        assert!((geom.roof_panel_length - 20.7405).abs() < 1e-4);
        assert!(geom.fallbacks.is_empty());
    }

    #[test]
    fn test_flat_roof_degenerates() {
        let geom = resolve_geometry(&gable(40.0, 12.0, 0.0));
        assert_eq!(geom.slope_length_per_side, geom.run_per_side);
        assert_eq!(geom.ridge_height, 12.0);
        assert_eq!(geom.slope_per_foot, 0.0);
    }

    #[test]
    fn test_zero_width_guards_divide_by_zero() {
        let geom = resolve_geometry(&gable(0.0, 12.0, 3.0));
        assert_eq!(geom.run_per_side, 0.0);
        assert_eq!(geom.slope_per_foot, 0.0);
        assert_eq!(geom.slope_factor(), 1.0);
        assert!(geom.roof_panel_length.is_finite());
    }

    #[test]
    fn test_infinite_pitch_falls_back() {
        let geom = resolve_geometry(&gable(40.0, 12.0, f64::INFINITY));
        assert!(geom.slope_length_per_side.is_finite());
        assert!(geom.roof_panel_length.is_finite());
        assert!(!geom.fallbacks.is_empty());
    }

    #[test]
    fn test_nan_overhang_uses_half_width() {
        let mut input = gable(40.0, 12.0, 3.0);
        input.overhang_in = f64::NAN;
        let geom = resolve_geometry(&input);
        assert_eq!(geom.roof_panel_length, 20.0);
        assert_eq!(geom.fallbacks.len(), 1);

        input.width = 12.0;
        let narrow = resolve_geometry(&input);
        assert_eq!(narrow.roof_panel_length, 10.0);
    }

    #[test]
    fn test_single_slope_spans_full_width() {
        let mut input = gable(30.0, 14.0, 1.0);
        input.roof_type = RoofType::SingleSlope;
        let geom = resolve_geometry(&input);
        assert_eq!(geom.run_per_side, 30.0);
        assert_eq!(geom.rise_per_side, 2.5);
        assert_eq!(geom.ridge_height, 16.5);
        assert!((geom.wall_height_at(14.0, 30.0, 30.0) - 16.5).abs() < 1e-9);
        assert!((geom.wall_height_at(14.0, 30.0, 15.0) - 15.25).abs() < 1e-9);
        assert_eq!(geom.wall_height_at(14.0, 30.0, 0.0), 14.0);
    }

    #[test]
    fn test_wall_height_at_gable() {
        let geom = resolve_geometry(&gable(40.0, 12.0, 3.0));
        assert_eq!(geom.wall_height_at(12.0, 40.0, 0.0), 12.0);
        assert_eq!(geom.wall_height_at(12.0, 40.0, 12.0), 15.0);
        assert_eq!(geom.wall_height_at(12.0, 40.0, 28.0), 15.0);
        assert_eq!(geom.wall_height_at(12.0, 40.0, 20.0), 17.0);
        // Offsets past the far corner never go below the eave
        assert_eq!(geom.wall_height_at(12.0, 40.0, 45.0), 12.0);
    }
}
