//! # Material Takeoff Engine
//!
//! Maps a [`BuildingDocument`] to a complete, itemized [`TakeoffResult`].
//! The pipeline is a single pass with no hidden state:
//!
//! ```text
//! BuildingDocument
//!   └─ TakeoffContext (sanitized dimensions, defaults, door wall assignment)
//!        └─ geometry ──┬─ structure ──┐
//!                      ├─ envelope  ──┼─ fasteners ─ formatter ─> TakeoffResult
//!                      ├─ openings  ──┘
//!                      └─ insulation
//! ```
//!
//! The engine never fails. Invalid numbers are replaced by conservative
//! fallbacks, logged with `tracing`, and listed in the Notes category.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::building::BuildingDocument;
//! use takeoff_core::takeoff::generate_takeoff;
//!
//! let doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
//! let takeoff = generate_takeoff(&doc);
//!
//! assert_eq!(takeoff.quantity_of("Roof Panels (R-Panel)"), Some(28));
//! assert_eq!(takeoff.quantity_of("Columns (I-beams)"), Some(8));
//! println!("{}", takeoff.to_text());
//! ```

pub mod envelope;
pub mod fasteners;
pub mod formatter;
pub mod geometry;
pub mod insulation;
pub mod openings;
pub mod structure;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::building::{BuildingDocument, RollUpDoor, WallAssignment};
use crate::constants::TakeoffConstants;
use crate::report::TakeoffResult;

pub use envelope::{quantify_envelope, EnvelopeTakeoff};
pub use fasteners::{quantify_fasteners, FastenerTakeoff};
pub use geometry::{resolve_geometry, GeometryInput, RoofGeometry};
pub use insulation::{quantify_insulation, InsulationTakeoff};
pub use openings::{quantify_openings, OpeningsTakeoff};
pub use structure::{quantify_structure, StructuralTakeoff};

/// Round a piece count up. Non-finite and negative values count as zero.
pub(crate) fn ceil_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as u32
    } else {
        0
    }
}

/// Round a piece count down. Non-finite and negative values count as zero.
pub(crate) fn floor_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u32
    } else {
        0
    }
}

/// Item count of a list, saturating at `u32::MAX`
pub(crate) fn count_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// A roll-up door together with the wall it was resolved onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedDoor<'a> {
    pub door: &'a RollUpDoor,
    pub wall: WallAssignment,
}

/// Sanitized view of one document, shared by every stage.
///
/// Built fresh for each run; holds nothing between runs.
#[derive(Debug, Clone)]
pub struct TakeoffContext<'a> {
    pub doc: &'a BuildingDocument,
    pub constants: &'a TakeoffConstants,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub bays: u32,
    pub pitch: f64,
    pub geometry: RoofGeometry,
    pub doors: Vec<PlacedDoor<'a>>,
    /// Assumptions and fallbacks, surfaced in the Notes category
    pub assumptions: Vec<String>,
}

impl<'a> TakeoffContext<'a> {
    /// Sanitize the document and resolve the roof geometry.
    pub fn new(doc: &'a BuildingDocument, constants: &'a TakeoffConstants) -> Self {
        let mut assumptions = Vec::new();

        let length = sanitize_dimension("length", doc.length, &mut assumptions);
        let width = sanitize_dimension("width", doc.width, &mut assumptions);
        let height = sanitize_dimension("height", doc.height, &mut assumptions);

        let bays = if doc.bays == 0 {
            warn!("Building has zero bays, using one");
            assumptions.push("Bay count was 0; the building was treated as a single bay".to_string());
            1
        } else {
            doc.bays
        };

        let pitch = match doc.roof_pitch {
            Some(p) if p < 0.0 => {
                warn!(pitch = p, "Negative roof pitch, treating roof as flat");
                assumptions.push(format!("Roof pitch {} is negative; the roof was treated as flat", p));
                0.0
            }
            Some(p) => p,
            None => {
                assumptions.push(format!(
                    "Roof pitch not set; assumed {}/12",
                    constants.default_roof_pitch
                ));
                constants.default_roof_pitch
            }
        };

        let geometry = resolve_geometry(&GeometryInput {
            width,
            height,
            pitch,
            roof_type: doc.roof_type,
            overhang_in: doc.roof_overhang.unwrap_or(constants.default_roof_overhang_in),
            peak_gap_in: doc.roof_peak_gap.unwrap_or(constants.default_roof_peak_gap_in),
        });
        assumptions.extend(geometry.fallbacks.iter().cloned());

        let doors = doc
            .roll_up_doors
            .iter()
            .enumerate()
            .map(|(index, door)| PlacedDoor {
                door,
                wall: door.resolved_wall(index),
            })
            .collect();

        TakeoffContext {
            doc,
            constants,
            length,
            width,
            height,
            bays,
            pitch,
            geometry,
            doors,
            assumptions,
        }
    }

    /// Length of one bay (ft)
    pub fn bay_length(&self) -> f64 {
        self.length / self.bays as f64
    }

    /// Panel slots along a wall of the building's length
    pub fn panels_per_wall(&self) -> u32 {
        ceil_count(self.length / self.constants.panel_width_ft)
    }

    pub fn roof_planes(&self) -> u32 {
        self.doc.roof_type.roof_planes()
    }

    /// Roll-up doors resolved onto a given wall
    pub fn doors_on(&self, wall: WallAssignment) -> impl Iterator<Item = &PlacedDoor<'a>> {
        self.doors.iter().filter(move |placed| placed.wall == wall)
    }
}

fn sanitize_dimension(field: &str, value: f64, assumptions: &mut Vec<String>) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(field, value, "Invalid building dimension, using 0");
        assumptions.push(format!("Building {} was invalid ({}); it was treated as 0'", field, value));
        0.0
    }
}

/// Every intermediate quantity of one run, before formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeoffBreakdown {
    /// Sanitized building length (ft)
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Pitch actually used (rise per 12)
    pub pitch: f64,
    pub geometry: RoofGeometry,
    pub structure: StructuralTakeoff,
    pub envelope: EnvelopeTakeoff,
    pub openings: OpeningsTakeoff,
    pub fasteners: FastenerTakeoff,
    pub insulation: Option<InsulationTakeoff>,
    pub assumptions: Vec<String>,
}

/// Stateless takeoff service. Holds only its policy table.
#[derive(Debug, Clone, Default)]
pub struct TakeoffEngine {
    constants: TakeoffConstants,
}

impl TakeoffEngine {
    pub fn new() -> Self {
        TakeoffEngine::default()
    }

    /// Use a custom policy table
    pub fn with_constants(constants: TakeoffConstants) -> Self {
        TakeoffEngine { constants }
    }

    pub fn constants(&self) -> &TakeoffConstants {
        &self.constants
    }

    /// Run every quantifier and return the raw quantities.
    pub fn breakdown(&self, doc: &BuildingDocument) -> TakeoffBreakdown {
        let ctx = TakeoffContext::new(doc, &self.constants);
        let structure = quantify_structure(&ctx);
        let envelope = quantify_envelope(&ctx);
        let openings = quantify_openings(&ctx);
        let fasteners = quantify_fasteners(&ctx, &structure, &envelope);
        let insulation = quantify_insulation(&ctx);

        debug!(
            columns = structure.total_columns(),
            roof_panels = envelope.roof_panels,
            assumptions = ctx.assumptions.len(),
            "Takeoff quantities computed"
        );

        TakeoffBreakdown {
            length: ctx.length,
            width: ctx.width,
            height: ctx.height,
            pitch: ctx.pitch,
            geometry: ctx.geometry.clone(),
            structure,
            envelope,
            openings,
            fasteners,
            insulation,
            assumptions: ctx.assumptions,
        }
    }

    /// Produce the itemized materials list for a building.
    pub fn generate(&self, doc: &BuildingDocument) -> TakeoffResult {
        let breakdown = self.breakdown(doc);
        formatter::format_takeoff(doc, &self.constants, &breakdown)
    }
}

/// Produce the materials list with the default policy table.
pub fn generate_takeoff(doc: &BuildingDocument) -> TakeoffResult {
    TakeoffEngine::new().generate(doc)
}
