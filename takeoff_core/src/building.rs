//! # Building Description Document
//!
//! [`BuildingDocument`] is the single input of the takeoff engine and also the
//! unit of save/load: it serializes to the same camelCase JSON the estimating
//! UI writes, so any field change here is a breaking change for saved files.
//!
//! ## Structure
//!
//! ```text
//! BuildingDocument
//! ├── length / width / height / roofPitch / bays / roofType
//! ├── panelType, roofOverhang, roofPeakGap, guttersEnabled, colors
//! ├── structuralFrames: [StructuralFrame; bays + 1] (optional)
//! ├── walls: { north, east, south, west } -> WallConfig (girts, per-wall openings)
//! ├── insulation: { enabled, type }
//! └── manDoors / rollUpDoors / windows / awnings (flat lists used by the takeoff)
//! ```
//!
//! North and south are the gabled end walls (front and back), east and west
//! are the sidewalls.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::building::BuildingDocument;
//!
//! let json = r#"{ "length": 40, "width": 40, "height": 12, "roofPitch": 3, "bays": 2 }"#;
//! let doc: BuildingDocument = serde_json::from_str(json).unwrap();
//! assert!(doc.gutters_enabled);
//! assert!(doc.structural_frames.is_none());
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Enumerations
// ============================================================================

/// Roof profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoofType {
    /// Two roof planes meeting at a center ridge
    #[default]
    Gable,
    /// One roof plane spanning the full width
    #[serde(alias = "single")]
    SingleSlope,
}

impl RoofType {
    /// Number of roof planes
    pub fn roof_planes(&self) -> u32 {
        match self {
            RoofType::Gable => 2,
            RoofType::SingleSlope => 1,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RoofType::Gable => "Gable",
            RoofType::SingleSlope => "Single Slope",
        }
    }
}

/// Metal panel profile. Unknown profile names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PanelType {
    RPanel,
    Pbr,
    UPanel,
    StandingSeam,
    Corrugated,
    Other(String),
}

impl PanelType {
    /// Code string as stored in building files
    pub fn code(&self) -> &str {
        match self {
            PanelType::RPanel => "r-panel",
            PanelType::Pbr => "pbr",
            PanelType::UPanel => "u-panel",
            PanelType::StandingSeam => "standing-seam",
            PanelType::Corrugated => "corrugated",
            PanelType::Other(code) => code,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            PanelType::RPanel => "R-Panel",
            PanelType::Pbr => "PBR Panel",
            PanelType::UPanel => "U-Panel",
            PanelType::StandingSeam => "Standing Seam",
            PanelType::Corrugated => "Corrugated",
            PanelType::Other(code) => code,
        }
    }

    /// Waste allowance as a fraction of panel area.
    ///
    /// Standing seam runs higher because of the more involved installation.
    /// Unknown profiles use 5%.
    pub fn waste_factor(&self) -> f64 {
        match self {
            PanelType::RPanel => 0.05,
            PanelType::Pbr => 0.06,
            PanelType::UPanel => 0.05,
            PanelType::StandingSeam => 0.08,
            PanelType::Corrugated => 0.04,
            PanelType::Other(_) => 0.05,
        }
    }
}

impl Default for PanelType {
    fn default() -> Self {
        PanelType::RPanel
    }
}

impl From<String> for PanelType {
    fn from(s: String) -> Self {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "r-panel" | "rpanel" => PanelType::RPanel,
            "pbr" | "pbr-panel" => PanelType::Pbr,
            "u-panel" | "upanel" => PanelType::UPanel,
            "standing-seam" => PanelType::StandingSeam,
            "corrugated" => PanelType::Corrugated,
            _ => PanelType::Other(s),
        }
    }
}

impl From<PanelType> for String {
    fn from(panel: PanelType) -> Self {
        panel.code().to_string()
    }
}

impl std::fmt::Display for PanelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which wall a roll-up door sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WallAssignment {
    /// North gabled end wall
    FrontGable,
    /// South gabled end wall
    BackGable,
    /// East or west sidewall
    Sidewall,
}

impl WallAssignment {
    pub fn is_gable(&self) -> bool {
        !matches!(self, WallAssignment::Sidewall)
    }
}

/// The four walls of the building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    North,
    East,
    South,
    West,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::North, WallSide::East, WallSide::South, WallSide::West];

    pub fn display_name(&self) -> &'static str {
        match self {
            WallSide::North => "North",
            WallSide::East => "East",
            WallSide::South => "South",
            WallSide::West => "West",
        }
    }
}

// ============================================================================
// Structural frames
// ============================================================================

/// Member selection for one transverse frame line.
///
/// ## JSON Example
///
/// ```json
/// { "columnType": "I-beam", "columnSize": "W8x18", "beamType": "I-beam", "beamSize": "W10x22" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralFrame {
    pub column_type: String,
    pub column_size: String,
    pub beam_type: String,
    pub beam_size: String,
}

impl StructuralFrame {
    pub fn new(
        column_type: impl Into<String>,
        column_size: impl Into<String>,
        beam_type: impl Into<String>,
        beam_size: impl Into<String>,
    ) -> Self {
        StructuralFrame {
            column_type: column_type.into(),
            column_size: column_size.into(),
            beam_type: beam_type.into(),
            beam_size: beam_size.into(),
        }
    }

    /// Grouping label for the two columns of this frame, e.g. "I-beam W8x18"
    pub fn column_label(&self) -> String {
        format!("{} {}", self.column_type, self.column_size)
    }

    /// Grouping label for the two rafters of this frame
    pub fn beam_label(&self) -> String {
        format!("{} {}", self.beam_type, self.beam_size)
    }
}

// ============================================================================
// Flat opening lists (consumed by the takeoff)
// ============================================================================

/// Width and height of a man door, window, or awning (ft)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningSize {
    pub width: f64,
    pub height: f64,
}

impl OpeningSize {
    pub fn new(width: f64, height: f64) -> Self {
        OpeningSize { width, height }
    }
}

/// A roll-up door from the flat door list.
///
/// `start`/`end` are offsets in feet from the left corner of the wall.
/// Without an explicit `wall`, the first two doors in the list belong to the
/// front gable wall and the rest to the back gable wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollUpDoor {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall: Option<WallAssignment>,
}

impl RollUpDoor {
    pub fn new(width: f64, height: f64) -> Self {
        RollUpDoor {
            width,
            height,
            start: None,
            end: None,
            wall: None,
        }
    }

    /// Place the door at an offset from the left corner of its wall
    pub fn at(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    /// Assign the door to a wall explicitly
    pub fn on(mut self, wall: WallAssignment) -> Self {
        self.wall = Some(wall);
        self
    }

    /// Left edge offset (ft), 0 when unset
    pub fn start_ft(&self) -> f64 {
        self.start.unwrap_or(0.0)
    }

    /// Right edge offset (ft), `start + width` when unset
    pub fn end_ft(&self) -> f64 {
        self.end.unwrap_or(self.start_ft() + self.width)
    }

    /// Whether the door opening covers a point along its wall
    pub fn spans(&self, position_ft: f64) -> bool {
        let start = self.start_ft();
        start <= position_ft && start + self.width >= position_ft
    }

    /// Wall this door belongs to, given its index in the flat list
    pub fn resolved_wall(&self, index: usize) -> WallAssignment {
        match self.wall {
            Some(wall) => wall,
            None if index < 2 => WallAssignment::FrontGable,
            None => WallAssignment::BackGable,
        }
    }
}

// ============================================================================
// Per-wall configuration (floor plan and insulation)
// ============================================================================

/// What a centered opening is centered within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterIn {
    #[default]
    Building,
    Bay,
    Objects,
}

/// Which end of the wall a distance is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureFrom {
    #[default]
    Left,
    Right,
}

/// Edge a distance is measured to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOf {
    #[default]
    Building,
    Bay,
    Object,
}

/// Where an opening sits along its wall. Resolved to an absolute offset by
/// the floor plan, never by the takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub centered: bool,
    pub center_in: CenterIn,
    pub bay: String,
    pub distance: f64,
    pub from: MeasureFrom,
    pub edge_of: EdgeOf,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            centered: true,
            center_in: CenterIn::Building,
            bay: "A".to_string(),
            distance: 5.0,
            from: MeasureFrom::Left,
            edge_of: EdgeOf::Building,
        }
    }
}

/// Girt selection for one wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GirtConfig {
    pub size: String,
    pub spacing: f64,
    pub max_gap: f64,
    pub size_locked: bool,
    pub spacing_locked: bool,
    pub max_gap_locked: bool,
}

impl Default for GirtConfig {
    fn default() -> Self {
        GirtConfig {
            size: "2x6".to_string(),
            spacing: 5.0,
            max_gap: 7.0,
            size_locked: false,
            spacing_locked: false,
            max_gap_locked: false,
        }
    }
}

/// A man door placed on a specific wall; `dimensions` is "WxH" in feet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallDoor {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub dimensions: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtract_insulation: Option<bool>,
}

/// A window placed on a specific wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallWindow {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub dimensions: String,
    #[serde(default)]
    pub sill_height: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtract_insulation: Option<bool>,
}

/// A bay (overhead) door placed on a specific wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BayDoor {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type", default)]
    pub door_type: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtract_insulation: Option<bool>,
}

/// A framed opening with no door or window in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallOpening {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtract_insulation: Option<bool>,
}

/// Wall awning settings (carried through, not used by the takeoff)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwningConfig {
    pub enabled: bool,
    pub height: f64,
    pub width: f64,
    pub position: Position,
    pub span_wall: bool,
    pub length: f64,
    pub wraparound: String,
    pub pitch: f64,
    pub post_type: String,
}

impl Default for AwningConfig {
    fn default() -> Self {
        AwningConfig {
            enabled: false,
            height: 10.0,
            width: 6.0,
            position: Position::default(),
            span_wall: true,
            length: 10.0,
            wraparound: "none".to_string(),
            pitch: 1.0,
            post_type: "none".to_string(),
        }
    }
}

/// Roof extension settings (carried through, not used by the takeoff)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoofExtension {
    pub enabled: bool,
    pub width: f64,
    pub drop_walls: String,
    pub wall_height: f64,
}

impl Default for RoofExtension {
    fn default() -> Self {
        RoofExtension {
            enabled: false,
            width: 10.0,
            drop_walls: "none".to_string(),
            wall_height: 0.0,
        }
    }
}

/// Everything configured on one wall
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WallConfig {
    pub girts: GirtConfig,
    pub doors: Vec<WallDoor>,
    pub windows: Vec<WallWindow>,
    pub bay_doors: Vec<BayDoor>,
    pub openings: Vec<WallOpening>,
    pub awning: AwningConfig,
    pub roof_extension: RoofExtension,
}

/// The four wall configurations, keyed by compass side
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Walls {
    pub north: WallConfig,
    pub east: WallConfig,
    pub south: WallConfig,
    pub west: WallConfig,
}

impl Walls {
    pub fn get(&self, side: WallSide) -> &WallConfig {
        match side {
            WallSide::North => &self.north,
            WallSide::East => &self.east,
            WallSide::South => &self.south,
            WallSide::West => &self.west,
        }
    }

    /// Walls in north, east, south, west order
    pub fn iter(&self) -> impl Iterator<Item = (WallSide, &WallConfig)> {
        WallSide::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

/// Parse a "WxH" dimension string (feet) such as "3x7" or "4 x 4".
pub fn parse_dimensions(dimensions: &str) -> Option<(f64, f64)> {
    let (w, h) = dimensions.split_once(['x', 'X'])?;
    let width: f64 = w.trim().parse().ok()?;
    let height: f64 = h.trim().parse().ok()?;
    if width.is_finite() && height.is_finite() {
        Some((width, height))
    } else {
        None
    }
}

// ============================================================================
// Insulation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsulationType {
    Spray,
    #[default]
    Batt,
}

impl InsulationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            InsulationType::Spray => "Spray Foam",
            InsulationType::Batt => "Batt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insulation {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: InsulationType,
}

// ============================================================================
// Document
// ============================================================================

fn default_gutters() -> bool {
    true
}

/// Complete description of one building.
///
/// ## JSON Example
///
/// ```json
/// {
///   "length": 40, "width": 40, "height": 12, "roofPitch": 3, "bays": 2,
///   "roofType": "gable", "panelType": "r-panel", "guttersEnabled": true,
///   "manDoors": [{ "width": 3, "height": 7 }],
///   "rollUpDoors": [{ "width": 16, "height": 10, "start": 12 }],
///   "windows": [], "awnings": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDocument {
    /// Building length along the sidewalls (ft)
    pub length: f64,

    /// Building width along the end walls (ft)
    pub width: f64,

    /// Eave height (ft)
    pub height: f64,

    /// Rise per 12 of run; 0 is a flat roof
    #[serde(default, alias = "pitch", skip_serializing_if = "Option::is_none")]
    pub roof_pitch: Option<f64>,

    /// Number of equal longitudinal bays
    pub bays: u32,

    #[serde(default)]
    pub roof_type: RoofType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_type: Option<PanelType>,

    /// Added to the roof panel length (in)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_overhang: Option<f64>,

    /// Gap left at the ridge (in), split between the two roof sides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_peak_gap: Option<f64>,

    #[serde(default = "default_gutters")]
    pub gutters_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_color: Option<String>,

    /// One entry per frame line, `bays + 1` long
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural_frames: Option<Vec<StructuralFrame>>,

    #[serde(default)]
    pub walls: Walls,

    #[serde(default)]
    pub insulation: Insulation,

    #[serde(default)]
    pub man_doors: Vec<OpeningSize>,

    #[serde(default)]
    pub roll_up_doors: Vec<RollUpDoor>,

    #[serde(default)]
    pub windows: Vec<OpeningSize>,

    #[serde(default)]
    pub awnings: Vec<OpeningSize>,
}

impl BuildingDocument {
    /// Create a gable building with no openings and all optional fields unset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::building::BuildingDocument;
    ///
    /// let doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
    /// assert_eq!(doc.roof_pitch, Some(3.0));
    /// ```
    pub fn new(length: f64, width: f64, height: f64, bays: u32) -> Self {
        BuildingDocument {
            length,
            width,
            height,
            roof_pitch: None,
            bays,
            roof_type: RoofType::Gable,
            panel_type: None,
            roof_overhang: None,
            roof_peak_gap: None,
            gutters_enabled: true,
            wall_color: None,
            trim_color: None,
            roof_color: None,
            structural_frames: None,
            walls: Walls::default(),
            insulation: Insulation::default(),
            man_doors: Vec::new(),
            roll_up_doors: Vec::new(),
            windows: Vec::new(),
            awnings: Vec::new(),
        }
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.roof_pitch = Some(pitch);
        self
    }

    pub fn with_roof_type(mut self, roof_type: RoofType) -> Self {
        self.roof_type = roof_type;
        self
    }

    pub fn with_panel_type(mut self, panel_type: PanelType) -> Self {
        self.panel_type = Some(panel_type);
        self
    }

    pub fn with_gutters(mut self, enabled: bool) -> Self {
        self.gutters_enabled = enabled;
        self
    }

    /// Apply the same member selection to every frame line
    pub fn with_uniform_frames(mut self, frame: StructuralFrame) -> Self {
        self.structural_frames = Some(vec![frame; self.bays as usize + 1]);
        self
    }

    /// Resolved panel profile ("r-panel" when unset)
    pub fn panel(&self) -> PanelType {
        self.panel_type.clone().unwrap_or_default()
    }

    /// Strict validation for callers that want to reject a document up front.
    ///
    /// The takeoff engine does not call this; it degrades instead of failing.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("length", self.length), ("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Dimension must be a positive number of feet"));
            }
        }
        if let Some(pitch) = self.roof_pitch {
            if !pitch.is_finite() || pitch < 0.0 {
                return Err(CalcError::invalid_input("roofPitch", pitch.to_string(), "Pitch must be zero or positive"));
            }
        }
        if self.bays == 0 {
            return Err(CalcError::invalid_input("bays", "0", "A building needs at least one bay"));
        }
        if let Some(frames) = &self.structural_frames {
            let expected = self.bays as usize + 1;
            if frames.len() != expected {
                return Err(CalcError::invalid_input(
                    "structuralFrames",
                    frames.len().to_string(),
                    format!("Expected {} frame lines (bays + 1)", expected),
                ));
            }
        }
        for (i, door) in self.roll_up_doors.iter().enumerate() {
            if !door.width.is_finite() || door.width <= 0.0 {
                return Err(CalcError::invalid_input(
                    format!("rollUpDoors[{}].width", i),
                    door.width.to_string(),
                    "Door width must be positive",
                ));
            }
        }
        Ok(())
    }
}
