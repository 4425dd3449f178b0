//! # takeoff_core - Metal Building Material Takeoff Engine
//!
//! `takeoff_core` derives a complete bill of materials for a pre-engineered
//! metal building: structural members, sheeting, trim, opening framing,
//! accessories, and fasteners, each with a quantity and a cut length.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: One pure function from a building document to a materials list
//! - **Never fails**: Bad numbers degrade to documented fallbacks, reported as notes
//! - **JSON-First**: Inputs and outputs implement Serialize/Deserialize
//! - **Auditable policy**: Every shop constant lives in [`constants::TakeoffConstants`]
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::building::{BuildingDocument, RollUpDoor};
//! use takeoff_core::takeoff::generate_takeoff;
//!
//! let mut doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
//! doc.roll_up_doors.push(RollUpDoor::new(16.0, 10.0).at(12.0));
//!
//! let takeoff = generate_takeoff(&doc);
//! assert_eq!(takeoff.quantity_of("Roof Panels (R-Panel)"), Some(28));
//!
//! // Text form for clipboard or print
//! println!("{}", takeoff.to_text());
//! ```
//!
//! ## Modules
//!
//! - [`building`] - Building document (the input and the saved file body)
//! - [`takeoff`] - Geometry, quantifiers, and the takeoff engine
//! - [`report`] - Line items, categories, text rendering and re-parsing
//! - [`constants`] - Shop rules as a named policy table
//! - [`units`] - Unit wrappers and feet-and-inches formatting
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic saves and versioned loads

pub mod building;
pub mod constants;
pub mod errors;
pub mod file_io;
pub mod report;
pub mod takeoff;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use building::BuildingDocument;
pub use constants::TakeoffConstants;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_building, save_building, BuildingFile};
pub use report::{Category, TakeoffLineItem, TakeoffResult};
pub use takeoff::{generate_takeoff, TakeoffEngine};
