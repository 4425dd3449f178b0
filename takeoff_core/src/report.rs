//! # Takeoff Report
//!
//! The structured output of the engine: an ordered list of
//! [`TakeoffLineItem`]s grouped by [`Category`]. The text form printed for
//! clipboard, print, and export is a thin projection of this list and reads
//! back into the same structure with [`TakeoffResult::parse_text`].
//!
//! ## Text Grammar
//!
//! ```text
//! MATERIAL TAKEOFF
//!
//! // STRUCTURAL:
//! - Roof Purlins: 20 @ 20' each (5 purlins per roof side)
//! - Outside Panel Closures: 28
//!
//! // NOTES:
//! - Note: Roof pitch 3/12 ...
//! ```
//!
//! Each item line is `- description: quantity[ @ size each][ (notes)]`.
//! Descriptions never contain `": "`, and notes keep their parentheses
//! balanced so the trailing group can be found from the end of the line.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Title line of the text projection
pub const TAKEOFF_TITLE: &str = "MATERIAL TAKEOFF";

/// Fixed grouping used by the UI table, print view and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Structural,
    Paneling,
    Trim,
    #[serde(rename = "Doors and Windows")]
    DoorsAndWindows,
    Accessories,
    Fasteners,
    Notes,
}

impl Category {
    /// All categories in report order
    pub const ALL: [Category; 7] = [
        Category::Structural,
        Category::Paneling,
        Category::Trim,
        Category::DoorsAndWindows,
        Category::Accessories,
        Category::Fasteners,
        Category::Notes,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Structural => "Structural",
            Category::Paneling => "Paneling",
            Category::Trim => "Trim",
            Category::DoorsAndWindows => "Doors and Windows",
            Category::Accessories => "Accessories",
            Category::Fasteners => "Fasteners",
            Category::Notes => "Notes",
        }
    }

    /// Section heading used in the text projection, e.g. `// DOORS AND WINDOWS:`
    pub fn heading(&self) -> String {
        format!("// {}:", self.display_name().to_uppercase())
    }

    /// Parse a section heading line
    pub fn from_heading(line: &str) -> Option<Self> {
        let name = line.trim().strip_prefix("//")?.trim().strip_suffix(':')?.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One row of the materials list.
///
/// ## JSON Example
///
/// ```json
/// {
///   "category": "Trim",
///   "description": "Sculpted Rake Trim",
///   "quantity": 4,
///   "unit_size": "20'9\"",
///   "notes": ""
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffLineItem {
    pub category: Category,
    pub description: String,
    /// Piece count; `None` only for free-text notes
    pub quantity: Option<u32>,
    /// Length or size of each piece, already formatted (e.g. `20'7"`)
    pub unit_size: Option<String>,
    pub notes: String,
}

impl TakeoffLineItem {
    /// Item counted in pieces with no size
    pub fn count(category: Category, description: impl Into<String>, quantity: u32) -> Self {
        TakeoffLineItem {
            category,
            description: description.into(),
            quantity: Some(quantity),
            unit_size: None,
            notes: String::new(),
        }
    }

    /// Item counted in pieces of a given size
    pub fn sized(category: Category, description: impl Into<String>, quantity: u32, unit_size: impl Into<String>) -> Self {
        TakeoffLineItem {
            category,
            description: description.into(),
            quantity: Some(quantity),
            unit_size: Some(unit_size.into()),
            notes: String::new(),
        }
    }

    /// Free-text note
    pub fn note(text: impl Into<String>) -> Self {
        TakeoffLineItem {
            category: Category::Notes,
            description: "Note".to_string(),
            quantity: None,
            unit_size: None,
            notes: text.into(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Render one `- ...` line of the text projection
    pub fn to_line(&self) -> String {
        if self.category == Category::Notes && self.quantity.is_none() {
            return format!("- Note: {}", self.notes);
        }

        let mut line = format!("- {}:", self.description);
        if let Some(quantity) = self.quantity {
            line.push_str(&format!(" {}", quantity));
        }
        if let Some(size) = &self.unit_size {
            line.push_str(&format!(" @ {} each", size));
        }
        if !self.notes.is_empty() {
            line.push_str(&format!(" ({})", self.notes));
        }
        line
    }

    /// Parse one `- ...` line back into an item of the given category
    pub fn parse_line(category: Category, line: &str, line_no: usize) -> CalcResult<Self> {
        let body = line
            .trim()
            .strip_prefix("- ")
            .ok_or_else(|| CalcError::parse_error(line_no, "item lines start with '- '"))?;

        if let Some(text) = body.strip_prefix("Note: ") {
            return Ok(TakeoffLineItem::note(text));
        }

        let (description, rest) = body
            .split_once(": ")
            .ok_or_else(|| CalcError::parse_error(line_no, "expected 'description: quantity'"))?;

        let (main, notes) = split_trailing_group(rest.trim());
        let (quantity_text, size) = match main.split_once(" @ ") {
            Some((q, s)) => {
                let s = s.trim();
                let s = s.strip_suffix(" each").unwrap_or(s);
                (q.trim(), Some(s.to_string()))
            }
            None => (main.trim(), None),
        };

        let quantity = quantity_text.parse::<u32>().map_err(|_| {
            CalcError::parse_error(line_no, format!("'{}' is not a quantity", quantity_text))
        })?;

        Ok(TakeoffLineItem {
            category,
            description: description.trim().to_string(),
            quantity: Some(quantity),
            unit_size: size,
            notes: notes.unwrap_or_default().to_string(),
        })
    }
}

/// Split `text (notes)` into the text and the contents of the last
/// parenthesized group, if the line ends with one.
fn split_trailing_group(text: &str) -> (&str, Option<&str>) {
    if !text.ends_with(')') {
        return (text, None);
    }

    let mut depth = 0usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    let inner = &text[i + 1..text.len() - 1];
                    return (text[..i].trim_end(), Some(inner));
                }
            }
            _ => {}
        }
    }
    (text, None)
}

/// The complete materials list produced by one takeoff run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TakeoffResult {
    pub items: Vec<TakeoffLineItem>,
}

impl TakeoffResult {
    pub fn new(items: Vec<TakeoffLineItem>) -> Self {
        TakeoffResult { items }
    }

    /// Items of one category, in report order
    pub fn category(&self, category: Category) -> impl Iterator<Item = &TakeoffLineItem> {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// First item with an exact description
    pub fn find(&self, description: &str) -> Option<&TakeoffLineItem> {
        self.items.iter().find(|item| item.description == description)
    }

    /// All items whose description starts with a prefix
    pub fn find_all<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a TakeoffLineItem> + 'a {
        self.items.iter().filter(move |item| item.description.starts_with(prefix))
    }

    /// Quantity of the first item with an exact description
    pub fn quantity_of(&self, description: &str) -> Option<u32> {
        self.find(description).and_then(|item| item.quantity)
    }

    /// Free-text notes
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.category(Category::Notes).map(|item| item.notes.as_str())
    }

    /// Render the text projection (title, category headings, item lines).
    ///
    /// Categories with no items are skipped.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(TAKEOFF_TITLE);
        out.push('\n');

        for category in Category::ALL {
            let mut lines = self.category(category).peekable();
            if lines.peek().is_none() {
                continue;
            }
            out.push('\n');
            out.push_str(&category.heading());
            out.push('\n');
            for item in lines {
                out.push_str(&item.to_line());
                out.push('\n');
            }
        }
        out
    }

    /// Read the text projection back into structured items.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::report::{Category, TakeoffResult};
    ///
    /// let text = "MATERIAL TAKEOFF\n\n// TRIM:\n- Ridge Roll: 1 @ 40' each\n";
    /// let parsed = TakeoffResult::parse_text(text).unwrap();
    /// assert_eq!(parsed.items[0].category, Category::Trim);
    /// assert_eq!(parsed.items[0].unit_size.as_deref(), Some("40'"));
    /// ```
    pub fn parse_text(text: &str) -> CalcResult<Self> {
        let mut items = Vec::new();
        let mut current: Option<Category> = None;

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() || line == TAKEOFF_TITLE {
                continue;
            }
            if line.starts_with("//") {
                let category = Category::from_heading(line).ok_or_else(|| {
                    CalcError::parse_error(line_no, format!("unknown section '{}'", line))
                })?;
                current = Some(category);
                continue;
            }
            let category = current
                .ok_or_else(|| CalcError::parse_error(line_no, "item before any section heading"))?;
            items.push(TakeoffLineItem::parse_line(category, line, line_no)?);
        }

        Ok(TakeoffResult { items })
    }
}

impl std::fmt::Display for TakeoffResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
