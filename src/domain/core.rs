//! Core domain types
//!
//! Defines the two linked dimensions, the conversion direction between them
//! and the text-backed coordinate triple the form edits.

use std::fmt;

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in display order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Lowercase axis name used in field identifiers
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Parses an axis from its name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    /// Whether this axis is scaled when crossing between dimensions
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Axis::Y)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two linked coordinate spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Nether,
    Overworld,
}

impl Dimension {
    /// Human readable label, as shown on the toggle poles and in results
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Nether => "Nether",
            Dimension::Overworld => "Overworld",
        }
    }

    /// Lowercase prefix used in field identifiers (`nether-x`)
    pub fn prefix(self) -> &'static str {
        match self {
            Dimension::Nether => "nether",
            Dimension::Overworld => "overworld",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Conversion direction; selects the source coordinate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    NetherToOverworld,
    OverworldToNether,
}

impl Direction {
    /// Dimension whose coordinates are read and converted
    pub fn source(self) -> Dimension {
        match self {
            Direction::NetherToOverworld => Dimension::Nether,
            Direction::OverworldToNether => Dimension::Overworld,
        }
    }

    /// Dimension the result is expressed in
    pub fn target(self) -> Dimension {
        match self {
            Direction::NetherToOverworld => Dimension::Overworld,
            Direction::OverworldToNether => Dimension::Nether,
        }
    }

    /// The other direction
    pub fn toggled(self) -> Self {
        match self {
            Direction::NetherToOverworld => Direction::OverworldToNether,
            Direction::OverworldToNether => Direction::NetherToOverworld,
        }
    }

    /// Arrow shown on the toggle knob
    pub fn arrow(self) -> char {
        match self {
            Direction::NetherToOverworld => '→',
            Direction::OverworldToNether => '←',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source(), self.target())
    }
}

/// A coordinate triple as entered in the form
///
/// Each axis holds raw text. Numeric interpretation happens only at
/// conversion time, so any text is representable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinates {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Coordinates {
    /// Creates a triple from three text values
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Text currently held by an axis
    pub fn get(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Replaces the text held by an axis
    pub fn set(&mut self, axis: Axis, value: impl Into<String>) {
        let slot = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        };
        *slot = value.into();
    }
}
