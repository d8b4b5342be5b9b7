//! Presence validation for the form fields
//!
//! A field is valid when it holds non-whitespace text. Numeric
//! well-formedness is deliberately not checked here.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::core::{Axis, Coordinates, Dimension};

/// Identifies one input field, e.g. `nether-x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    pub dimension: Dimension,
    pub axis: Axis,
}

impl FieldId {
    pub fn new(dimension: Dimension, axis: Axis) -> Self {
        Self { dimension, axis }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.dimension.prefix(), self.axis.name())
    }
}

/// The only validation failure: a required field was left blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Missing required field {field}")]
pub struct MissingField {
    pub field: FieldId,
}

/// Set of fields currently flagged invalid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    flagged: BTreeSet<FieldId>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags a field as invalid
    pub fn flag(&mut self, field: FieldId) {
        self.flagged.insert(field);
    }

    /// Clears one flag, returning whether it was set
    pub fn clear_field(&mut self, field: FieldId) -> bool {
        self.flagged.remove(&field)
    }

    /// Clears every flag
    pub fn clear(&mut self) {
        self.flagged.clear();
    }

    pub fn is_flagged(&self, field: FieldId) -> bool {
        self.flagged.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flagged.len()
    }

    /// Merges the failures of one validation run
    pub fn extend(&mut self, missing: &[MissingField]) {
        for failure in missing {
            self.flag(failure.field);
        }
    }
}

/// Checks that every axis of `coords` holds non-whitespace text
///
/// # Returns
/// Ok(()) when all three fields are present, otherwise every blank field
pub fn validate_presence(dimension: Dimension, coords: &Coordinates) -> Result<(), Vec<MissingField>> {
    let missing: Vec<MissingField> = Axis::ALL
        .iter()
        .filter(|axis| coords.get(**axis).trim().is_empty())
        .map(|axis| MissingField {
            field: FieldId::new(dimension, *axis),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}
