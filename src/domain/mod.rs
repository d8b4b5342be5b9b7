//! Domain logic and core data structures
//!
//! Pure conversion arithmetic and validation rules, independent of how the
//! form is presented.

pub mod conversion;
pub mod core;
pub mod validation;
