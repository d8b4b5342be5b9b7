//! Presentation of the converter form
//!
//! `terminal` draws the form as text after every interaction; `renderer`
//! rasterizes the same state into a PNG snapshot.

pub mod renderer;
pub mod terminal;

pub use renderer::{FormLayout, FormRenderer, RendererError};
pub use terminal::render_form;
