//! Application orchestration layer
//!
//! Coordinates input, domain and UI. The main loop is the single consumer of
//! [`LoopEvent`]s posted by the console reader and the conversion timer.

pub mod controller;
pub mod runner;
pub mod state;

pub use controller::{ControllerError, FormController, SubmitOutcome};
pub use runner::{FormRunner, RunnerError};
pub use state::{FormPhase, FormState};

/// Messages delivered to the main loop from background threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// A line typed on the console
    Input(String),
    /// The console reached end of input
    InputClosed,
    /// A delayed conversion landed in the form state
    ConversionFinished { ticket: u64 },
}
