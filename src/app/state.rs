//! Form state management
//!
//! Defines the converter form's state machine and its transitions. All data
//! the form shows lives in [`FormState`]; nothing is kept globally.

use log::{debug, info, warn};

use crate::domain::conversion::{self, Rounding};
use crate::domain::core::{Axis, Coordinates, Dimension, Direction};
use crate::domain::validation::{validate_presence, FieldId, MissingField, ValidationErrors};

/// Lifecycle phase of the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Waiting for input, nothing to show
    #[default]
    Idle,
    /// Checking the active coordinate set before converting
    Validating,
    /// A conversion is in flight; the submit control is disabled
    Converting(PendingConversion),
    /// The last conversion's result is on display
    ShowingResult,
}

/// A conversion captured at submit time, waiting for its delay to elapse
///
/// The coordinates are a snapshot, so edits made while the conversion is in
/// flight do not change its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConversion {
    pub ticket: u64,
    pub direction: Direction,
    pub source: Coordinates,
}

/// Result of running a pending conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub ticket: u64,
    pub summary: String,
}

impl PendingConversion {
    /// Runs the arithmetic and formats the result line
    pub fn run(&self, rounding: Rounding) -> ConversionOutcome {
        let target = conversion::convert(self.direction, &self.source, rounding);
        ConversionOutcome {
            ticket: self.ticket,
            summary: conversion::format_result(self.direction, &self.source, &target),
        }
    }
}

/// Complete state of the converter form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    direction: Direction,
    nether: Coordinates,
    overworld: Coordinates,
    errors: ValidationErrors,
    result: Option<String>,
    phase: FormPhase,
    next_ticket: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The formatted result of the last finished conversion, if any
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Coordinates entered for a dimension
    pub fn coordinates(&self, dimension: Dimension) -> &Coordinates {
        match dimension {
            Dimension::Nether => &self.nether,
            Dimension::Overworld => &self.overworld,
        }
    }

    /// The editable coordinate set, chosen by the active direction
    pub fn active_coordinates(&self) -> &Coordinates {
        self.coordinates(self.direction.source())
    }

    fn active_coordinates_mut(&mut self) -> &mut Coordinates {
        match self.direction.source() {
            Dimension::Nether => &mut self.nether,
            Dimension::Overworld => &mut self.overworld,
        }
    }

    /// Whether a dimension's fields accept input right now
    pub fn is_editable(&self, dimension: Dimension) -> bool {
        self.direction.source() == dimension
    }

    /// Whether a conversion is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FormPhase::Converting(_))
    }

    /// Whether the submit control can be activated
    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    /// Drops an in-flight conversion that can no longer complete
    pub(crate) fn abandon_pending(&mut self) {
        if self.is_loading() {
            self.phase = self.settled_phase();
        }
    }

    fn settled_phase(&self) -> FormPhase {
        if self.result.is_some() {
            FormPhase::ShowingResult
        } else {
            FormPhase::Idle
        }
    }
}

/// User actions and deferred completions fed into the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The direction toggle was flipped
    ToggleDirection,
    /// A field of the active coordinate set changed
    EditField { axis: Axis, value: String },
    /// The convert control was activated
    Submit,
    /// The delay of a pending conversion elapsed
    ConversionFinished(ConversionOutcome),
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing further to do
    None,
    /// Validation failed; the listed fields were flagged
    Rejected(Vec<MissingField>),
    /// Submit ignored because a conversion is already in flight
    Busy,
    /// Validation passed; run this conversion after the configured delay
    Schedule(PendingConversion),
}

/// State machine for form transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes an event and returns the new state with its side effect
    ///
    /// # Arguments
    /// * `current` - Current form state
    /// * `event` - Event to process
    pub fn process_event(mut current: FormState, event: FormEvent) -> (FormState, Effect) {
        match event {
            FormEvent::ToggleDirection => {
                current.direction = current.direction.toggled();
                current.result = None;
                current.errors.clear();
                // an in-flight conversion cannot be cancelled and keeps the trigger disabled
                if !current.is_loading() {
                    current.phase = FormPhase::Idle;
                }
                info!("Direction toggled to {}", current.direction);
                (current, Effect::None)
            }

            FormEvent::EditField { axis, value } => {
                let field = FieldId::new(current.direction.source(), axis);
                current.active_coordinates_mut().set(axis, value);
                if current.errors.clear_field(field) {
                    debug!("Cleared validation flag on {}", field);
                }
                (current, Effect::None)
            }

            FormEvent::Submit => {
                if current.is_loading() {
                    debug!("Submit ignored: conversion already in flight");
                    return (current, Effect::Busy);
                }

                current.errors.clear();
                current.phase = FormPhase::Validating;
                let source_dimension = current.direction.source();

                if let Err(missing) = validate_presence(source_dimension, current.active_coordinates()) {
                    current.errors.extend(&missing);
                    current.phase = current.settled_phase();
                    info!("Validation failed for {} field(s)", missing.len());
                    return (current, Effect::Rejected(missing));
                }

                let pending = PendingConversion {
                    ticket: current.next_ticket,
                    direction: current.direction,
                    source: current.active_coordinates().clone(),
                };
                current.next_ticket += 1;
                current.phase = FormPhase::Converting(pending.clone());
                info!("Converting {} coordinates (ticket {})", source_dimension, pending.ticket);
                (current, Effect::Schedule(pending))
            }

            FormEvent::ConversionFinished(outcome) => {
                let expected = match &current.phase {
                    FormPhase::Converting(pending) => pending.ticket == outcome.ticket,
                    _ => false,
                };
                if !expected {
                    warn!("Dropping result for unknown conversion ticket {}", outcome.ticket);
                    return (current, Effect::None);
                }

                info!("Conversion {} finished: {}", outcome.ticket, outcome.summary);
                current.result = Some(outcome.summary);
                current.phase = FormPhase::ShowingResult;
                (current, Effect::None)
            }
        }
    }
}
