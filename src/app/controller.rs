//! Form controller and conversion scheduling
//!
//! The controller owns the shared form state, feeds user actions through the
//! state machine and runs the delayed conversion on a one-shot timer thread.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};

use crate::app::state::{Effect, FormEvent, FormState, PendingConversion, StateMachine};
use crate::config::ConverterSettings;
use crate::domain::core::Axis;
use crate::domain::validation::MissingField;

/// Errors that can occur during controller operations
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Form state lock was poisoned by a panicking thread")]
    StatePoisoned,
    #[error("Failed to start conversion timer: {0}")]
    TimerSpawn(#[from] std::io::Error),
    #[error("Submit produced an unexpected effect: {0}")]
    UnexpectedEffect(String),
}

/// What happened to a convert action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank fields were flagged; nothing was computed
    Rejected(Vec<MissingField>),
    /// A conversion is already in flight
    Busy,
    /// The conversion will complete after the configured delay
    Scheduled { ticket: u64 },
}

type CompletionCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Main form controller
///
/// State is shared with the timer thread, so every access goes through the
/// mutex. At most one timer exists at a time because the state machine
/// refuses a second submit while converting.
pub struct FormController {
    state: Arc<Mutex<FormState>>,
    settings: ConverterSettings,
    on_finished: Option<CompletionCallback>,
    timer: Option<JoinHandle<()>>,
}

impl FormController {
    /// Creates a controller with an empty form
    pub fn new(settings: ConverterSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            settings,
            on_finished: None,
            timer: None,
        }
    }

    /// Registers a callback invoked with the ticket once a conversion lands
    ///
    /// The callback runs on the timer thread.
    pub fn on_conversion_finished<F>(&mut self, callback: F)
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.on_finished = Some(Arc::new(callback));
    }

    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    /// Gets a copy of the current form state
    pub fn get_state(&self) -> Result<FormState, ControllerError> {
        Ok(self.lock_state()?.clone())
    }

    /// Processes an event through the state machine
    ///
    /// # Returns
    /// The side effect requested by the transition
    pub fn process_event(&self, event: FormEvent) -> Result<Effect, ControllerError> {
        let mut guard = self.lock_state()?;
        let current = guard.clone();
        let (next, effect) = StateMachine::process_event(current, event);
        *guard = next;
        Ok(effect)
    }

    /// Flips the conversion direction
    pub fn toggle_direction(&self) -> Result<(), ControllerError> {
        self.process_event(FormEvent::ToggleDirection)?;
        Ok(())
    }

    /// Replaces the text of a field in the active coordinate set
    pub fn edit_field(&self, axis: Axis, value: impl Into<String>) -> Result<(), ControllerError> {
        self.process_event(FormEvent::EditField {
            axis,
            value: value.into(),
        })?;
        Ok(())
    }

    /// Empties a field in the active coordinate set
    pub fn clear_field(&self, axis: Axis) -> Result<(), ControllerError> {
        self.edit_field(axis, String::new())
    }

    /// Handles the convert action
    ///
    /// Validates the active set and, when it passes, starts the timer that
    /// delivers the result after the configured delay.
    pub fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        let effect = self.process_event(FormEvent::Submit)?;
        self.submit_outcome(effect)
    }

    fn submit_outcome(&mut self, effect: Effect) -> Result<SubmitOutcome, ControllerError> {
        match effect {
            Effect::Rejected(missing) => Ok(SubmitOutcome::Rejected(missing)),
            Effect::Busy => Ok(SubmitOutcome::Busy),
            Effect::Schedule(pending) => {
                let ticket = pending.ticket;
                self.schedule(pending)?;
                Ok(SubmitOutcome::Scheduled { ticket })
            }
            other => {
                error!("Submit transition returned {:?}", other);
                Err(ControllerError::UnexpectedEffect(format!("{:?}", other)))
            }
        }
    }

    /// Blocks until the in-flight conversion, if any, has landed
    pub fn wait_for_pending(&mut self) {
        if let Some(handle) = self.timer.take() {
            if handle.join().is_err() {
                error!("Conversion timer thread panicked");
            }
        }
    }

    fn schedule(&mut self, pending: PendingConversion) -> Result<(), ControllerError> {
        // the previous timer already delivered, or submit would have been refused
        if let Some(finished) = self.timer.take() {
            let _ = finished.join();
        }

        let state = Arc::clone(&self.state);
        let callback = self.on_finished.clone();
        let delay = self.settings.delay();
        let rounding = self.settings.rounding;
        debug!("Scheduling conversion {} in {:?}", pending.ticket, delay);

        let spawned = thread::Builder::new()
            .name("conversion-timer".to_string())
            .spawn(move || {
                thread::sleep(delay);
                let outcome = pending.run(rounding);
                let ticket = outcome.ticket;

                match state.lock() {
                    Ok(mut guard) => {
                        let current = guard.clone();
                        let (next, _) =
                            StateMachine::process_event(current, FormEvent::ConversionFinished(outcome));
                        *guard = next;
                    }
                    Err(_) => {
                        error!("Form state poisoned; dropping conversion {}", ticket);
                        return;
                    }
                }

                if let Some(callback) = callback {
                    callback(ticket);
                }
            });

        match spawned {
            Ok(handle) => {
                self.timer = Some(handle);
                Ok(())
            }
            Err(err) => {
                // unblock the form, otherwise the trigger would stay disabled forever
                self.reset_after_failed_spawn()?;
                Err(ControllerError::TimerSpawn(err))
            }
        }
    }

    fn reset_after_failed_spawn(&self) -> Result<(), ControllerError> {
        self.lock_state()?.abandon_pending();
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, FormState>, ControllerError> {
        self.state.lock().map_err(|_| ControllerError::StatePoisoned)
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if self.timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            info!("FormController: conversion still in flight at shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::{Dimension, Direction};
    use crate::domain::validation::FieldId;
    use std::sync::mpsc;
    use std::time::Duration;

    fn settings_with_delay(delay_ms: u64) -> ConverterSettings {
        ConverterSettings {
            delay_ms,
            ..ConverterSettings::default()
        }
    }

    fn fill(controller: &FormController, x: &str, y: &str, z: &str) {
        controller.edit_field(Axis::X, x).unwrap();
        controller.edit_field(Axis::Y, y).unwrap();
        controller.edit_field(Axis::Z, z).unwrap();
    }

    #[test]
    fn controller_starts_idle() {
        let controller = FormController::new(ConverterSettings::default());
        let state = controller.get_state().unwrap();
        assert_eq!(state.direction(), Direction::NetherToOverworld);
        assert!(state.can_submit());
    }

    #[test]
    fn conversion_lands_after_delay() {
        let mut controller = FormController::new(settings_with_delay(0));
        fill(&controller, "10", "64", "-3");

        let outcome = controller.submit().unwrap();
        assert_eq!(outcome, SubmitOutcome::Scheduled { ticket: 0 });

        controller.wait_for_pending();
        let state = controller.get_state().unwrap();
        assert_eq!(state.result(), Some("Nether (10, 64, -3) → Overworld (80, 64, -24)"));
        assert!(state.can_submit());
    }

    #[test]
    fn callback_receives_ticket() {
        let (tx, rx) = mpsc::channel();
        let mut controller = FormController::new(settings_with_delay(0));
        controller.on_conversion_finished(move |ticket| {
            let _ = tx.send(ticket);
        });
        fill(&controller, "1", "2", "3");

        controller.submit().unwrap();
        let ticket = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(ticket, 0);
    }

    #[test]
    fn rejected_submit_starts_no_timer() {
        let mut controller = FormController::new(settings_with_delay(0));
        fill(&controller, "10", "64", "");

        match controller.submit().unwrap() {
            SubmitOutcome::Rejected(missing) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].field, FieldId::new(Dimension::Nether, Axis::Z));
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
        assert!(controller.timer.is_none());
        assert!(!controller.get_state().unwrap().is_loading());
    }

    #[test]
    fn only_one_conversion_in_flight() {
        let mut controller = FormController::new(settings_with_delay(300));
        fill(&controller, "1", "2", "3");

        assert!(matches!(controller.submit().unwrap(), SubmitOutcome::Scheduled { .. }));
        assert_eq!(controller.submit().unwrap(), SubmitOutcome::Busy);
        assert!(controller.get_state().unwrap().is_loading());

        controller.wait_for_pending();
        assert!(controller.get_state().unwrap().can_submit());
        assert_eq!(
            controller.submit().unwrap(),
            SubmitOutcome::Scheduled { ticket: 1 }
        );
        controller.wait_for_pending();
    }

    #[test]
    fn floor_rounding_applies_to_result() {
        let mut controller = FormController::new(ConverterSettings {
            delay_ms: 0,
            rounding: crate::domain::conversion::Rounding::Floor,
            ..ConverterSettings::default()
        });
        controller.toggle_direction().unwrap();
        fill(&controller, "-9", "70", "12");

        controller.submit().unwrap();
        controller.wait_for_pending();
        assert_eq!(
            controller.get_state().unwrap().result(),
            Some("Overworld (-9, 70, 12) → Nether (-2, 70, 1)")
        );
    }

    #[test]
    fn submit_without_effect_is_an_error() {
        let mut controller = FormController::new(settings_with_delay(0));
        assert!(matches!(
            controller.submit_outcome(Effect::None),
            Err(ControllerError::UnexpectedEffect(_))
        ));
        assert_eq!(controller.submit_outcome(Effect::Busy).unwrap(), SubmitOutcome::Busy);
        assert!(controller.timer.is_none());
    }

    #[test]
    fn clear_field_empties_active_set() {
        let controller = FormController::new(ConverterSettings::default());
        controller.edit_field(Axis::Y, "64").unwrap();
        controller.clear_field(Axis::Y).unwrap();
        let state = controller.get_state().unwrap();
        assert_eq!(state.coordinates(Dimension::Nether).y, "");
    }
}
