//! Main event loop for the terminal form
//!
//! Consumes [`LoopEvent`]s, dispatches typed commands to the controller and
//! redraws the form whenever state changes.

use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Receiver;

use log::{debug, info, warn};

use crate::app::controller::{ControllerError, FormController, SubmitOutcome};
use crate::app::LoopEvent;
use crate::input::{Command, CommandError};
use crate::ui::renderer::{FormLayout, FormRenderer};
use crate::ui::terminal::render_form;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error("Failed to write to output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives the form from loop events until quit or end of input
pub struct FormRunner<W: Write> {
    controller: FormController,
    renderer: FormRenderer,
    events: Receiver<LoopEvent>,
    out: W,
}

impl<W: Write> FormRunner<W> {
    pub fn new(controller: FormController, renderer: FormRenderer, events: Receiver<LoopEvent>, out: W) -> Self {
        Self {
            controller,
            renderer,
            events,
            out,
        }
    }

    /// Runs the loop; returns when the user quits or input ends
    pub fn run(&mut self) -> Result<(), RunnerError> {
        self.show()?;

        while let Ok(event) = self.events.recv() {
            match event {
                LoopEvent::Input(line) => {
                    if self.handle_line(&line)? == Flow::Quit {
                        info!("Quit requested");
                        break;
                    }
                }
                LoopEvent::ConversionFinished { ticket } => {
                    debug!("Conversion {} delivered to main loop", ticket);
                    self.show()?;
                }
                LoopEvent::InputClosed => {
                    self.finish_pending()?;
                    break;
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    /// Hands back the output sink
    pub fn into_output(self) -> W {
        self.out
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, RunnerError> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(CommandError::Empty) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{}", err)?;
                return Ok(Flow::Continue);
            }
        };
        debug!("Command: {:?}", command);

        match command {
            Command::Toggle => {
                self.controller.toggle_direction()?;
                self.show()?;
            }
            Command::Set { axis, value } => {
                self.controller.edit_field(axis, value)?;
                self.show()?;
            }
            Command::Clear(axis) => {
                self.controller.clear_field(axis)?;
                self.show()?;
            }
            Command::Convert => self.convert()?,
            Command::Show => self.show()?,
            Command::Snapshot(path) => self.snapshot(&path)?,
            Command::Help => writeln!(self.out, "{}", Command::HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn convert(&mut self) -> Result<(), RunnerError> {
        match self.controller.submit()? {
            SubmitOutcome::Rejected(missing) => {
                self.show()?;
                for field in missing {
                    writeln!(self.out, "{}", field)?;
                }
            }
            SubmitOutcome::Busy => writeln!(self.out, "Conversion already in progress")?,
            SubmitOutcome::Scheduled { .. } => self.show()?,
        }
        Ok(())
    }

    fn snapshot(&mut self, path: &Path) -> Result<(), RunnerError> {
        let state = self.controller.get_state()?;
        let settings = self.controller.settings();
        let layout = FormLayout::from_state(&state, settings.snapshot_width, settings.snapshot_height);

        match self.renderer.save_snapshot(&layout, path) {
            Ok(()) => writeln!(self.out, "Snapshot saved to {}", path.display())?,
            Err(err) => {
                warn!("Snapshot failed: {}", err);
                writeln!(self.out, "Snapshot failed: {}", err)?;
            }
        }
        Ok(())
    }

    /// Lets an in-flight conversion land before leaving
    fn finish_pending(&mut self) -> Result<(), RunnerError> {
        self.controller.wait_for_pending();
        if self.controller.get_state()?.result().is_some() {
            self.show()?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<(), RunnerError> {
        let state = self.controller.get_state()?;
        write!(self.out, "{}", render_form(&state))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterSettings;
    use std::sync::mpsc;

    fn run_script(lines: &[&str], delay_ms: u64) -> String {
        let (tx, rx) = mpsc::channel();
        for line in lines {
            tx.send(LoopEvent::Input(line.to_string())).unwrap();
        }
        tx.send(LoopEvent::InputClosed).unwrap();

        let controller = FormController::new(ConverterSettings {
            delay_ms,
            ..ConverterSettings::default()
        });
        let mut runner = FormRunner::new(controller, FormRenderer::new(), rx, Vec::new());
        runner.run().unwrap();
        String::from_utf8(runner.into_output()).unwrap()
    }

    #[test]
    fn converts_and_waits_at_end_of_input() {
        let out = run_script(&["set x 10", "set y 64", "set z -3", "convert"], 50);
        assert!(out.contains("Processing..."));
        assert!(out.contains("Conversion Result: Nether (10, 64, -3) → Overworld (80, 64, -24)"));
    }

    #[test]
    fn reports_missing_fields() {
        let out = run_script(&["set x 10", "set y 64", "convert"], 0);
        assert!(out.contains("Missing required field nether-z"));
        assert!(out.contains("  Z: _  ! required"));
        assert!(!out.contains("Conversion Result"));
    }

    #[test]
    fn second_convert_is_refused_while_busy() {
        let out = run_script(&["set x 1", "set y 2", "set z 3", "convert", "convert"], 300);
        assert!(out.contains("Conversion already in progress"));
        assert!(out.contains("Overworld (8, 2, 24)"));
    }

    #[test]
    fn quit_stops_processing() {
        let out = run_script(&["quit", "toggle"], 0);
        assert!(!out.contains("[Overworld]"));
    }

    #[test]
    fn bad_commands_are_reported() {
        let out = run_script(&["fly", "", "set w 3"], 0);
        assert!(out.contains("Unknown command 'fly'"));
        assert!(out.contains("Unknown axis 'w'"));
    }

    #[test]
    fn toggle_then_convert_overworld() {
        let out = run_script(&["toggle", "set x 80", "set y 64", "set z -24", "convert"], 0);
        assert!(out.contains("Overworld (80, 64, -24) → Nether (10, 64, -3)"));
    }

    #[test]
    fn snapshot_reports_location() {
        let path = std::env::temp_dir().join(format!("axis-gate-runner-{}.png", std::process::id()));
        let line = format!("snapshot {}", path.display());
        let out = run_script(&[line.as_str()], 0);
        assert!(out.contains("Snapshot saved to"));
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
