//! Text rendering of the converter form
//!
//! Produces the full form as a string after each interaction. The inactive
//! coordinate set is drawn but marked disabled.

use std::fmt::Write;

use crate::app::state::FormState;
use crate::domain::core::{Axis, Dimension};
use crate::domain::validation::FieldId;

const WIDTH: usize = 52;

/// Renders the whole form
pub fn render_form(state: &FormState) -> String {
    let mut out = String::new();
    let rule = "=".repeat(WIDTH);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", center("⚡ AXIS GATE ⚡"));
    let _ = writeln!(out, "{}", center("Nether ↔ Overworld Coordinate Converter"));
    let _ = writeln!(out, "{}", rule);

    render_toggle(&mut out, state);
    for dimension in [Dimension::Nether, Dimension::Overworld] {
        render_coordinate_set(&mut out, state, dimension);
    }
    render_error_summary(&mut out, state);
    render_button(&mut out, state);
    render_result(&mut out, state);

    out
}

fn render_toggle(out: &mut String, state: &FormState) {
    let direction = state.direction();
    let pole = |dimension: Dimension| {
        if direction.source() == dimension {
            format!("[{}]", dimension.label())
        } else {
            dimension.label().to_string()
        }
    };
    let _ = writeln!(
        out,
        "Conversion direction: {} {} {}",
        pole(Dimension::Nether),
        direction.arrow(),
        pole(Dimension::Overworld)
    );
}

fn render_coordinate_set(out: &mut String, state: &FormState, dimension: Dimension) {
    let editable = state.is_editable(dimension);
    let heading = format!(
        "-- {} Coordinates ({}) ",
        dimension.label(),
        if editable { "editable" } else { "disabled" }
    );
    let fill = WIDTH.saturating_sub(heading.chars().count());
    let _ = writeln!(out, "{}{}", heading, "-".repeat(fill));

    let coords = state.coordinates(dimension);
    for axis in Axis::ALL {
        let value = coords.get(axis);
        let shown = if value.is_empty() { "_" } else { value };
        let flagged = state.errors().is_flagged(FieldId::new(dimension, axis));
        let marker = if flagged { "  ! required" } else { "" };
        let _ = writeln!(out, "  {}: {}{}", axis.name().to_ascii_uppercase(), shown, marker);
    }
}

fn render_error_summary(out: &mut String, state: &FormState) {
    let errors = state.errors();
    if !errors.is_empty() {
        let _ = writeln!(out, "! {} required field(s) missing", errors.len());
    }
}

fn render_button(out: &mut String, state: &FormState) {
    let label = if state.is_loading() {
        "[ ◌ Processing... ] (disabled)"
    } else {
        "[ ⚡ Convert ⚡ ]"
    };
    let _ = writeln!(out, "{}", label);
}

fn render_result(out: &mut String, state: &FormState) {
    if state.is_loading() {
        let _ = writeln!(out, "Conversion Result: {}", "▒".repeat(8));
    } else if let Some(result) = state.result() {
        let _ = writeln!(out, "Conversion Result: {}", result);
    }
}

fn center(text: &str) -> String {
    let pad = WIDTH.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{Effect, FormEvent, StateMachine};
    use crate::domain::conversion::Rounding;

    fn edit(state: FormState, axis: Axis, value: &str) -> FormState {
        StateMachine::process_event(
            state,
            FormEvent::EditField {
                axis,
                value: value.to_string(),
            },
        )
        .0
    }

    #[test]
    fn empty_form_marks_active_set() {
        let text = render_form(&FormState::new());
        assert!(text.contains("Conversion direction: [Nether] → Overworld"));
        assert!(text.contains("-- Nether Coordinates (editable)"));
        assert!(text.contains("-- Overworld Coordinates (disabled)"));
        assert!(text.contains("[ ⚡ Convert ⚡ ]"));
        assert!(!text.contains("Conversion Result"));
    }

    #[test]
    fn flagged_fields_are_marked() {
        let state = edit(FormState::new(), Axis::X, "10");
        let state = edit(state, Axis::Y, "64");
        let (state, _) = StateMachine::process_event(state, FormEvent::Submit);

        let text = render_form(&state);
        assert!(text.contains("  Z: _  ! required"));
        assert!(text.contains("  X: 10\n"));
        assert!(text.contains("! 1 required field(s) missing"));
        assert!(!render_form(&FormState::new()).contains("missing"));
    }

    #[test]
    fn loading_and_result_regions() {
        let state = edit(FormState::new(), Axis::X, "10");
        let state = edit(state, Axis::Y, "64");
        let state = edit(state, Axis::Z, "-3");
        let (state, effect) = StateMachine::process_event(state, FormEvent::Submit);

        let loading = render_form(&state);
        assert!(loading.contains("Processing... ] (disabled)"));
        assert!(loading.contains("Conversion Result: ▒▒▒▒▒▒▒▒"));

        let Effect::Schedule(pending) = effect else {
            panic!("Expected schedule");
        };
        let (state, _) =
            StateMachine::process_event(state, FormEvent::ConversionFinished(pending.run(Rounding::Exact)));
        let done = render_form(&state);
        assert!(done.contains("Conversion Result: Nether (10, 64, -3) → Overworld (80, 64, -24)"));
        assert!(done.contains("[ ⚡ Convert ⚡ ]"));
    }

    #[test]
    fn toggled_form_swaps_poles() {
        let (state, _) = StateMachine::process_event(FormState::new(), FormEvent::ToggleDirection);
        let text = render_form(&state);
        assert!(text.contains("Conversion direction: Nether ← [Overworld]"));
        assert!(text.contains("-- Overworld Coordinates (editable)"));
    }
}
