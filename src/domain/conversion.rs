//! Nether/Overworld coordinate conversion
//!
//! Pure functions only. Text is interpreted as numbers here and nowhere else;
//! text that is not a number becomes `NaN` and flows through the arithmetic
//! untouched.

use std::fmt;

use serde::Deserialize;

use crate::domain::core::{Axis, Coordinates, Direction};

/// Horizontal scale between the two dimensions
pub const DIMENSION_RATIO: f64 = 8.0;

/// Post-processing applied to the scaled x/z components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Keep the raw floating point result
    #[default]
    Exact,
    /// Round the scaled axes down to the block they fall in
    Floor,
}

impl Rounding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(Rounding::Exact),
            "floor" => Some(Rounding::Floor),
            _ => None,
        }
    }

    fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Exact => value,
            // floor leaves NaN and infinities as they are
            Rounding::Floor => value.floor(),
        }
    }
}

/// A numeric coordinate triple produced by a conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Interprets each text field of a triple as a number
    pub fn from_coordinates(coords: &Coordinates) -> Self {
        Self {
            x: parse_component(coords.get(Axis::X)),
            y: parse_component(coords.get(Axis::Y)),
            z: parse_component(coords.get(Axis::Z)),
        }
    }

    /// Renders the triple back into form text
    pub fn to_coordinates(&self) -> Coordinates {
        Coordinates::new(
            format_component(self.x),
            format_component(self.y),
            format_component(self.z),
        )
    }

    fn map_horizontal(self, f: impl Fn(f64) -> f64) -> Self {
        let scale = |axis: Axis, value: f64| if axis.is_horizontal() { f(value) } else { value };
        Self {
            x: scale(Axis::X, self.x),
            y: scale(Axis::Y, self.y),
            z: scale(Axis::Z, self.z),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            format_component(self.x),
            format_component(self.y),
            format_component(self.z)
        )
    }
}

/// Converts Nether coordinates to the matching Overworld position
pub fn nether_to_overworld(coords: &Coordinates) -> Position {
    Position::from_coordinates(coords).map_horizontal(|v| v * DIMENSION_RATIO)
}

/// Converts Overworld coordinates to the matching Nether position
pub fn overworld_to_nether(coords: &Coordinates) -> Position {
    Position::from_coordinates(coords).map_horizontal(|v| v / DIMENSION_RATIO)
}

/// Applies the conversion selected by `direction`, then `rounding` on x/z
pub fn convert(direction: Direction, coords: &Coordinates, rounding: Rounding) -> Position {
    let position = match direction {
        Direction::NetherToOverworld => nether_to_overworld(coords),
        Direction::OverworldToNether => overworld_to_nether(coords),
    };
    position.map_horizontal(|v| rounding.apply(v))
}

/// Formats a finished conversion as `Nether (x, y, z) → Overworld (x, y, z)`
///
/// The source triple is shown as entered (trimmed), the target as numbers.
pub fn format_result(direction: Direction, source: &Coordinates, target: &Position) -> String {
    format!(
        "{} ({}, {}, {}) → {} {}",
        direction.source(),
        source.x.trim(),
        source.y.trim(),
        source.z.trim(),
        direction.target(),
        target
    )
}

/// Parses one form field into a number
///
/// Blank text and anything that is not a plain numeric literal give `NaN`.
/// Accepted: signed decimals with optional fraction and exponent, signed
/// `Infinity`, and unsigned `0x`/`0o`/`0b` integer literals.
pub fn parse_component(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return f64::NAN;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed_integer(text) {
        return value;
    }

    let is_decimal_literal = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && text.chars().any(|c| c.is_ascii_digit());
    if !is_decimal_literal {
        return f64::NAN;
    }

    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)?.to_ascii_lowercase().as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }

    // fold in f64 so arbitrarily long literals still produce a value
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * radix as f64 + d as f64),
    )
}

/// Formats one numeric component for display
///
/// Shortest decimal form, `NaN`, `Infinity`/`-Infinity`, and `0` for
/// negative zero. Magnitudes of at least 1e21 or below 1e-6 use exponent
/// form with an explicit sign (`1e+21`, `1e-7`).
pub fn format_component(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let text = format!("{:e}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
            _ => text,
        }
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(x: &str, y: &str, z: &str) -> Coordinates {
        Coordinates::new(x, y, z)
    }

    #[test]
    fn nether_to_overworld_scales_horizontal_axes() {
        let result = nether_to_overworld(&coords("10", "64", "-3"));
        assert_eq!(result, Position::new(80.0, 64.0, -24.0));
    }

    #[test]
    fn overworld_to_nether_divides_horizontal_axes() {
        let result = overworld_to_nether(&coords("80", "64", "-24"));
        assert_eq!(result, Position::new(10.0, 64.0, -3.0));
    }

    #[test]
    fn division_keeps_fractions() {
        let result = overworld_to_nether(&coords("100", "70", "-9"));
        assert_eq!(result.x, 12.5);
        assert_eq!(result.y, 70.0);
        assert_eq!(result.z, -1.125);
    }

    #[test]
    fn round_trip_restores_horizontal_axes() {
        let samples = [
            ("0", "0", "0"),
            ("10", "64", "-3"),
            ("-1234", "-60", "987654"),
            ("2.5", "100.75", "-0.125"),
        ];

        for (x, y, z) in samples {
            let original = coords(x, y, z);
            let there = nether_to_overworld(&original).to_coordinates();
            let back = overworld_to_nether(&there);
            assert_eq!(back, Position::from_coordinates(&original), "round trip of {:?}", original);
        }
    }

    #[test]
    fn vertical_axis_passes_through_both_ways() {
        let input = coords("3", "-17.5", "4");
        assert_eq!(nether_to_overworld(&input).y, -17.5);
        assert_eq!(overworld_to_nether(&input).y, -17.5);
    }

    #[test]
    fn non_numeric_text_becomes_nan() {
        let result = nether_to_overworld(&coords("abc", "64", ""));
        assert!(result.x.is_nan());
        assert_eq!(result.y, 64.0);
        assert!(result.z.is_nan());
    }

    #[test]
    fn floor_rounding_only_touches_scaled_axes() {
        let input = coords("-9", "70.5", "12");
        let exact = convert(Direction::OverworldToNether, &input, Rounding::Exact);
        let floored = convert(Direction::OverworldToNether, &input, Rounding::Floor);

        assert_eq!(exact, Position::new(-1.125, 70.5, 1.5));
        assert_eq!(floored, Position::new(-2.0, 70.5, 1.0));
    }

    #[test]
    fn floor_rounding_keeps_nan() {
        let floored = convert(Direction::NetherToOverworld, &coords("x", "1", "1"), Rounding::Floor);
        assert!(floored.x.is_nan());
        assert_eq!(floored.z, 8.0);
    }

    #[test]
    fn parses_numeric_literals() {
        assert_eq!(parse_component(" 42 "), 42.0);
        assert_eq!(parse_component("-3"), -3.0);
        assert_eq!(parse_component("+4"), 4.0);
        assert_eq!(parse_component(".5"), 0.5);
        assert_eq!(parse_component("5."), 5.0);
        assert_eq!(parse_component("1e3"), 1000.0);
        assert_eq!(parse_component("0x1F"), 31.0);
        assert_eq!(parse_component("0o17"), 15.0);
        assert_eq!(parse_component("0b101"), 5.0);
        assert_eq!(parse_component("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn rejects_non_literals() {
        for text in ["", "   ", "abc", "inf", "nan", "infinity", "1_000", "-0x10", "0x", "0b102", "1e", "."] {
            assert!(parse_component(text).is_nan(), "{:?} should be NaN", text);
        }
    }

    #[test]
    fn formats_components_for_display() {
        assert_eq!(format_component(80.0), "80");
        assert_eq!(format_component(-24.0), "-24");
        assert_eq!(format_component(12.5), "12.5");
        assert_eq!(format_component(-0.0), "0");
        assert_eq!(format_component(f64::NAN), "NaN");
        assert_eq!(format_component(f64::INFINITY), "Infinity");
        assert_eq!(format_component(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_component(1e21), "1e+21");
        assert_eq!(format_component(-1.5e22), "-1.5e+22");
        assert_eq!(format_component(1e-7), "1e-7");
        assert_eq!(format_component(1e20), "100000000000000000000");
        assert_eq!(format_component(0.000001), "0.000001");
        assert_eq!(format_component(parse_component("1.25e21") * DIMENSION_RATIO), "1e+22");
    }

    #[test]
    fn result_string_names_both_dimensions() {
        let source = coords("10", " 64", "-3");
        let target = convert(Direction::NetherToOverworld, &source, Rounding::Exact);
        assert_eq!(
            format_result(Direction::NetherToOverworld, &source, &target),
            "Nether (10, 64, -3) → Overworld (80, 64, -24)"
        );

        let source = coords("80", "64", "-24");
        let target = convert(Direction::OverworldToNether, &source, Rounding::Exact);
        assert_eq!(
            format_result(Direction::OverworldToNether, &source, &target),
            "Overworld (80, 64, -24) → Nether (10, 64, -3)"
        );
    }

    #[test]
    fn rounding_names() {
        assert_eq!(Rounding::from_name("Floor"), Some(Rounding::Floor));
        assert_eq!(Rounding::from_name("exact"), Some(Rounding::Exact));
        assert_eq!(Rounding::from_name("ceil"), None);
    }
}
