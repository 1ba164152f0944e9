//! General screen: six labelled numeric fields.

use core::fmt::Write;

use heapless::String;

use crate::display::{Color, DisplaySurface, Point};
use crate::layout::Layout;
use crate::types::Telemetry;

/// One row of the General screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Airspeed,
    Groundspeed,
    Alt,
    Climb,
    Heading,
    Throttle,
}

impl Field {
    pub const COUNT: usize = 6;

    /// Rows in display order, top to bottom.
    pub const ALL: [Field; Self::COUNT] = [
        Field::Airspeed,
        Field::Groundspeed,
        Field::Alt,
        Field::Climb,
        Field::Heading,
        Field::Throttle,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::Airspeed => "airspeed",
            Field::Groundspeed => "groundspeed",
            Field::Alt => "alt",
            Field::Climb => "climb",
            Field::Heading => "heading",
            Field::Throttle => "throttle",
        }
    }

    /// Label text, padded so the colons line up.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Field::Airspeed => "airspeed    : ",
            Field::Groundspeed => "groundspeed : ",
            Field::Alt => "alt         : ",
            Field::Climb => "climb       : ",
            Field::Heading => "heading     : ",
            Field::Throttle => "throttle    : ",
        }
    }

    #[must_use]
    pub fn value(self, telemetry: &Telemetry) -> FieldValue {
        match self {
            Field::Airspeed => FieldValue::Float(telemetry.airspeed),
            Field::Groundspeed => FieldValue::Float(telemetry.groundspeed),
            Field::Alt => FieldValue::Float(telemetry.alt),
            Field::Climb => FieldValue::Float(telemetry.climb),
            Field::Heading => FieldValue::Signed(telemetry.heading),
            Field::Throttle => FieldValue::Unsigned(telemetry.throttle),
        }
    }
}

/// A value as drawn on the General screen.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    Float(f32),
    Signed(i16),
    Unsigned(u16),
}

impl FieldValue {
    /// Exact equality. Floats compare by bit pattern, so a NaN matches the
    /// same NaN and `-0.0` differs from `0.0`.
    #[must_use]
    pub fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Float(a), FieldValue::Float(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::Signed(a), FieldValue::Signed(b)) => a == b,
            (FieldValue::Unsigned(a), FieldValue::Unsigned(b)) => a == b,
            _ => false,
        }
    }

    /// Floats with six decimals, integers in plain decimal.
    #[must_use]
    pub fn format(&self) -> String<48> {
        let mut text = String::new();
        // 48 bytes fit any f32 with six decimals.
        let _ = match self {
            FieldValue::Float(v) => write!(text, "{v:.6}"),
            FieldValue::Signed(v) => write!(text, "{v}"),
            FieldValue::Unsigned(v) => write!(text, "{v}"),
        };
        text
    }
}

pub(super) fn draw_background<D: DisplaySurface>(
    surface: &mut D,
    layout: &Layout,
) -> Result<(), D::Error> {
    surface.fill_rect(layout.content_area(), Color::BACKGROUND)?;
    for (row, field) in Field::ALL.iter().enumerate() {
        let at = Point::new(0, layout.field_baseline(row));
        surface.draw_string(at, field.label(), Color::Cyan)?;
    }
    Ok(())
}

/// Erase the value area of `row` and draw `value` into it.
pub(super) fn draw_value<D: DisplaySurface>(
    surface: &mut D,
    layout: &Layout,
    row: usize,
    value: &FieldValue,
) -> Result<(), D::Error> {
    surface.fill_rect(layout.field_value_area(row), Color::BACKGROUND)?;
    let at = Point::new(layout.field_value_x(), layout.field_baseline(row));
    surface.draw_string(at, &value.format(), Color::Cyan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_share_colon_column() {
        for field in Field::ALL {
            assert_eq!(field.label().len(), 14);
            assert!(field.label().starts_with(field.name()));
            assert!(field.label().ends_with(": "));
        }
    }

    #[test]
    fn test_format_values() {
        assert_eq!(FieldValue::Float(12.5).format(), "12.500000");
        assert_eq!(FieldValue::Float(-0.25).format(), "-0.250000");
        assert_eq!(FieldValue::Float(f32::NAN).format(), "NaN");
        assert_eq!(FieldValue::Float(f32::MAX).format().len(), 46);
        assert_eq!(FieldValue::Signed(-90).format(), "-90");
        assert_eq!(FieldValue::Unsigned(100).format(), "100");
    }

    #[test]
    fn test_same_as_needs_matching_kind() {
        assert!(FieldValue::Signed(5).same_as(&FieldValue::Signed(5)));
        assert!(!FieldValue::Signed(5).same_as(&FieldValue::Unsigned(5)));
        assert!(!FieldValue::Float(0.0).same_as(&FieldValue::Float(-0.0)));
    }
}
