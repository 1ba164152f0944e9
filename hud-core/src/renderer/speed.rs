//! Speed screen: half-circle airspeed gauge with a needle and a numeric
//! readout.
//!
//! The gauge spans screen angles 180 (left, zero) to 360 (right, full
//! scale). The upper quarter is split into a green and a yellow zone.

use core::fmt::Write;

use heapless::String;

use crate::display::{Color, DisplaySurface, Point};
use crate::layout::{Layout, ARROW_WIDTH, NEEDLE_INSET, SPEED_RADIUS, TICK_LENGTH};

const GREEN_ZONE: core::ops::RangeInclusive<i32> = 270..=315;
const YELLOW_ZONE: core::ops::RangeInclusive<i32> = 315..=360;

/// Screen angle of the needle for `airspeed`.
///
/// The airspeed is clamped to `0..=scale_max` first; NaN reads as zero.
#[must_use]
pub fn needle_angle(airspeed: f32, scale_max: f32) -> f32 {
    if !(scale_max > 0.0) || airspeed.is_nan() {
        return 180.0;
    }
    let clamped = airspeed.clamp(0.0, scale_max);
    180.0 + clamped * 180.0 / scale_max
}

pub(super) fn needle_tip(center: Point, airspeed: f32, scale_max: f32) -> Point {
    center.polar(
        needle_angle(airspeed, scale_max),
        (SPEED_RADIUS - NEEDLE_INSET) as f32,
    )
}

pub(super) fn draw_needle<D: DisplaySurface>(
    surface: &mut D,
    center: Point,
    tip: Point,
    color: Color,
) -> Result<(), D::Error> {
    surface.draw_arrow(center, tip, ARROW_WIDTH, color)
}

/// Erase the previous readout (`previous_columns` wide) and print the
/// unclamped airspeed. Returns the width of the new readout in characters.
pub(super) fn draw_readout<D: DisplaySurface>(
    surface: &mut D,
    layout: &Layout,
    airspeed: f32,
    previous_columns: i32,
) -> Result<i32, D::Error> {
    surface.fill_rect(layout.speed_readout_area(previous_columns), Color::BACKGROUND)?;

    let mut text: String<56> = String::new();
    let _ = write!(text, "{airspeed:4.1} m/Sec");
    surface.draw_string(layout.speed_readout_origin(), &text, Color::Cyan)?;
    Ok(text.len() as i32)
}

pub(super) fn draw_background<D: DisplaySurface>(
    surface: &mut D,
    layout: &Layout,
) -> Result<(), D::Error> {
    let center = layout.speed_center();
    let content = layout.content_area();
    surface.fill_rect(content, Color::BACKGROUND)?;
    surface.draw_rect(content, Color::Cyan)?;

    let inner = SPEED_RADIUS as f32;
    let outer = (SPEED_RADIUS + TICK_LENGTH) as f32;
    for degrees in 180..=360 {
        let angle = degrees as f32;
        surface.draw_pixel(center.polar(angle, inner), Color::Cyan)?;
        surface.draw_pixel(center.polar(angle, outer), Color::Cyan)?;
    }
    for degrees in (180..=360).step_by(45) {
        let angle = degrees as f32;
        surface.draw_line(center.polar(angle, inner), center.polar(angle, outer), Color::Cyan)?;
    }

    for (zone, color) in [(GREEN_ZONE, Color::Green), (YELLOW_ZONE, Color::Yellow)] {
        for degrees in zone {
            let angle = degrees as f32;
            surface.draw_line(center.polar(angle, inner), center.polar(angle, outer), color)?;
        }
    }

    for (label, at) in layout.speed_scale_labels() {
        surface.draw_string(at, label, Color::Cyan)?;
    }
    Ok(())
}
