//! Heading screen: compass ring with a red arrow.

use crate::display::{Color, DisplaySurface, Point};
use crate::layout::{Layout, ARROW_WIDTH, HEADING_RADIUS, NEEDLE_INSET, TICK_LENGTH};

/// Convert a compass heading to a screen angle.
///
/// Compass 0 (north) points up, which is 270 in screen angles. Headings
/// outside `0..360` are wrapped first.
#[must_use]
pub fn screen_angle(heading: i16) -> i32 {
    let heading = i32::from(heading).rem_euclid(360);
    if heading < 90 {
        heading + 270
    } else {
        heading - 90
    }
}

pub(super) fn arrow_tip(center: Point, heading: i16) -> Point {
    center.polar(
        screen_angle(heading) as f32,
        (HEADING_RADIUS - NEEDLE_INSET) as f32,
    )
}

pub(super) fn draw_arrow<D: DisplaySurface>(
    surface: &mut D,
    center: Point,
    tip: Point,
    color: Color,
) -> Result<(), D::Error> {
    surface.draw_arrow(center, tip, ARROW_WIDTH, color)
}

pub(super) fn draw_background<D: DisplaySurface>(
    surface: &mut D,
    layout: &Layout,
) -> Result<(), D::Error> {
    let center = layout.heading_center();
    let content = layout.content_area();
    surface.fill_rect(content, Color::BACKGROUND)?;
    surface.draw_rect(content, Color::Cyan)?;
    surface.draw_circle(center, HEADING_RADIUS, Color::Cyan)?;

    // Ticks every 30 degrees; the cardinal points carry labels instead.
    let inner = HEADING_RADIUS as f32;
    let outer = (HEADING_RADIUS + TICK_LENGTH) as f32;
    for degrees in (0..360).step_by(30).filter(|d| d % 90 != 0) {
        let angle = degrees as f32;
        surface.draw_line(center.polar(angle, inner), center.polar(angle, outer), Color::Cyan)?;
    }

    for (label, at) in layout.cardinal_labels() {
        surface.draw_string(at, label, Color::Cyan)?;
    }
    Ok(())
}
