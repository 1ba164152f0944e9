//! Drawing seam between the renderer and a concrete panel.

/// Fixed drawing palette.
///
/// `Black` is the background; erasing means drawing in `Black`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Blue,
    Cyan,
    Yellow,
}

impl Color {
    /// Background color of every screen.
    pub const BACKGROUND: Color = Color::Black;
}

/// A pixel position. Signed so off-panel geometry stays representable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` pixels from `self` in direction `degrees`.
    ///
    /// Angles follow screen coordinates: 0 is east and angles grow
    /// clockwise because y grows downwards. The result is rounded to the
    /// nearest pixel.
    #[must_use]
    pub fn polar(self, degrees: f32, radius: f32) -> Self {
        let rad = degrees.to_radians();
        Self {
            x: libm::roundf(self.x as f32 + libm::cosf(rad) * radius) as i32,
            y: libm::roundf(self.y as f32 + libm::sinf(rad) * radius) as i32,
        }
    }
}

/// Axis-aligned rectangle given by two inclusive corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            top_left: Point::new(x0, y0),
            bottom_right: Point::new(x1, y1),
        }
    }

    /// Width in pixels, counting both edges.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        (self.bottom_right.x - self.top_left.x + 1).unsigned_abs()
    }

    /// Height in pixels, counting both edges.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        (self.bottom_right.y - self.top_left.y + 1).unsigned_abs()
    }
}

/// Primitive draw operations of a pixel display.
///
/// The renderer only ever talks to the panel through this trait, so it can
/// be driven against a recording double on host or an
/// `embedded-graphics` draw target on the device. Text is positioned by
/// its bottom-left corner.
pub trait DisplaySurface {
    /// Error reported by the underlying panel.
    type Error;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error>;

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error>;

    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), Self::Error>;

    fn draw_circle(&mut self, center: Point, radius: u32, color: Color)
        -> Result<(), Self::Error>;

    fn draw_pixel(&mut self, at: Point, color: Color) -> Result<(), Self::Error>;

    /// Draw a line from `from` to `to` with an arrow head at `to`.
    ///
    /// Drawing the same arrow again in the background color must erase it.
    fn draw_arrow(
        &mut self,
        from: Point,
        to: Point,
        width: u32,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_string(&mut self, at: Point, text: &str, color: Color) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_cardinal_directions() {
        let c = Point::new(160, 132);
        assert_eq!(c.polar(0.0, 75.0), Point::new(235, 132));
        assert_eq!(c.polar(90.0, 75.0), Point::new(160, 207));
        assert_eq!(c.polar(180.0, 75.0), Point::new(85, 132));
        assert_eq!(c.polar(270.0, 75.0), Point::new(160, 57));
    }

    #[test]
    fn test_rect_dimensions_are_inclusive() {
        let r = Rect::new(0, 24, 319, 239);
        assert_eq!(r.width(), 320);
        assert_eq!(r.height(), 216);
    }
}
