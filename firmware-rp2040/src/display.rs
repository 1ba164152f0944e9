//! `DisplaySurface` on top of an `embedded-graphics` draw target.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, Point as GfxPoint, Primitive, RgbColor, Size};
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::{Drawable, Pixel};
use hud_core::{Color, DisplaySurface, Layout, Point, Rect};

/// Font used for every string on the HUD.
pub const FONT: &MonoFont<'static> = &FONT_10X20;

/// Length of each arrow head stroke.
const ARROW_HEAD_LENGTH: f32 = 10.0;

/// Angle between the shaft and each head stroke, in radians (30 degrees).
const ARROW_HEAD_ANGLE: f32 = core::f32::consts::PI / 6.0;

/// Geometry of a `width` x `height` panel drawn with [`FONT`].
#[must_use]
pub fn panel_layout(width: u32, height: u32) -> Layout {
    Layout::new(
        width as i32,
        height as i32,
        FONT.character_size.width as i32,
        FONT.character_size.height as i32,
    )
}

/// Map the HUD palette to RGB565.
#[must_use]
pub fn rgb565(color: Color) -> Rgb565 {
    match color {
        Color::Black => Rgb565::BLACK,
        Color::White => Rgb565::WHITE,
        Color::Red => Rgb565::RED,
        Color::Green => Rgb565::GREEN,
        Color::Blue => Rgb565::BLUE,
        Color::Cyan => Rgb565::CYAN,
        Color::Yellow => Rgb565::YELLOW,
    }
}

fn gfx(point: Point) -> GfxPoint {
    GfxPoint::new(point.x, point.y)
}

/// Adapts any RGB565 draw target to the renderer.
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    fn line(&mut self, from: Point, to: Point, width: u32, color: Color) -> Result<(), D::Error> {
        Line::new(gfx(from), gfx(to))
            .into_styled(PrimitiveStyle::with_stroke(rgb565(color), width))
            .draw(&mut self.target)
    }
}

impl<D> DisplaySurface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = D::Error;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error> {
        let area = Rectangle::new(gfx(rect.top_left), Size::new(rect.width(), rect.height()));
        self.target.fill_solid(&area, rgb565(color))
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error> {
        Rectangle::new(gfx(rect.top_left), Size::new(rect.width(), rect.height()))
            .into_styled(PrimitiveStyle::with_stroke(rgb565(color), 1))
            .draw(&mut self.target)
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), Self::Error> {
        self.line(from, to, 1, color)
    }

    fn draw_circle(&mut self, center: Point, radius: u32, color: Color) -> Result<(), Self::Error> {
        Circle::with_center(gfx(center), radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_stroke(rgb565(color), 1))
            .draw(&mut self.target)
    }

    fn draw_pixel(&mut self, at: Point, color: Color) -> Result<(), Self::Error> {
        Pixel(gfx(at), rgb565(color)).draw(&mut self.target)
    }

    fn draw_arrow(
        &mut self,
        from: Point,
        to: Point,
        width: u32,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.line(from, to, width, color)?;

        // Head strokes point back along the shaft from the tip.
        let dx = (from.x - to.x) as f32;
        let dy = (from.y - to.y) as f32;
        let back = libm::atan2f(dy, dx);
        for side in [-ARROW_HEAD_ANGLE, ARROW_HEAD_ANGLE] {
            let angle = back + side;
            let end = Point::new(
                libm::roundf(to.x as f32 + libm::cosf(angle) * ARROW_HEAD_LENGTH) as i32,
                libm::roundf(to.y as f32 + libm::sinf(angle) * ARROW_HEAD_LENGTH) as i32,
            );
            self.line(to, end, width / 2 + 1, color)?;
        }
        Ok(())
    }

    fn draw_string(&mut self, at: Point, text: &str, color: Color) -> Result<(), Self::Error> {
        let style = MonoTextStyle::new(FONT, rgb565(color));
        Text::with_baseline(text, gfx(at), style, Baseline::Bottom)
            .draw(&mut self.target)
            .map(|_| ())
    }
}
