//! Renderer: the single consumer of the command queue.
//!
//! The renderer owns which screen is active and, per screen, what is
//! already on the panel. It paints a screen's static artwork once per
//! activation and afterwards only touches what a new telemetry command
//! changes:
//!
//! - **General**: a value is redrawn only when it differs bit-for-bit from
//!   the value drawn last time. Each field is tracked on its own.
//! - **Heading / Speed**: the arrow or needle is erased at its previous
//!   tip and redrawn on every telemetry command.
//!
//! Screen selection only swaps the sub-title and invalidates the content;
//! the content itself is painted by the next telemetry command.

mod general;
mod heading;
mod speed;

pub use general::{Field, FieldValue};
pub use heading::screen_angle;
pub use speed::needle_angle;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::HudConfig;
use crate::display::{Color, DisplaySurface, Point};
use crate::layout::Layout;
use crate::queue::CommandQueue;
use crate::types::{Command, Screen, Telemetry};

/// Header text painted once at startup.
pub const HEADER: &str = "PX4 HUD";

/// What the General screen has on the panel.
#[derive(Clone, Copy, Debug, Default)]
struct GeneralState {
    drawn_static: bool,
    /// Last value drawn per field; `None` until drawn.
    last: [Option<FieldValue>; Field::COUNT],
}

/// What a gauge screen has on the panel.
#[derive(Clone, Copy, Debug, Default)]
struct GaugeState {
    drawn_static: bool,
    /// Tip of the arrow or needle currently on the panel.
    last_endpoint: Option<Point>,
}

/// Screen state machine driving a [`DisplaySurface`].
pub struct Renderer<D> {
    surface: D,
    layout: Layout,
    speed_scale_max: f32,
    screen: Screen,
    general: GeneralState,
    heading: GaugeState,
    speed: GaugeState,
    /// Width in characters of the airspeed readout on screen.
    speed_readout_columns: i32,
}

impl<D: DisplaySurface> Renderer<D> {
    /// Clear the panel, paint the header and start on the General screen.
    ///
    /// The General content is painted by the first telemetry command.
    pub fn init(mut surface: D, layout: Layout, config: &HudConfig) -> Result<Self, D::Error> {
        surface.fill_rect(layout.screen_area(), Color::BACKGROUND)?;
        surface.draw_string(layout.header_origin(), HEADER, Color::Yellow)?;
        surface.draw_string(layout.subtitle_origin(), Screen::General.title(), Color::Yellow)?;

        Ok(Self {
            surface,
            layout,
            speed_scale_max: config.speed_scale_max,
            screen: Screen::General,
            general: GeneralState::default(),
            heading: GaugeState::default(),
            speed: GaugeState::default(),
            speed_readout_columns: 0,
        })
    }

    /// The active screen.
    #[inline]
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Whether `screen`'s static artwork is currently on the panel.
    #[must_use]
    pub fn is_background_drawn(&self, screen: Screen) -> bool {
        match screen {
            Screen::General => self.general.drawn_static,
            Screen::Heading => self.heading.drawn_static,
            Screen::Speed => self.speed.drawn_static,
        }
    }

    /// Get a reference to the display surface.
    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// Get a mutable reference to the display surface.
    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Apply one command.
    pub fn handle(&mut self, command: Command) -> Result<(), D::Error> {
        match command {
            Command::ScreenSelect(screen) => self.select_screen(screen).map(|_| ()),
            Command::Telemetry(telemetry) => self.render_telemetry(&telemetry),
        }
    }

    /// Switch to `screen`.
    ///
    /// Returns `false` without drawing anything when `screen` is already
    /// active.
    pub fn select_screen(&mut self, screen: Screen) -> Result<bool, D::Error> {
        if screen == self.screen {
            return Ok(false);
        }

        self.surface
            .fill_rect(self.layout.subtitle_area(), Color::BACKGROUND)?;
        self.surface
            .draw_string(self.layout.subtitle_origin(), screen.title(), Color::Yellow)?;

        // Only the active screen may count as drawn.
        self.invalidate(self.screen);
        self.invalidate(screen);
        self.screen = screen;
        Ok(true)
    }

    /// Draw `telemetry` on the active screen.
    pub fn render_telemetry(&mut self, telemetry: &Telemetry) -> Result<(), D::Error> {
        match self.screen {
            Screen::General => self.render_general(telemetry),
            Screen::Heading => self.render_heading(telemetry),
            Screen::Speed => self.render_speed(telemetry),
        }
    }

    /// Wait for the next command and apply it.
    ///
    /// Returns the command for logging; draw errors are returned instead.
    pub async fn process_one<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
    ) -> Result<Command, D::Error> {
        let command = queue.dequeue().await;
        self.handle(command)?;
        Ok(command)
    }

    /// Consume commands forever, handing each outcome to `report`.
    ///
    /// A failed draw does not stop the loop.
    pub async fn run<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
        mut report: impl FnMut(Result<Command, D::Error>),
    ) -> ! {
        loop {
            report(self.process_one(queue).await);
        }
    }

    fn invalidate(&mut self, screen: Screen) {
        match screen {
            Screen::General => self.general.drawn_static = false,
            Screen::Heading => self.heading.drawn_static = false,
            Screen::Speed => self.speed.drawn_static = false,
        }
    }

    fn render_general(&mut self, telemetry: &Telemetry) -> Result<(), D::Error> {
        if !self.general.drawn_static {
            general::draw_background(&mut self.surface, &self.layout)?;
            // The values under the labels were just wiped.
            self.general.last = [None; Field::COUNT];
            self.general.drawn_static = true;
        }

        for (row, field) in Field::ALL.iter().enumerate() {
            let value = field.value(telemetry);
            let unchanged = self.general.last[row].is_some_and(|last| last.same_as(&value));
            if unchanged {
                continue;
            }
            general::draw_value(&mut self.surface, &self.layout, row, &value)?;
            self.general.last[row] = Some(value);
        }
        Ok(())
    }

    fn render_heading(&mut self, telemetry: &Telemetry) -> Result<(), D::Error> {
        let center = self.layout.heading_center();
        if !self.heading.drawn_static {
            heading::draw_background(&mut self.surface, &self.layout)?;
            self.heading.drawn_static = true;
        } else if let Some(tip) = self.heading.last_endpoint {
            heading::draw_arrow(&mut self.surface, center, tip, Color::BACKGROUND)?;
        }

        let tip = heading::arrow_tip(center, telemetry.heading);
        heading::draw_arrow(&mut self.surface, center, tip, Color::Red)?;
        self.heading.last_endpoint = Some(tip);
        Ok(())
    }

    fn render_speed(&mut self, telemetry: &Telemetry) -> Result<(), D::Error> {
        let center = self.layout.speed_center();
        if !self.speed.drawn_static {
            speed::draw_background(&mut self.surface, &self.layout)?;
            self.speed.drawn_static = true;
            self.speed_readout_columns = 0;
        } else if let Some(tip) = self.speed.last_endpoint {
            speed::draw_needle(&mut self.surface, center, tip, Color::BACKGROUND)?;
        }

        self.speed_readout_columns = speed::draw_readout(
            &mut self.surface,
            &self.layout,
            telemetry.airspeed,
            self.speed_readout_columns,
        )?;

        let tip = speed::needle_tip(center, telemetry.airspeed, self.speed_scale_max);
        speed::draw_needle(&mut self.surface, center, tip, Color::Red)?;
        self.speed.last_endpoint = Some(tip);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::display::Rect;
    use crate::layout::SPEED_READOUT_COLUMNS;
    use core::cell::RefCell;
    use core::future::poll_fn;
    use core::task::Poll;
    use embassy_futures::block_on;
    use embassy_futures::select::select;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::string::{String, ToString};
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    enum DrawOp {
        FillRect(Rect, Color),
        DrawRect(Rect, Color),
        Line(Point, Point, Color),
        Circle(Point, u32, Color),
        Pixel(Point, Color),
        Arrow(Point, Point, u32, Color),
        Text(Point, String, Color),
    }

    /// Surface that logs every primitive call.
    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<DrawOp>,
    }

    impl DisplaySurface for RecordingSurface {
        type Error = core::convert::Infallible;

        fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::FillRect(rect, color));
            Ok(())
        }

        fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::DrawRect(rect, color));
            Ok(())
        }

        fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::Line(from, to, color));
            Ok(())
        }

        fn draw_circle(&mut self, center: Point, radius: u32, color: Color) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::Circle(center, radius, color));
            Ok(())
        }

        fn draw_pixel(&mut self, at: Point, color: Color) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::Pixel(at, color));
            Ok(())
        }

        fn draw_arrow(
            &mut self,
            from: Point,
            to: Point,
            width: u32,
            color: Color,
        ) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::Arrow(from, to, width, color));
            Ok(())
        }

        fn draw_string(&mut self, at: Point, text: &str, color: Color) -> Result<(), Self::Error> {
            self.ops.push(DrawOp::Text(at, text.to_string(), color));
            Ok(())
        }
    }

    const LAYOUT: Layout = Layout::REFERENCE;

    fn renderer() -> Renderer<RecordingSurface> {
        let mut r = Renderer::init(RecordingSurface::default(), LAYOUT, &HudConfig::DEFAULT).unwrap();
        r.surface_mut().ops.clear();
        r
    }

    fn ops(r: &mut Renderer<RecordingSurface>) -> Vec<DrawOp> {
        core::mem::take(&mut r.surface_mut().ops)
    }

    fn sample() -> Telemetry {
        Telemetry {
            airspeed: 12.0,
            groundspeed: 11.5,
            alt: 120.25,
            climb: -0.5,
            heading: 45,
            throttle: 50,
        }
    }

    fn count(ops: &[DrawOp], pred: impl Fn(&DrawOp) -> bool) -> usize {
        ops.iter().filter(|op| pred(op)).count()
    }

    fn is_subtitle(op: &DrawOp) -> bool {
        matches!(op, DrawOp::Text(at, _, _) if *at == LAYOUT.subtitle_origin())
    }

    fn is_content_clear(op: &DrawOp) -> bool {
        *op == DrawOp::FillRect(LAYOUT.content_area(), Color::Black)
    }

    fn value_redraws(ops: &[DrawOp]) -> Vec<usize> {
        (0..Field::COUNT)
            .filter(|row| ops.contains(&DrawOp::FillRect(LAYOUT.field_value_area(*row), Color::Black)))
            .collect()
    }

    fn arrows(ops: &[DrawOp]) -> Vec<(Point, Color)> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Arrow(_, to, _, color) => Some((*to, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_init_paints_header_and_general_title() {
        let r = Renderer::init(RecordingSurface::default(), LAYOUT, &HudConfig::DEFAULT).unwrap();
        let ops = &r.surface().ops;
        assert_eq!(ops[0], DrawOp::FillRect(LAYOUT.screen_area(), Color::Black));
        assert!(ops.contains(&DrawOp::Text(LAYOUT.header_origin(), "PX4 HUD".into(), Color::Yellow)));
        assert!(ops.contains(&DrawOp::Text(
            LAYOUT.subtitle_origin(),
            "General Info".into(),
            Color::Yellow
        )));
        assert_eq!(r.screen(), Screen::General);
        assert!(!r.is_background_drawn(Screen::General));
    }

    #[test]
    fn test_reselecting_current_screen_is_noop() {
        let mut r = renderer();
        r.handle(Command::ScreenSelect(Screen::Heading)).unwrap();
        ops(&mut r);

        r.handle(Command::ScreenSelect(Screen::General)).unwrap();
        let first = ops(&mut r);
        r.handle(Command::ScreenSelect(Screen::General)).unwrap();
        let second = ops(&mut r);

        assert_eq!(count(&first, is_subtitle) + count(&second, is_subtitle), 1);
        assert!(second.is_empty());
        assert_eq!(count(&second, is_content_clear), 0);
    }

    #[test]
    fn test_select_only_swaps_subtitle() {
        let mut r = renderer();
        r.handle(Command::Telemetry(sample())).unwrap();
        ops(&mut r);

        assert!(r.select_screen(Screen::Speed).unwrap());
        let ops = ops(&mut r);
        assert_eq!(
            ops,
            [
                DrawOp::FillRect(LAYOUT.subtitle_area(), Color::Black),
                DrawOp::Text(LAYOUT.subtitle_origin(), "Speed Info".into(), Color::Yellow),
            ]
        );
        assert!(!r.is_background_drawn(Screen::Speed));
        assert!(!r.is_background_drawn(Screen::General));
    }

    #[test]
    fn test_general_first_frame_draws_labels_and_all_values() {
        let mut r = renderer();
        r.handle(Command::Telemetry(sample())).unwrap();
        let ops = ops(&mut r);

        assert_eq!(count(&ops, is_content_clear), 1);
        for field in Field::ALL {
            assert!(ops.iter().any(|op| matches!(op, DrawOp::Text(_, text, Color::Cyan) if text.starts_with(field.name()))));
        }
        assert_eq!(value_redraws(&ops), [0, 1, 2, 3, 4, 5]);
        assert!(ops.contains(&DrawOp::Text(
            Point::new(LAYOUT.field_value_x(), LAYOUT.field_baseline(0)),
            "12.000000".into(),
            Color::Cyan
        )));
        assert!(ops.contains(&DrawOp::Text(
            Point::new(LAYOUT.field_value_x(), LAYOUT.field_baseline(5)),
            "50".into(),
            Color::Cyan
        )));
        assert!(r.is_background_drawn(Screen::General));
    }

    #[test]
    fn test_general_identical_frame_redraws_nothing() {
        let mut r = renderer();
        r.handle(Command::Telemetry(sample())).unwrap();
        ops(&mut r);

        r.handle(Command::Telemetry(sample())).unwrap();
        assert!(ops(&mut r).is_empty());
    }

    #[test]
    fn test_general_redraws_only_changed_field() {
        let mut r = renderer();
        r.handle(Command::Telemetry(sample())).unwrap();
        ops(&mut r);

        let mut next = sample();
        next.throttle = 51;
        r.handle(Command::Telemetry(next)).unwrap();
        let ops = ops(&mut r);

        assert_eq!(value_redraws(&ops), [5]);
        assert_eq!(
            ops,
            [
                DrawOp::FillRect(LAYOUT.field_value_area(5), Color::Black),
                DrawOp::Text(
                    Point::new(LAYOUT.field_value_x(), LAYOUT.field_baseline(5)),
                    "51".into(),
                    Color::Cyan
                ),
            ]
        );
    }

    #[test]
    fn test_general_compares_floats_bitwise() {
        let mut r = renderer();
        let mut t = sample();
        t.climb = 0.0;
        r.handle(Command::Telemetry(t)).unwrap();
        ops(&mut r);

        // -0.0 == 0.0 numerically but not bit-for-bit.
        t.climb = -0.0;
        r.handle(Command::Telemetry(t)).unwrap();
        assert_eq!(value_redraws(&ops(&mut r)), [3]);

        // NaN != NaN numerically but the same bits suppress the redraw.
        t.alt = f32::NAN;
        r.handle(Command::Telemetry(t)).unwrap();
        assert_eq!(value_redraws(&ops(&mut r)), [2]);
        r.handle(Command::Telemetry(t)).unwrap();
        assert!(ops(&mut r).is_empty());
    }

    #[test]
    fn test_general_reactivation_redraws_everything() {
        let mut r = renderer();
        r.handle(Command::Telemetry(sample())).unwrap();
        r.handle(Command::ScreenSelect(Screen::Heading)).unwrap();
        r.handle(Command::Telemetry(sample())).unwrap();
        r.handle(Command::ScreenSelect(Screen::General)).unwrap();
        ops(&mut r);

        r.handle(Command::Telemetry(sample())).unwrap();
        let ops = ops(&mut r);
        assert_eq!(count(&ops, is_content_clear), 1);
        assert_eq!(value_redraws(&ops), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_heading_background_then_arrow_updates() {
        let mut r = renderer();
        r.handle(Command::ScreenSelect(Screen::Heading)).unwrap();
        ops(&mut r);

        let mut t = sample();
        t.heading = 0;
        r.handle(Command::Telemetry(t)).unwrap();
        let first = ops(&mut r);
        assert_eq!(count(&first, is_content_clear), 1);
        assert_eq!(count(&first, |op| matches!(op, DrawOp::Circle(_, 80, Color::Cyan))), 1);
        assert_eq!(count(&first, |op| matches!(op, DrawOp::Line(..))), 8);
        let north = LAYOUT.heading_center().polar(270.0, 75.0);
        assert_eq!(arrows(&first), [(north, Color::Red)]);

        t.heading = 90;
        r.handle(Command::Telemetry(t)).unwrap();
        let second = ops(&mut r);
        assert_eq!(count(&second, is_content_clear), 0);
        let east = LAYOUT.heading_center().polar(0.0, 75.0);
        assert_eq!(arrows(&second), [(north, Color::Black), (east, Color::Red)]);
    }

    #[test]
    fn test_heading_redraws_arrow_even_when_unchanged() {
        let mut r = renderer();
        r.handle(Command::ScreenSelect(Screen::Heading)).unwrap();
        r.handle(Command::Telemetry(sample())).unwrap();
        ops(&mut r);

        r.handle(Command::Telemetry(sample())).unwrap();
        let ops = ops(&mut r);
        assert_eq!(ops.len(), 2);
        assert_eq!(arrows(&ops)[1].1, Color::Red);
    }

    #[test]
    fn test_speed_needle_clamps_but_readout_does_not() {
        let mut r = renderer();
        r.handle(Command::ScreenSelect(Screen::Speed)).unwrap();
        let mut t = sample();
        t.airspeed = 25.0;
        r.handle(Command::Telemetry(t)).unwrap();
        let fast = ops(&mut r);

        t.airspeed = 20.0;
        r.handle(Command::Telemetry(t)).unwrap();
        let max = ops(&mut r);

        let fast_tip = arrows(&fast).last().copied().unwrap();
        let max_tip = arrows(&max).last().copied().unwrap();
        assert_eq!(fast_tip, max_tip);

        let readout = |ops: &[DrawOp]| {
            ops.iter()
                .find_map(|op| match op {
                    DrawOp::Text(at, text, _) if *at == LAYOUT.speed_readout_origin() => Some(text.clone()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(readout(&fast), "25.0 m/Sec");
        assert_eq!(readout(&max), "20.0 m/Sec");
    }

    #[test]
    fn test_speed_background_painted_once_per_activation() {
        let mut r = renderer();
        r.handle(Command::ScreenSelect(Screen::Speed)).unwrap();
        r.handle(Command::Telemetry(sample())).unwrap();
        let first = ops(&mut r);
        assert_eq!(count(&first, is_content_clear), 1);
        // Two rings of one pixel per degree from 180 to 360 inclusive.
        assert_eq!(count(&first, |op| matches!(op, DrawOp::Pixel(..))), 2 * 181);
        assert!(first.iter().any(|op| matches!(op, DrawOp::Line(_, _, Color::Green))));
        assert!(first.iter().any(|op| matches!(op, DrawOp::Line(_, _, Color::Yellow))));

        r.handle(Command::Telemetry(sample())).unwrap();
        let second = ops(&mut r);
        assert_eq!(count(&second, is_content_clear), 0);
        assert!(second.contains(&DrawOp::FillRect(
            LAYOUT.speed_readout_area(SPEED_READOUT_COLUMNS),
            Color::Black
        )));
        assert_eq!(arrows(&second).len(), 2);
    }

    #[test]
    fn test_process_one_applies_queued_commands_in_order() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        queue.enqueue(Command::ScreenSelect(Screen::Speed)).unwrap();
        queue.enqueue(Command::Telemetry(sample())).unwrap();

        let mut r = renderer();
        assert_eq!(
            block_on(r.process_one(&queue)).unwrap(),
            Command::ScreenSelect(Screen::Speed)
        );
        assert_eq!(r.screen(), Screen::Speed);
        block_on(r.process_one(&queue)).unwrap();
        assert!(r.is_background_drawn(Screen::Speed));
    }

    #[test]
    fn test_run_reports_each_command_and_keeps_going() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        queue.enqueue(Command::ScreenSelect(Screen::Heading)).unwrap();
        queue.enqueue(Command::Telemetry(sample())).unwrap();

        let mut r = renderer();
        let seen = RefCell::new(Vec::new());
        let drained = poll_fn(|_| {
            if seen.borrow().len() == 2 {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        });
        block_on(select(
            r.run(&queue, |result| seen.borrow_mut().push(result.unwrap())),
            drained,
        ));

        assert_eq!(
            seen.into_inner(),
            [
                Command::ScreenSelect(Screen::Heading),
                Command::Telemetry(sample())
            ]
        );
        assert_eq!(r.screen(), Screen::Heading);
        assert!(r.is_background_drawn(Screen::Heading));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_speed_readout_erase_covers_previous_wide_text() {
        let mut r = renderer();
        r.handle(Command::ScreenSelect(Screen::Speed)).unwrap();
        let mut t = sample();
        t.airspeed = 1234.5;
        r.handle(Command::Telemetry(t)).unwrap();
        let wide = ops(&mut r);
        assert!(wide.contains(&DrawOp::Text(
            LAYOUT.speed_readout_origin(),
            "1234.5 m/Sec".into(),
            Color::Cyan
        )));

        t.airspeed = 5.0;
        r.handle(Command::Telemetry(t)).unwrap();
        let narrow = ops(&mut r);
        let erase = LAYOUT.speed_readout_area(12);
        let usual = LAYOUT.speed_readout_area(SPEED_READOUT_COLUMNS);
        assert_eq!(erase.width() - usual.width(), 2 * LAYOUT.font_width as u32);
        assert!(narrow.contains(&DrawOp::FillRect(erase, Color::Black)));

        r.handle(Command::Telemetry(t)).unwrap();
        let again = ops(&mut r);
        assert!(again.contains(&DrawOp::FillRect(
            LAYOUT.speed_readout_area(SPEED_READOUT_COLUMNS),
            Color::Black
        )));
    }
}
