//! Panel geometry.
//!
//! All screen positions are derived from the panel size and the font
//! metrics. Absolute label positions come from the reference 320x240
//! panel and are kept as-is.

use crate::display::{Point, Rect};

/// Compass circle radius.
pub const HEADING_RADIUS: u32 = 80;

/// Length of the compass tick marks outside the circle.
pub const TICK_LENGTH: u32 = 10;

/// Speed gauge inner arc radius.
pub const SPEED_RADIUS: u32 = 130;

/// Needle and arrow tips stop this far inside their gauge.
pub const NEEDLE_INSET: u32 = 5;

/// Stroke width passed to `draw_arrow`.
pub const ARROW_WIDTH: u32 = 4;

/// Character columns taken by a General screen label ("groundspeed : ").
pub const LABEL_COLUMNS: i32 = 14;

/// Character columns always erased under the airspeed readout ("20.0 m/Sec").
pub const SPEED_READOUT_COLUMNS: i32 = 10;

/// Geometry of a panel and the font drawn on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub font_width: i32,
    pub font_height: i32,
}

impl Layout {
    /// 320x240 panel with a 12x24 font.
    pub const REFERENCE: Self = Self::new(320, 240, 12, 24);

    #[must_use]
    pub const fn new(width: i32, height: i32, font_width: i32, font_height: i32) -> Self {
        Self {
            width,
            height,
            font_width,
            font_height,
        }
    }

    /// The whole panel.
    #[must_use]
    pub const fn screen_area(&self) -> Rect {
        Rect::new(0, 0, self.width - 1, self.height - 1)
    }

    /// Baseline of the header and sub-title row.
    #[must_use]
    pub const fn header_baseline(&self) -> i32 {
        self.font_height - 1
    }

    /// Where the "PX4 HUD" header starts.
    #[must_use]
    pub const fn header_origin(&self) -> Point {
        Point::new(0, self.header_baseline())
    }

    /// Where the sub-title starts.
    #[must_use]
    pub const fn subtitle_origin(&self) -> Point {
        Point::new(self.width / 2, self.header_baseline())
    }

    /// Region erased before a new sub-title is drawn.
    #[must_use]
    pub const fn subtitle_area(&self) -> Rect {
        Rect::new(self.width / 2, 0, self.width - 1, self.font_height - 1)
    }

    /// Everything below the header row.
    #[must_use]
    pub const fn content_area(&self) -> Rect {
        Rect::new(0, self.font_height, self.width - 1, self.height - 1)
    }

    // --- General screen ---

    /// Baseline of the `row`-th field on the General screen.
    #[must_use]
    pub const fn field_baseline(&self, row: usize) -> i32 {
        self.font_height * 3 - 1 + self.font_height * row as i32
    }

    /// X position where field values start.
    #[must_use]
    pub const fn field_value_x(&self) -> i32 {
        self.font_width * LABEL_COLUMNS - 1
    }

    /// Region holding the value of the `row`-th field.
    #[must_use]
    pub const fn field_value_area(&self, row: usize) -> Rect {
        let baseline = self.field_baseline(row);
        Rect::new(
            self.field_value_x(),
            baseline - self.font_height,
            self.width - 1,
            baseline,
        )
    }

    // --- Heading screen ---

    #[must_use]
    pub const fn heading_center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2 + self.font_height / 2)
    }

    /// Cardinal labels with their fixed origins.
    #[must_use]
    pub const fn cardinal_labels(&self) -> [(&'static str, Point); 4] {
        let x = self.width / 2 - self.font_width / 2;
        let y = self.heading_center().y;
        [
            ("N", Point::new(x, self.font_height * 2 - 1)),
            ("S", Point::new(x, self.height - 1)),
            ("W", Point::new(60, y)),
            ("E", Point::new(250, y)),
        ]
    }

    // --- Speed screen ---

    #[must_use]
    pub const fn speed_center(&self) -> Point {
        Point::new(self.width / 2, self.height - 20)
    }

    /// Scale labels with their fixed origins.
    #[must_use]
    pub const fn speed_scale_labels(&self) -> [(&'static str, Point); 3] {
        [
            ("5", Point::new(40, 110)),
            ("10", Point::new(self.width / 2 - self.font_width, 70)),
            ("15", Point::new(250, 110)),
        ]
    }

    /// Where the airspeed readout text starts.
    #[must_use]
    pub const fn speed_readout_origin(&self) -> Point {
        Point::new(
            self.width / 2 - self.font_width * 5,
            self.speed_center().y - self.font_height,
        )
    }

    /// Region erased before the readout is redrawn, wide enough to cover
    /// a previous readout of `columns` characters.
    #[must_use]
    pub const fn speed_readout_area(&self, columns: i32) -> Rect {
        let columns = if columns > SPEED_READOUT_COLUMNS {
            columns
        } else {
            SPEED_READOUT_COLUMNS
        };
        let origin = self.speed_readout_origin();
        Rect::new(
            origin.x,
            origin.y - self.font_height,
            origin.x + self.font_width * columns,
            origin.y,
        )
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::REFERENCE
    }
}
