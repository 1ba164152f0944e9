//! Command model: Screen, Telemetry, Command.

/// One of the three operator-selectable screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Numeric panel with all six telemetry fields.
    General,
    /// Compass gauge with a heading arrow.
    Heading,
    /// Half-circle airspeed gauge with a needle.
    Speed,
}

impl Screen {
    /// All screens, in button order (left, middle, right).
    pub const ALL: [Screen; 3] = [Screen::General, Screen::Heading, Screen::Speed];

    /// Sub-title shown next to the header while this screen is active.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Screen::General => "General Info",
            Screen::Heading => "Heading Info",
            Screen::Speed => "Speed Info",
        }
    }
}

/// Flight vitals carried by one telemetry command.
///
/// Field units follow the MAVLink `VFR_HUD` message.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Indicated airspeed in m/s.
    pub airspeed: f32,
    /// Ground speed in m/s.
    pub groundspeed: f32,
    /// Altitude (MSL) in meters.
    pub alt: f32,
    /// Climb rate in m/s.
    pub climb: f32,
    /// Compass heading in degrees (0..360, 0 = north).
    pub heading: i16,
    /// Throttle setting in percent (0 to 100).
    pub throttle: u16,
}

/// A command travelling from a producer task to the renderer.
///
/// Commands are immutable and passed by value through the queue.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Make the given screen the active one.
    ScreenSelect(Screen),
    /// New telemetry to show on the active screen.
    Telemetry(Telemetry),
}

impl From<Telemetry> for Command {
    fn from(telemetry: Telemetry) -> Self {
        Command::Telemetry(telemetry)
    }
}
