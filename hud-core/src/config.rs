//! Runtime configuration for the HUD tasks.

/// MAVLink ground-station UDP port.
pub const DEFAULT_UDP_PORT: u16 = 14550;

/// MAVLink component id of the primary autopilot (`MAV_COMP_ID_AUTOPILOT1`).
pub const DEFAULT_FLIGHT_CONTROLLER_COMPONENT: u8 = 1;

/// Button sampling interval in milliseconds.
pub const DEFAULT_BUTTON_POLL_INTERVAL_MS: u32 = 10;

/// Airspeed at full needle deflection, in m/s.
pub const DEFAULT_SPEED_SCALE_MAX: f32 = 20.0;

/// Knobs shared by the producer tasks and the renderer.
///
/// The queue depth is not part of this struct because it sizes the channel
/// at compile time; see [`QUEUE_CAPACITY`](crate::QUEUE_CAPACITY).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HudConfig {
    /// UDP port the telemetry receiver listens on.
    pub udp_port: u16,
    /// Only frames from this MAVLink component become telemetry commands.
    pub flight_controller_component: u8,
    /// Interval between button samples.
    pub button_poll_interval_ms: u32,
    /// Airspeed mapped to the end of the speed gauge.
    pub speed_scale_max: f32,
}

impl HudConfig {
    /// Reference configuration.
    pub const DEFAULT: Self = Self {
        udp_port: DEFAULT_UDP_PORT,
        flight_controller_component: DEFAULT_FLIGHT_CONTROLLER_COMPONENT,
        button_poll_interval_ms: DEFAULT_BUTTON_POLL_INTERVAL_MS,
        speed_scale_max: DEFAULT_SPEED_SCALE_MAX,
    };

    /// Same configuration with a different UDP port.
    #[must_use]
    pub const fn with_udp_port(mut self, port: u16) -> Self {
        self.udp_port = port;
        self
    }
}

impl Default for HudConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
