//! VFR_HUD to HUD telemetry conversion.
//!
//! VFR_HUD already carries the units the HUD shows, so the mapping is a
//! field-for-field copy. Values are passed through untouched; clamping and
//! wrapping are display concerns handled by the renderer.

use hud_core::Telemetry;

use crate::parser::VfrHud;

/// Convert a decoded VFR_HUD message into a telemetry snapshot.
#[must_use]
pub fn vfr_hud_to_telemetry(hud: &VfrHud) -> Telemetry {
    Telemetry {
        airspeed: hud.airspeed,
        groundspeed: hud.groundspeed,
        alt: hud.alt,
        climb: hud.climb,
        heading: hud.heading,
        throttle: hud.throttle,
    }
}

impl From<VfrHud> for Telemetry {
    fn from(hud: VfrHud) -> Self {
        vfr_hud_to_telemetry(&hud)
    }
}
