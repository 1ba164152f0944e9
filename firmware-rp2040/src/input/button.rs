//! Push buttons on GPIO inputs.

use embassy_rp::gpio::{Input, Pin, Pull};
use embassy_rp::Peri;
use embassy_time::Delay;
use hud_core::{HudConfig, InputWatcher, Screen};

/// Watcher for one active-low button wired to ground.
pub type ButtonWatcher = InputWatcher<Input<'static>, Delay>;

/// Configure `pin` with its pull-up and watch it for `screen`.
pub fn button_watcher(
    pin: Peri<'static, impl Pin>,
    screen: Screen,
    config: &HudConfig,
) -> ButtonWatcher {
    InputWatcher::new(
        Input::new(pin, Pull::Up),
        Delay,
        screen,
        config.button_poll_interval_ms,
    )
}
