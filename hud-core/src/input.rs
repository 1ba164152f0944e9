//! Button watcher: turns an active-low push button into screen-select
//! commands.
//!
//! The press/release detection is a small state machine
//! ([`ButtonMachine`]) that is fed one pin sample at a time, so it can be
//! tested without hardware. [`InputWatcher`] wraps it with a pin, a delay
//! and the screen the button selects.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::queue::CommandQueue;
use crate::types::{Command, Screen};

/// State of one push button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Released, waiting for a press.
    #[default]
    Idle,
    /// Low level seen on the last sample.
    Pressed,
    /// Still held down; waiting for the line to go high again.
    WaitingForRelease,
}

/// Edge reported by [`ButtonMachine::sample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// The line went low.
    Pressed,
    /// The line went high again after a press. This completes a click.
    Released,
}

/// Press/release detector for an active-low line.
///
/// A click is only reported on release, which doubles as a simple
/// debounce: however long the button is held, one click is produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonMachine {
    state: ButtonState,
}

impl ButtonMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ButtonState::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ButtonState {
        self.state
    }

    /// Feed one sample. `low` is `true` while the button is held.
    pub fn sample(&mut self, low: bool) -> Option<ButtonEvent> {
        match (self.state, low) {
            (ButtonState::Idle, true) => {
                self.state = ButtonState::Pressed;
                Some(ButtonEvent::Pressed)
            }
            (ButtonState::Idle, false) => None,
            (ButtonState::Pressed | ButtonState::WaitingForRelease, true) => {
                self.state = ButtonState::WaitingForRelease;
                None
            }
            (ButtonState::Pressed | ButtonState::WaitingForRelease, false) => {
                self.state = ButtonState::Idle;
                Some(ButtonEvent::Released)
            }
        }
    }
}

/// Result of one completed click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchOutcome {
    /// The screen-select command is in the queue.
    Queued(Screen),
    /// The queue was full and the command was discarded.
    Dropped(Screen),
}

/// Polls one button and produces `ScreenSelect` commands.
pub struct InputWatcher<P, D> {
    pin: P,
    delay: D,
    screen: Screen,
    machine: ButtonMachine,
    poll_interval_ms: u32,
}

impl<P: InputPin, D: DelayNs> InputWatcher<P, D> {
    /// Create a watcher for the button that selects `screen`.
    #[must_use]
    pub fn new(pin: P, delay: D, screen: Screen, poll_interval_ms: u32) -> Self {
        Self {
            pin,
            delay,
            screen,
            machine: ButtonMachine::new(),
            poll_interval_ms,
        }
    }

    /// Screen selected by this button.
    #[inline]
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Current press state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.machine.state()
    }

    /// Take one sample and advance the state machine.
    ///
    /// A failed pin read counts as released.
    pub fn poll(&mut self) -> Option<ButtonEvent> {
        let low = self.pin.is_low().unwrap_or(false);
        self.machine.sample(low)
    }

    /// Sample every poll interval until a full press and release.
    pub async fn next_click(&mut self) -> Screen {
        loop {
            if self.poll() == Some(ButtonEvent::Released) {
                return self.screen;
            }
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }

    /// Wait for a click and try to queue its screen-select command.
    ///
    /// Never waits on the queue: when it is full the command is dropped.
    pub async fn watch_once<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
    ) -> WatchOutcome {
        let screen = self.next_click().await;
        match queue.enqueue(Command::ScreenSelect(screen)) {
            Ok(()) => WatchOutcome::Queued(screen),
            Err(_) => WatchOutcome::Dropped(screen),
        }
    }
}
