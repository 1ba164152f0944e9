//! Platform-agnostic command pipeline and renderer for the telemetry HUD.
//!
//! This crate holds everything of the HUD that does not touch a specific
//! chip: the command model, the bounded command queue shared by all
//! producers, the button press state machine, and the render state machine
//! that repaints only what changed. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`types`]: Command model ([`Command`], [`Screen`], [`Telemetry`])
//! - [`queue`]: Bounded drop-on-full queue ([`CommandQueue`])
//! - [`input`]: Button watcher ([`InputWatcher`], [`ButtonMachine`])
//! - [`display`]: Drawing seam ([`DisplaySurface`], [`Color`], [`Point`], [`Rect`])
//! - [`layout`]: Panel geometry ([`Layout`])
//! - [`config`]: Runtime knobs ([`HudConfig`])
//! - [`renderer`]: Screen state machine ([`Renderer`])
//!
//! # Data Flow
//!
//! ```text
//! InputWatcher x3 ──┐
//!                   ├──> CommandQueue ──> Renderer ──> DisplaySurface
//! TelemetryReceiver ┘
//! ```
//!
//! The telemetry receiver lives in the `mavlink-proto` crate, next to the
//! decoder it drives.
//!
//! # Features
//!
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![no_std]

pub mod config;
pub mod display;
pub mod input;
pub mod layout;
pub mod queue;
pub mod renderer;
pub mod types;

// Re-export main types at crate root
pub use config::HudConfig;
pub use display::{Color, DisplaySurface, Point, Rect};
pub use input::{ButtonEvent, ButtonMachine, ButtonState, InputWatcher, WatchOutcome};
pub use layout::Layout;
pub use queue::{CommandQueue, HudQueue, QueueFull, QUEUE_CAPACITY};
pub use renderer::{Field, FieldValue, Renderer};
pub use types::{Command, Screen, Telemetry};
