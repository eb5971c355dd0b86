//! # motefield
//!
//! An animated desktop backdrop: a field of drifting motes joined by faint
//! proximity lines and pushed aside by the pointer, plus an alternate comet
//! that chases the pointer with a fading trail.
//!
//! The crate draws through a small [`Surface`] trait, so the same engine
//! renders into an in-memory pixel buffer ([`PixelSurface`]), a command
//! recorder ([`DrawList`]), or anything a host implements.
//!
//! ## Quick Start
//!
//! ```
//! use motefield::prelude::*;
//!
//! let mut engine = Engine::new(Some(PixelSurface::new(320, 200)), 5.0);
//! let frame = engine.start().unwrap();
//!
//! // Host animation loop
//! for _ in 0..3 {
//!     engine.set_pointer(Some(Vec2::new(160.0, 100.0)));
//!     engine.frame(frame);
//! }
//!
//! engine.stop();
//! assert!(engine.surface().unwrap().is_clear());
//! ```
//!
//! ## Core Concepts
//!
//! ### Motes
//!
//! A [`Mote`] is a small white disc with its own radius, alpha and
//! velocity. The [`MoteField`] holds `floor(density * 20)` of them and
//! respawns the whole set whenever the density or viewport changes.
//!
//! ### Frames
//!
//! The engine does work only when the host delivers a frame with the
//! [`FrameHandle`] returned by [`Engine::start`]. Stopping cancels the
//! handle; frames carrying a stale handle are ignored.
//!
//! ### Modes
//!
//! [`BackdropMode::Field`] and [`BackdropMode::Comet`] are mutually
//! exclusive. Switching clears the surface.
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Control surface | [`Engine`], [`FrameHandle`], [`BackdropMode`] |
//! | Simulation | [`MoteField`], [`Mote`], [`FieldParams`], [`Comet`], [`CometParams`] |
//! | Drawing | [`Surface`], [`PixelSurface`], [`DrawList`], [`Rgba`] |
//! | Host plumbing | [`Settings`], [`input::Input`], [`time::FrameClock`] |

pub mod color;
pub mod comet;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod input;
mod mote;
pub mod schedule;
pub mod surface;
pub mod time;

pub use color::Rgba;
pub use comet::{Comet, CometParams, MAX_TRAIL_LENGTH};
pub use config::Settings;
pub use engine::{BackdropMode, Engine};
pub use error::{GpuError, HostError, SettingsError, SnapshotError};
pub use field::{Connection, FieldParams, MoteField, DEFAULT_DENSITY, MOTES_PER_DENSITY};
pub use glam::Vec2;
pub use mote::Mote;
pub use schedule::{FrameHandle, FrameLoop};
pub use surface::{DrawCommand, DrawList, PixelSurface, Surface};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use motefield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::Settings;
    pub use crate::engine::{BackdropMode, Engine};
    pub use crate::field::{FieldParams, MoteField};
    pub use crate::schedule::FrameHandle;
    pub use crate::surface::{DrawList, PixelSurface, Surface};
    pub use crate::Vec2;
}
