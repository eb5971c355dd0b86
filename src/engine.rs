//! The backdrop engine and its control surface.
//!
//! [`Engine`] owns everything the animated background needs: the drawable
//! surface, the mote field, the comet, the pointer, the frame chain and the
//! clock. Hosts drive it through a handful of calls:
//!
//! ```
//! use motefield::{DrawList, Engine, Vec2};
//!
//! let mut engine = Engine::new(Some(DrawList::new(800, 600)), 5.0);
//! let frame = engine.start().unwrap();
//!
//! // every animation frame:
//! engine.set_pointer(Some(Vec2::new(400.0, 300.0)));
//! assert!(engine.frame(frame));
//!
//! engine.stop();
//! assert!(!engine.frame(frame));
//! ```
//!
//! An engine built without a surface is inert: every call is a no-op and
//! `start` returns `None`. The backdrop is decoration, so a missing surface
//! must never take the host down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::comet::{Comet, CometParams};
use crate::config::Settings;
use crate::field::{FieldParams, MoteField};
use crate::schedule::{FrameHandle, FrameLoop};
use crate::surface::Surface;
use crate::time::FrameClock;

/// Which backdrop is drawn. The two are never active together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropMode {
    /// Drifting motes with proximity lines.
    #[default]
    Field,
    /// A single comet following the pointer.
    Comet,
}

impl BackdropMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            BackdropMode::Field => BackdropMode::Comet,
            BackdropMode::Comet => BackdropMode::Field,
        }
    }
}

/// An animated backdrop bound to one surface.
///
/// Every mutation takes `&mut self`, so the frame step, `set_density` and
/// `resize` are serialised by ownership. Regeneration swaps in a whole new
/// mote set; a frame never observes a half-built one.
pub struct Engine<S: Surface> {
    surface: Option<S>,
    field: MoteField,
    comet: Comet,
    mode: BackdropMode,
    accent: Rgba,
    pointer: Option<Vec2>,
    frames: FrameLoop,
    clock: FrameClock,
}

impl<S: Surface> Engine<S> {
    /// Bind an engine to `surface` with the given density.
    ///
    /// Pass `None` when no surface is available; the engine is then inert.
    pub fn new(surface: Option<S>, density: f32) -> Self {
        let (width, height) = surface.as_ref().map(|s| s.size()).unwrap_or((0, 0));
        // An inert engine holds no motes.
        let density = if surface.is_some() { density } else { 0.0 };
        if surface.is_none() {
            tracing::debug!("no surface available, backdrop engine is inert");
        }

        let mut clock = FrameClock::new();
        clock.pause();

        Self {
            surface,
            field: MoteField::new(width, height, density),
            comet: Comet::new(width, height),
            mode: BackdropMode::default(),
            accent: Rgba::ACCENT,
            pointer: None,
            frames: FrameLoop::new(),
            clock,
        }
    }

    /// Build an engine from persisted settings.
    ///
    /// Applies density, theme, accent and tuning. Does not start it; the
    /// host decides based on `settings.animated_bg`.
    pub fn from_settings(surface: Option<S>, settings: &Settings) -> Self {
        Self::new(surface, settings.particle_density)
            .with_field_params(settings.field)
            .with_comet_params(settings.comet)
            .with_mode(settings.theme)
            .with_accent(settings.accent())
    }

    /// Replace the field tuning. Regenerates the motes.
    pub fn with_field_params(mut self, params: FieldParams) -> Self {
        self.field.set_params(params);
        self
    }

    pub fn with_comet_params(mut self, params: CometParams) -> Self {
        let (width, height) = self.size();
        self.comet = Comet::with_params(width, height, params);
        self
    }

    /// Make mote spawning reproducible. Regenerates the motes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.field.reseed(seed);
        self
    }

    pub fn with_mode(mut self, mode: BackdropMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_accent(mut self, accent: Rgba) -> Self {
        self.accent = accent;
        self
    }

    // ========== Lifecycle ==========

    /// Start the frame chain.
    ///
    /// Idempotent: while running, returns the live handle instead of
    /// starting a second chain. Returns `None` for an inert engine.
    pub fn start(&mut self) -> Option<FrameHandle> {
        self.surface.as_ref()?;

        if let Some(handle) = self.frames.live() {
            return Some(handle);
        }
        let handle = self.frames.start();
        self.clock.resume();
        tracing::debug!(run = handle.id(), mode = ?self.mode, "backdrop started");
        Some(handle)
    }

    /// Run one frame of the live chain.
    ///
    /// Returns `false` without doing anything when `handle` is stale (the
    /// engine was stopped or restarted since it was issued).
    pub fn frame(&mut self, handle: FrameHandle) -> bool {
        if !self.frames.accepts(handle) {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        self.clock.tick();
        match self.mode {
            BackdropMode::Field => {
                self.field.step(self.pointer);
                self.field.render(surface);
            }
            BackdropMode::Comet => {
                self.comet.step(self.pointer);
                self.comet.render(surface, self.accent);
            }
        }
        true
    }

    /// Cancel the frame chain and clear the surface.
    ///
    /// Idempotent: returns `false` if the engine was not running.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.frames.cancel() else {
            return false;
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.clock.pause();
        tracing::debug!(run = handle.id(), frames = self.clock.frame(), "backdrop stopped");
        true
    }

    /// Stop and hand back the surface.
    pub fn dispose(mut self) -> Option<S> {
        self.stop();
        self.surface.take()
    }

    // ========== Controls ==========

    /// Set the density and regenerate the motes at `floor(density * 20)`.
    pub fn set_density(&mut self, density: f32) {
        if self.surface.is_none() {
            return;
        }
        self.field.set_density(density);
    }

    /// Match a new surface size. Regenerates the motes and recenters the
    /// comet.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(width, height);
        self.field.resize(width, height);
        self.comet.resize(width, height);
    }

    /// Record the pointer position, or `None` once it leaves the viewport.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        if self.surface.is_none() {
            return;
        }
        self.pointer = pointer;
    }

    /// Switch backdrops. Clears the surface so no frame of the previous
    /// mode lingers; the comet starts with an empty trail.
    pub fn set_mode(&mut self, mode: BackdropMode) {
        if self.surface.is_none() || self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == BackdropMode::Comet {
            self.comet.clear_trail();
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        tracing::debug!(?mode, "backdrop mode changed");
    }

    pub fn set_accent(&mut self, accent: Rgba) {
        if self.surface.is_none() {
            return;
        }
        self.accent = accent;
    }

    // ========== Queries ==========

    /// True when constructed without a surface.
    pub fn is_inert(&self) -> bool {
        self.surface.is_none()
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Number of live frame chains: 0 or 1.
    pub fn live_chains(&self) -> usize {
        self.frames.chains()
    }

    pub fn mode(&self) -> BackdropMode {
        self.mode
    }

    pub fn density(&self) -> f32 {
        self.field.density()
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn accent(&self) -> Rgba {
        self.accent
    }

    /// Surface size, `(0, 0)` when inert.
    pub fn size(&self) -> (u32, u32) {
        self.surface.as_ref().map(|s| s.size()).unwrap_or((0, 0))
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn field(&self) -> &MoteField {
        &self.field
    }

    pub fn comet(&self) -> &Comet {
        &self.comet
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;

    fn engine() -> Engine<DrawList> {
        Engine::new(Some(DrawList::new(800, 600)), 5.0).with_seed(11)
    }

    #[test]
    fn test_inert_engine_ignores_everything() {
        let mut engine: Engine<DrawList> = Engine::new(None, 5.0);
        assert!(engine.is_inert());
        assert!(engine.start().is_none());
        assert!(!engine.stop());

        engine.set_density(3.0);
        engine.resize(100, 100);
        engine.set_pointer(Some(Vec2::ONE));
        engine.set_mode(BackdropMode::Comet);

        assert_eq!(engine.size(), (0, 0));
        assert!(engine.field().is_empty());
        assert!(engine.pointer().is_none());
        assert_eq!(engine.mode(), BackdropMode::Field);
        assert!(engine.dispose().is_none());
    }

    #[test]
    fn test_inert_engine_spawns_nothing() {
        let engine: Engine<DrawList> = Engine::new(None, 10.0).with_seed(3);
        assert!(engine.field().is_empty());
        assert_eq!(engine.field().density(), 0.0);
    }

    #[test]
    fn test_frame_draws_field() {
        let mut engine = engine();
        let handle = engine.start().unwrap();
        assert!(engine.frame(handle));

        let surface = engine.surface().unwrap();
        assert_eq!(surface.circles().count(), 100);
        assert_eq!(engine.clock().frame(), 1);
    }

    #[test]
    fn test_stop_clears_and_rejects_frames() {
        let mut engine = engine();
        let handle = engine.start().unwrap();
        engine.frame(handle);

        assert!(engine.stop());
        assert!(engine.surface().unwrap().is_blank());
        assert!(!engine.frame(handle));
        assert!(!engine.stop());
    }

    #[test]
    fn test_mode_switch_clears_surface() {
        let mut engine = engine();
        let handle = engine.start().unwrap();
        engine.frame(handle);

        engine.set_mode(BackdropMode::Comet);
        assert!(engine.surface().unwrap().is_blank());

        engine.frame(handle);
        assert_eq!(engine.comet().trail().len(), 1);
        assert_eq!(engine.field().len(), 100);
    }

    #[test]
    fn test_resize_propagates() {
        let mut engine = engine();
        engine.resize(320, 200);
        assert_eq!(engine.size(), (320, 200));
        assert_eq!(engine.field().viewport(), Vec2::new(320.0, 200.0));
        assert_eq!(engine.comet().head(), Vec2::new(160.0, 100.0));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            particle_density: 2.0,
            theme: BackdropMode::Comet,
            accent_color: "#ff9f0a".into(),
            ..Settings::default()
        };
        let engine = Engine::from_settings(Some(DrawList::new(640, 480)), &settings);

        assert_eq!(engine.field().len(), 40);
        assert_eq!(engine.mode(), BackdropMode::Comet);
        assert_eq!(engine.accent().to_rgba8(), [255, 159, 10, 255]);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_toggled_mode() {
        assert_eq!(BackdropMode::Field.toggled(), BackdropMode::Comet);
        assert_eq!(BackdropMode::Comet.toggled(), BackdropMode::Field);
    }
}
