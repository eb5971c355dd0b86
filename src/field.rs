//! The mote field: a bounded set of drifting points joined by proximity
//! lines and pushed around by the pointer.
//!
//! # Frame order
//!
//! Each [`MoteField::step`] updates every mote independently:
//!
//! 1. pointer repulsion (only while a pointer is present)
//! 2. wall reflection against the velocity about to be applied
//! 3. Euler integration, one unit per frame
//! 4. friction
//!
//! [`MoteField::render`] then clears the surface, fills every mote and
//! strokes the connection lines computed from the updated positions.
//!
//! # Scaling
//!
//! The connection pass checks every unordered pair, so its cost is
//! quadratic in the mote count. At the densities the UI offers (up to 10,
//! i.e. 200 motes) that is under 20,000 checks a frame. Larger densities
//! work but are logged as exceeding that budget.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::mote::Mote;
use crate::surface::Surface;

/// Default user-facing density.
pub const DEFAULT_DENSITY: f32 = 5.0;

/// Motes spawned per unit of density.
pub const MOTES_PER_DENSITY: f32 = 20.0;

/// Pair checks per frame the connection pass is sized for.
pub const PAIR_CHECK_BUDGET: usize = 20_000;

/// Tuning constants for the field.
///
/// The defaults give the standard desktop backdrop. A settings file can
/// override any of them; [`FieldParams::sanitized`] resets values that are
/// non-finite or out of range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Distance within which the pointer repels motes.
    pub pointer_radius: f32,
    /// Displacement of the repulsion target at full force.
    pub pointer_push: f32,
    /// Fraction of the target offset added to velocity per frame.
    pub pointer_easing: f32,
    /// Speed kept on an axis after bouncing off a wall.
    pub bounce_damping: f32,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Distance below which two motes are connected.
    pub link_distance: f32,
    /// Alpha of a connection between coincident motes.
    pub link_alpha: f32,
    /// Stroke width of connections.
    pub link_width: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            pointer_radius: 150.0,
            pointer_push: 10.0,
            pointer_easing: 0.01,
            bounce_damping: 0.8,
            friction: 0.98,
            link_distance: 100.0,
            link_alpha: 0.2,
            link_width: 1.0,
        }
    }
}

impl FieldParams {
    /// Replace every non-finite or out-of-range value with its default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            pointer_radius: tuned("pointer_radius", self.pointer_radius, 0.0..=f32::MAX, d.pointer_radius),
            pointer_push: tuned("pointer_push", self.pointer_push, 0.0..=f32::MAX, d.pointer_push),
            pointer_easing: tuned("pointer_easing", self.pointer_easing, 0.0..=1.0, d.pointer_easing),
            bounce_damping: tuned("bounce_damping", self.bounce_damping, 0.0..=1.0, d.bounce_damping),
            friction: tuned("friction", self.friction, 0.0..=1.0, d.friction),
            link_distance: tuned("link_distance", self.link_distance, 0.0..=f32::MAX, d.link_distance),
            link_alpha: tuned("link_alpha", self.link_alpha, 0.0..=1.0, d.link_alpha),
            link_width: tuned("link_width", self.link_width, 0.0..=f32::MAX, d.link_width),
        }
    }

    /// Number of motes for a density: `floor(density * 20)`.
    ///
    /// Zero, negative and non-finite densities give an empty field.
    pub fn mote_count(&self, density: f32) -> usize {
        if !density.is_finite() || density <= 0.0 {
            return 0;
        }
        (density * MOTES_PER_DENSITY).floor() as usize
    }

    /// Alpha of the line joining two motes `distance` apart, or `None`
    /// when they are too far apart to be connected.
    ///
    /// Strictly decreasing in `distance` over `[0, link_distance)`.
    pub fn link_alpha_at(&self, distance: f32) -> Option<f32> {
        if distance < self.link_distance {
            Some((1.0 - distance / self.link_distance) * self.link_alpha)
        } else {
            None
        }
    }
}

/// `value` if it lies in `range`, otherwise `fallback` with a warning.
/// NaN is never in range.
pub(crate) fn tuned(name: &str, value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if range.contains(&value) {
        value
    } else {
        tracing::warn!(param = name, value, fallback, "tuning value out of range, using default");
        fallback
    }
}

/// A line between two motes, by index into [`MoteField::motes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// The mote set together with the viewport it lives in.
///
/// Owns its motes exclusively. Regeneration builds a complete new set and
/// swaps it in; motes are never migrated across a resize or density change.
#[derive(Debug, Clone)]
pub struct MoteField {
    motes: Vec<Mote>,
    density: f32,
    viewport: Vec2,
    params: FieldParams,
    rng: StdRng,
}

impl MoteField {
    /// Create a field filling a `width` x `height` viewport.
    pub fn new(width: u32, height: u32, density: f32) -> Self {
        Self::with_rng(width, height, density, FieldParams::default(), StdRng::from_entropy())
    }

    /// Create a field whose spawns are reproducible from `seed`.
    pub fn seeded(width: u32, height: u32, density: f32, seed: u64) -> Self {
        Self::with_rng(
            width,
            height,
            density,
            FieldParams::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(width: u32, height: u32, density: f32, params: FieldParams, rng: StdRng) -> Self {
        let mut field = Self {
            motes: Vec::new(),
            density,
            viewport: Vec2::new(width as f32, height as f32),
            params,
            rng,
        };
        field.regenerate();
        field
    }

    /// Replace the tuning constants and regenerate.
    ///
    /// Invalid values fall back to their defaults.
    pub fn set_params(&mut self, params: FieldParams) {
        self.params = params.sanitized();
        self.regenerate();
    }

    /// Reseed the spawn generator and regenerate.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.regenerate();
    }

    /// Set the density and respawn the whole set at the new count.
    pub fn set_density(&mut self, density: f32) {
        self.density = density;
        self.regenerate();
    }

    /// Adopt a new viewport size and respawn the whole set.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let count = self.params.mote_count(self.density);
        let viewport = self.viewport;
        let mut fresh = Vec::with_capacity(count);
        for _ in 0..count {
            fresh.push(Mote::spawn(&mut self.rng, viewport));
        }
        self.motes = fresh;

        let pairs = count.saturating_sub(1) * count / 2;
        if pairs > PAIR_CHECK_BUDGET {
            tracing::warn!(
                count,
                pairs,
                budget = PAIR_CHECK_BUDGET,
                "mote count exceeds the connection pass budget; expect slow frames"
            );
        }
        tracing::debug!(
            count,
            density = self.density,
            width = viewport.x,
            height = viewport.y,
            "regenerated motes"
        );
    }

    /// Advance every mote by one frame.
    pub fn step(&mut self, pointer: Option<Vec2>) {
        let params = self.params;
        let viewport = self.viewport;

        for mote in &mut self.motes {
            if let Some(pointer) = pointer {
                mote.repel(pointer, &params);
            }
            mote.reflect(viewport, params.bounce_damping);
            mote.advance(params.friction);
        }
    }

    /// Every unordered pair of motes close enough to be connected.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for (a, first) in self.motes.iter().enumerate() {
            for (offset, second) in self.motes[a + 1..].iter().enumerate() {
                let distance = first.position.distance(second.position);
                if let Some(alpha) = self.params.link_alpha_at(distance) {
                    out.push(Connection {
                        a,
                        b: a + 1 + offset,
                        distance,
                        alpha,
                    });
                }
            }
        }
        out
    }

    /// Draw the current state: clear, motes, then connections.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();

        for mote in &self.motes {
            surface.fill_circle(mote.position, mote.size, mote.color);
        }

        for link in self.connections() {
            surface.stroke_line(
                self.motes[link.a].position,
                self.motes[link.b].position,
                self.params.link_width,
                Rgba::white(link.alpha),
            );
        }
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn len(&self) -> usize {
        self.motes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    #[cfg(test)]
    pub(crate) fn motes_mut(&mut self) -> &mut Vec<Mote> {
        &mut self.motes
    }
}
