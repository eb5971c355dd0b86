//! The comet: a single glowing head that eases toward the pointer and
//! leaves a fading trail.
//!
//! An alternate backdrop to the mote field. The two never run at once; the
//! [`Engine`](crate::Engine) selects one through
//! [`BackdropMode`](crate::BackdropMode).

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::field::tuned;
use crate::surface::Surface;

/// Longest trail the comet keeps.
pub const MAX_TRAIL_LENGTH: usize = 40;

/// Tuning constants for the comet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CometParams {
    /// Fraction of the remaining distance to the pointer covered per frame.
    pub easing: f32,
    /// Maximum number of past positions kept, at most [`MAX_TRAIL_LENGTH`].
    pub trail_length: usize,
    /// Radius of the head disc.
    pub head_radius: f32,
    /// Outer radius of the glow around the head.
    pub glow_radius: f32,
    /// Alpha of the newest trail point.
    pub trail_alpha: f32,
}

impl Default for CometParams {
    fn default() -> Self {
        Self {
            easing: 0.07,
            trail_length: MAX_TRAIL_LENGTH,
            head_radius: 6.0,
            glow_radius: 18.0,
            trail_alpha: 0.6,
        }
    }
}

impl CometParams {
    /// Clamp the trail into `1..=MAX_TRAIL_LENGTH` and replace every
    /// non-finite or out-of-range value with its default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let trail_length = self.trail_length.clamp(1, MAX_TRAIL_LENGTH);
        if trail_length != self.trail_length {
            tracing::warn!(
                value = self.trail_length,
                clamped = trail_length,
                "comet trail length out of range"
            );
        }
        Self {
            easing: tuned("easing", self.easing, 0.0..=1.0, d.easing),
            trail_length,
            head_radius: tuned("head_radius", self.head_radius, 0.0..=f32::MAX, d.head_radius),
            glow_radius: tuned("glow_radius", self.glow_radius, 0.0..=f32::MAX, d.glow_radius),
            trail_alpha: tuned("trail_alpha", self.trail_alpha, 0.0..=1.0, d.trail_alpha),
        }
    }
}

/// Number of rings used to fake the glow.
const GLOW_RINGS: usize = 4;

#[derive(Debug, Clone)]
pub struct Comet {
    head: Vec2,
    trail: VecDeque<Vec2>,
    params: CometParams,
}

impl Comet {
    /// Create a comet resting at the center of the viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_params(width, height, CometParams::default())
    }

    /// Create a comet with custom tuning. Invalid values are sanitized.
    pub fn with_params(width: u32, height: u32, params: CometParams) -> Self {
        let params = params.sanitized();
        Self {
            head: center(width, height),
            trail: VecDeque::with_capacity(params.trail_length + 1),
            params,
        }
    }

    /// Recenter on a new viewport and forget the trail.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.head = center(width, height);
        self.trail.clear();
    }

    /// Forget the trail, keeping the head where it is.
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Advance one frame.
    ///
    /// With a pointer the head eases toward it; without one it holds. Either
    /// way the head position joins the trail, evicting the oldest point once
    /// the trail is full.
    pub fn step(&mut self, pointer: Option<Vec2>) {
        if let Some(target) = pointer {
            self.head += (target - self.head) * self.params.easing;
        }

        self.trail.push_back(self.head);
        while self.trail.len() > self.params.trail_length {
            self.trail.pop_front();
        }
    }

    /// Draw the trail and the head tinted with `accent`.
    ///
    /// Trail points fade in and grow with recency; the newest is drawn last.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, accent: Rgba) {
        surface.clear();

        let len = self.trail.len() as f32;
        for (i, point) in self.trail.iter().enumerate() {
            let recency = (i as f32 + 1.0) / len;
            surface.fill_circle(
                *point,
                self.params.head_radius * recency,
                accent.with_alpha(self.params.trail_alpha * recency),
            );
        }

        let ring_step = (self.params.glow_radius - self.params.head_radius) / GLOW_RINGS as f32;
        for ring in (1..=GLOW_RINGS).rev() {
            let radius = self.params.head_radius + ring_step * ring as f32;
            surface.fill_circle(self.head, radius, accent.with_alpha(0.08));
        }
        surface.fill_circle(self.head, self.params.head_radius, Rgba::white(0.95));
    }

    pub fn head(&self) -> Vec2 {
        self.head
    }

    /// Past positions, oldest first.
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    pub fn params(&self) -> &CometParams {
        &self.params
    }
}

fn center(width: u32, height: u32) -> Vec2 {
    Vec2::new(width as f32, height as f32) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;

    #[test]
    fn test_starts_centered() {
        let comet = Comet::new(800, 600);
        assert_eq!(comet.head(), Vec2::new(400.0, 300.0));
        assert!(comet.trail().is_empty());
    }

    #[test]
    fn test_eases_toward_pointer() {
        let mut comet = Comet::new(200, 200);
        comet.step(Some(Vec2::new(200.0, 100.0)));

        // 7% of the 100 units between head and pointer
        assert!((comet.head().x - 107.0).abs() < 1e-4);
        assert_eq!(comet.head().y, 100.0);
    }

    #[test]
    fn test_holds_without_pointer() {
        let mut comet = Comet::new(200, 200);
        comet.step(Some(Vec2::new(0.0, 0.0)));
        let held = comet.head();

        comet.step(None);
        comet.step(None);
        assert_eq!(comet.head(), held);
        assert_eq!(comet.trail().len(), 3);
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut comet = Comet::new(1000, 1000);
        let mut heads = Vec::new();
        for i in 0..41 {
            comet.step(Some(Vec2::new(i as f32 * 10.0, 0.0)));
            heads.push(comet.head());
        }

        assert_eq!(comet.trail().len(), 40);
        assert_eq!(comet.trail()[0], heads[1]);

        comet.step(None);
        assert_eq!(comet.trail().len(), 40);
        assert_eq!(comet.trail()[0], heads[2]);
        assert_eq!(comet.trail()[39], heads[40]);
    }

    #[test]
    fn test_resize_recenters_and_clears() {
        let mut comet = Comet::new(100, 100);
        comet.step(Some(Vec2::ZERO));
        comet.resize(300, 100);
        assert_eq!(comet.head(), Vec2::new(150.0, 50.0));
        assert!(comet.trail().is_empty());
    }

    #[test]
    fn test_render_draws_trail_then_head() {
        let mut comet = Comet::new(100, 100);
        for _ in 0..5 {
            comet.step(Some(Vec2::new(80.0, 80.0)));
        }

        let mut list = DrawList::new(100, 100);
        comet.render(&mut list, Rgba::ACCENT);

        let circles: Vec<_> = list.circles().collect();
        assert_eq!(circles.len(), 5 + GLOW_RINGS + 1);

        // trail grows with recency
        assert!(circles[0].1 < circles[4].1);
        assert!(circles[0].2.a < circles[4].2.a);

        let (center, radius, color) = circles[circles.len() - 1];
        assert_eq!(center, comet.head());
        assert_eq!(radius, 6.0);
        assert!(color.a > 0.9);
    }

    #[test]
    fn test_trail_length_is_clamped() {
        let params = CometParams {
            trail_length: usize::MAX,
            ..CometParams::default()
        };
        let mut comet = Comet::with_params(100, 100, params);
        assert_eq!(comet.params().trail_length, MAX_TRAIL_LENGTH);

        for _ in 0..100 {
            comet.step(Some(Vec2::new(90.0, 10.0)));
        }
        assert_eq!(comet.trail().len(), MAX_TRAIL_LENGTH);

        let zero = CometParams {
            trail_length: 0,
            ..CometParams::default()
        };
        assert_eq!(zero.sanitized().trail_length, 1);
    }

    #[test]
    fn test_sanitized_resets_bad_values() {
        let params = CometParams {
            easing: f32::NAN,
            head_radius: -1.0,
            trail_alpha: 3.0,
            glow_radius: 24.0,
            ..CometParams::default()
        }
        .sanitized();

        let defaults = CometParams::default();
        assert_eq!(params.easing, defaults.easing);
        assert_eq!(params.head_radius, defaults.head_radius);
        assert_eq!(params.trail_alpha, defaults.trail_alpha);
        assert_eq!(params.glow_radius, 24.0);
    }
}
