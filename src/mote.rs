//! A single drifting point in the field.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::color::Rgba;
use crate::field::FieldParams;

/// One animated point-agent.
///
/// Motes are transient: the field throws the whole set away and spawns a
/// fresh one whenever the density or the viewport changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    /// Viewport-relative position of the center.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Radius in `[1, 4)`, smaller only when the viewport cannot fit it.
    pub size: f32,
    /// White with an alpha fixed at creation.
    pub color: Rgba,
}

impl Mote {
    /// Spawn a mote at a random position fully inside `viewport`.
    ///
    /// On an axis too small to hold the mote's diameter the mote shrinks to
    /// fit and starts at rest on that axis.
    pub fn spawn<R: Rng>(rng: &mut R, viewport: Vec2) -> Self {
        let fit = (viewport.min_element() * 0.5).max(0.0);
        let size = rng.gen_range(1.0..4.0_f32).min(fit);

        let span = viewport - Vec2::splat(size * 2.0);
        let mut axis = |span: f32| {
            if span > 0.0 {
                (rng.gen::<f32>() * span + size, rng.gen_range(-0.25..0.25_f32))
            } else {
                (size, 0.0)
            }
        };
        let (x, vx) = axis(span.x);
        let (y, vy) = axis(span.y);

        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            size,
            color: Rgba::white(rng.gen_range(0.3..0.8)),
        }
    }

    /// Nudge the velocity away from a nearby pointer.
    ///
    /// Inside `pointer_radius` the mote eases toward a point displaced away
    /// from the pointer by `force * pointer_push`, where `force` grows
    /// linearly from 0 at the edge of the radius to 1 on top of the pointer.
    pub(crate) fn repel(&mut self, pointer: Vec2, params: &FieldParams) {
        let delta = pointer - self.position;
        let distance = delta.length();
        if distance >= params.pointer_radius {
            return;
        }

        let force = (params.pointer_radius - distance) / params.pointer_radius;
        let away = Vec2::from_angle(delta.y.atan2(delta.x) + PI);
        let target = self.position + away * force * params.pointer_push;
        self.velocity += (target - self.position) * params.pointer_easing;
    }

    /// Reflect velocity on any axis where the next step would carry the
    /// leading edge past a wall of `viewport`.
    ///
    /// A bounce costs `damping` of the speed on that axis. If even the
    /// reflected step would leave the free span (a span narrower than one
    /// step), the axis comes to rest instead.
    pub(crate) fn reflect(&mut self, viewport: Vec2, damping: f32) {
        let lo = self.size;
        let hi = viewport - Vec2::splat(self.size);

        self.velocity.x = reflect_axis(self.position.x, self.velocity.x, lo, hi.x, damping);
        self.velocity.y = reflect_axis(self.position.y, self.velocity.y, lo, hi.y, damping);
    }

    /// Euler step followed by friction.
    pub(crate) fn advance(&mut self, friction: f32) {
        self.position += self.velocity;
        self.velocity *= friction;
    }
}

fn reflect_axis(position: f32, velocity: f32, lo: f32, hi: f32, damping: f32) -> f32 {
    let inside = |v: f32| {
        let next = position + v;
        next >= lo && next <= hi
    };

    if inside(velocity) {
        return velocity;
    }
    let bounced = -velocity * damping;
    if inside(bounced) {
        bounced
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mote_at(position: Vec2, velocity: Vec2) -> Mote {
        Mote {
            position,
            velocity,
            size: 2.0,
            color: Rgba::white(0.5),
        }
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let viewport = Vec2::new(800.0, 600.0);

        for _ in 0..1000 {
            let m = Mote::spawn(&mut rng, viewport);
            assert!(m.size >= 1.0 && m.size < 4.0);
            assert!(m.velocity.x >= -0.25 && m.velocity.x < 0.25);
            assert!(m.velocity.y >= -0.25 && m.velocity.y < 0.25);
            assert!(m.color.a >= 0.3 && m.color.a < 0.8);
            assert!(m.position.x >= m.size && m.position.x <= viewport.x - m.size);
            assert!(m.position.y >= m.size && m.position.y <= viewport.y - m.size);
        }
    }

    #[test]
    fn test_spawn_in_tiny_viewport_shrinks_to_fit() {
        let mut rng = StdRng::seed_from_u64(1);
        let m = Mote::spawn(&mut rng, Vec2::new(3.0, 500.0));
        assert!(m.size <= 1.5);
        assert!(m.position.x >= m.size && m.position.x <= 3.0 - m.size);
    }

    #[test]
    fn test_spawn_in_empty_viewport() {
        let mut rng = StdRng::seed_from_u64(1);
        let m = Mote::spawn(&mut rng, Vec2::ZERO);
        assert_eq!(m.size, 0.0);
        assert_eq!(m.position, Vec2::ZERO);
        assert_eq!(m.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_reflect_bounces_with_damping() {
        let mut m = mote_at(Vec2::new(97.9, 50.0), Vec2::new(0.5, 0.1));
        m.reflect(Vec2::new(100.0, 100.0), 0.8);
        assert!((m.velocity.x + 0.4).abs() < 1e-6);
        assert!((m.velocity.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_leaves_free_motion_alone() {
        let mut m = mote_at(Vec2::new(50.0, 50.0), Vec2::new(0.5, -0.5));
        m.reflect(Vec2::new(100.0, 100.0), 0.8);
        assert_eq!(m.velocity, Vec2::new(0.5, -0.5));
    }

    #[test]
    fn test_reflect_rests_when_span_too_narrow() {
        // Free span is [2, 3]; neither direction of a 5-unit step fits.
        let mut m = mote_at(Vec2::new(2.5, 50.0), Vec2::new(5.0, 0.0));
        m.reflect(Vec2::new(5.0, 100.0), 0.8);
        assert_eq!(m.velocity.x, 0.0);
    }

    #[test]
    fn test_repel_pushes_away_from_pointer() {
        let params = FieldParams::default();
        let mut m = mote_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        m.repel(Vec2::new(150.0, 100.0), &params);

        // force = (150 - 50) / 150, displacement 10 * force, eased by 0.01
        let expected = -(100.0 / 150.0) * 10.0 * 0.01;
        assert!((m.velocity.x - expected).abs() < 1e-5);
        assert!(m.velocity.y.abs() < 1e-5);
    }

    #[test]
    fn test_repel_ignores_distant_pointer() {
        let params = FieldParams::default();
        let mut m = mote_at(Vec2::new(100.0, 100.0), Vec2::new(0.1, 0.1));
        m.repel(Vec2::new(400.0, 100.0), &params);
        assert_eq!(m.velocity, Vec2::new(0.1, 0.1));
    }

    #[test]
    fn test_repel_on_top_of_pointer_is_finite() {
        let params = FieldParams::default();
        let mut m = mote_at(Vec2::new(10.0, 10.0), Vec2::ZERO);
        m.repel(Vec2::new(10.0, 10.0), &params);
        assert!(m.velocity.is_finite());
        assert!((m.velocity.length() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_advance_integrates_then_applies_friction() {
        let mut m = mote_at(Vec2::new(10.0, 10.0), Vec2::new(1.0, -1.0));
        m.advance(0.98);
        assert_eq!(m.position, Vec2::new(11.0, 9.0));
        assert!((m.velocity.x - 0.98).abs() < 1e-6);
    }
}
