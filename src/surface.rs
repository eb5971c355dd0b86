//! Drawable surfaces.
//!
//! The engine never talks to a window or GPU directly. It draws through the
//! [`Surface`] trait, which covers exactly what a 2D canvas context offers
//! the backdrop: clear, filled circles and stroked lines.
//!
//! Two implementations ship with the crate:
//! - [`PixelSurface`] rasterizes into an RGBA image in memory. The native
//!   host uploads that image to the GPU every frame.
//! - [`DrawList`] records the commands instead of executing them. Useful
//!   for tests and for hosts that bring their own rasterizer.

use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::color::Rgba;
use crate::error::SnapshotError;

/// A 2D drawing target of known pixel size.
pub trait Surface {
    /// Current size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Change the pixel size. Contents after a resize are cleared.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Fill a circle, compositing `color` over the existing contents.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight line of the given width.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// Software RGBA raster backed by an [`image::RgbaImage`].
///
/// Shapes are anti-aliased with a one-pixel coverage ramp and composited
/// with source-over blending.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    image: RgbaImage,
}

impl PixelSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Raw RGBA8 bytes, row-major, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// The backing image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Color of a single pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.image.width() && y < self.image.height() {
            Some(Rgba::from_rgba8(self.image.get_pixel(x, y).0))
        } else {
            None
        }
    }

    /// True when every pixel is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    /// Write the current frame to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        self.image
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let px = self.image.get_pixel_mut(x, y);
        let dst = Rgba::from_rgba8(px.0);
        px.0 = color.over(dst, coverage).to_rgba8();
    }

    /// Clip a float bounding box to the pixel grid. Returns inclusive
    /// `(x0, y0, x1, y1)`, or `None` when nothing is visible.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 || !min.is_finite() || !max.is_finite() {
            return None;
        }
        if max.x < 0.0 || max.y < 0.0 || min.x >= w as f32 || min.y >= h as f32 {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as u32).min(w - 1);
        let y1 = (max.y.ceil() as u32).min(h - 1);
        Some((x0, y0, x1, y1))
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            px.0 = [0; 4];
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(center - reach, center + reach) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - pixel_center.distance(center)).clamp(0.0, 1.0);
                self.blend(x, y, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if width <= 0.0 || color.a <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let reach = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(from.min(to) - reach, from.max(to) + reach) else {
            return;
        };
        let segment = to - from;
        let length_sq = segment.length_squared();
        if length_sq <= f32::EPSILON {
            // Butt caps: a zero-length stroke paints nothing.
            return;
        }
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = ((p - from).dot(segment) / length_sq).clamp(0.0, 1.0);
                let distance = p.distance(from + segment * t);
                let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
                self.blend(x, y, color, coverage);
            }
        }
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// A surface that records commands since the last clear.
///
/// # Example
///
/// ```
/// use motefield::{DrawList, Rgba, Surface, Vec2};
///
/// let mut list = DrawList::new(100, 100);
/// list.fill_circle(Vec2::new(10.0, 10.0), 2.0, Rgba::WHITE);
/// assert_eq!(list.circles().count(), 1);
///
/// list.clear();
/// assert!(list.is_blank());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Everything drawn since the last clear, starting with the `Clear`
    /// itself when there was one.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// True when nothing has been drawn since the last clear.
    pub fn is_blank(&self) -> bool {
        self.commands.iter().all(|c| matches!(c, DrawCommand::Clear))
    }

    /// Recorded circles as `(center, radius, color)`.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    /// Recorded lines as `(from, to, color)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { from, to, color, .. } => Some((from, to, color)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
