//! Colors used by the backdrop renderers.
//!
//! Components are straight (non-premultiplied) `f32` values in `0.0..=1.0`.
//! Surfaces composite them with source-over blending.

/// An RGBA color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black; the cleared state of every surface.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Default accent used by the comet (`#0a84ff`).
    pub const ACCENT: Rgba = Rgba::new(10.0 / 255.0, 132.0 / 255.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White with the given alpha, the color every mote and connection uses.
    pub const fn white(alpha: f32) -> Self {
        Self::new(1.0, 1.0, 1.0, alpha)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Parse a CSS-style hex color: `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// The leading `#` is optional. Returns `None` for anything else.
    ///
    /// # Example
    ///
    /// ```
    /// use motefield::Rgba;
    ///
    /// let accent = Rgba::from_hex("#0a84ff").unwrap();
    /// assert_eq!(accent.to_rgba8(), [10, 132, 255, 255]);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match digits.len() {
            3 => {
                let mut out = [0.0; 3];
                for (i, c) in digits.chars().enumerate() {
                    let doubled: String = [c, c].iter().collect();
                    out[i] = channel(&doubled)?;
                }
                Some(Self::new(out[0], out[1], out[2], 1.0))
            }
            6 | 8 => {
                let r = channel(&digits[0..2])?;
                let g = channel(&digits[2..4])?;
                let b = channel(&digits[4..6])?;
                let a = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    1.0
                };
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Quantize to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }

    /// Source-over composite of `self` on top of `dst`, with the source
    /// alpha additionally scaled by `coverage`.
    pub fn over(self, dst: Rgba, coverage: f32) -> Rgba {
        let sa = (self.a * coverage).clamp(0.0, 1.0);
        let out_a = sa + dst.a * (1.0 - sa);
        if out_a <= f32::EPSILON {
            return Rgba::TRANSPARENT;
        }
        let mix = |s: f32, d: f32| (s * sa + d * dst.a * (1.0 - sa)) / out_a;
        Rgba::new(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
            out_a,
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::TRANSPARENT
    }
}
