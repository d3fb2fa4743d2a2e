pub use kurbo::{Affine, Point, Rect, Vec2};

/// Square or rectangular drawing surface size in units (one unit is one pixel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in units.
    pub width: u32,
    /// Height in units.
    pub height: u32,
}

impl Canvas {
    /// Square canvas of side `size`.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Canvas center in units.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Full canvas bounds anchored at the origin.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// How `rect` interprets its `(x, y)` argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectMode {
    /// `(x, y)` is the top-left corner.
    #[default]
    Corner,
    /// `(x, y)` is the rectangle center.
    Center,
}

impl RectMode {
    /// Resolve a rectangle in local (pre-transform) coordinates.
    pub fn resolve(self, x: f64, y: f64, w: f64, h: f64) -> Rect {
        match self {
            Self::Corner => Rect::new(x, y, x + w, y + h),
            Self::Center => Rect::from_center_size(Point::new(x, y), (w, h)),
        }
    }
}

/// Hue/saturation/brightness color with each channel in `[0, 100]` and alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsb {
    /// Hue, `[0, 100)` covers the full color wheel.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Brightness.
    pub b: f64,
    /// Alpha.
    #[serde(default = "one")]
    pub a: f64,
}

fn one() -> f64 {
    1.0
}

impl Hsb {
    /// Opaque color.
    pub fn new(h: f64, s: f64, b: f64) -> Self {
        Self { h, s, b, a: 1.0 }
    }

    /// Zero-saturation color of the given brightness and alpha.
    pub fn gray(b: f64, a: f64) -> Self {
        Self { h: 0.0, s: 0.0, b, a }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Convert to straight (non-premultiplied) RGBA8. Channels are clamped first.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let h = (self.h.rem_euclid(100.0) / 100.0) * 6.0;
        let s = self.s.clamp(0.0, 100.0) / 100.0;
        let v = self.b.clamp(0.0, 100.0) / 100.0;

        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [to_u8(r + m), to_u8(g + m), to_u8(b + m), to_u8(self.a)]
    }
}
