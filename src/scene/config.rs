use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::{
    core::{Canvas, Hsb},
    error::{SketchError, SketchResult},
};

/// Largest accepted `shape_count`.
pub const MAX_SHAPE_COUNT: u32 = 4096;
/// Largest accepted `speckle_count`.
pub const MAX_SPECKLE_COUNT: u32 = 1_000_000;
/// Largest paper grid, in cells, a single overlay may lay down.
pub const MAX_PAPER_CELLS: u64 = 4096 * 4096;

/// Staged-reveal toggles. Every stage is enabled by default; disabling one reproduces an
/// intermediate step of the sketch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Stages {
    /// Randomly tilt each rectangle.
    pub rotation: bool,
    /// Grade saturation and brightness across the stack.
    pub gradient: bool,
    /// Crop the stack into a circle.
    pub mask: bool,
    /// Overlay the paper grain.
    pub texture: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            rotation: true,
            gradient: true,
            mask: true,
            texture: true,
        }
    }
}

/// Immutable sketch configuration, handed to [`crate::Sketch::new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchConfig {
    /// Side of the square canvas in units.
    pub canvas_size: u32,
    /// Rectangles per stack.
    pub shape_count: u32,
    /// Height of each rectangle.
    pub shape_width: f64,
    /// Lower rotation bound in degrees.
    pub rotate_min: f64,
    /// Upper rotation bound in degrees.
    pub rotate_max: f64,
    /// Crop circle diameter as a fraction of the canvas size.
    pub crop_ratio: f64,
    /// Multiplier placing the first rectangle below the crop circle.
    pub vertical_start_factor: f64,
    /// Brightness of the first rectangle.
    pub brightness_floor: f64,
    /// Brightness gained over the whole stack (divided by `shape_count` per step).
    pub brightness_span: f64,
    /// Saturation lost over the whole stack (divided by `shape_count` per step).
    pub saturation_span: f64,
    /// Stroke width of the mask circle.
    pub mask_stroke_width: f64,
    /// Paper overlay opacity.
    pub paper_opacity: f64,
    /// Paper grid step and cell size.
    pub paper_cell: u32,
    /// Dark speckles per paper overlay.
    pub speckle_count: u32,
    /// Background and mask color.
    pub background: Hsb,
    /// Staged-reveal toggles.
    pub stages: Stages,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            canvas_size: 600,
            shape_count: 8,
            shape_width: 65.0,
            rotate_min: 7.0,
            rotate_max: 22.0,
            crop_ratio: 0.6,
            vertical_start_factor: 1.2,
            brightness_floor: 10.0,
            brightness_span: 100.0 - 8.0,
            saturation_span: 100.0,
            mask_stroke_width: 300.0,
            paper_opacity: 0.30,
            paper_cell: 2,
            speckle_count: 30,
            background: Hsb::new(10.0, 3.0, 90.0),
            stages: Stages::default(),
        }
    }
}

impl SketchConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> SketchResult<Self> {
        let f = File::open(path)
            .map_err(|e| SketchError::io(format!("open config '{}': {e}", path.display())))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| SketchError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field is inside the range the renderer can honor.
    pub fn validate(&self) -> SketchResult<()> {
        if self.canvas_size == 0 || self.canvas_size > u32::from(u16::MAX) {
            return Err(SketchError::validation(format!(
                "canvas_size must be in 1..={}, got {}",
                u16::MAX,
                self.canvas_size
            )));
        }
        if self.shape_count == 0 || self.shape_count > MAX_SHAPE_COUNT {
            return Err(SketchError::validation(format!(
                "shape_count must be in 1..={MAX_SHAPE_COUNT}, got {}",
                self.shape_count
            )));
        }
        if !(self.shape_width.is_finite() && self.shape_width > 0.0) {
            return Err(SketchError::validation("shape_width must be finite and > 0"));
        }
        if !(self.rotate_min.is_finite() && self.rotate_max.is_finite()) {
            return Err(SketchError::validation("rotation bounds must be finite"));
        }
        if self.rotate_min < 0.0 || self.rotate_min > self.rotate_max {
            return Err(SketchError::validation(
                "rotation bounds must satisfy 0 <= rotate_min <= rotate_max",
            ));
        }
        if !(self.crop_ratio > 0.0 && self.crop_ratio <= 1.0) {
            return Err(SketchError::validation("crop_ratio must be in (0, 1]"));
        }
        for (name, v) in [
            ("vertical_start_factor", self.vertical_start_factor),
            ("brightness_floor", self.brightness_floor),
            ("brightness_span", self.brightness_span),
            ("saturation_span", self.saturation_span),
        ] {
            if !v.is_finite() {
                return Err(SketchError::validation(format!("{name} must be finite")));
            }
        }
        if !(self.mask_stroke_width.is_finite() && self.mask_stroke_width >= 0.0) {
            return Err(SketchError::validation(
                "mask_stroke_width must be finite and >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.paper_opacity) {
            return Err(SketchError::validation("paper_opacity must be in [0, 1]"));
        }
        if self.paper_cell == 0 {
            return Err(SketchError::validation("paper_cell must be > 0"));
        }
        let side = u64::from(self.canvas_size.div_ceil(self.paper_cell));
        if side * side > MAX_PAPER_CELLS {
            return Err(SketchError::validation(format!(
                "paper grid of {side}x{side} cells exceeds {MAX_PAPER_CELLS}; raise paper_cell"
            )));
        }
        if self.speckle_count > MAX_SPECKLE_COUNT {
            return Err(SketchError::validation(format!(
                "speckle_count must be <= {MAX_SPECKLE_COUNT}, got {}",
                self.speckle_count
            )));
        }
        Ok(())
    }

    /// Canvas described by this config.
    pub fn canvas(&self) -> Canvas {
        Canvas::square(self.canvas_size)
    }

    /// Diameter of the visible crop circle.
    pub fn crop_diameter(&self) -> f64 {
        self.crop_ratio * f64::from(self.canvas_size)
    }

    /// Nominal vertical distance between consecutive rectangles.
    pub fn step(&self) -> f64 {
        self.crop_diameter() / f64::from(self.shape_count)
    }

    /// Baseline of the first rectangle, below the crop circle.
    pub fn vertical_start(&self) -> f64 {
        self.vertical_start_factor
            * (f64::from(self.canvas_size) / 2.0 + self.crop_diameter() / 2.0)
    }

    /// Diameter of the stroked mask circle.
    pub fn mask_diameter(&self) -> f64 {
        self.crop_diameter() + self.mask_stroke_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scene() {
        let cfg = SketchConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.crop_diameter(), 360.0);
        assert_eq!(cfg.step(), 45.0);
        assert_eq!(cfg.vertical_start(), 1.2 * 480.0);
        assert_eq!(cfg.mask_diameter(), 0.6 * 600.0 + 300.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SketchConfig =
            serde_json::from_str(r#"{ "shape_count": 12, "stages": { "texture": false } }"#)
                .unwrap();
        assert_eq!(cfg.shape_count, 12);
        assert_eq!(cfg.canvas_size, 600);
        assert!(!cfg.stages.texture);
        assert!(cfg.stages.mask);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<SketchConfig, _> = serde_json::from_str(r#"{ "shape_cnt": 3 }"#);
        assert!(res.is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            SketchConfig {
                canvas_size: 0,
                ..SketchConfig::default()
            },
            SketchConfig {
                canvas_size: 70_000,
                ..SketchConfig::default()
            },
            SketchConfig {
                shape_count: 0,
                ..SketchConfig::default()
            },
            SketchConfig {
                rotate_min: 30.0,
                ..SketchConfig::default()
            },
            SketchConfig {
                crop_ratio: 1.5,
                ..SketchConfig::default()
            },
            SketchConfig {
                paper_opacity: -0.1,
                ..SketchConfig::default()
            },
            SketchConfig {
                paper_cell: 0,
                ..SketchConfig::default()
            },
            SketchConfig {
                shape_width: f64::NAN,
                ..SketchConfig::default()
            },
            SketchConfig {
                shape_count: u32::MAX,
                ..SketchConfig::default()
            },
            SketchConfig {
                speckle_count: u32::MAX,
                ..SketchConfig::default()
            },
            SketchConfig {
                canvas_size: u32::from(u16::MAX),
                paper_cell: 1,
                ..SketchConfig::default()
            },
        ];
        for cfg in bad {
            let err = cfg.validate().unwrap_err();
            assert!(matches!(err, SketchError::Validation(_)), "{err}");
        }
    }

    #[test]
    fn largest_canvas_is_allowed_with_coarser_paper() {
        let cfg = SketchConfig {
            canvas_size: u32::from(u16::MAX),
            paper_cell: 16,
            shape_count: MAX_SHAPE_COUNT,
            speckle_count: MAX_SPECKLE_COUNT,
            ..SketchConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn equal_rotation_bounds_are_allowed() {
        let cfg = SketchConfig {
            rotate_min: 10.0,
            rotate_max: 10.0,
            ..SketchConfig::default()
        };
        cfg.validate().unwrap();
    }
}
