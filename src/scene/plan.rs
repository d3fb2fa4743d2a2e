use rand::Rng;

use crate::{
    foundation::core::{Hsb, Point},
    scene::{
        config::SketchConfig,
        paper::{PaperPlan, plan_paper, uniform},
    },
};

/// Upper bound (exclusive) of the palette hue draw.
pub const PALETTE_HUE: (f64, f64) = (0.0, 100.0);
/// Range of the palette saturation draw.
pub const PALETTE_SATURATION: (f64, f64) = (90.0, 100.0);

/// Starting color of the stack gradient, drawn once per render pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Palette {
    /// Hue shared by every rectangle.
    pub hue: f64,
    /// Saturation of rectangle 0.
    pub saturation: f64,
}

/// One rectangle of the stack.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RectItem {
    /// Position in the stack, 0 is the bottom-most.
    pub index: u32,
    /// Translation applied before rotating (the rectangle center).
    pub center: Point,
    /// Baseline this rectangle was placed from.
    pub vertical_start: f64,
    /// Coin-flip roll in `[0, 1)`, `None` when rotation is disabled.
    pub roll: Option<f64>,
    /// Signed rotation in degrees. Negative is counter-clockwise (`roll > 0.5`).
    pub rotation_deg: f64,
    /// Rectangle width.
    pub width: f64,
    /// Rectangle height.
    pub height: f64,
    /// Fill color.
    pub color: Hsb,
}

impl RectItem {
    /// Rotation in radians.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation_deg.to_radians()
    }
}

/// Oversized stroked circle that crops the stack.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MaskCircle {
    /// Circle center (canvas center).
    pub center: Point,
    /// Diameter of the stroke's center line.
    pub diameter: f64,
    /// Stroke width.
    pub stroke_width: f64,
    /// Stroke color (the background).
    pub color: Hsb,
}

impl MaskCircle {
    /// Diameter of the region left visible inside the stroke.
    pub fn visible_diameter(&self) -> f64 {
        self.diameter - self.stroke_width
    }
}

/// Everything one render pass draws, with every random value already sampled.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScenePlan {
    /// Frame clear color.
    pub background: Hsb,
    /// Gradient seed.
    pub palette: Palette,
    /// Rectangles in draw order.
    pub rects: Vec<RectItem>,
    /// Crop mask, if that stage is enabled.
    pub mask: Option<MaskCircle>,
    /// Paper overlay, if that stage is enabled.
    pub paper: Option<PaperPlan>,
}

/// Saturation of rectangle `i`: palette saturation minus `i` steps of `span / count`.
pub fn stack_saturation(cfg: &SketchConfig, palette: Palette, i: u32) -> f64 {
    palette.saturation - f64::from(i) * (cfg.saturation_span / f64::from(cfg.shape_count))
}

/// Brightness of rectangle `i`: floor plus `i` steps of `span / count`.
pub fn stack_brightness(cfg: &SketchConfig, i: u32) -> f64 {
    cfg.brightness_floor + f64::from(i) * (cfg.brightness_span / f64::from(cfg.shape_count))
}

/// Sample a full scene. Random draws happen in render order: palette, then per rectangle the
/// coin flip, the rotation magnitude and the spacing jitter, then the paper texture.
#[tracing::instrument(level = "debug", skip_all, fields(shapes = cfg.shape_count))]
pub fn plan_scene<R: Rng + ?Sized>(cfg: &SketchConfig, rng: &mut R) -> ScenePlan {
    let canvas = cfg.canvas();
    let size = f64::from(cfg.canvas_size);
    let center = canvas.center();

    let palette = Palette {
        hue: uniform(rng, PALETTE_HUE),
        saturation: uniform(rng, PALETTE_SATURATION),
    };
    tracing::debug!(hue = palette.hue, saturation = palette.saturation, "palette");

    let step = cfg.step();
    let mut vertical_start = cfg.vertical_start();
    let mut rects = Vec::with_capacity(cfg.shape_count as usize);
    for i in 0..cfg.shape_count {
        let (roll, rotation_deg) = if cfg.stages.rotation {
            let roll: f64 = rng.random();
            let magnitude = if cfg.rotate_max > cfg.rotate_min {
                rng.random_range(cfg.rotate_min..=cfg.rotate_max)
            } else {
                cfg.rotate_min
            };
            let sign = if roll > 0.5 { -1.0 } else { 1.0 };
            (Some(roll), sign * magnitude)
        } else {
            (None, 0.0)
        };

        let shade = if cfg.stages.gradient { i } else { 0 };
        let color = Hsb::new(
            palette.hue,
            stack_saturation(cfg, palette, shade),
            stack_brightness(cfg, shade),
        );

        rects.push(RectItem {
            index: i,
            center: Point::new(center.x, vertical_start - cfg.shape_width / 2.0),
            vertical_start,
            roll,
            rotation_deg,
            width: size,
            height: cfg.shape_width,
            color,
        });

        vertical_start -= step - uniform(rng, (-step / 2.0, step / 2.0));
    }

    let mask = cfg.stages.mask.then(|| MaskCircle {
        center,
        diameter: cfg.mask_diameter(),
        stroke_width: cfg.mask_stroke_width,
        color: cfg.background,
    });

    let paper = cfg.stages.texture.then(|| {
        plan_paper(
            canvas,
            cfg.paper_opacity,
            cfg.paper_cell,
            cfg.speckle_count,
            rng,
        )
    });

    ScenePlan {
        background: cfg.background,
        palette,
        rects,
        mask,
        paper,
    }
}
