use rand::Rng;

use crate::{
    draw::context::{DrawContext, scoped},
    foundation::{
        core::RectMode,
        error::{SketchError, SketchResult},
    },
    scene::{
        config::SketchConfig,
        paper::PaperPlan,
        plan::{ScenePlan, plan_scene},
    },
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames read back from [`crate::CpuCanvas`] are **premultiplied alpha**; the `premultiplied`
/// flag makes this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// True when no pixel is left transparent or partially covered.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }
}

/// The scene renderer: clears the frame, stacks the graded rectangles, crops them into a circle
/// and lays the paper grain on top.
#[derive(Clone, Debug)]
pub struct Sketch {
    config: SketchConfig,
}

impl Sketch {
    /// Validate `config` and build a renderer around it.
    pub fn new(config: SketchConfig) -> SketchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this renderer was built with.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// One-time context setup: rectangles are positioned by their center and drawn without
    /// outlines.
    pub fn setup<C: DrawContext + ?Sized>(&self, ctx: &mut C) -> SketchResult<()> {
        let canvas = ctx.canvas();
        if canvas != self.config.canvas() {
            return Err(SketchError::render(format!(
                "context is {}x{}, sketch expects {}x{}",
                canvas.width, canvas.height, self.config.canvas_size, self.config.canvas_size
            )));
        }
        ctx.rect_mode(RectMode::Center);
        ctx.no_stroke();
        Ok(())
    }

    /// Sample a fresh scene and draw it. Returns what was drawn.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn render_frame<C, R>(&self, ctx: &mut C, rng: &mut R) -> ScenePlan
    where
        C: DrawContext + ?Sized,
        R: Rng + ?Sized,
    {
        let plan = plan_scene(&self.config, rng);
        paint_plan(&plan, ctx);
        tracing::debug!(
            rects = plan.rects.len(),
            mask = plan.mask.is_some(),
            paper_cells = plan.paper.as_ref().map_or(0, PaperPlan::cell_count),
            "render pass done"
        );
        plan
    }
}

/// Issue the draw calls for an already sampled scene.
///
/// Every element sets its own rect mode, fill and stroke inside a scoped block, so the result
/// does not depend on the state the context arrives in.
pub fn paint_plan<C: DrawContext + ?Sized>(plan: &ScenePlan, ctx: &mut C) {
    ctx.background(plan.background);

    for item in &plan.rects {
        let mut g = scoped(&mut *ctx);
        g.rect_mode(RectMode::Center);
        g.no_stroke();
        g.translate(item.center.x, item.center.y);
        if item.rotation_deg != 0.0 {
            g.rotate(item.rotation_rad());
        }
        g.fill(item.color);
        g.rect(0.0, 0.0, item.width, item.height);
    }

    if let Some(mask) = &plan.mask {
        let mut g = scoped(&mut *ctx);
        g.stroke(mask.color);
        g.no_fill();
        g.stroke_weight(mask.stroke_width);
        g.ellipse(mask.center.x, mask.center.y, mask.diameter, mask.diameter);
    }

    if let Some(paper) = &plan.paper {
        paint_paper(paper, ctx);
    }
}

/// Grain cells first, then the speckles, all in canvas coordinates without outlines.
pub fn paint_paper<C: DrawContext + ?Sized>(paper: &PaperPlan, ctx: &mut C) {
    let mut g = scoped(ctx);
    g.no_stroke();
    g.rect_mode(RectMode::Corner);
    for (rect, color) in paper.cells() {
        g.fill(color);
        g.rect(rect.x0, rect.y0, rect.width(), rect.height());
    }
    for s in &paper.speckles {
        g.fill(s.color);
        g.rect(s.rect.x0, s.rect.y0, s.rect.width(), s.rect.height());
    }
}
