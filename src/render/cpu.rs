use crate::{
    draw::{
        context::DrawContext,
        state::{DrawState, StateStack},
    },
    foundation::{
        core::{Affine, Canvas, Hsb, Rect, RectMode},
        error::{SketchError, SketchResult},
    },
    render::frame::FrameRGBA,
};
use vello_cpu::kurbo::Shape as _;

/// Ellipse flattening tolerance in pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// [`DrawContext`] rasterizing into a premultiplied RGBA8 pixmap with `vello_cpu`.
///
/// Draw calls accumulate in a render context; [`CpuCanvas::finish`] flushes them into the
/// pixmap and reads the frame back. The pixmap lives as long as the canvas, so the next pass
/// paints over the previous one.
pub struct CpuCanvas {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    states: StateStack,
    pending: usize,
}

impl CpuCanvas {
    /// Allocate a surface. Fails when either side is zero or exceeds `u16`.
    pub fn new(canvas: Canvas) -> SketchResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| SketchError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| SketchError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(SketchError::render("canvas must be at least 1x1"));
        }

        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            states: StateStack::default(),
            pending: 0,
        })
    }

    /// Start a pass with a fresh render context. Drawing state carries over.
    pub fn begin(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.pending = 0;
    }

    /// Fill and stroke commands queued since the last [`CpuCanvas::finish`].
    pub fn pending_draws(&self) -> usize {
        self.pending
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawState {
        self.states.current()
    }

    /// Rasterize pending draw calls and read the surface back. The queue starts empty again.
    pub fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.begin();
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn fill_local_rect(&mut self, rect: Rect, transform: Affine, color: Hsb) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.pending += 1;
    }

    fn paint_shape(&mut self, path: vello_cpu::kurbo::BezPath) {
        let s = *self.states.current();
        self.ctx.set_transform(affine_to_cpu(s.transform));
        if let Some(fill) = s.fill {
            self.ctx.set_paint(color_to_cpu(fill));
            self.ctx.fill_path(&path);
            self.pending += 1;
        }
        if let Some(stroke) = s.stroke
            && s.stroke_weight > 0.0
        {
            self.ctx
                .set_stroke(vello_cpu::kurbo::Stroke::new(s.stroke_weight));
            self.ctx.set_paint(color_to_cpu(stroke));
            self.ctx.stroke_path(&path);
            self.pending += 1;
        }
    }
}

impl DrawContext for CpuCanvas {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn background(&mut self, color: Hsb) {
        self.fill_local_rect(self.canvas.bounds(), Affine::IDENTITY, color);
    }

    fn fill(&mut self, color: Hsb) {
        self.states.current_mut().fill = Some(color);
    }

    fn no_fill(&mut self) {
        self.states.current_mut().fill = None;
    }

    fn stroke(&mut self, color: Hsb) {
        self.states.current_mut().stroke = Some(color);
    }

    fn no_stroke(&mut self) {
        self.states.current_mut().stroke = None;
    }

    fn stroke_weight(&mut self, weight: f64) {
        self.states.current_mut().stroke_weight = weight;
    }

    fn rect_mode(&mut self, mode: RectMode) {
        self.states.current_mut().rect_mode = mode;
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.states.translate(x, y);
    }

    fn rotate(&mut self, radians: f64) {
        self.states.rotate(radians);
    }

    fn push(&mut self) {
        self.states.push();
    }

    fn pop(&mut self) {
        self.states.pop();
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let s = *self.states.current();
        let rect = s.rect_mode.resolve(x, y, w, h);
        if s.stroke.is_none() {
            if let Some(fill) = s.fill {
                self.fill_local_rect(rect, s.transform, fill);
            }
            return;
        }
        self.paint_shape(rect_to_cpu(rect).to_path(PATH_TOLERANCE));
    }

    fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let ellipse = vello_cpu::kurbo::Ellipse::new((x, y), (w / 2.0, h / 2.0), 0.0);
        self.paint_shape(ellipse.to_path(PATH_TOLERANCE));
    }
}

fn color_to_cpu(c: Hsb) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}
