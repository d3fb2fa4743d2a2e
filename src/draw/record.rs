use crate::{
    draw::{
        context::DrawContext,
        state::{DrawState, StateStack},
    },
    foundation::core::{Affine, Canvas, Hsb, Point, Rect, RectMode},
};

/// Stroke resolved at draw time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Hsb,
    /// Stroke width.
    pub width: f64,
}

/// One logged draw call with the state it was issued under.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    /// Whole-surface clear.
    Background {
        /// Clear color.
        color: Hsb,
    },
    /// Rectangle in local coordinates.
    Rect {
        /// Local bounds after applying the rect mode.
        rect: Rect,
        /// Local-to-canvas transform.
        transform: Affine,
        /// Fill, if any.
        fill: Option<Hsb>,
        /// Stroke, if any.
        stroke: Option<StrokeStyle>,
    },
    /// Ellipse in local coordinates.
    Ellipse {
        /// Center.
        center: Point,
        /// Full width.
        width: f64,
        /// Full height.
        height: f64,
        /// Local-to-canvas transform.
        transform: Affine,
        /// Fill, if any.
        fill: Option<Hsb>,
        /// Stroke, if any.
        stroke: Option<StrokeStyle>,
    },
}

/// Per-kind totals of a draw log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CallCensus {
    /// Background clears.
    pub backgrounds: usize,
    /// Rectangles.
    pub rects: usize,
    /// Ellipses.
    pub ellipses: usize,
    /// Deepest push nesting reached.
    pub max_depth: usize,
    /// Saves still open at the end.
    pub open_saves: usize,
}

/// [`DrawContext`] that logs calls instead of rasterizing.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    canvas: Canvas,
    states: StateStack,
    max_depth: usize,
    calls: Vec<DrawCall>,
}

impl RecordingContext {
    /// Empty log for a surface of size `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            states: StateStack::default(),
            max_depth: 0,
            calls: Vec::new(),
        }
    }

    /// Logged calls in issue order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Current state.
    pub fn state(&self) -> &DrawState {
        self.states.current()
    }

    /// Current push nesting.
    pub fn depth(&self) -> usize {
        self.states.depth()
    }

    /// Deepest push nesting seen.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of rectangle calls.
    pub fn rect_count(&self) -> usize {
        self.census().rects
    }

    /// Tally the log.
    pub fn census(&self) -> CallCensus {
        let mut c = CallCensus {
            max_depth: self.max_depth,
            open_saves: self.depth(),
            ..CallCensus::default()
        };
        for call in &self.calls {
            match call {
                DrawCall::Background { .. } => c.backgrounds += 1,
                DrawCall::Rect { .. } => c.rects += 1,
                DrawCall::Ellipse { .. } => c.ellipses += 1,
            }
        }
        c
    }

    /// Forget logged calls but keep the drawing state.
    pub fn clear_calls(&mut self) {
        self.max_depth = self.depth();
        self.calls.clear();
    }

    /// Forget logged calls and state, keeping the canvas.
    pub fn clear(&mut self) {
        self.states.reset();
        self.max_depth = 0;
        self.calls.clear();
    }

    fn stroke_style(&self) -> Option<StrokeStyle> {
        let s = self.states.current();
        s.stroke.map(|color| StrokeStyle {
            color,
            width: s.stroke_weight,
        })
    }
}

impl DrawContext for RecordingContext {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn background(&mut self, color: Hsb) {
        self.calls.push(DrawCall::Background { color });
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
        self.max_depth = self.max_depth.max(self.states.depth());
    }

    fn pop(&mut self) {
        self.states.pop();
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let s = *self.states.current();
        self.calls.push(DrawCall::Rect {
            rect: s.rect_mode.resolve(x, y, w, h),
            transform: s.transform,
            fill: s.fill,
            stroke: self.stroke_style(),
        });
    }

    fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let s = *self.states.current();
        self.calls.push(DrawCall::Ellipse {
            center: Point::new(x, y),
            width: w,
            height: h,
            transform: s.transform,
            fill: s.fill,
            stroke: self.stroke_style(),
        });
    }
}
