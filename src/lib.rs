//! cropstack draws a generative sketch: a stack of randomly tilted, color-graded rectangles,
//! cropped into a circle and covered with synthetic paper grain.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: `SketchConfig + Rng -> ScenePlan` (every random value sampled up front)
//! 2. **Paint**: `ScenePlan -> DrawContext` (immediate-mode draw calls with scoped state)
//! 3. **Read back**: `CpuCanvas -> FrameRGBA` (premultiplied RGBA8 via `vello_cpu`)
//!
//! A [`Session`] ties the passes to host events: setup plus one pass on
//! [`SketchEvent::Ready`], one pass per [`SketchEvent::PointerPressed`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod draw;
mod foundation;
mod render;
mod scene;
mod session;

pub use draw::context::{DrawContext, Scoped, scoped};
pub use draw::record::{CallCensus, DrawCall, RecordingContext, StrokeStyle};
pub use draw::state::{DrawState, StateStack};
pub use foundation::core::{Affine, Canvas, Hsb, Point, Rect, RectMode, Vec2};
pub use foundation::error::{SketchError, SketchResult};
pub use render::cpu::CpuCanvas;
pub use render::frame::{FrameRGBA, Sketch, paint_paper, paint_plan};
pub use render::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png};
pub use scene::config::{
    MAX_PAPER_CELLS, MAX_SHAPE_COUNT, MAX_SPECKLE_COUNT, SketchConfig, Stages,
};
pub use scene::paper::{PaperPlan, Speckle, plan_paper};
pub use scene::plan::{
    MaskCircle, Palette, RectItem, ScenePlan, plan_scene, stack_brightness, stack_saturation,
};
pub use session::events::{EventSource, LineEvents, ScriptedEvents, SketchEvent};
pub use session::runner::{RenderTarget, RenderedPass, Session};
