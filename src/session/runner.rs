use rand::Rng;

use crate::{
    draw::{context::DrawContext, record::RecordingContext},
    foundation::error::SketchResult,
    render::{
        cpu::CpuCanvas,
        frame::{FrameRGBA, Sketch},
        sink::{FrameSink, SinkConfig},
    },
    scene::plan::ScenePlan,
    session::events::{EventSource, SketchEvent},
};

/// A [`DrawContext`] that render passes can be bracketed on.
pub trait RenderTarget: DrawContext {
    /// Prepare for a new pass. Drawing state set up earlier is kept.
    fn begin_pass(&mut self);

    /// Finish the pass and return the frame, if this target produces pixels.
    fn end_pass(&mut self) -> SketchResult<Option<FrameRGBA>>;
}

impl RenderTarget for CpuCanvas {
    fn begin_pass(&mut self) {
        self.begin();
    }

    fn end_pass(&mut self) -> SketchResult<Option<FrameRGBA>> {
        Ok(Some(self.finish()))
    }
}

impl RenderTarget for RecordingContext {
    fn begin_pass(&mut self) {
        self.clear_calls();
    }

    fn end_pass(&mut self) -> SketchResult<Option<FrameRGBA>> {
        Ok(None)
    }
}

/// Result of one render pass.
#[derive(Clone, Debug)]
pub struct RenderedPass {
    /// Zero-based pass number within the session.
    pub index: u64,
    /// Event that triggered the pass.
    pub trigger: SketchEvent,
    /// What was drawn.
    pub plan: ScenePlan,
    /// Pixels, when the target produces them.
    pub frame: Option<FrameRGBA>,
}

/// Event-driven driver: setup once on `Ready`, one render pass per event, nothing in between.
#[derive(Debug)]
pub struct Session<'a> {
    sketch: &'a Sketch,
    ready: bool,
    passes: u64,
}

impl<'a> Session<'a> {
    /// New session for `sketch`. No pass has run yet.
    pub fn new(sketch: &'a Sketch) -> Self {
        Self {
            sketch,
            ready: false,
            passes: 0,
        }
    }

    /// Passes rendered so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Whether setup has run.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Run setup and the first pass. A repeated `Ready` is ignored and returns `None`.
    pub fn on_ready<T, R>(
        &mut self,
        target: &mut T,
        rng: &mut R,
    ) -> SketchResult<Option<RenderedPass>>
    where
        T: RenderTarget + ?Sized,
        R: Rng + ?Sized,
    {
        if self.ready {
            tracing::warn!("duplicate ready event ignored");
            return Ok(None);
        }
        self.sketch.setup(target)?;
        self.ready = true;
        self.pass(SketchEvent::Ready, target, rng).map(Some)
    }

    /// Redraw with freshly sampled values. Runs setup first if `Ready` never arrived.
    pub fn on_pointer_pressed<T, R>(
        &mut self,
        x: f64,
        y: f64,
        target: &mut T,
        rng: &mut R,
    ) -> SketchResult<RenderedPass>
    where
        T: RenderTarget + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.ready {
            tracing::warn!("pointer pressed before ready; running setup first");
            self.sketch.setup(target)?;
            self.ready = true;
        }
        self.pass(SketchEvent::PointerPressed { x, y }, target, rng)
    }

    /// Route one event to its callback.
    pub fn dispatch<T, R>(
        &mut self,
        event: SketchEvent,
        target: &mut T,
        rng: &mut R,
    ) -> SketchResult<Option<RenderedPass>>
    where
        T: RenderTarget + ?Sized,
        R: Rng + ?Sized,
    {
        match event {
            SketchEvent::Ready => self.on_ready(target, rng),
            SketchEvent::PointerPressed { x, y } => {
                self.on_pointer_pressed(x, y, target, rng).map(Some)
            }
        }
    }

    /// Drain `events`, pushing every produced frame into `sink`. Returns the number of passes.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run<E, T, R, S>(
        &mut self,
        events: &mut E,
        target: &mut T,
        rng: &mut R,
        sink: &mut S,
    ) -> SketchResult<u64>
    where
        E: EventSource + ?Sized,
        T: RenderTarget + ?Sized,
        R: Rng + ?Sized,
        S: FrameSink + ?Sized,
    {
        let canvas = target.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
        })?;

        let start = self.passes;
        while let Some(event) = events.next_event()? {
            let Some(pass) = self.dispatch(event, target, rng)? else {
                continue;
            };
            if let Some(frame) = &pass.frame {
                sink.push_frame(pass.index - start, frame)?;
            }
        }

        sink.end()?;
        Ok(self.passes - start)
    }

    fn pass<T, R>(
        &mut self,
        trigger: SketchEvent,
        target: &mut T,
        rng: &mut R,
    ) -> SketchResult<RenderedPass>
    where
        T: RenderTarget + ?Sized,
        R: Rng + ?Sized,
    {
        target.begin_pass();
        let plan = self.sketch.render_frame(target, rng);
        let frame = target.end_pass()?;

        let index = self.passes;
        self.passes += 1;
        tracing::debug!(index, ?trigger, "render pass");
        Ok(RenderedPass {
            index,
            trigger,
            plan,
            frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        render::sink::InMemorySink, scene::config::SketchConfig, session::events::ScriptedEvents,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn small_sketch() -> Sketch {
        Sketch::new(SketchConfig {
            canvas_size: 40,
            ..SketchConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn each_event_renders_exactly_one_pass() {
        let sketch = small_sketch();
        let mut session = Session::new(&sketch);
        let mut target = RecordingContext::new(sketch.config().canvas());
        let mut rng = StdRng::seed_from_u64(1);

        let first = session.on_ready(&mut target, &mut rng).unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(target.census().backgrounds, 1);

        let second = session
            .on_pointer_pressed(5.0, 5.0, &mut target, &mut rng)
            .unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(target.census().backgrounds, 1);
        assert_eq!(target.census().ellipses, 1);
        assert_eq!(session.passes(), 2);
    }

    #[test]
    fn duplicate_ready_is_ignored() {
        let sketch = small_sketch();
        let mut session = Session::new(&sketch);
        let mut target = RecordingContext::new(sketch.config().canvas());
        let mut rng = StdRng::seed_from_u64(2);
        assert!(session.on_ready(&mut target, &mut rng).unwrap().is_some());
        assert!(session.on_ready(&mut target, &mut rng).unwrap().is_none());
        assert_eq!(session.passes(), 1);
    }

    #[test]
    fn press_before_ready_runs_setup() {
        let sketch = small_sketch();
        let mut session = Session::new(&sketch);
        let mut target = RecordingContext::new(sketch.config().canvas());
        let mut rng = StdRng::seed_from_u64(3);
        session
            .on_pointer_pressed(0.0, 0.0, &mut target, &mut rng)
            .unwrap();
        assert!(session.is_ready());
        assert_eq!(target.state().rect_mode, crate::RectMode::Center);
    }

    #[test]
    fn run_pushes_one_frame_per_event() {
        let sketch = small_sketch();
        let mut session = Session::new(&sketch);
        let mut target = CpuCanvas::new(sketch.config().canvas()).unwrap();
        let mut sink = InMemorySink::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mut events = ScriptedEvents::ready_then_clicks(2);

        let n = session
            .run(&mut events, &mut target, &mut rng, &mut sink)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(sink.frames().len(), 3);
        assert!(sink.ended());
        assert_eq!(
            sink.config(),
            Some(SinkConfig {
                width: 40,
                height: 40
            })
        );
        for (_, frame) in sink.frames() {
            assert!(frame.is_opaque());
        }
    }
}
