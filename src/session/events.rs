use std::{collections::VecDeque, io::BufRead};

use crate::foundation::error::{SketchError, SketchResult};

/// Host events that trigger a render pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SketchEvent {
    /// The canvas exists; fired once.
    Ready,
    /// The user clicked at canvas position `(x, y)`.
    PointerPressed {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
}

/// Anything that can feed events to a [`crate::Session`].
pub trait EventSource {
    /// Next event, or `None` once the source is exhausted.
    fn next_event(&mut self) -> SketchResult<Option<SketchEvent>>;
}

/// Fixed list of events, replayed in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<SketchEvent>,
}

impl ScriptedEvents {
    /// Replay `events` as given.
    pub fn new(events: impl IntoIterator<Item = SketchEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    /// `Ready` followed by `clicks` presses at the canvas origin.
    pub fn ready_then_clicks(clicks: u32) -> Self {
        Self::new(
            std::iter::once(SketchEvent::Ready)
                .chain((0..clicks).map(|_| SketchEvent::PointerPressed { x: 0.0, y: 0.0 })),
        )
    }

    /// Events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> SketchResult<Option<SketchEvent>> {
        Ok(self.queue.pop_front())
    }
}

/// Line-driven events: `Ready` first, then one press per input line.
///
/// A line holding two numbers (`"120 45"`) is a press at that position; any other line is a
/// press at the origin. `q`, `quit` or end of input stops the stream.
pub struct LineEvents<R: BufRead> {
    reader: R,
    ready_sent: bool,
    done: bool,
}

impl<R: BufRead> LineEvents<R> {
    /// Read events from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            ready_sent: false,
            done: false,
        }
    }
}

impl<R: BufRead> EventSource for LineEvents<R> {
    fn next_event(&mut self) -> SketchResult<Option<SketchEvent>> {
        if !self.ready_sent {
            self.ready_sent = true;
            return Ok(Some(SketchEvent::Ready));
        }
        if self.done {
            return Ok(None);
        }

        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| SketchError::io(format!("read event line: {e}")))?;
        let line = line.trim();
        if n == 0 || line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            self.done = true;
            return Ok(None);
        }

        Ok(Some(parse_press(line)))
    }
}

fn parse_press(line: &str) -> SketchEvent {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => SketchEvent::PointerPressed { x, y },
        _ => SketchEvent::PointerPressed { x: 0.0, y: 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(src: &mut impl EventSource) -> Vec<SketchEvent> {
        let mut out = Vec::new();
        while let Some(ev) = src.next_event().unwrap() {
            out.push(ev);
        }
        out
    }

    #[test]
    fn scripted_ready_then_clicks() {
        let mut src = ScriptedEvents::ready_then_clicks(2);
        assert_eq!(src.remaining(), 3);
        let evs = drain(&mut src);
        assert_eq!(evs[0], SketchEvent::Ready);
        assert!(
            evs[1..]
                .iter()
                .all(|e| matches!(e, SketchEvent::PointerPressed { .. }))
        );
        assert_eq!(src.next_event().unwrap(), None);
    }

    #[test]
    fn lines_become_presses_until_quit() {
        let input = "\n120 45\n3,4\nclick\nq\nignored\n";
        let mut src = LineEvents::new(input.as_bytes());
        let evs = drain(&mut src);
        assert_eq!(
            evs,
            vec![
                SketchEvent::Ready,
                SketchEvent::PointerPressed { x: 0.0, y: 0.0 },
                SketchEvent::PointerPressed { x: 120.0, y: 45.0 },
                SketchEvent::PointerPressed { x: 3.0, y: 4.0 },
                SketchEvent::PointerPressed { x: 0.0, y: 0.0 },
            ]
        );
        assert_eq!(src.next_event().unwrap(), None);
    }

    #[test]
    fn eof_ends_stream_after_ready() {
        let mut src = LineEvents::new("".as_bytes());
        assert_eq!(drain(&mut src), vec![SketchEvent::Ready]);
    }
}
