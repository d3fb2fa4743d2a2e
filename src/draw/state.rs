use crate::foundation::core::{Affine, Hsb, RectMode};

/// Transform and style in effect for the next draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    /// Local-to-canvas transform.
    pub transform: Affine,
    /// Fill color, `None` after `no_fill`.
    pub fill: Option<Hsb>,
    /// Stroke color, `None` after `no_stroke`.
    pub stroke: Option<Hsb>,
    /// Stroke width.
    pub stroke_weight: f64,
    /// Interpretation of `rect` coordinates.
    pub rect_mode: RectMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: Some(Hsb::new(0.0, 0.0, 100.0)),
            stroke: Some(Hsb::new(0.0, 0.0, 0.0)),
            stroke_weight: 1.0,
            rect_mode: RectMode::Corner,
        }
    }
}

/// Current state plus the saved states below it.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    /// State in effect.
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    /// Mutable state in effect.
    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Save a copy of the current state.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the last saved state. Returns `false` when nothing was saved.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(s) => {
                self.current = s;
                true
            }
            None => {
                tracing::warn!("pop without matching push ignored");
                false
            }
        }
    }

    /// Post-multiply a translation onto the current transform.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.current.transform = self.current.transform * Affine::translate((x, y));
    }

    /// Post-multiply a rotation (radians, clockwise on a y-down canvas).
    pub fn rotate(&mut self, radians: f64) {
        self.current.transform = self.current.transform * Affine::rotate(radians);
    }

    /// Drop all saved states and reset to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Point;

    #[test]
    fn push_pop_restores_transform_and_style() {
        let mut s = StateStack::default();
        s.push();
        s.translate(10.0, 20.0);
        s.current_mut().fill = None;
        assert_eq!(s.depth(), 1);
        assert!(s.pop());
        assert_eq!(s.current(), &DrawState::default());
        assert!(!s.pop());
    }

    #[test]
    fn translate_then_rotate_rotates_about_translated_origin() {
        let mut s = StateStack::default();
        s.translate(100.0, 50.0);
        s.rotate(std::f64::consts::FRAC_PI_2);
        let p = s.current().transform * Point::new(10.0, 0.0);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 60.0).abs() < 1e-9);
    }
}
