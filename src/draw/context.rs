use std::ops::{Deref, DerefMut};

use crate::foundation::core::{Canvas, Hsb, RectMode};

/// Immediate-mode 2D drawing surface threaded through a render pass.
///
/// Implementations keep a current transform and style (see [`crate::DrawState`]); draw calls
/// use whatever is current when they are issued. `push`/`pop` save and restore both.
pub trait DrawContext {
    /// Surface size.
    fn canvas(&self) -> Canvas;

    /// Paint the whole surface with `color`, ignoring the current transform.
    fn background(&mut self, color: Hsb);

    /// Set the fill color.
    fn fill(&mut self, color: Hsb);
    /// Disable filling.
    fn no_fill(&mut self);

    /// Set the stroke color.
    fn stroke(&mut self, color: Hsb);
    /// Disable stroking.
    fn no_stroke(&mut self);
    /// Set the stroke width.
    fn stroke_weight(&mut self, weight: f64);

    /// Set how `rect` interprets its position.
    fn rect_mode(&mut self, mode: RectMode);

    /// Move the origin.
    fn translate(&mut self, x: f64, y: f64);
    /// Rotate about the origin, clockwise for positive angles.
    fn rotate(&mut self, radians: f64);

    /// Save transform and style.
    fn push(&mut self);
    /// Restore the last saved transform and style.
    fn pop(&mut self);

    /// Draw a rectangle.
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// Draw an ellipse centered on `(x, y)`.
    fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64);
}

/// Saved-state guard returned by [`scoped`]. Restores the context when dropped.
pub struct Scoped<'a, C: DrawContext + ?Sized> {
    ctx: &'a mut C,
}

/// Push the context state; the returned guard pops it on every exit path.
pub fn scoped<C: DrawContext + ?Sized>(ctx: &mut C) -> Scoped<'_, C> {
    ctx.push();
    Scoped { ctx }
}

impl<C: DrawContext + ?Sized> Deref for Scoped<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> DerefMut for Scoped<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> Drop for Scoped<'_, C> {
    fn drop(&mut self) {
        self.ctx.pop();
    }
}
