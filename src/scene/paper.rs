use rand::Rng;

use crate::foundation::core::{Canvas, Hsb, Rect};

/// Brightness range of the grain cells.
pub const CELL_BRIGHTNESS: (f64, f64) = (75.0, 95.0);
/// Brightness range of the speckles.
pub const SPECKLE_BRIGHTNESS: (f64, f64) = (40.0, 60.0);
/// Speckle alpha as multiples of the overlay opacity.
pub const SPECKLE_ALPHA_FACTOR: (f64, f64) = (2.5, 3.0);
/// Speckle side length range.
pub const SPECKLE_SIZE: (f64, f64) = (1.0, 3.0);

/// A small dark fleck on top of the grain.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Speckle {
    /// Top-left corner and size.
    pub rect: Rect,
    /// Fill color (gray with its own alpha).
    pub color: Hsb,
}

/// Sampled paper texture for one render pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PaperPlan {
    /// Overlay opacity `p`.
    pub opacity: f64,
    /// Grid step and cell side.
    pub cell: u32,
    /// Grid columns.
    pub cols: u32,
    /// Grid rows.
    pub rows: u32,
    /// Row-major cell brightness, `cols * rows` entries.
    #[serde(skip)]
    pub cell_brightness: Vec<f64>,
    /// Speckles in draw order.
    pub speckles: Vec<Speckle>,
}

impl PaperPlan {
    /// Number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.cell_brightness.len()
    }

    /// Cells as `(rect, color)` in draw order.
    pub fn cells(&self) -> impl Iterator<Item = (Rect, Hsb)> + '_ {
        let side = f64::from(self.cell);
        let cols = self.cols.max(1) as usize;
        self.cell_brightness
            .iter()
            .enumerate()
            .map(move |(idx, &b)| {
                let x = (idx % cols) as f64 * side;
                let y = (idx / cols) as f64 * side;
                (
                    Rect::new(x, y, x + side, y + side),
                    Hsb::gray(b, self.opacity),
                )
            })
    }
}

/// Sample the grain grid and speckles covering `canvas`.
///
/// One cell every `cell` units in both axes (`ceil(w / cell) * ceil(h / cell)` cells), followed
/// by `speckles` flecks with alpha in `[2.5p, 3p)`.
pub fn plan_paper<R: Rng + ?Sized>(
    canvas: Canvas,
    opacity: f64,
    cell: u32,
    speckles: u32,
    rng: &mut R,
) -> PaperPlan {
    let cell = cell.max(1);
    let cols = canvas.width.div_ceil(cell);
    let rows = canvas.height.div_ceil(cell);

    let mut cell_brightness = Vec::with_capacity(cols as usize * rows as usize);
    for _y in 0..rows {
        for _x in 0..cols {
            cell_brightness.push(uniform(rng, CELL_BRIGHTNESS));
        }
    }

    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let speckles = (0..speckles)
        .map(|_| {
            let b = uniform(rng, SPECKLE_BRIGHTNESS);
            let a = uniform(
                rng,
                (
                    SPECKLE_ALPHA_FACTOR.0 * opacity,
                    SPECKLE_ALPHA_FACTOR.1 * opacity,
                ),
            );
            let x = uniform(rng, (0.0, w));
            let y = uniform(rng, (0.0, h));
            let sw = uniform(rng, SPECKLE_SIZE);
            let sh = uniform(rng, SPECKLE_SIZE);
            Speckle {
                rect: Rect::new(x, y, x + sw, y + sh),
                color: Hsb::gray(b, a),
            }
        })
        .collect();

    PaperPlan {
        opacity,
        cell,
        cols,
        rows,
        cell_brightness,
        speckles,
    }
}

/// Uniform draw from `[lo, hi)`; collapses to `lo` when the range is empty.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn grid_covers_canvas_with_ceil_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = plan_paper(Canvas::square(600), 0.3, 2, 30, &mut rng);
        assert_eq!(p.cell_count(), 300 * 300);
        assert_eq!(p.speckles.len(), 30);

        let p = plan_paper(Canvas::square(5), 0.3, 2, 0, &mut rng);
        assert_eq!((p.cols, p.rows), (3, 3));
        assert_eq!(p.cell_count(), 9);
        let last = p.cells().last().unwrap().0;
        assert_eq!(last, Rect::new(4.0, 4.0, 6.0, 6.0));
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let p = plan_paper(Canvas::square(64), 0.3, 2, 200, &mut rng);
        for (_, c) in p.cells() {
            assert!((75.0..95.0).contains(&c.b));
            assert_eq!(c.a, 0.3);
        }
        for s in &p.speckles {
            assert!((40.0..60.0).contains(&s.color.b));
            assert!(s.color.a >= 2.5 * 0.3 && s.color.a < 3.0 * 0.3);
            assert!((0.0..64.0).contains(&s.rect.x0));
            assert!((0.0..64.0).contains(&s.rect.y0));
            assert!((1.0 - 1e-9..3.0 + 1e-9).contains(&s.rect.width()));
            assert!((1.0 - 1e-9..3.0 + 1e-9).contains(&s.rect.height()));
        }
    }

    #[test]
    fn zero_opacity_speckles_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = plan_paper(Canvas::square(4), 0.0, 2, 5, &mut rng);
        assert!(p.speckles.iter().all(|s| s.color.a == 0.0));
    }
}
