//! Arc reconstruction from G02/G03 words

use std::f64::consts::TAU;

use crate::model::{Point, POSITION_EPSILON};

/// Points along the arc from `from` to `to` whose center sits at `from + (i, j)`.
///
/// Returns `samples` points (at least two) including both ends. Clockwise
/// sweeps strictly decrease in angle, counter-clockwise sweeps strictly
/// increase; identical endpoints are a full turn. A zero radius degrades to
/// the straight segment `[from, to]`.
pub fn sample_arc(
    from: Point,
    to: Point,
    i: f64,
    j: f64,
    clockwise: bool,
    samples: usize,
) -> Vec<Point> {
    let center = Point::new(from.x + i, from.y + j);
    let radius = i.hypot(j);

    if radius == 0.0 {
        return vec![from, to];
    }

    let start = (from.y - center.y).atan2(from.x - center.x);
    let mut end = (to.y - center.y).atan2(to.x - center.x);

    if clockwise {
        if end >= start {
            end -= TAU;
        }
    } else if end <= start {
        end += TAU;
    }

    let full_turn =
        (from.x - to.x).abs() <= POSITION_EPSILON && (from.y - to.y).abs() <= POSITION_EPSILON;
    if full_turn {
        end = if clockwise { start - TAU } else { start + TAU };
    }

    let n = samples.max(2);
    let last = (n - 1) as f64;
    (0..n)
        .map(|k| {
            let angle = start + (end - start) * k as f64 / last;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}
