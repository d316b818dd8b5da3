use super::{Coord, Vector2};

/// Returns the exact squared Euclidean distance between two coordinates.
///
/// Saturates at `u128::MAX` only when both axis deltas are close to the full `i64` span.
#[must_use]
pub fn distance_squared(a: &Coord, b: &Coord) -> u128 {
    let dx = u128::from(a.x.abs_diff(b.x));
    let dy = u128::from(a.y.abs_diff(b.y));
    (dx * dx).saturating_add(dy * dy)
}

/// Returns the Euclidean distance between two coordinates.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distance(a: &Coord, b: &Coord) -> f64 {
    (distance_squared(a, b) as f64).sqrt()
}

/// Returns the vector from `from` to `to` in floating point.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn delta(from: &Coord, to: &Coord) -> Vector2 {
    Vector2::new(
        (i128::from(to.x) - i128::from(from.x)) as f64,
        (i128::from(to.y) - i128::from(from.y)) as f64,
    )
}
