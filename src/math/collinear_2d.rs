use std::f64::consts::PI;

use super::distance_2d::delta;
use super::{Coord, Vector2};

/// Returns the direction angle of `v`, folded into `[0, π)`.
///
/// A line and its reverse share the same folded angle.
#[must_use]
pub fn direction_angle(v: &Vector2) -> f64 {
    let mut angle = v.y.atan2(v.x);
    if angle < 0.0 {
        angle += PI;
    }
    if angle >= PI {
        angle -= PI;
    }
    angle
}

/// Returns the difference between two folded angles, measured around the
/// `[0, π)` circle so that directions just above 0 and just below π are close.
#[must_use]
pub fn line_angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(PI - diff)
}

/// Returns the unit direction of the line through all `points`, or `None` if
/// they do not lie on one line through the first point.
///
/// Points whose squared distance to the first point is not above
/// `min_distance_sq` carry no reliable direction and are skipped; the reference
/// direction comes from the first point that is far enough away. When no point
/// is far enough, the x axis is returned. Fewer than three points always have a
/// direction.
#[must_use]
pub fn line_direction(
    points: &[Coord],
    min_distance_sq: f64,
    angle_tolerance: f64,
) -> Option<Vector2> {
    let x_axis = Vector2::new(1.0, 0.0);
    let Some((origin, rest)) = points.split_first() else {
        return Some(x_axis);
    };

    let mut reference: Option<(f64, Vector2)> = None;
    for p in rest {
        let v = delta(origin, p);
        if v.norm_squared() <= min_distance_sq {
            continue;
        }
        let angle = direction_angle(&v);
        match reference {
            None => reference = Some((angle, v.normalize())),
            Some((a0, _)) => {
                if line_angle_difference(angle, a0) > angle_tolerance {
                    return None;
                }
            }
        }
    }
    Some(reference.map_or(x_axis, |(_, dir)| dir))
}

/// Checks whether all `points` lie on one line through the first point.
///
/// See [`line_direction`] for how near points are treated.
#[must_use]
pub fn are_collinear(points: &[Coord], min_distance_sq: f64, angle_tolerance: f64) -> bool {
    line_direction(points, min_distance_sq, angle_tolerance).is_some()
}
