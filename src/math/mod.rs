pub mod collinear_2d;
pub mod distance_2d;

/// 2D board coordinate in nanometres.
pub type Coord = nalgebra::Point2<i64>;

/// 2D vector type used for direction computations.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Squared distance (nm²) below which a point is too close to judge its direction (1 µm).
pub const MIN_DIRECTION_DISTANCE_SQ: f64 = 1e6;

/// Angular tolerance (radians) for treating two directions as the same line.
pub const ANGLE_TOLERANCE: f64 = 1e-6;
