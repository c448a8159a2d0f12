use super::{CubicFn, ParametricCurve2d, Point2d, Vector2d};
use crate::util::Interval;

/// A cubic Hermite spline between two points, defined on `t` in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct HermiteCurve2d {
    x: CubicFn,
    y: CubicFn,
}

impl HermiteCurve2d {
    /// Creates a spline leaving `start` with tangent `start_tan`
    /// and arriving at `end` with tangent `end_tan`.
    pub fn new(start: Point2d, start_tan: Vector2d, end: Point2d, end_tan: Vector2d) -> Self {
        Self {
            x: CubicFn::fit(0.0, start.x, start_tan.x, 1.0, end.x, end_tan.x),
            y: CubicFn::fit(0.0, start.y, start_tan.y, 1.0, end.y, end_tan.y),
        }
    }
}

impl ParametricCurve2d for HermiteCurve2d {
    fn sample(&self, t: f64) -> Point2d {
        Point2d::new(self.x.y(t), self.y.y(t))
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, 1.0)
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        Vector2d::new(self.x.dy(t), self.y.dy(t))
    }
}
