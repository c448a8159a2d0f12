//! Lane geometry at intersection boundaries and the paths that join them.

use crate::math::{right_normal, HermiteCurve2d, ParametricCurve2d, Point2d};
use crate::road::Road;

/// The default number of segments a turning path is divided into.
pub const DEFAULT_PATH_SEGMENTS: usize = 10;

/// The lateral offset of the centre of a lane from the road's centre line, in m.
pub fn lane_shift(lane_index: usize, lane_width: f64) -> f64 {
    2.0 * (lane_index as f64 + 0.5) * lane_width
}

/// The point where a lane of `road` leaves the road and enters the intersection at its end.
pub fn out_point(road: &Road, lane_index: usize, intersection_width: f64) -> Point2d {
    let dir = road.unit_vector();
    let shift = lane_shift(lane_index, road.lane_width);
    road.end.point() - dir * intersection_width + right_normal(dir) * shift
}

/// The point where a lane of `road` begins after leaving the intersection at its start.
pub fn in_point(road: &Road, lane_index: usize, intersection_width: f64) -> Point2d {
    let dir = road.unit_vector();
    let shift = lane_shift(lane_index, road.lane_width);
    road.start.point() + dir * intersection_width + right_normal(dir) * shift
}

/// Builds the spline joining a lane of `in_road` to a lane of `out_road`
/// through the intersection between them.
pub fn turn_curve(
    in_road: &Road,
    in_lane: usize,
    out_road: &Road,
    out_lane: usize,
    intersection_width: f64,
) -> HermiteCurve2d {
    HermiteCurve2d::new(
        out_point(in_road, in_lane, intersection_width),
        in_road.unit_vector() * intersection_width,
        in_point(out_road, out_lane, intersection_width),
        out_road.unit_vector() * intersection_width,
    )
}

/// Samples the turning path between two lanes.
///
/// # Parameters
/// * `in_road` - The road entering the intersection
/// * `in_lane` - The lane of `in_road` the movement starts from
/// * `out_road` - The road leaving the intersection
/// * `out_lane` - The lane of `out_road` the movement ends in
/// * `intersection_width` - The distance from the intersection centre to the lane ends
/// * `segments` - The number of segments; `segments + 1` points are returned
pub fn turn_path(
    in_road: &Road,
    in_lane: usize,
    out_road: &Road,
    out_lane: usize,
    intersection_width: f64,
    segments: usize,
) -> Vec<Point2d> {
    turn_curve(in_road, in_lane, out_road, out_lane, intersection_width).sample_uniform(segments)
}
