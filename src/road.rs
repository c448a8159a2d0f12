use cgmath::InnerSpace;
use serde::{Deserialize, Serialize};

use crate::math::Vector2d;
use crate::roadnet::{LaneRecord, RoadRecord};
use crate::Vertex;

/// The number of lanes on every road: left turn, straight and right turn.
pub const NUM_LANES: usize = 3;

/// A compass direction, numbered anticlockwise from east.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// Classifies the direction of travel from `start` to `end`.
    ///
    /// Only axis-aligned segments are meaningful; anything else is reported as west.
    pub fn between(start: Vertex, end: Vertex) -> Self {
        match (start.x == end.x, start.y == end.y) {
            (true, _) if start.y < end.y => Direction::North,
            (true, _) if start.y > end.y => Direction::South,
            (_, true) if start.x < end.x => Direction::East,
            _ => Direction::West,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Gets the direction reached by turning `offset` quarter turns anticlockwise.
    pub fn turn(self, offset: i32) -> Self {
        Self::ALL[(self as i32 + offset).rem_euclid(4) as usize]
    }

    /// The single letter used in road names.
    pub fn letter(self) -> char {
        match self {
            Direction::East => 'E',
            Direction::North => 'N',
            Direction::West => 'W',
            Direction::South => 'S',
        }
    }

    /// Whether the direction lies on the east-west axis.
    pub fn is_east_west(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

/// A directed road segment between two adjacent vertices.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Road {
    pub start: Vertex,
    pub end: Vertex,
    pub direction: Direction,
    /// Lane width in m.
    pub lane_width: f64,
    /// Speed limit in m/s.
    pub max_speed: f64,
}

impl Road {
    pub fn new(start: Vertex, end: Vertex, lane_width: f64, max_speed: f64) -> Self {
        Self {
            start,
            end,
            direction: Direction::between(start, end),
            lane_width,
            max_speed,
        }
    }

    /// The road's identifier, derived from its start and direction.
    pub fn name(&self) -> String {
        road_name(self.start, self.direction)
    }

    /// The unit vector pointing along the road.
    ///
    /// The road must have distinct endpoints.
    pub fn unit_vector(&self) -> Vector2d {
        (self.end.point() - self.start.point()).normalize()
    }

    /// Builds the simulator record for this road.
    pub fn record(&self) -> RoadRecord {
        RoadRecord {
            id: self.name(),
            points: vec![self.start.point().into(), self.end.point().into()],
            lanes: vec![
                LaneRecord {
                    width: self.lane_width,
                    max_speed: self.max_speed,
                };
                NUM_LANES
            ],
            start_intersection: intersection_name(self.start),
            end_intersection: intersection_name(self.end),
        }
    }
}

/// Gets the name of the road leaving `start` in `direction`.
pub fn road_name(start: Vertex, direction: Direction) -> String {
    format!("road_{}_{}_{}", start.x, start.y, direction.letter())
}

/// Gets the name of the intersection at `v`.
pub fn intersection_name(v: Vertex) -> String {
    format!("intersection_{}_{}", v.x, v.y)
}
