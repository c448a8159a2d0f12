//! The roadnet file format read by the simulator.

use serde::{Deserialize, Serialize};

use crate::math::Point2d;

/// A compiled road network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadnet {
    pub intersections: Vec<IntersectionRecord>,
    pub roads: Vec<RoadRecord>,
}

impl Roadnet {
    /// Finds an intersection by its identifier.
    pub fn intersection(&self, id: &str) -> Option<&IntersectionRecord> {
        self.intersections.iter().find(|i| i.id == id)
    }

    /// Finds a road by its identifier.
    pub fn road(&self, id: &str) -> Option<&RoadRecord> {
        self.roads.iter().find(|r| r.id == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

impl From<Point2d> for PointRecord {
    fn from(p: Point2d) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadRecord {
    pub id: String,
    pub points: Vec<PointRecord>,
    pub lanes: Vec<LaneRecord>,
    pub start_intersection: String,
    pub end_intersection: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneRecord {
    pub width: f64,
    pub max_speed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionRecord {
    pub id: String,
    pub point: PointRecord,
    pub width: f64,
    pub roads: Vec<String>,
    pub road_links: Vec<RoadLinkRecord>,
    pub traffic_light: TrafficLightRecord,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

/// The kind of movement a road link makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnType {
    TurnLeft,
    GoStraight,
    TurnRight,
}

impl TurnType {
    /// Classifies a movement by its number of anticlockwise quarter turns.
    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset {
            -1 => Some(TurnType::TurnRight),
            0 => Some(TurnType::GoStraight),
            1 => Some(TurnType::TurnLeft),
            _ => None,
        }
    }

    /// The number of anticlockwise quarter turns made by the movement.
    pub fn offset(self) -> i32 {
        match self {
            TurnType::TurnRight => -1,
            TurnType::GoStraight => 0,
            TurnType::TurnLeft => 1,
        }
    }

    /// The lane a movement of this kind starts from.
    /// Lane 0 turns left, 1 goes straight and 2 turns right.
    pub fn start_lane(self) -> usize {
        (1 - self.offset()) as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadLinkRecord {
    #[serde(rename = "type")]
    pub turn: TurnType,
    pub start_road: String,
    pub end_road: String,
    /// The direction of travel of the start road.
    pub direction: usize,
    pub lane_links: Vec<LaneLinkRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneLinkRecord {
    pub start_lane_index: usize,
    pub end_lane_index: usize,
    pub points: Vec<PointRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficLightRecord {
    pub road_link_indices: Vec<usize>,
    pub lightphases: Vec<LightPhaseRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightPhaseRecord {
    pub time: f64,
    pub available_road_links: Vec<usize>,
}
