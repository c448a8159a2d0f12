//! Partitioning of turn movements into traffic light phases.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use once_cell::sync::Lazy;
use smallvec::SmallVec;

use super::{LightPhaseRecord, TurnType};
use crate::road::Direction;
use crate::{Error, Graph, Result, Vertex};

/// The duration of the first placeholder phase of a virtual intersection.
const VIRTUAL_FIRST_PHASE_TIME: f64 = 5.0;

/// The duration of the remaining placeholder phases of a virtual intersection.
const VIRTUAL_PHASE_TIME: f64 = 30.0;

/// The number of placeholder phases the simulator expects at a virtual intersection.
const NUM_VIRTUAL_PHASES: usize = 9;

/// The number of timing parameters that control one real intersection.
pub const PARAMS_PER_INTERSECTION: usize = 4;

/// Placeholder phases with no active movements, used at virtual intersections.
pub(crate) static VIRTUAL_PHASES: Lazy<Vec<LightPhaseRecord>> = Lazy::new(|| {
    (0..NUM_VIRTUAL_PHASES)
        .map(|i| LightPhaseRecord {
            time: if i == 0 {
                VIRTUAL_FIRST_PHASE_TIME
            } else {
                VIRTUAL_PHASE_TIME
            },
            available_road_links: vec![],
        })
        .collect()
});

/// The phases of a real intersection's signal plan, in cycle order.
///
/// Right turns never conflict with anything on a four-way grid intersection,
/// so they are enabled in every phase. Each other phase adds one kind of
/// movement on one axis. A phase is only left out when it would enable nothing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PhaseCategory {
    RightTurns,
    StraightEastWest,
    StraightNorthSouth,
    LeftEastWest,
    LeftNorthSouth,
}

impl PhaseCategory {
    pub const ALL: [PhaseCategory; 5] = [
        PhaseCategory::RightTurns,
        PhaseCategory::StraightEastWest,
        PhaseCategory::StraightNorthSouth,
        PhaseCategory::LeftEastWest,
        PhaseCategory::LeftNorthSouth,
    ];

    /// Whether a movement belongs to this category in its own right,
    /// ignoring the right turns every phase carries.
    pub fn admits(self, turn: TurnType, direction: Direction) -> bool {
        use PhaseCategory::*;
        match self {
            RightTurns => turn == TurnType::TurnRight,
            StraightEastWest => turn == TurnType::GoStraight && direction.is_east_west(),
            StraightNorthSouth => turn == TurnType::GoStraight && !direction.is_east_west(),
            LeftEastWest => turn == TurnType::TurnLeft && direction.is_east_west(),
            LeftNorthSouth => turn == TurnType::TurnLeft && !direction.is_east_west(),
        }
    }

    /// The index of this category's duration within [`PhaseTimes`],
    /// or `None` for the right turn phase which always uses the default duration.
    pub fn timing_index(self) -> Option<usize> {
        match self {
            PhaseCategory::RightTurns => None,
            other => Some(other as usize - 1),
        }
    }
}

/// The durations of the straight east-west, straight north-south, left east-west
/// and left north-south phases of one intersection.
pub type PhaseTimes = [f64; PARAMS_PER_INTERSECTION];

/// Phase durations for the real intersections of a network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhaseTimings {
    times: BTreeMap<Vertex, PhaseTimes>,
}

impl PhaseTimings {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reshapes a flat parameter vector into per-intersection phase times.
    ///
    /// Parameters are consumed in groups of four per real intersection, in the
    /// order given by [`Graph::real_intersections`]. When `fixed_period` is given
    /// the groups have three parameters and the fourth is inferred so that each
    /// cycle lasts exactly the period.
    pub fn from_parameters(
        graph: &Graph,
        params: &[f64],
        fixed_period: Option<f64>,
    ) -> Result<Self> {
        let per = params_per_intersection(fixed_period);
        let vertices = graph.real_intersections().collect::<Vec<_>>();
        let expected = vertices.len() * per;
        if params.len() != expected {
            return Err(Error::ParameterCount {
                expected,
                got: params.len(),
            });
        }
        let times = vertices
            .into_iter()
            .zip(params.chunks(per))
            .map(|(v, chunk)| (v, complete_phase_times(chunk, fixed_period)))
            .collect();
        Ok(Self { times })
    }

    pub fn insert(&mut self, v: Vertex, times: PhaseTimes) {
        self.times.insert(v, times);
    }

    pub fn get(&self, v: Vertex) -> Option<&PhaseTimes> {
        self.times.get(&v)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// The number of free parameters per real intersection.
pub fn params_per_intersection(fixed_period: Option<f64>) -> usize {
    match fixed_period {
        Some(_) => PARAMS_PER_INTERSECTION - 1,
        None => PARAMS_PER_INTERSECTION,
    }
}

/// Fills in the inferred last phase of a parameter group if the cycle period is fixed.
///
/// An inferred duration that would be negative is clamped to zero.
pub fn complete_phase_times(chunk: &[f64], fixed_period: Option<f64>) -> PhaseTimes {
    let mut times = [0.0; PARAMS_PER_INTERSECTION];
    for (time, value) in times.iter_mut().zip(chunk) {
        *time = *value;
    }
    if let Some(period) = fixed_period {
        let free = PARAMS_PER_INTERSECTION - 1;
        let inferred = period - chunk.iter().take(free).sum::<f64>();
        if inferred < 0.0 {
            log::warn!(
                "Phase times {:?} exceed the fixed period {}; last phase clamped to 0.",
                chunk,
                period
            );
        }
        times[free] = inferred.max(0.0);
    }
    times
}

/// Partitions the road links of a real intersection into non-conflicting phases.
///
/// # Parameters
/// * `links` - The type and start road direction of each road link
/// * `default_time` - The duration of phases without a configured time
/// * `times` - The configured phase times of the intersection, if any
pub(crate) fn partition_phases(
    links: &[(TurnType, Direction)],
    default_time: f64,
    times: Option<&PhaseTimes>,
) -> ArrayVec<LightPhaseRecord, 5> {
    let rights = indices_where(links, |turn, dir| PhaseCategory::RightTurns.admits(turn, dir));

    PhaseCategory::ALL
        .iter()
        .filter_map(|&category| {
            let mut available = indices_where(links, |turn, dir| category.admits(turn, dir));
            available.extend(rights.iter().copied());
            available.sort_unstable();
            available.dedup();
            if available.is_empty() {
                return None;
            }
            let time = category
                .timing_index()
                .and_then(|idx| times.map(|t| t[idx]))
                .unwrap_or(default_time);
            Some(LightPhaseRecord {
                time,
                available_road_links: available.into_vec(),
            })
        })
        .collect()
}

fn indices_where(
    links: &[(TurnType, Direction)],
    pred: impl Fn(TurnType, Direction) -> bool,
) -> SmallVec<[usize; 12]> {
    links
        .iter()
        .enumerate()
        .filter(|(_, (turn, dir))| pred(*turn, *dir))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use crate::road::Direction::*;
    use crate::roadnet::TurnType::*;

    #[test]
    fn four_way_has_five_phases() {
        let links = [
            (TurnRight, East),
            (GoStraight, East),
            (TurnLeft, East),
            (TurnRight, North),
            (GoStraight, North),
            (TurnLeft, North),
            (TurnRight, West),
            (GoStraight, West),
            (TurnLeft, West),
            (TurnRight, South),
            (GoStraight, South),
            (TurnLeft, South),
        ];
        let phases = partition_phases(&links, 30.0, Some(&[10.0, 20.0, 30.0, 40.0]));
        assert_eq!(phases.len(), 5);
        assert_eq!(phases[0].available_road_links, vec![0, 3, 6, 9]);
        assert_eq!(phases[1].available_road_links, vec![0, 1, 3, 6, 7, 9]);
        assert_eq!(phases[2].available_road_links, vec![0, 3, 4, 6, 9, 10]);
        assert_eq!(phases[3].available_road_links, vec![0, 2, 3, 6, 8, 9]);
        assert_eq!(phases[4].available_road_links, vec![0, 3, 5, 6, 9, 11]);
        let times = phases.iter().map(|p| p.time).collect::<Vec<_>>();
        assert_eq!(times, vec![30.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn missing_movements_leave_right_turn_phases() {
        // T junction with no north arm: east-west through traffic, turns from the south
        let links = [
            (GoStraight, East),
            (TurnRight, East),
            (TurnRight, North),
            (TurnLeft, North),
            (GoStraight, West),
            (TurnLeft, West),
        ];
        let phases = partition_phases(&links, 30.0, Some(&[10.0, 20.0, 30.0, 40.0]));
        assert_eq!(phases.len(), 5);
        assert!(phases.iter().all(|p| p.available_road_links.contains(&1)));
        assert!(phases.iter().all(|p| p.available_road_links.contains(&2)));
        // No north-south through traffic, so that phase only carries right turns
        assert_eq!(phases[2].available_road_links, vec![1, 2]);
        let times = phases.iter().map(|p| p.time).collect::<Vec<_>>();
        assert_eq!(times, vec![30.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn phases_without_right_turns_are_dropped() {
        let links = [(GoStraight, East), (GoStraight, West)];
        let phases = partition_phases(&links, 30.0, None);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].available_road_links, vec![0, 1]);
    }

    #[test]
    fn no_links_no_phases() {
        assert!(partition_phases(&[], 30.0, None).is_empty());
    }

    #[test]
    fn virtual_placeholders() {
        assert_eq!(VIRTUAL_PHASES.len(), 9);
        assert_eq!(VIRTUAL_PHASES[0].time, 5.0);
        assert!(VIRTUAL_PHASES[1..].iter().all(|p| p.time == 30.0));
    }

    #[test]
    fn infers_last_phase_from_period() {
        let times = complete_phase_times(&[10.0, 20.0, 5.0], Some(60.0));
        assert_approx_eq!(times[3], 25.0);
        let times = complete_phase_times(&[30.0, 30.0, 30.0], Some(60.0));
        assert_approx_eq!(times[3], 0.0);
        let times = complete_phase_times(&[1.0, 2.0, 3.0, 4.0], None);
        assert_eq!(times, [1.0, 2.0, 3.0, 4.0]);
    }
}
