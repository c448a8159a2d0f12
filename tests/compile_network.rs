//! Tests that compile whole networks and the demand placed on them.

use roadnet_synth::flow::{all_pairs_shortest_paths, UniformFlowStrategy};
use roadnet_synth::roadnet::TurnType;
use roadnet_synth::scenarios::{grid_graph, i_graph, single_intersection};
use roadnet_synth::{graph_to_flow, graph_to_roadnet, RoadnetConfig, Vertex};

/// Test that every edge becomes a road in each direction.
#[test]
fn roads_in_both_directions() {
    let graph = grid_graph(2, 2, 300);
    let roadnet = graph_to_roadnet(&graph, &RoadnetConfig::default());
    assert_eq!(roadnet.roads.len(), 2 * graph.edges().count());
    assert_eq!(roadnet.intersections.len(), graph.len());
    for road in &roadnet.roads {
        assert_eq!(road.lanes.len(), 3);
        assert!(roadnet.intersection(&road.start_intersection).is_some());
        assert!(roadnet.intersection(&road.end_intersection).is_some());
    }
}

/// Test that dead ends and bends pass traffic through without signals.
#[test]
fn virtual_intersections_have_no_links() {
    let roadnet = graph_to_roadnet(&i_graph(), &RoadnetConfig::default());
    let virtuals = roadnet
        .intersections
        .iter()
        .filter(|i| i.is_virtual)
        .collect::<Vec<_>>();
    assert_eq!(virtuals.len(), 4);
    for i in virtuals {
        assert_eq!(i.width, 0.0);
        assert!(i.road_links.is_empty());
        assert_eq!(i.traffic_light.lightphases.len(), 9);
        assert!(i
            .traffic_light
            .lightphases
            .iter()
            .all(|p| p.available_road_links.is_empty()));
    }
}

/// Test that every movement gets a green, and right turns are always green.
#[test]
fn phases_cover_every_movement() {
    let roadnet = graph_to_roadnet(&grid_graph(2, 2, 300), &RoadnetConfig::default());
    for i in roadnet.intersections.iter().filter(|i| !i.is_virtual) {
        assert_eq!(i.road_links.len(), 12);
        let phases = &i.traffic_light.lightphases;
        assert_eq!(phases.len(), 5);
        for idx in 0..i.road_links.len() {
            let green = phases
                .iter()
                .filter(|p| p.available_road_links.contains(&idx))
                .count();
            if i.road_links[idx].turn == TurnType::TurnRight {
                assert_eq!(green, phases.len());
            } else {
                assert_eq!(green, 1);
            }
        }
    }
}

/// Test that turning paths are sampled at the configured resolution.
#[test]
fn lane_links_are_sampled() {
    let config = RoadnetConfig {
        path_segments: 4,
        ..Default::default()
    };
    let roadnet = graph_to_roadnet(&single_intersection(), &config);
    let centre = roadnet.intersection("intersection_0_0").unwrap();
    for link in &centre.road_links {
        assert_eq!(link.lane_links.len(), 3);
        for lane_link in &link.lane_links {
            assert_eq!(lane_link.points.len(), 5);
        }
    }
}

/// Test that every route refers to roads that exist in the compiled network.
#[test]
fn flows_follow_compiled_roads() {
    let graph = single_intersection();
    let roadnet = graph_to_roadnet(&graph, &RoadnetConfig::default());
    let flows = graph_to_flow(&graph, &mut UniformFlowStrategy::default());
    assert_eq!(flows.len(), 12);
    for flow in &flows {
        assert_eq!(flow.route.len(), 2);
        assert!(flow.route.iter().all(|road| roadnet.road(road).is_some()));
    }
}

/// Test that opposite arms of an intersection are joined through its centre.
#[test]
fn routes_cross_the_centre() {
    let paths = all_pairs_shortest_paths(&single_intersection());
    assert_eq!(paths.len(), 4);
    for (source, routes) in &paths {
        assert_eq!(routes.len(), 3);
        for (dest, route) in routes {
            assert_eq!(route.len(), 3);
            assert_eq!(route[0], *source);
            assert_eq!(route[1], Vertex::new(0, 0));
            assert_eq!(route[2], *dest);
        }
    }
}

/// Test the field names the simulator reads.
#[test]
fn roadnet_json_field_names() {
    let roadnet = graph_to_roadnet(&single_intersection(), &RoadnetConfig::default());
    let value = serde_json::to_value(&roadnet).unwrap();
    let centre = value["intersections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "intersection_0_0")
        .unwrap();
    assert_eq!(centre["virtual"], false);
    assert!(centre["roadLinks"][0]["type"].is_string());
    assert!(centre["roadLinks"][0]["laneLinks"][0]["startLaneIndex"].is_number());
    assert!(centre["trafficLight"]["lightphases"][0]["availableRoadLinks"].is_array());
    assert!(value["roads"][0]["lanes"][0]["maxSpeed"].is_number());
}

/// Test that T junctions keep a phase for every timing parameter.
#[test]
fn t_junctions_keep_five_phases() {
    let roadnet = graph_to_roadnet(&i_graph(), &RoadnetConfig::default());
    let reals = roadnet
        .intersections
        .iter()
        .filter(|i| !i.is_virtual)
        .collect::<Vec<_>>();
    assert_eq!(reals.len(), 2);
    for i in reals {
        assert_eq!(i.road_links.len(), 6);
        let rights = (0..i.road_links.len())
            .filter(|idx| i.road_links[*idx].turn == TurnType::TurnRight)
            .collect::<Vec<_>>();
        assert_eq!(rights.len(), 2);
        let phases = &i.traffic_light.lightphases;
        assert_eq!(phases.len(), 5);
        assert!(phases
            .iter()
            .all(|p| rights.iter().all(|r| p.available_road_links.contains(r))));
    }
}
