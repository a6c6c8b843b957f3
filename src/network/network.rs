//! Minimum hallway network.
//!
//! Every room that needs hallway service (direct or indirect access) gets
//! connected to the public zone through a spanning tree of centerline
//! segments weighted by centroid distance. Segments that merely duplicate an
//! existing shared wall are dropped, and points where several segments meet
//! become junctions.

mod cluster;
mod spine;
mod traffic;
#[cfg(test)]
mod test;

pub use cluster::{
    corridor_to_segments, detect_bedroom_clusters, generate_cluster_corridor, BedroomCluster,
    CorridorAxis, CorridorDoor, CorridorSide, CorridorSpec, CLUSTER_PROXIMITY,
    DEFAULT_CORRIDOR_WIDTH, HALL_BATH_REACH, MIN_CORRIDOR_WIDTH,
};
pub use spine::{generate_spine_geometry, HallwayPolygon, JunctionPolygon, SpineGeometry};
pub use traffic::{
    detect_open_plan_clusters, generate_entry_zone, generate_kitchen_work_zone,
    generate_primary_traffic_path, generate_traffic_paths, OpenPlanCluster, TrafficPath,
    TrafficPathKind,
};

use itertools::Itertools;
use log::debug;
use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::UnGraph;
use serde::Serialize;

use crate::geometry::{segment_intersection, shared_wall};
use crate::layout::Room;
use crate::point::Point;
use crate::program::{AccessType, RoomType};

/// One straight hallway centerline between two rooms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HallwaySegment {
    pub id: u32,
    pub from_room: u32,
    pub from_point: Point,
    pub to_room: u32,
    pub to_point: Point,
    pub width: f32,
}

impl HallwaySegment {
    pub fn length(&self) -> f32 {
        self.from_point.dist(&self.to_point)
    }

    pub fn centerline(&self) -> (Point, Point) {
        (self.from_point, self.to_point)
    }
}

/// A spot where hallway endpoints meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Junction {
    pub point: Point,
    pub segment_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HallwayNetwork {
    pub segments: Vec<HallwaySegment>,
    pub junctions: Vec<Junction>,
    pub width: f32,
}

impl HallwayNetwork {
    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(|s| s.length()).sum()
    }

    pub fn next_segment_id(&self) -> u32 {
        self.segments.iter().map(|s| s.id + 1).max().unwrap_or(0)
    }

    /// Appends externally generated segments (bedroom corridors) and
    /// refreshes the junction list.
    pub fn integrate_segments(&mut self, extra: Vec<HallwaySegment>) {
        self.segments.extend(extra);
        self.junctions = detect_junctions(&self.segments, self.width);
    }
}

/// Which rooms the hallway tree must serve.
fn needs_hallway_service(room_type: RoomType) -> bool {
    matches!(room_type.access(), AccessType::Direct | AccessType::Indirect)
}

/// Picks the room anchoring the tree to the public zone: a foyer when there
/// is one, otherwise any hub, otherwise the first shared room.
fn public_anchor(rooms: &[Room]) -> Option<u32> {
    rooms
        .iter()
        .find(|r| r.room_type == RoomType::Foyer)
        .or_else(|| rooms.iter().find(|r| r.room_type.access() == AccessType::Hub))
        .or_else(|| rooms.iter().find(|r| r.room_type.access() == AccessType::Shared))
        .map(|r| r.id)
}

/// Builds the minimum hallway network for a set of placed rooms.
pub fn compute_hallway_network(rooms: &[Room], width: f32) -> HallwayNetwork {
    let mut members: Vec<&Room> =
        rooms.iter().filter(|r| needs_hallway_service(r.room_type)).collect();
    if let Some(anchor) = public_anchor(rooms) {
        if !members.iter().any(|r| r.id == anchor) {
            if let Some(room) = rooms.iter().find(|r| r.id == anchor) {
                members.push(room);
            }
        }
    }
    if members.len() < 2 {
        return HallwayNetwork { segments: Vec::new(), junctions: Vec::new(), width };
    }
    members.sort_by_key(|r| r.id);

    // Complete graph on member centroids, weighted by distance.
    let mut graph = UnGraph::<u32, f32>::new_undirected();
    let indices = members.iter().map(|r| graph.add_node(r.id)).collect_vec();
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            let weight = members[i].centroid().dist(&members[j].centroid());
            graph.add_edge(indices[i], indices[j], weight);
        }
    }

    let mut segments = Vec::new();
    let mut next_id = 0;
    for element in min_spanning_tree(&graph) {
        let Element::Edge { source, target, .. } = element else {
            continue;
        };
        let from = members[source];
        let to = members[target];
        // Rooms already joined along a wall don't need a hallway between
        // them.
        if shared_wall(&from.bounds(), &to.bounds(), 1.0).is_some() {
            continue;
        }
        segments.push(HallwaySegment {
            id: next_id,
            from_room: from.id,
            from_point: wall_point_toward(from, to.centroid()),
            to_room: to.id,
            to_point: wall_point_toward(to, from.centroid()),
            width,
        });
        next_id += 1;
    }

    let junctions = detect_junctions(&segments, width);
    debug!(
        "hallway network: {} segment(s), {} junction(s), {:.0} ft total",
        segments.len(),
        junctions.len(),
        segments.iter().map(HallwaySegment::length).sum::<f32>()
    );
    HallwayNetwork { segments, junctions, width }
}

/// The point where the line from a room's centroid toward `target` crosses
/// the room boundary. Falls back to the centroid when the target sits
/// inside the room.
fn wall_point_toward(room: &Room, target: Point) -> Point {
    let bounds = room.bounds();
    let center = room.centroid();
    if bounds.contains_point(target) {
        return center;
    }
    let corners = bounds.corners();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        if let Some(hit) = segment_intersection(center, target, a, b) {
            return hit;
        }
    }
    center
}

/// Groups segment endpoints that fall within `2 * width` of each other;
/// every group touched by at least two distinct segments becomes a
/// junction at the group's mean point.
pub fn detect_junctions(segments: &[HallwaySegment], width: f32) -> Vec<Junction> {
    let mut endpoints: Vec<(u32, Point)> = Vec::new();
    for segment in segments {
        endpoints.push((segment.id, segment.from_point));
        endpoints.push((segment.id, segment.to_point));
    }

    let reach = 2.0 * width;
    let mut assigned = vec![false; endpoints.len()];
    let mut junctions = Vec::new();
    for i in 0..endpoints.len() {
        if assigned[i] {
            continue;
        }
        let mut group = vec![i];
        assigned[i] = true;
        for (j, endpoint) in endpoints.iter().enumerate().skip(i + 1) {
            if !assigned[j] && endpoints[i].1.dist(&endpoint.1) < reach {
                assigned[j] = true;
                group.push(j);
            }
        }

        let mut segment_ids: Vec<u32> = group.iter().map(|&k| endpoints[k].0).collect();
        segment_ids.sort_unstable();
        segment_ids.dedup();
        if segment_ids.len() < 2 {
            continue;
        }
        let mut sum = Point::default();
        for &k in &group {
            sum += endpoints[k].1;
        }
        junctions.push(Junction { point: sum / group.len() as f32, segment_ids });
    }
    junctions
}
