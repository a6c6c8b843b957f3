//! Bedroom cluster detection and shared-corridor synthesis.
//!
//! Groups of nearby bedrooms share one corridor instead of each getting its
//! own hallway run. The cluster detector also identifies the primary suite
//! and which bathrooms the corridor has to serve.

use log::debug;
use serde::Serialize;

use crate::geometry::{shared_wall, Bounds};
use crate::layout::Room;
use crate::point::Point;
use crate::program::{is_primary_name, RoomType};

use super::HallwaySegment;

/// Bedrooms closer than this (centroid to centroid) cluster together.
pub const CLUSTER_PROXIMITY: f32 = 30.0;
/// Bathrooms within this reach of the cluster bounds become hall bathrooms.
pub const HALL_BATH_REACH: f32 = 25.0;
pub const DEFAULT_CORRIDOR_WIDTH: f32 = 3.5;
pub const MIN_CORRIDOR_WIDTH: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedroomCluster {
    pub id: u32,
    /// Member bedroom ids, ascending.
    pub bedrooms: Vec<u32>,
    pub hall_bathrooms: Vec<u32>,
    pub primary_suite: Option<u32>,
    pub ensuite: Option<u32>,
    pub bounds: Bounds,
    pub corridor_axis: CorridorAxis,
    /// Where the cluster faces the public zone: the midpoint of the bounds
    /// edge the corridor will run along.
    pub public_connection_point: Point,
}

/// Detects clusters of two or more bedrooms.
pub fn detect_bedroom_clusters(rooms: &[Room]) -> Vec<BedroomCluster> {
    let bedrooms: Vec<&Room> =
        rooms.iter().filter(|r| r.room_type == RoomType::Bedroom).collect();

    // Proximity components over bedroom centroids.
    let mut component = vec![usize::MAX; bedrooms.len()];
    let mut component_count = 0;
    for i in 0..bedrooms.len() {
        if component[i] != usize::MAX {
            continue;
        }
        let label = component_count;
        component_count += 1;
        let mut stack = vec![i];
        component[i] = label;
        while let Some(current) = stack.pop() {
            for j in 0..bedrooms.len() {
                if component[j] == usize::MAX
                    && bedrooms[current].centroid().dist(&bedrooms[j].centroid())
                        < CLUSTER_PROXIMITY
                {
                    component[j] = label;
                    stack.push(j);
                }
            }
        }
    }

    let mut clusters = Vec::new();
    for label in 0..component_count {
        let members: Vec<&Room> = bedrooms
            .iter()
            .enumerate()
            .filter(|(i, _)| component[*i] == label)
            .map(|(_, r)| *r)
            .collect();
        if members.len() < 2 {
            continue;
        }
        clusters.push(build_cluster(clusters.len() as u32, &members, rooms));
    }
    debug!("detected {} bedroom cluster(s)", clusters.len());
    clusters
}

fn build_cluster(id: u32, members: &[&Room], rooms: &[Room]) -> BedroomCluster {
    let bounds = members
        .iter()
        .map(|r| r.bounds())
        .reduce(|a, b| a.union(&b))
        .expect("cluster has members");

    let primary_suite = detect_primary_suite(members, rooms);
    let ensuite = primary_suite.and_then(|primary_id| {
        let primary = rooms.iter().find(|r| r.id == primary_id)?;
        let adjacent: Vec<&Room> = rooms
            .iter()
            .filter(|r| {
                r.room_type == RoomType::Bathroom
                    && shared_wall(&primary.bounds(), &r.bounds(), 1.0).is_some()
            })
            .collect();
        adjacent
            .iter()
            .find(|r| r.is_primary || is_primary_name(&r.name))
            .or_else(|| adjacent.first())
            .map(|r| r.id)
    });

    let hall_bathrooms: Vec<u32> = rooms
        .iter()
        .filter(|r| {
            r.room_type == RoomType::Bathroom
                && Some(r.id) != ensuite
                && bounds.distance_to_point(r.centroid()) <= HALL_BATH_REACH
        })
        .map(|r| r.id)
        .collect();

    let corridor_axis = if bounds.width() >= bounds.depth() {
        CorridorAxis::Horizontal
    } else {
        CorridorAxis::Vertical
    };

    // Face the corridor toward the public rooms; without any, default to
    // the south/west side.
    let public_centroid = public_zone_centroid(rooms).unwrap_or(Point::new(
        bounds.center().x - 1.0,
        bounds.center().y - 1.0,
    ));
    let center = bounds.center();
    let public_connection_point = match corridor_axis {
        CorridorAxis::Horizontal => {
            if public_centroid.y <= center.y {
                Point::new(center.x, bounds.min.y)
            } else {
                Point::new(center.x, bounds.max.y)
            }
        }
        CorridorAxis::Vertical => {
            if public_centroid.x <= center.x {
                Point::new(bounds.min.x, center.y)
            } else {
                Point::new(bounds.max.x, center.y)
            }
        }
    };

    BedroomCluster {
        id,
        bedrooms: members.iter().map(|r| r.id).collect(),
        hall_bathrooms,
        primary_suite,
        ensuite,
        bounds,
        corridor_axis,
        public_connection_point,
    }
}

/// Primary-suite heuristic: a naming match wins; otherwise the largest
/// bedroom that has a bathroom on a shared wall. Equal areas fall back to
/// input order (the earlier room keeps the title).
fn detect_primary_suite(members: &[&Room], rooms: &[Room]) -> Option<u32> {
    if let Some(named) = members.iter().find(|r| r.is_primary || is_primary_name(&r.name)) {
        return Some(named.id);
    }
    let mut best: Option<&Room> = None;
    for room in members {
        let has_bath = rooms.iter().any(|other| {
            other.room_type == RoomType::Bathroom
                && shared_wall(&room.bounds(), &other.bounds(), 1.0).is_some()
        });
        if !has_bath {
            continue;
        }
        if best.map_or(true, |b| room.area() > b.area()) {
            best = Some(room);
        }
    }
    best.map(|r| r.id)
}

fn public_zone_centroid(rooms: &[Room]) -> Option<Point> {
    let public: Vec<&Room> = rooms
        .iter()
        .filter(|r| r.room_type.is_open_plan() || r.room_type == RoomType::Foyer)
        .collect();
    if public.is_empty() {
        return None;
    }
    let mut sum = Point::default();
    for room in &public {
        sum += room.centroid();
    }
    Some(sum / public.len() as f32)
}

/// Which side of the corridor a door opens toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorridorDoor {
    pub room_id: u32,
    /// Door center on the corridor centerline.
    pub position: Point,
    pub side: CorridorSide,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorridorSpec {
    pub cluster_id: u32,
    pub centerline: (Point, Point),
    pub width: f32,
    pub length: f32,
    pub axis: CorridorAxis,
    pub doors: Vec<CorridorDoor>,
}

const DOOR_WIDTH: f32 = 3.0;
const DOOR_CORNER_OFFSET: f32 = 1.5;

/// Synthesises the shared corridor for a cluster: a centerline run parallel
/// to the cluster's long axis, pushed `width / 2 + 0.5` ft outside the
/// bounds on the public side, with one evenly spaced door per served room.
pub fn generate_cluster_corridor(
    cluster: &BedroomCluster,
    rooms: &[Room],
    width: f32,
) -> CorridorSpec {
    let width = width.max(MIN_CORRIDOR_WIDTH);
    let door_count = cluster.bedrooms.len() + cluster.hall_bathrooms.len();
    let length = 4.0 * door_count as f32 + 8.0;
    let offset = width / 2.0 + 0.5;
    let center = cluster.bounds.center();

    let (start, end) = match cluster.corridor_axis {
        CorridorAxis::Horizontal => {
            let y = if cluster.public_connection_point.y <= center.y {
                cluster.bounds.min.y - offset
            } else {
                cluster.bounds.max.y + offset
            };
            (
                Point::new(center.x - length / 2.0, y),
                Point::new(center.x + length / 2.0, y),
            )
        }
        CorridorAxis::Vertical => {
            let x = if cluster.public_connection_point.x <= center.x {
                cluster.bounds.min.x - offset
            } else {
                cluster.bounds.max.x + offset
            };
            (
                Point::new(x, center.y - length / 2.0),
                Point::new(x, center.y + length / 2.0),
            )
        }
    };

    // Served rooms in order along the corridor axis, so door i belongs to
    // the i-th room along the run.
    let mut served: Vec<&Room> = cluster
        .bedrooms
        .iter()
        .chain(cluster.hall_bathrooms.iter())
        .filter_map(|id| rooms.iter().find(|r| r.id == *id))
        .collect();
    served.sort_by(|a, b| {
        let (ka, kb) = match cluster.corridor_axis {
            CorridorAxis::Horizontal => (a.centroid().x, b.centroid().x),
            CorridorAxis::Vertical => (a.centroid().y, b.centroid().y),
        };
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal).then(a.id.cmp(&b.id))
    });

    let run = end - start;
    let min_inset = DOOR_CORNER_OFFSET + DOOR_WIDTH / 2.0;
    let doors = served
        .iter()
        .enumerate()
        .map(|(i, room)| {
            let t = (i + 1) as f32 / (door_count + 1) as f32;
            let mut along = t * length;
            along = along.clamp(min_inset, length - min_inset);
            let position = start + run.normalized() * along;
            let side = match cluster.corridor_axis {
                CorridorAxis::Horizontal => {
                    if room.centroid().y > position.y {
                        CorridorSide::Left
                    } else {
                        CorridorSide::Right
                    }
                }
                CorridorAxis::Vertical => {
                    if room.centroid().x < position.x {
                        CorridorSide::Left
                    } else {
                        CorridorSide::Right
                    }
                }
            };
            CorridorDoor { room_id: room.id, position, side, width: DOOR_WIDTH }
        })
        .collect();

    CorridorSpec {
        cluster_id: cluster.id,
        centerline: (start, end),
        width,
        length,
        axis: cluster.corridor_axis,
        doors,
    }
}

/// Converts a corridor into hallway segments: the main run plus a short
/// perpendicular stub from each door to its room wall.
pub fn corridor_to_segments(
    spec: &CorridorSpec,
    rooms: &[Room],
    first_id: u32,
) -> Vec<HallwaySegment> {
    let mut segments = Vec::new();
    let mut id = first_id;

    let (anchor_from, anchor_to) = match (spec.doors.first(), spec.doors.last()) {
        (Some(first), Some(last)) => (first.room_id, last.room_id),
        _ => return segments,
    };
    segments.push(HallwaySegment {
        id,
        from_room: anchor_from,
        from_point: spec.centerline.0,
        to_room: anchor_to,
        to_point: spec.centerline.1,
        width: spec.width,
    });
    id += 1;

    for door in &spec.doors {
        let Some(room) = rooms.iter().find(|r| r.id == door.room_id) else {
            continue;
        };
        // Nearest point on the room rectangle: the stub's far end.
        let bounds = room.bounds();
        let wall = Point::new(
            door.position.x.clamp(bounds.min.x, bounds.max.x),
            door.position.y.clamp(bounds.min.y, bounds.max.y),
        );
        segments.push(HallwaySegment {
            id,
            from_room: door.room_id,
            from_point: door.position,
            to_room: door.room_id,
            to_point: wall,
            width: door.width,
        });
        id += 1;
    }
    segments
}
