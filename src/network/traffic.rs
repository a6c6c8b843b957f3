//! Open-plan traffic paths.
//!
//! Open-plan clusters (kitchen/living/dining and friends sharing walls) get
//! overlay circulation: a primary path threading the rooms, a kitchen work
//! zone, and an entry zone. Overlays never consume footprint area; their
//! square footage is reported separately from walled circulation.

use itertools::Itertools;
use serde::Serialize;

use crate::geometry::{polygon_area, shared_wall, Bounds};
use crate::layout::Room;
use crate::point::Point;
use crate::program::RoomType;

pub const PRIMARY_PATH_WIDTH: f32 = 3.0;
pub const KITCHEN_WORK_OFFSET: f32 = 4.0;
pub const ENTRY_ZONE_SIZE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficPathKind {
    PrimaryCirculation,
    SecondaryCirculation,
    KitchenWorkZone,
    FurnitureClearance,
    EntryZone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficPath {
    pub id: u32,
    pub kind: TrafficPathKind,
    /// The open-plan cluster this path belongs to, when it has one.
    pub cluster_id: Option<u32>,
    pub vertices: Vec<Point>,
    pub area: f32,
    pub blocks_furniture: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPlanCluster {
    pub id: u32,
    /// Member room ids, ascending.
    pub rooms: Vec<u32>,
    pub bounds: Bounds,
}

/// Finds contiguous groups of open-plan rooms (two or more) joined by
/// shared walls.
pub fn detect_open_plan_clusters(rooms: &[Room]) -> Vec<OpenPlanCluster> {
    let open: Vec<&Room> = rooms.iter().filter(|r| r.room_type.is_open_plan()).collect();

    let mut component = vec![usize::MAX; open.len()];
    let mut count = 0;
    for i in 0..open.len() {
        if component[i] != usize::MAX {
            continue;
        }
        let label = count;
        count += 1;
        component[i] = label;
        let mut stack = vec![i];
        while let Some(current) = stack.pop() {
            for j in 0..open.len() {
                if component[j] == usize::MAX
                    && shared_wall(&open[current].bounds(), &open[j].bounds(), 1.0).is_some()
                {
                    component[j] = label;
                    stack.push(j);
                }
            }
        }
    }

    let mut clusters = Vec::new();
    for label in 0..count {
        let members: Vec<&Room> = open
            .iter()
            .enumerate()
            .filter(|(i, _)| component[*i] == label)
            .map(|(_, r)| *r)
            .collect();
        if members.len() < 2 {
            continue;
        }
        let bounds = members
            .iter()
            .map(|r| r.bounds())
            .reduce(|a, b| a.union(&b))
            .expect("cluster has members");
        clusters.push(OpenPlanCluster {
            id: clusters.len() as u32,
            rooms: members.iter().map(|r| r.id).collect(),
            bounds,
        });
    }
    clusters
}

/// The primary circulation spine through an open-plan cluster: a 3 ft wide
/// polyline along the room centroids, ordered along the cluster's long
/// axis. It never blocks furniture; it only marks where people walk.
pub fn generate_primary_traffic_path(
    cluster: &OpenPlanCluster,
    rooms: &[Room],
    id: u32,
) -> TrafficPath {
    let mut members: Vec<&Room> = cluster
        .rooms
        .iter()
        .filter_map(|rid| rooms.iter().find(|r| r.id == *rid))
        .collect();
    let horizontal = cluster.bounds.width() >= cluster.bounds.depth();
    members.sort_by(|a, b| {
        let (ka, kb) = if horizontal {
            (a.centroid().x, b.centroid().x)
        } else {
            (a.centroid().y, b.centroid().y)
        };
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal).then(a.id.cmp(&b.id))
    });

    let polyline = members.iter().map(|r| r.centroid()).collect_vec();
    let vertices = offset_polyline(&polyline, PRIMARY_PATH_WIDTH);
    let length: f32 = polyline.windows(2).map(|pair| pair[0].dist(&pair[1])).sum();

    TrafficPath {
        id,
        kind: TrafficPathKind::PrimaryCirculation,
        cluster_id: Some(cluster.id),
        vertices,
        area: length * PRIMARY_PATH_WIDTH,
        blocks_furniture: false,
    }
}

/// The kitchen work zone: the kitchen rectangle pulled in 4 ft from the
/// counter walls. Kitchens too small to keep a positive core get none.
pub fn generate_kitchen_work_zone(
    cluster: &OpenPlanCluster,
    rooms: &[Room],
    id: u32,
) -> Option<TrafficPath> {
    let kitchen = cluster
        .rooms
        .iter()
        .filter_map(|rid| rooms.iter().find(|r| r.id == *rid))
        .find(|r| r.room_type == RoomType::Kitchen)?;
    let bounds = kitchen.bounds();
    let inset = Bounds::new(
        Point::new(bounds.min.x + KITCHEN_WORK_OFFSET, bounds.min.y + KITCHEN_WORK_OFFSET),
        Point::new(bounds.max.x - KITCHEN_WORK_OFFSET, bounds.max.y - KITCHEN_WORK_OFFSET),
    );
    if inset.width() <= 0.0 || inset.depth() <= 0.0 {
        return None;
    }
    Some(TrafficPath {
        id,
        kind: TrafficPathKind::KitchenWorkZone,
        cluster_id: Some(cluster.id),
        vertices: inset.corners().to_vec(),
        area: inset.area(),
        blocks_furniture: true,
    })
}

/// The clear zone just inside the primary entry.
pub fn generate_entry_zone(entry_point: Point, id: u32) -> TrafficPath {
    let half = ENTRY_ZONE_SIZE / 2.0;
    let bounds = Bounds::new(
        Point::new(entry_point.x - half, entry_point.y - half),
        Point::new(entry_point.x + half, entry_point.y + half),
    );
    TrafficPath {
        id,
        kind: TrafficPathKind::EntryZone,
        cluster_id: None,
        vertices: bounds.corners().to_vec(),
        area: bounds.area(),
        blocks_furniture: true,
    }
}

/// All overlay paths for a layout: one primary path and work zone per
/// cluster, plus the entry zone when an entry point is known.
pub fn generate_traffic_paths(
    clusters: &[OpenPlanCluster],
    rooms: &[Room],
    entry_point: Option<Point>,
) -> Vec<TrafficPath> {
    let mut paths = Vec::new();
    let mut id = 0;
    for cluster in clusters {
        paths.push(generate_primary_traffic_path(cluster, rooms, id));
        id += 1;
        if let Some(zone) = generate_kitchen_work_zone(cluster, rooms, id) {
            paths.push(zone);
            id += 1;
        }
    }
    if let Some(entry) = entry_point {
        paths.push(generate_entry_zone(entry, id));
    }
    paths
}

/// Expands a polyline into a closed polygon of the given width: left-side
/// offsets out, right-side offsets back. Interior vertices use the averaged
/// normal of their adjacent segments.
fn offset_polyline(polyline: &[Point], width: f32) -> Vec<Point> {
    let half = width / 2.0;
    match polyline {
        [] => Vec::new(),
        [single] => {
            // Degenerate path: a square pad around the point.
            Bounds::new(
                Point::new(single.x - half, single.y - half),
                Point::new(single.x + half, single.y + half),
            )
            .corners()
            .to_vec()
        }
        _ => {
            let normals: Vec<Point> = (0..polyline.len())
                .map(|i| {
                    let before = if i == 0 { None } else { Some(polyline[i] - polyline[i - 1]) };
                    let after = if i + 1 == polyline.len() {
                        None
                    } else {
                        Some(polyline[i + 1] - polyline[i])
                    };
                    let dir = match (before, after) {
                        (Some(a), Some(b)) => (a.normalized() + b.normalized()).normalized(),
                        (Some(a), None) => a.normalized(),
                        (None, Some(b)) => b.normalized(),
                        (None, None) => Point::new(1.0, 0.0),
                    };
                    dir.perpendicular()
                })
                .collect();

            let mut vertices = Vec::with_capacity(polyline.len() * 2);
            for (p, n) in polyline.iter().zip(normals.iter()) {
                vertices.push(*p + *n * half);
            }
            for (p, n) in polyline.iter().zip(normals.iter()).rev() {
                vertices.push(*p - *n * half);
            }
            vertices
        }
    }
}

/// Total overlay area. Kept separate from walled circulation on purpose.
pub fn total_overlay_area(paths: &[TrafficPath]) -> f32 {
    paths.iter().map(|p| p.area).sum()
}

/// Checked area of a path polygon, for validation.
pub fn path_polygon_area(path: &TrafficPath) -> f32 {
    polygon_area(&path.vertices)
}
