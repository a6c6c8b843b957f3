//! Spine geometry realisation: centerlines become walkable polygons.
//!
//! Hallway segments expand into rectangles, meeting points grow junction
//! polygons, and everything is clipped to the footprint. Validation here
//! never aborts; findings come back as severity-tagged warnings on the
//! result.

use float_ord::FloatOrd;
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::errors::PlanWarning;
use crate::geometry::{
    perpendicular_offset, polygon_area, polygons_overlap, sutherland_hodgman_clip, Bounds,
    EPSILON,
};
use crate::layout::Room;
use crate::point::Point;
use crate::program::Footprint;

use super::{HallwayNetwork, TrafficPath};

/// Hallways shorter than this are flagged and not materialised.
pub const MIN_HALLWAY_LENGTH: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HallwayPolygon {
    pub id: u32,
    /// CCW outline, possibly trimmed by the footprint clip.
    pub vertices: Vec<Point>,
    pub width: f32,
    pub length: f32,
    pub centerline: (Point, Point),
    pub connects: (u32, u32),
}

impl HallwayPolygon {
    pub fn area(&self) -> f32 {
        polygon_area(&self.vertices)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JunctionPolygon {
    pub id: u32,
    pub vertices: Vec<Point>,
    pub hallway_ids: Vec<u32>,
}

impl JunctionPolygon {
    pub fn area(&self) -> f32 {
        polygon_area(&self.vertices)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpineGeometry {
    pub hallways: Vec<HallwayPolygon>,
    pub junctions: Vec<JunctionPolygon>,
    pub traffic_paths: Vec<TrafficPath>,
    /// Real circulation square footage: hallways plus junctions. Traffic
    /// paths are overlays and stay out of this number.
    pub walled_area: f32,
    pub traffic_path_area: f32,
    pub bounds: Option<Bounds>,
    pub warnings: Vec<PlanWarning>,
}

/// Materialises the hallway network (with any integrated corridors) into
/// polygons and validates the result against the placed rooms.
pub fn generate_spine_geometry(
    network: &HallwayNetwork,
    traffic_paths: &[TrafficPath],
    footprint: &Footprint,
    rooms: &[Room],
) -> SpineGeometry {
    let clip = footprint.bounds().corners().to_vec();
    let mut warnings = Vec::new();
    let mut hallways = Vec::new();

    for segment in &network.segments {
        let length = segment.length();
        if length < MIN_HALLWAY_LENGTH {
            warnings.push(PlanWarning::warning(
                "spine_geometry",
                format!("hallway #{} is shorter than 1 ft and was dropped", segment.id),
            ));
            continue;
        }
        let delta = segment.to_point - segment.from_point;
        if delta.x.abs() > EPSILON && delta.y.abs() > EPSILON {
            warnings.push(PlanWarning::warning(
                "spine_geometry",
                format!("hallway #{} is not axis-aligned", segment.id),
            ));
        }

        let rect = perpendicular_offset(segment.from_point, segment.to_point, segment.width);
        let clipped = sutherland_hodgman_clip(&rect, &clip);
        if polygon_area(&clipped) < EPSILON {
            warnings.push(PlanWarning::warning(
                "spine_geometry",
                format!("hallway #{} lies entirely outside the footprint", segment.id),
            ));
            continue;
        }
        hallways.push(HallwayPolygon {
            id: segment.id,
            vertices: clipped,
            width: segment.width,
            length,
            centerline: segment.centerline(),
            connects: (segment.from_room, segment.to_room),
        });
    }

    let mut junctions = Vec::new();
    for (junction_id, junction) in network.junctions.iter().enumerate() {
        let width = junction
            .segment_ids
            .iter()
            .filter_map(|id| network.segments.iter().find(|s| s.id == *id))
            .map(|s| FloatOrd(s.width))
            .max()
            .map(|w| w.0)
            .unwrap_or(network.width);

        let outline = if junction.segment_ids.len() <= 2 {
            // A simple elbow: a square pad over the meeting point.
            let half = 0.6 * width;
            vec![
                Point::new(junction.point.x - half, junction.point.y - half),
                Point::new(junction.point.x + half, junction.point.y - half),
                Point::new(junction.point.x + half, junction.point.y + half),
                Point::new(junction.point.x - half, junction.point.y + half),
            ]
        } else {
            junction_polygon_vertices(junction.point, &approach_angles(network, junction), 0.6 * width)
        };

        let clipped = sutherland_hodgman_clip(&outline, &clip);
        if polygon_area(&clipped) < EPSILON {
            continue;
        }
        junctions.push(JunctionPolygon {
            id: junction_id as u32,
            vertices: clipped,
            hallway_ids: junction.segment_ids.clone(),
        });
    }

    // Hallways must not cut through rooms other than the two they serve.
    for hallway in &hallways {
        for room in rooms {
            if room.id == hallway.connects.0 || room.id == hallway.connects.1 {
                continue;
            }
            if polygons_overlap(&hallway.vertices, &room.bounds().corners()) {
                warnings.push(PlanWarning::error(
                    "spine_geometry",
                    format!("hallway #{} crosses room '{}'", hallway.id, room.name),
                ));
            }
        }
    }

    let walled_area: f32 = hallways.iter().map(HallwayPolygon::area).sum::<f32>()
        + junctions.iter().map(JunctionPolygon::area).sum::<f32>();
    let traffic_path_area: f32 = traffic_paths.iter().map(|p| p.area).sum();

    let bounds = Bounds::of_points(
        hallways
            .iter()
            .flat_map(|h| h.vertices.iter())
            .chain(junctions.iter().flat_map(|j| j.vertices.iter())),
    );

    debug!(
        "spine geometry: {} hallway(s), {} junction(s), {:.0} sq ft walled, {:.0} sq ft overlay",
        hallways.len(),
        junctions.len(),
        walled_area,
        traffic_path_area
    );

    SpineGeometry {
        hallways,
        junctions,
        traffic_paths: traffic_paths.to_vec(),
        walled_area,
        traffic_path_area,
        bounds,
        warnings,
    }
}

/// The direction each hallway leaves the junction in, as sorted angles.
fn approach_angles(network: &HallwayNetwork, junction: &super::Junction) -> Vec<f32> {
    junction
        .segment_ids
        .iter()
        .filter_map(|id| network.segments.iter().find(|s| s.id == *id))
        .map(|segment| {
            // The far endpoint defines the approach direction.
            let far = if segment.from_point.dist(&junction.point)
                <= segment.to_point.dist(&junction.point)
            {
                segment.to_point
            } else {
                segment.from_point
            };
            (far.y - junction.point.y).atan2(far.x - junction.point.x)
        })
        .sorted_by_key(|a| FloatOrd(*a))
        .collect_vec()
}

/// A 2n-gon inscribed in a circle around the junction: each approach
/// direction contributes the pair of vertices bracketing it, keeping the
/// outline ordered by approach angle.
fn junction_polygon_vertices(center: Point, approaches: &[f32], radius: f32) -> Vec<Point> {
    let n = approaches.len();
    let spread = std::f32::consts::PI / (2.0 * n as f32);
    approaches
        .iter()
        .flat_map(|&theta| [theta - spread, theta + spread])
        .sorted_by_key(|a| FloatOrd(*a))
        .map(|theta| Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin()))
        .collect_vec()
}
