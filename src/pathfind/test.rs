use super::*;
use crate::catalog::{RoomSizeOption, SizeTier};
use crate::geometry::perpendicular_offset;
use crate::layout::Room;
use crate::network::{HallwayPolygon, SpineGeometry};
use crate::point::Point;
use crate::program::RoomType;

fn rect(x: f32, y: f32, w: f32, d: f32) -> Vec<Point> {
    crate::geometry::Bounds::from_origin_size(Point::new(x, y), w, d)
        .corners()
        .to_vec()
}

fn room(id: u32, name: &str, room_type: RoomType, x: f32, y: f32, w: f32, d: f32) -> Room {
    Room {
        id,
        name: name.to_string(),
        room_type,
        is_primary: false,
        size: RoomSizeOption { width: w, depth: d, area: w * d, tier: SizeTier::Minimum, description: "test room" },
        origin: Point::new(x, y),
    }
}

fn empty_geometry() -> SpineGeometry {
    SpineGeometry {
        hallways: Vec::new(),
        junctions: Vec::new(),
        traffic_paths: Vec::new(),
        walled_area: 0.0,
        traffic_path_area: 0.0,
        bounds: None,
        warnings: Vec::new(),
    }
}

fn hallway_polygon(id: u32, from: Point, to: Point, width: f32, connects: (u32, u32)) -> HallwayPolygon {
    HallwayPolygon {
        id,
        vertices: perpendicular_offset(from, to, width).to_vec(),
        width,
        length: from.dist(&to),
        centerline: (from, to),
        connects,
    }
}

#[test]
fn straight_corridor_path_is_optimal() {
    let walkable = vec![rect(0.0, 0.0, 10.0, 1.0)];
    let path = a_star_polygons(&walkable, &[], Point::new(0.5, 0.5), Point::new(9.5, 0.5)).unwrap();
    assert!(!path.points.is_empty());
    let start = path.points.first().unwrap();
    let goal = path.points.last().unwrap();
    let straight = start.dist(goal);
    // Optimal on a straight corridor: the grid path costs what the crow
    // flies (within one cell of rounding).
    assert!((path.cost - straight).abs() <= GRID_RESOLUTION + 1e-3);
}

#[test]
fn diagonal_moves_cost_sqrt_two() {
    let walkable = vec![rect(0.0, 0.0, 10.0, 10.0)];
    let path = a_star_polygons(&walkable, &[], Point::new(0.5, 0.5), Point::new(9.5, 9.5)).unwrap();
    let start = path.points.first().unwrap();
    let goal = path.points.last().unwrap();
    let straight = start.dist(goal);
    assert!((path.cost - straight).abs() <= 2.0 * GRID_RESOLUTION);
}

#[test]
fn disjoint_polygons_have_no_path() {
    let walkable = vec![rect(0.0, 0.0, 5.0, 5.0), rect(20.0, 0.0, 5.0, 5.0)];
    assert!(a_star_polygons(&walkable, &[], Point::new(2.0, 2.0), Point::new(22.0, 2.0)).is_none());
}

#[test]
fn obstacles_force_a_detour() {
    let walkable = vec![rect(0.0, 0.0, 20.0, 10.0)];
    let wall = vec![rect(9.0, 0.0, 2.0, 8.0)];
    let direct =
        a_star_polygons(&walkable, &[], Point::new(1.0, 1.0), Point::new(19.0, 1.0)).unwrap();
    let detour =
        a_star_polygons(&walkable, &wall, Point::new(1.0, 1.0), Point::new(19.0, 1.0)).unwrap();
    assert!(detour.cost > direct.cost + 2.0);
}

#[test]
fn corner_contact_cannot_be_cut() {
    // Two squares meeting only at a corner: the diagonal step would cut the
    // corner, which is forbidden.
    let walkable = vec![rect(0.0, 0.0, 5.0, 5.0), rect(5.0, 5.0, 5.0, 5.0)];
    assert!(a_star_polygons(&walkable, &[], Point::new(2.0, 2.0), Point::new(8.0, 8.0)).is_none());
}

#[test]
fn endpoints_snap_to_nearby_walkable_cells() {
    let walkable = vec![rect(0.0, 0.0, 10.0, 5.0)];
    // Start sits 2 ft outside the polygon, well within the snap radius.
    let path =
        a_star_polygons(&walkable, &[], Point::new(-2.0, 2.0), Point::new(9.0, 2.0)).unwrap();
    assert!(path.points.first().unwrap().x >= 0.0);
}

#[test]
fn endpoints_too_far_away_fail() {
    let walkable = vec![rect(0.0, 0.0, 10.0, 5.0)];
    // 20 ft away is past the 10-cell snap radius.
    assert!(a_star_polygons(&walkable, &[], Point::new(-20.0, 2.0), Point::new(9.0, 2.0)).is_none());
}

#[test]
fn same_cell_start_and_goal() {
    let walkable = vec![rect(0.0, 0.0, 5.0, 5.0)];
    let path = a_star_polygons(&walkable, &[], Point::new(2.0, 2.0), Point::new(2.1, 2.0)).unwrap();
    assert!(path.cost <= GRID_RESOLUTION);
}

#[test]
fn pathfinding_is_deterministic() {
    let walkable = vec![rect(0.0, 0.0, 20.0, 20.0)];
    let a = a_star_polygons(&walkable, &[], Point::new(1.0, 1.0), Point::new(18.0, 16.0)).unwrap();
    let b = a_star_polygons(&walkable, &[], Point::new(1.0, 1.0), Point::new(18.0, 16.0)).unwrap();
    assert_eq!(a, b);
}

// ── Reachability validation ─────────────────────────────────────────────

#[test]
fn isolated_room_is_reported_unreachable() {
    let rooms = vec![
        room(0, "Foyer", RoomType::Foyer, 0.0, 0.0, 8.0, 8.0),
        room(1, "Living", RoomType::Living, 8.0, 0.0, 14.0, 14.0),
        room(2, "Room X", RoomType::Bedroom, 100.0, 100.0, 11.0, 11.0),
    ];
    let report =
        validate_all_rooms_reachable(&rooms, &empty_geometry(), &[], "Foyer").unwrap();
    assert!(!report.all_reachable);
    assert_eq!(report.unreachable, vec!["Room X"]);
    assert_eq!(report.reachable, vec!["Living"]);
    let x = report.results.iter().find(|r| r.room == "Room X").unwrap();
    assert!(!x.found);
    assert!(x.path.is_empty());
}

#[test]
fn hallway_geometry_connects_distant_rooms() {
    let rooms = vec![
        room(0, "Foyer", RoomType::Foyer, 0.0, 0.0, 8.0, 8.0),
        room(1, "Bedroom", RoomType::Bedroom, 30.0, 0.0, 11.0, 11.0),
    ];
    let mut geometry = empty_geometry();
    geometry.hallways.push(hallway_polygon(
        0,
        Point::new(8.0, 4.0),
        Point::new(30.0, 4.0),
        3.5,
        (0, 1),
    ));
    let report = validate_all_rooms_reachable(&rooms, &geometry, &[], "Foyer").unwrap();
    assert!(report.all_reachable, "unreachable: {:?}", report.unreachable);
    let result = &report.results[0];
    assert!(result.found);
    assert!(result.distance > 20.0);
    assert_eq!(result.rooms_traversed.first().map(String::as_str), Some("Foyer"));
    assert_eq!(result.rooms_traversed.last().map(String::as_str), Some("Bedroom"));
}

#[test]
fn bedrooms_are_not_corridors() {
    // Bedroom B can only be reached through bedroom A. Since private rooms
    // are never traversable, B is unreachable.
    let rooms = vec![
        room(0, "Foyer", RoomType::Foyer, 0.0, 0.0, 8.0, 8.0),
        room(1, "Bedroom A", RoomType::Bedroom, 8.0, 0.0, 11.0, 8.0),
        room(2, "Bedroom B", RoomType::Bedroom, 19.0, 0.0, 11.0, 8.0),
    ];
    let report =
        validate_all_rooms_reachable(&rooms, &empty_geometry(), &[], "Foyer").unwrap();
    assert_eq!(report.reachable, vec!["Bedroom A"]);
    assert_eq!(report.unreachable, vec!["Bedroom B"]);
}

#[test]
fn service_rooms_are_traversable() {
    // The garage bridges the foyer and the laundry.
    let rooms = vec![
        room(0, "Foyer", RoomType::Foyer, 0.0, 0.0, 8.0, 8.0),
        room(1, "Garage", RoomType::Garage, 8.0, 0.0, 20.0, 20.0),
        room(2, "Laundry", RoomType::Laundry, 28.0, 0.0, 6.0, 8.0),
    ];
    let report =
        validate_all_rooms_reachable(&rooms, &empty_geometry(), &[], "Foyer").unwrap();
    assert!(report.all_reachable);
}

#[test]
fn doors_along_the_path_are_recorded() {
    // Centroids share a row, so the optimal path runs straight through the
    // doorway on the shared wall.
    let rooms = vec![
        room(0, "Foyer", RoomType::Foyer, 0.0, 0.0, 8.0, 8.0),
        room(1, "Living", RoomType::Living, 8.0, -3.0, 14.0, 14.0),
    ];
    let doors = vec![crate::graph::Door::new(Point::new(8.0, 4.0), ("Foyer", "Living"))];
    let report =
        validate_all_rooms_reachable(&rooms, &empty_geometry(), &doors, "Foyer").unwrap();
    let result = &report.results[0];
    assert!(result.found);
    assert_eq!(result.doors_used, vec![0]);
}

#[test]
fn unknown_entry_room_is_an_error() {
    let rooms = vec![room(0, "Living", RoomType::Living, 0.0, 0.0, 14.0, 14.0)];
    assert!(matches!(
        validate_all_rooms_reachable(&rooms, &empty_geometry(), &[], "Ghost"),
        Err(crate::errors::FloorweaveError::RoomNotFound(_))
    ));
}

#[test]
fn validation_runs_twice_identically() {
    let rooms = vec![
        room(0, "Foyer", RoomType::Foyer, 0.0, 0.0, 8.0, 8.0),
        room(1, "Living", RoomType::Living, 8.0, 0.0, 14.0, 14.0),
        room(2, "Bedroom", RoomType::Bedroom, 0.0, 8.0, 11.0, 11.0),
    ];
    let a = validate_all_rooms_reachable(&rooms, &empty_geometry(), &[], "Foyer").unwrap();
    let b = validate_all_rooms_reachable(&rooms, &empty_geometry(), &[], "Foyer").unwrap();
    assert_eq!(a, b);
}
