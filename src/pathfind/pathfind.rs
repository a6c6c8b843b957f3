//! Grid A* over walkable polygons, and the reachability validator.
//!
//! The polygon mode rasterises walkable space onto a uniform grid (0.5 ft
//! cells) and runs 8-connected A* on it. Walkability is deliberately
//! conservative about privacy: hallways, junctions, and hub/shared/service
//! rooms are traversable, private rooms only when they are the start or the
//! goal. That is what makes "you cannot walk through one bedroom to reach
//! another" hold during validation.

#[cfg(test)]
mod test;

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use float_ord::FloatOrd;
use log::debug;
use serde::Serialize;

use crate::errors::FloorweaveError;
use crate::geometry::{point_in_polygon, Bounds};
use crate::graph::Door;
use crate::layout::Room;
use crate::network::SpineGeometry;
use crate::point::Point;
use crate::program::AccessType;

pub const GRID_RESOLUTION: f32 = 0.5;
/// How far (in cells) an unwalkable endpoint may be nudged to the nearest
/// walkable cell.
pub const SNAP_RADIUS: i32 = 10;

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// A rasterised walkability field.
#[derive(Debug, Clone)]
pub struct WalkGrid {
    origin: Point,
    cols: i32,
    rows: i32,
    resolution: f32,
    walkable: Vec<bool>,
}

impl WalkGrid {
    /// Rasterises the union AABB of `walkable` polygons. A cell is walkable
    /// when its centre lies inside any walkable polygon and inside no
    /// obstacle. Returns None when there is nothing to walk on.
    pub fn build(
        walkable: &[Vec<Point>],
        obstacles: &[Vec<Point>],
        resolution: f32,
    ) -> Option<WalkGrid> {
        let bounds =
            Bounds::of_points(walkable.iter().flat_map(|poly| poly.iter()))?.expand(resolution);

        let cols = (bounds.width() / resolution).ceil() as i32;
        let rows = (bounds.depth() / resolution).ceil() as i32;
        if cols <= 0 || rows <= 0 {
            return None;
        }

        let mut grid = WalkGrid {
            origin: bounds.min,
            cols,
            rows,
            resolution,
            walkable: vec![false; (cols * rows) as usize],
        };
        for row in 0..rows {
            for col in 0..cols {
                let center = grid.cell_center(col, row);
                let open = walkable.iter().any(|poly| point_in_polygon(center, poly))
                    && !obstacles.iter().any(|poly| point_in_polygon(center, poly));
                let idx = grid.index(col, row);
                grid.walkable[idx] = open;
            }
        }
        Some(grid)
    }

    fn index(&self, col: i32, row: i32) -> usize {
        (row * self.cols + col) as usize
    }

    fn in_range(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.cols && row >= 0 && row < self.rows
    }

    pub fn is_walkable(&self, col: i32, row: i32) -> bool {
        self.in_range(col, row) && self.walkable[self.index(col, row)]
    }

    pub fn cell_center(&self, col: i32, row: i32) -> Point {
        Point::new(
            self.origin.x + (col as f32 + 0.5) * self.resolution,
            self.origin.y + (row as f32 + 0.5) * self.resolution,
        )
    }

    pub fn cell_of(&self, p: Point) -> (i32, i32) {
        (
            ((p.x - self.origin.x) / self.resolution).floor() as i32,
            ((p.y - self.origin.y) / self.resolution).floor() as i32,
        )
    }

    /// BFS outward from `cell` to the nearest walkable cell, up to
    /// SNAP_RADIUS rings away.
    pub fn snap_to_walkable(&self, cell: (i32, i32)) -> Option<(i32, i32)> {
        if self.is_walkable(cell.0, cell.1) {
            return Some(cell);
        }
        for radius in 1..=SNAP_RADIUS {
            for row in (cell.1 - radius)..=(cell.1 + radius) {
                for col in (cell.0 - radius)..=(cell.0 + radius) {
                    let on_ring =
                        (row - cell.1).abs() == radius || (col - cell.0).abs() == radius;
                    if on_ring && self.is_walkable(col, row) {
                        return Some((col, row));
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPath {
    pub points: Vec<Point>,
    /// Walk distance in feet.
    pub cost: f32,
}

/// 8-connected A* between two points on the grid. Cardinal steps cost one
/// cell, diagonals cost sqrt(2) cells, both scaled by the resolution. The
/// Euclidean heuristic never overestimates, so returned paths are optimal.
/// Corner cutting is forbidden: a diagonal needs both touching cardinals
/// open.
pub fn a_star_grid(grid: &WalkGrid, start: Point, goal: Point) -> Option<GridPath> {
    let start_cell = grid.snap_to_walkable(grid.cell_of(start))?;
    let goal_cell = grid.snap_to_walkable(grid.cell_of(goal))?;

    let cell_count = (grid.cols * grid.rows) as usize;
    let mut g_score = vec![f32::MAX; cell_count];
    let mut came_from: Vec<Option<(i32, i32)>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];

    let heuristic =
        |cell: (i32, i32)| grid.cell_center(cell.0, cell.1).dist(&grid.cell_center(goal_cell.0, goal_cell.1));

    // Min-heap on f = g + h. Decrease-key is done lazily: stale entries are
    // skipped when popped because a better g already closed the cell.
    let mut open: BinaryHeap<Reverse<(FloatOrd<f32>, i32, i32)>> = BinaryHeap::new();
    g_score[grid.index(start_cell.0, start_cell.1)] = 0.0;
    open.push(Reverse((FloatOrd(heuristic(start_cell)), start_cell.0, start_cell.1)));

    while let Some(Reverse((_, col, row))) = open.pop() {
        let idx = grid.index(col, row);
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        if (col, row) == goal_cell {
            let mut cells = vec![(col, row)];
            let mut current = (col, row);
            while let Some(previous) = came_from[grid.index(current.0, current.1)] {
                cells.push(previous);
                current = previous;
            }
            cells.reverse();
            return Some(GridPath {
                points: cells.iter().map(|&(c, r)| grid.cell_center(c, r)).collect(),
                cost: g_score[idx],
            });
        }

        for dr in -1..=1i32 {
            for dc in -1..=1i32 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (ncol, nrow) = (col + dc, row + dr);
                if !grid.is_walkable(ncol, nrow) {
                    continue;
                }
                let diagonal = dr != 0 && dc != 0;
                if diagonal && !(grid.is_walkable(col + dc, row) && grid.is_walkable(col, row + dr))
                {
                    continue;
                }
                let step = if diagonal { SQRT_2 } else { 1.0 } * grid.resolution;
                let tentative = g_score[idx] + step;
                let nidx = grid.index(ncol, nrow);
                if tentative < g_score[nidx] {
                    g_score[nidx] = tentative;
                    came_from[nidx] = Some((col, row));
                    open.push(Reverse((
                        FloatOrd(tentative + heuristic((ncol, nrow))),
                        ncol,
                        nrow,
                    )));
                }
            }
        }
    }
    None
}

/// Polygon-mode A*: rasterise, then search.
pub fn a_star_polygons(
    walkable: &[Vec<Point>],
    obstacles: &[Vec<Point>],
    start: Point,
    goal: Point,
) -> Option<GridPath> {
    let grid = WalkGrid::build(walkable, obstacles, GRID_RESOLUTION)?;
    a_star_grid(&grid, start, goal)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub room: String,
    pub found: bool,
    pub path: Vec<Point>,
    pub distance: f32,
    /// Names of rooms the path passes through, in walk order.
    pub rooms_traversed: Vec<String>,
    /// Indices into the doors list that the path passes close to.
    pub doors_used: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachabilityReport {
    pub all_reachable: bool,
    pub reachable: Vec<String>,
    pub unreachable: Vec<String>,
    pub results: Vec<PathResult>,
}

/// Whether a room is open to through-traffic for everyone.
fn is_public_walkable(room: &Room) -> bool {
    matches!(
        room.room_type.access(),
        AccessType::Hub | AccessType::Shared | AccessType::Service
    )
}

/// Walks from the entry to every other room through hallway geometry and
/// public rooms, and reports per-room path details. Private rooms are only
/// walkable as endpoints, never as shortcuts.
pub fn validate_all_rooms_reachable(
    rooms: &[Room],
    geometry: &SpineGeometry,
    doors: &[Door],
    entry_name: &str,
) -> Result<ReachabilityReport, FloorweaveError> {
    let entry = rooms
        .iter()
        .find(|r| r.name == entry_name)
        .ok_or_else(|| FloorweaveError::RoomNotFound(entry_name.to_string()))?;

    let mut results = Vec::new();
    let mut reachable = Vec::new();
    let mut unreachable = Vec::new();

    for target in rooms {
        if target.id == entry.id {
            continue;
        }

        let mut walkable: Vec<Vec<Point>> = Vec::new();
        for hallway in &geometry.hallways {
            walkable.push(hallway.vertices.clone());
        }
        for junction in &geometry.junctions {
            walkable.push(junction.vertices.clone());
        }
        for room in rooms {
            if is_public_walkable(room) || room.id == entry.id || room.id == target.id {
                walkable.push(room.bounds().corners().to_vec());
            }
        }

        let path = a_star_polygons(&walkable, &[], entry.centroid(), target.centroid());
        let result = match path {
            Some(path) => PathResult {
                room: target.name.clone(),
                found: true,
                rooms_traversed: rooms_along(&path.points, rooms),
                doors_used: doors_along(&path.points, doors),
                distance: path.cost,
                path: path.points,
            },
            None => PathResult {
                room: target.name.clone(),
                found: false,
                path: Vec::new(),
                distance: 0.0,
                rooms_traversed: Vec::new(),
                doors_used: Vec::new(),
            },
        };
        if result.found {
            reachable.push(target.name.clone());
        } else {
            unreachable.push(target.name.clone());
        }
        results.push(result);
    }

    debug!(
        "reachability: {}/{} rooms reachable from '{}'",
        reachable.len(),
        reachable.len() + unreachable.len(),
        entry_name
    );
    Ok(ReachabilityReport {
        all_reachable: unreachable.is_empty(),
        reachable,
        unreachable,
        results,
    })
}

fn rooms_along(path: &[Point], rooms: &[Room]) -> Vec<String> {
    let mut traversed: Vec<String> = Vec::new();
    for point in path {
        let hit = rooms.iter().find(|r| r.bounds().contains_point(*point));
        if let Some(room) = hit {
            if traversed.last() != Some(&room.name) {
                traversed.push(room.name.clone());
            }
        }
    }
    traversed
}

fn doors_along(path: &[Point], doors: &[Door]) -> Vec<usize> {
    doors
        .iter()
        .enumerate()
        .filter(|(_, door)| {
            path.iter().any(|p| p.dist(&door.point) <= door.width / 2.0 + GRID_RESOLUTION)
        })
        .map(|(i, _)| i)
        .collect()
}
