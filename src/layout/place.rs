//! The placement engine.
//!
//! Rooms are placed one at a time. Absolute and relative placements go
//! exactly where asked and fail loudly; auto placement searches the sides of
//! existing rooms for the spot that keeps the plan compact. Whatever path
//! produced an origin, the final zero-tolerance overlap check always runs.

use float_ord::FloatOrd;
use log::debug;

use crate::catalog::RoomSizeOption;
use crate::errors::FloorweaveError;
use crate::geometry::Bounds;
use crate::point::Point;
use crate::program::RoomType;

use super::{Direction, Layout, PositionSpec, Room};

/// Overlap allowance while searching candidate positions. The final check
/// is always zero-tolerance.
const SEARCH_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    pub name: String,
    pub room_type: RoomType,
    pub is_primary: bool,
    pub size: RoomSizeOption,
    pub position: PositionSpec,
}

/// Places every request in order, stopping at the first failure.
pub fn place_rooms(
    layout: &mut Layout,
    requests: &[PlacementRequest],
) -> Result<(), FloorweaveError> {
    for request in requests {
        place_room(layout, request)?;
    }
    Ok(())
}

/// Places a single room and returns its id.
pub fn place_room(layout: &mut Layout, request: &PlacementRequest) -> Result<u32, FloorweaveError> {
    let size = request.size;
    if size.width <= 0.0 || size.depth <= 0.0 {
        return Err(FloorweaveError::InvalidDimensions { width: size.width, depth: size.depth });
    }

    let origin = match &request.position {
        PositionSpec::Absolute(p) => *p,
        PositionSpec::Relative { direction, of, gap } => {
            let target = layout
                .room_named(of)
                .ok_or_else(|| FloorweaveError::RoomNotFound(of.clone()))?;
            let origin = beside(target, *direction, &size, *gap);
            let bounds = Bounds::from_origin_size(origin, size.width, size.depth);
            if let Some(conflict) = first_conflict(layout, &bounds, SEARCH_TOLERANCE) {
                return Err(FloorweaveError::Overlap {
                    room: request.name.clone(),
                    conflict,
                });
            }
            origin
        }
        PositionSpec::Auto { prefer } => auto_origin(layout, &size, request.room_type, *prefer)
            .ok_or_else(|| FloorweaveError::FootprintExceeded { room: request.name.clone() })?,
    };

    let bounds = Bounds::from_origin_size(origin, size.width, size.depth);
    if !layout.footprint.bounds().contains(&bounds) {
        return Err(FloorweaveError::FootprintExceeded { room: request.name.clone() });
    }
    // Mandatory hard non-overlap check, regardless of how the origin was
    // chosen.
    if let Some(conflict) = first_conflict(layout, &bounds, 0.0) {
        return Err(FloorweaveError::Overlap { room: request.name.clone(), conflict });
    }

    let id = layout.take_id();
    debug!(
        "placed '{}' ({}) at ({:.1}, {:.1}), {:.0}x{:.0}",
        request.name, request.room_type, origin.x, origin.y, size.width, size.depth
    );
    layout.rooms.push(Room {
        id,
        name: request.name.clone(),
        room_type: request.room_type,
        is_primary: request.is_primary,
        size,
        origin,
    });
    Ok(id)
}

fn first_conflict(layout: &Layout, bounds: &Bounds, tolerance: f32) -> Option<String> {
    layout
        .rooms
        .iter()
        .find(|other| bounds.intersects(&other.bounds(), tolerance))
        .map(|other| other.name.clone())
}

/// SW corner of a room of the given size placed on `direction`'s side of
/// `target`, aligned with the target's origin.
fn beside(target: &Room, direction: Direction, size: &RoomSizeOption, gap: f32) -> Point {
    let t = target.bounds();
    match direction {
        Direction::North => Point::new(t.min.x, t.max.y + gap),
        Direction::South => Point::new(t.min.x, t.min.y - gap - size.depth),
        Direction::East => Point::new(t.max.x + gap, t.min.y),
        Direction::West => Point::new(t.min.x - gap - size.width, t.min.y),
    }
}

/// The room type a given type wants to sit next to when auto-placed.
fn preferred_anchor(room_type: RoomType) -> Option<RoomType> {
    match room_type {
        RoomType::Bedroom => Some(RoomType::Hallway),
        RoomType::Bathroom | RoomType::Closet => Some(RoomType::Bedroom),
        RoomType::Pantry => Some(RoomType::Kitchen),
        RoomType::Mudroom => Some(RoomType::Garage),
        _ => None,
    }
}

/// Chooses an origin for auto placement. The first room lands at the
/// footprint origin; later rooms try their preferred anchor first, then
/// every side of every placed room, scored by distance to the layout
/// centroid (compactness).
fn auto_origin(
    layout: &Layout,
    size: &RoomSizeOption,
    room_type: RoomType,
    prefer: Option<Direction>,
) -> Option<Point> {
    if layout.rooms.is_empty() {
        return Some(Point::new(0.0, 0.0));
    }

    let fits = |origin: Point| -> bool {
        let bounds = Bounds::from_origin_size(origin, size.width, size.depth);
        layout.footprint.bounds().contains(&bounds)
            && first_conflict(layout, &bounds, SEARCH_TOLERANCE).is_none()
    };

    // Adjacency-informed shortcut: snug up against the most recently placed
    // anchor room when one exists.
    if let Some(anchor_type) = preferred_anchor(room_type) {
        if let Some(anchor) = layout.rooms_of_type(anchor_type).last() {
            for direction in Direction::ALL {
                let origin = beside(anchor, direction, size, 0.0);
                if fits(origin) {
                    return Some(origin);
                }
            }
        }
    }

    let centroid = layout.centroid();
    let mut candidates: Vec<(Direction, Point, f32)> = Vec::new();
    for room in &layout.rooms {
        for direction in Direction::ALL {
            let origin = beside(room, direction, size, 0.0);
            if !fits(origin) {
                continue;
            }
            let center = Bounds::from_origin_size(origin, size.width, size.depth).center();
            candidates.push((direction, origin, center.dist(&centroid)));
        }
    }

    // A preferred side wins whenever it has any workable candidate.
    if let Some(preferred) = prefer {
        if candidates.iter().any(|(d, _, _)| *d == preferred) {
            candidates.retain(|(d, _, _)| *d == preferred);
        }
    }

    // Strict less-than keeps the earliest candidate on ties, so the scan
    // order (room id, then compass order) is the tie-break.
    candidates
        .into_iter()
        .min_by_key(|(_, _, score)| FloatOrd(*score))
        .map(|(_, origin, _)| origin)
}
