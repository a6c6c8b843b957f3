//! Placed rooms and the layout container.
//!
//! A `Layout` owns every placed room for one story. Rooms are keyed by
//! monotonically assigned ids; names stay attached for callers but id order
//! is the canonical ordering everywhere determinism matters.

mod place;
#[cfg(test)]
mod test;

use std::fmt::{Display, Formatter};

use serde::Serialize;

pub use place::{place_rooms, PlacementRequest};

use crate::catalog::RoomSizeOption;
use crate::geometry::Bounds;
use crate::point::Point;
use crate::program::{Footprint, RoomType};

/// A room fixed in layout coordinates. `origin` is the SW corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub room_type: RoomType,
    pub is_primary: bool,
    pub size: RoomSizeOption,
    pub origin: Point,
}

impl Room {
    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn depth(&self) -> f32 {
        self.size.depth
    }

    pub fn area(&self) -> f32 {
        self.size.area
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.origin, self.size.width, self.size.depth)
    }

    pub fn centroid(&self) -> Point {
        self.bounds().center()
    }

    pub fn overlaps(&self, other: &Room, tolerance: f32) -> bool {
        self.bounds().intersects(&other.bounds(), tolerance)
    }
}

/// The compass directions used by relative and auto placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::South => write!(f, "south"),
            Direction::East => write!(f, "east"),
            Direction::West => write!(f, "west"),
        }
    }
}

/// Where a room wants to go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PositionSpec {
    /// Exact SW corner.
    Absolute(Point),
    /// Beside an existing room, separated by `gap` feet.
    Relative { direction: Direction, of: String, gap: f32 },
    /// Let the engine choose, optionally preferring one side.
    Auto { prefer: Option<Direction> },
}

/// All placed rooms for one story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub footprint: Footprint,
    pub rooms: Vec<Room>,
    next_id: u32,
}

impl Layout {
    pub fn new(footprint: Footprint) -> Self {
        Layout { footprint, rooms: Vec::new(), next_id: 0 }
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Name lookup. Non-canonical: names are not required to be unique, and
    /// the first match in id order wins.
    pub fn room_named(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    pub fn rooms_of_type(&self, room_type: RoomType) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |r| r.room_type == room_type)
    }

    /// Mean of all room centroids. The auto placer scores candidates by
    /// their distance to this.
    pub fn centroid(&self) -> Point {
        if self.rooms.is_empty() {
            return self.footprint.center();
        }
        let mut sum = Point::default();
        for room in &self.rooms {
            sum += room.centroid();
        }
        sum / self.rooms.len() as f32
    }

    pub(crate) fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// A unique structured string describing this layout, used for
    /// determinism comparisons in tests. Not meant to be readable.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        slug.push_str(&format!("{}x{};[", self.footprint.width, self.footprint.depth));
        for room in &self.rooms {
            slug.push_str(&format!(
                "{},{},x{:.2}y{:.2}w{:.2}d{:.2};",
                room.name,
                room.room_type,
                room.origin.x,
                room.origin.y,
                room.size.width,
                room.size.depth,
            ));
        }
        slug.push_str("];");
        slug
    }
}
