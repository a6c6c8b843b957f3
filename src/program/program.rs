//! The room program: the caller-facing description of what a floor plan
//! must contain. A `FloorProgram` plays the role the generation-parameter
//! file plays for a cave generator — everything downstream (circulation,
//! budget, placement, validation) is derived from it plus a footprint.

#[cfg(test)]
mod test;

use std::fmt::{Display, Formatter};

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FloorweaveError;
use crate::geometry::Bounds;
use crate::point::Point;

/// Every room category the synthesis engine understands. The set is closed;
/// callers with exotic rooms use `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Living,
    Kitchen,
    Bedroom,
    Bathroom,
    Closet,
    Hallway,
    Utility,
    Garage,
    Dining,
    Family,
    Office,
    Laundry,
    Pantry,
    Mudroom,
    Foyer,
    Patio,
    Deck,
    Circulation,
    Stair,
    Landing,
    GreatRoom,
    Other,
}

/// What kind of circulation contact a room type demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// Must be entered from a hallway or hub (bedrooms, bathrooms, offices).
    Direct,
    /// Entered through open floor area shared with other rooms.
    Shared,
    /// Entered through its parent room only (closets, pantries).
    Indirect,
    /// Is itself circulation (foyer, hallway, stair, ...).
    Hub,
    /// Back-of-house rooms entered from service circulation.
    Service,
}

/// Coarse plan zones used when clustering rooms around the spine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Entry,
    Public,
    Private,
    Service,
    Vertical,
}

impl RoomType {
    pub const ALL: [RoomType; 22] = [
        RoomType::Living,
        RoomType::Kitchen,
        RoomType::Bedroom,
        RoomType::Bathroom,
        RoomType::Closet,
        RoomType::Hallway,
        RoomType::Utility,
        RoomType::Garage,
        RoomType::Dining,
        RoomType::Family,
        RoomType::Office,
        RoomType::Laundry,
        RoomType::Pantry,
        RoomType::Mudroom,
        RoomType::Foyer,
        RoomType::Patio,
        RoomType::Deck,
        RoomType::Circulation,
        RoomType::Stair,
        RoomType::Landing,
        RoomType::GreatRoom,
        RoomType::Other,
    ];

    /// The access contract for this room type. Total over the enum.
    pub fn access(self) -> AccessType {
        match self {
            RoomType::Bedroom | RoomType::Bathroom | RoomType::Office => AccessType::Direct,
            RoomType::Living
            | RoomType::Kitchen
            | RoomType::Dining
            | RoomType::Family
            | RoomType::GreatRoom
            | RoomType::Other => AccessType::Shared,
            RoomType::Closet | RoomType::Pantry => AccessType::Indirect,
            RoomType::Foyer
            | RoomType::Hallway
            | RoomType::Circulation
            | RoomType::Mudroom
            | RoomType::Stair
            | RoomType::Landing => AccessType::Hub,
            RoomType::Garage
            | RoomType::Utility
            | RoomType::Laundry
            | RoomType::Patio
            | RoomType::Deck => AccessType::Service,
        }
    }

    /// The plan zone this room type clusters into.
    pub fn zone(self) -> ZoneType {
        match self {
            RoomType::Foyer | RoomType::Mudroom | RoomType::Hallway | RoomType::Circulation => {
                ZoneType::Entry
            }
            RoomType::Living
            | RoomType::Kitchen
            | RoomType::Dining
            | RoomType::Family
            | RoomType::GreatRoom
            | RoomType::Other => ZoneType::Public,
            RoomType::Bedroom | RoomType::Bathroom | RoomType::Closet | RoomType::Office => {
                ZoneType::Private
            }
            RoomType::Garage
            | RoomType::Utility
            | RoomType::Laundry
            | RoomType::Pantry
            | RoomType::Patio
            | RoomType::Deck => ZoneType::Service,
            RoomType::Stair | RoomType::Landing => ZoneType::Vertical,
        }
    }

    /// Adjacency priority used by the space-budget allocator. Circulation
    /// types are pinned at 0 and are never upsized.
    pub fn priority(self) -> u32 {
        match self {
            RoomType::Bedroom => 75,
            RoomType::Bathroom => 65,
            RoomType::Kitchen => 60,
            RoomType::Dining => 55,
            RoomType::GreatRoom => 52,
            RoomType::Living => 50,
            RoomType::Family => 48,
            RoomType::Office => 40,
            RoomType::Closet => 30,
            RoomType::Pantry => 25,
            RoomType::Laundry => 20,
            RoomType::Utility => 15,
            RoomType::Foyer => 15,
            RoomType::Mudroom => 12,
            RoomType::Garage => 10,
            RoomType::Other => 10,
            RoomType::Patio => 5,
            RoomType::Deck => 5,
            RoomType::Hallway | RoomType::Circulation | RoomType::Stair | RoomType::Landing => 0,
        }
    }

    /// Whether this type is pure circulation (and so exempt from upsizing).
    pub fn is_circulation(self) -> bool {
        matches!(
            self,
            RoomType::Hallway | RoomType::Circulation | RoomType::Stair | RoomType::Landing
        )
    }

    /// Room types that merge into open-plan space with each other.
    pub fn is_open_plan(self) -> bool {
        matches!(
            self,
            RoomType::Living
                | RoomType::Kitchen
                | RoomType::Dining
                | RoomType::Family
                | RoomType::GreatRoom
        )
    }
}

impl Display for RoomType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoomType::Living => "living",
            RoomType::Kitchen => "kitchen",
            RoomType::Bedroom => "bedroom",
            RoomType::Bathroom => "bathroom",
            RoomType::Closet => "closet",
            RoomType::Hallway => "hallway",
            RoomType::Utility => "utility",
            RoomType::Garage => "garage",
            RoomType::Dining => "dining",
            RoomType::Family => "family",
            RoomType::Office => "office",
            RoomType::Laundry => "laundry",
            RoomType::Pantry => "pantry",
            RoomType::Mudroom => "mudroom",
            RoomType::Foyer => "foyer",
            RoomType::Patio => "patio",
            RoomType::Deck => "deck",
            RoomType::Circulation => "circulation",
            RoomType::Stair => "stair",
            RoomType::Landing => "landing",
            RoomType::GreatRoom => "great_room",
            RoomType::Other => "other",
        };
        write!(f, "{name}")
    }
}

impl TryFrom<&str> for RoomType {
    type Error = FloorweaveError;
    fn try_from(input: &str) -> Result<Self, Self::Error> {
        match input.to_ascii_lowercase().as_str() {
            "living" | "living_room" => Ok(RoomType::Living),
            "kitchen" => Ok(RoomType::Kitchen),
            "bedroom" => Ok(RoomType::Bedroom),
            "bathroom" | "bath" => Ok(RoomType::Bathroom),
            "closet" => Ok(RoomType::Closet),
            "hallway" | "hall" => Ok(RoomType::Hallway),
            "utility" => Ok(RoomType::Utility),
            "garage" => Ok(RoomType::Garage),
            "dining" | "dining_room" => Ok(RoomType::Dining),
            "family" | "family_room" => Ok(RoomType::Family),
            "office" | "study" => Ok(RoomType::Office),
            "laundry" => Ok(RoomType::Laundry),
            "pantry" => Ok(RoomType::Pantry),
            "mudroom" => Ok(RoomType::Mudroom),
            "foyer" | "entry" => Ok(RoomType::Foyer),
            "patio" => Ok(RoomType::Patio),
            "deck" => Ok(RoomType::Deck),
            "circulation" => Ok(RoomType::Circulation),
            "stair" | "stairs" | "stairwell" => Ok(RoomType::Stair),
            "landing" => Ok(RoomType::Landing),
            "great_room" | "greatroom" => Ok(RoomType::GreatRoom),
            "other" => Ok(RoomType::Other),
            _ => Err(FloorweaveError::RoomNotFound(input.to_string())),
        }
    }
}

static PRIMARY_NAME: OnceCell<Regex> = OnceCell::new();

/// Whether a room name marks it as belonging to the primary suite.
/// Matches anywhere in the name, case-insensitively.
pub fn is_primary_name(name: &str) -> bool {
    PRIMARY_NAME
        .get_or_init(|| Regex::new(r"(?i)(primary|master|main|ensuite)").unwrap())
        .is_match(name)
}

/// The qualitative size knob. Fixes hallway width, foyer size, and the
/// zone-transition buffer in one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feel {
    Cozy,
    Comfortable,
    Spacious,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeelParams {
    pub hallway_width: f32,
    pub foyer_area: f32,
    pub transition_buffer: f32,
}

impl Feel {
    pub fn params(self) -> FeelParams {
        match self {
            Feel::Cozy => FeelParams { hallway_width: 3.0, foyer_area: 48.0, transition_buffer: 0.0 },
            Feel::Comfortable => {
                FeelParams { hallway_width: 3.5, foyer_area: 64.0, transition_buffer: 1.5 }
            }
            Feel::Spacious => {
                FeelParams { hallway_width: 4.0, foyer_area: 100.0, transition_buffer: 3.0 }
            }
        }
    }

    /// The catalogue-facing name of the foyer size this feel implies.
    pub fn foyer_style(self) -> &'static str {
        match self {
            Feel::Cozy => "minimal",
            Feel::Comfortable => "standard",
            Feel::Spacious => "grand",
        }
    }
}

impl Display for Feel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Feel::Cozy => write!(f, "cozy"),
            Feel::Comfortable => write!(f, "comfortable"),
            Feel::Spacious => write!(f, "spacious"),
        }
    }
}

/// One requested room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    pub room_type: RoomType,
    /// Target floor area in square feet. The allocator resolves this
    /// against the size catalogue, so the placed room may be larger.
    pub area: f32,
    #[serde(default)]
    pub is_primary: bool,
}

impl RoomSpec {
    pub fn new(name: impl Into<String>, room_type: RoomType, area: f32) -> Self {
        RoomSpec { name: name.into(), room_type, area, is_primary: false }
    }

    pub fn primary(name: impl Into<String>, room_type: RoomType, area: f32) -> Self {
        RoomSpec { name: name.into(), room_type, area, is_primary: true }
    }

    /// Primary either by flag or by naming convention.
    pub fn treated_as_primary(&self) -> bool {
        self.is_primary || is_primary_name(&self.name)
    }
}

/// The full program for one story: the rooms, the story count of the whole
/// building, and the feel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorProgram {
    pub rooms: Vec<RoomSpec>,
    pub stories: u32,
    pub feel: Feel,
}

impl FloorProgram {
    pub fn new(rooms: Vec<RoomSpec>, stories: u32, feel: Feel) -> Self {
        FloorProgram { rooms, stories, feel }
    }

    pub fn rooms_of_type(&self, room_type: RoomType) -> impl Iterator<Item = &RoomSpec> {
        self.rooms.iter().filter(move |r| r.room_type == room_type)
    }

    pub fn count_of(&self, room_type: RoomType) -> usize {
        self.rooms_of_type(room_type).count()
    }

    pub fn has_zone(&self, zone: ZoneType) -> bool {
        self.rooms.iter().any(|r| r.room_type.zone() == zone)
    }

    /// Sum of requested areas, before catalogue resolution.
    pub fn requested_area(&self) -> f32 {
        self.rooms.iter().map(|r| r.area).sum()
    }
}

impl Display for FloorProgram {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Rooms: {}\tStories: {}\tFeel: {}",
            self.rooms.len(),
            self.stories,
            self.feel
        )?;
        for room in &self.rooms {
            write!(f, "\t{} ({}, {} sq ft", room.name, room.room_type, room.area)?;
            if room.treated_as_primary() {
                write!(f, ", primary")?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}

/// The rectangular buildable envelope for one story.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
}

impl Footprint {
    pub fn new(width: f32, depth: f32) -> Result<Self, FloorweaveError> {
        if width <= 0.0 || depth <= 0.0 {
            return Err(FloorweaveError::InvalidDimensions { width, depth });
        }
        Ok(Footprint { width, depth })
    }

    pub fn area(&self) -> f32 {
        self.width * self.depth
    }

    /// Width over depth. Drives the spine topology choice.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.depth
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(Point::new(0.0, 0.0), self.width, self.depth)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.depth / 2.0)
    }
}
