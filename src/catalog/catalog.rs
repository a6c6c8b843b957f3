//! Exact-dimension size catalogues.
//!
//! Rooms are never given arbitrary dimensions: every room resolves to one of
//! the known-good (width, depth) options listed here, and the allocator only
//! ever moves a room up through its catalogue. Catalogues are immutable
//! singletons built once at first use.
//!
//! Within a catalogue, options are strictly ascending by area. The
//! allocator's tie-break on equal areas is declared order, which makes every
//! lookup deterministic.

#[cfg(test)]
mod test;

use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::program::RoomType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Minimum,
    Nice,
    Extra,
    Premium,
}

impl Display for SizeTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeTier::Minimum => write!(f, "minimum"),
            SizeTier::Nice => write!(f, "nice"),
            SizeTier::Extra => write!(f, "extra"),
            SizeTier::Premium => write!(f, "premium"),
        }
    }
}

/// One known-good room size. `area` is always `width * depth`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoomSizeOption {
    pub width: f32,
    pub depth: f32,
    pub area: f32,
    pub tier: SizeTier,
    pub description: &'static str,
}

fn opt(width: f32, depth: f32, tier: SizeTier, description: &'static str) -> RoomSizeOption {
    RoomSizeOption { width, depth, area: width * depth, tier, description }
}

use SizeTier::{Extra, Minimum, Nice, Premium};

/// Catalogue entries keyed by (room type, primary variant). Primary
/// variants exist for the suite rooms only; every other type shares one
/// catalogue regardless of the flag.
static CATALOG: Lazy<Vec<((RoomType, bool), Vec<RoomSizeOption>)>> = Lazy::new(|| {
    vec![
        ((RoomType::Living, false), vec![
            opt(12.0, 14.0, Minimum, "compact living room"),
            opt(14.0, 16.0, Nice, "comfortable living room"),
            opt(16.0, 18.0, Extra, "generous living room"),
            opt(18.0, 20.0, Premium, "formal living room"),
        ]),
        ((RoomType::Kitchen, false), vec![
            opt(10.0, 12.0, Minimum, "galley kitchen"),
            opt(12.0, 12.0, Nice, "eat-in kitchen"),
            opt(12.0, 14.0, Extra, "kitchen with island"),
            opt(14.0, 16.0, Premium, "chef's kitchen"),
        ]),
        ((RoomType::Bedroom, false), vec![
            opt(10.0, 11.0, Minimum, "minimum bedroom"),
            opt(11.0, 12.0, Nice, "standard bedroom"),
            opt(12.0, 12.0, Extra, "roomy bedroom"),
            opt(12.0, 14.0, Premium, "oversized bedroom"),
        ]),
        ((RoomType::Bedroom, true), vec![
            opt(12.0, 14.0, Minimum, "minimum primary bedroom"),
            opt(14.0, 14.0, Nice, "standard primary bedroom"),
            opt(14.0, 16.0, Extra, "large primary bedroom"),
            opt(16.0, 18.0, Premium, "primary retreat"),
        ]),
        ((RoomType::Bathroom, false), vec![
            opt(5.0, 5.0, Minimum, "powder room"),
            opt(5.0, 8.0, Nice, "full bathroom"),
            opt(5.0, 9.0, Extra, "full bathroom with linen"),
            opt(6.0, 10.0, Premium, "double-vanity bathroom"),
        ]),
        ((RoomType::Bathroom, true), vec![
            opt(8.0, 10.0, Minimum, "minimum primary bathroom"),
            opt(9.0, 10.0, Nice, "primary bathroom"),
            opt(10.0, 10.0, Extra, "primary bathroom with soaking tub"),
            opt(10.0, 12.0, Premium, "spa primary bathroom"),
        ]),
        ((RoomType::Closet, false), vec![
            opt(2.0, 4.0, Minimum, "reach-in closet"),
            opt(4.0, 5.0, Nice, "wide reach-in closet"),
            opt(5.0, 5.0, Extra, "small walk-in closet"),
            opt(5.0, 6.0, Premium, "walk-in closet"),
        ]),
        ((RoomType::Closet, true), vec![
            opt(6.0, 6.0, Minimum, "primary walk-in closet"),
            opt(6.0, 8.0, Nice, "long primary walk-in"),
            opt(7.0, 8.0, Extra, "double-sided primary walk-in"),
            opt(8.0, 10.0, Premium, "dressing room"),
        ]),
        ((RoomType::Hallway, false), vec![
            opt(3.0, 8.0, Minimum, "minimum hallway run"),
            opt(3.5, 10.0, Nice, "standard hallway run"),
            opt(4.0, 12.0, Extra, "wide hallway run"),
            opt(4.0, 14.0, Premium, "gallery hallway"),
        ]),
        ((RoomType::Utility, false), vec![
            opt(5.0, 6.0, Minimum, "utility closet"),
            opt(6.0, 6.0, Nice, "utility room"),
            opt(6.0, 8.0, Extra, "large utility room"),
            opt(8.0, 8.0, Premium, "mechanical room"),
        ]),
        ((RoomType::Garage, false), vec![
            opt(12.0, 20.0, Minimum, "one-car garage"),
            opt(20.0, 20.0, Nice, "two-car garage"),
            opt(20.0, 22.0, Extra, "two-car garage with storage"),
            opt(22.0, 24.0, Premium, "oversized two-car garage"),
        ]),
        ((RoomType::Dining, false), vec![
            opt(10.0, 11.0, Minimum, "breakfast nook"),
            opt(11.0, 12.0, Nice, "dining room"),
            opt(12.0, 13.0, Extra, "large dining room"),
            opt(13.0, 14.0, Premium, "formal dining room"),
        ]),
        ((RoomType::Family, false), vec![
            opt(12.0, 14.0, Minimum, "compact family room"),
            opt(14.0, 16.0, Nice, "family room"),
            opt(16.0, 18.0, Extra, "large family room"),
            opt(18.0, 20.0, Premium, "media family room"),
        ]),
        ((RoomType::Office, false), vec![
            opt(8.0, 10.0, Minimum, "study nook"),
            opt(10.0, 10.0, Nice, "home office"),
            opt(10.0, 12.0, Extra, "large home office"),
            opt(12.0, 12.0, Premium, "library office"),
        ]),
        ((RoomType::Laundry, false), vec![
            opt(5.0, 6.0, Minimum, "laundry closet"),
            opt(6.0, 8.0, Nice, "laundry room"),
            opt(8.0, 8.0, Extra, "laundry room with folding counter"),
            opt(8.0, 10.0, Premium, "laundry and craft room"),
        ]),
        ((RoomType::Pantry, false), vec![
            opt(3.0, 4.0, Minimum, "pantry cabinet"),
            opt(4.0, 5.0, Nice, "reach-in pantry"),
            opt(5.0, 5.0, Extra, "walk-in pantry"),
            opt(5.0, 6.0, Premium, "butler's pantry"),
        ]),
        ((RoomType::Mudroom, false), vec![
            opt(5.0, 6.0, Minimum, "entry drop zone"),
            opt(6.0, 8.0, Nice, "mudroom"),
            opt(8.0, 8.0, Extra, "mudroom with bench"),
            opt(8.0, 10.0, Premium, "mudroom with lockers"),
        ]),
        ((RoomType::Foyer, false), vec![
            opt(6.0, 8.0, Minimum, "minimal foyer"),
            opt(8.0, 8.0, Nice, "standard foyer"),
            opt(8.0, 10.0, Extra, "large foyer"),
            opt(10.0, 10.0, Premium, "grand foyer"),
        ]),
        ((RoomType::Patio, false), vec![
            opt(10.0, 10.0, Minimum, "patio pad"),
            opt(10.0, 12.0, Nice, "dining patio"),
            opt(12.0, 14.0, Extra, "entertaining patio"),
            opt(14.0, 16.0, Premium, "wraparound patio"),
        ]),
        ((RoomType::Deck, false), vec![
            opt(8.0, 10.0, Minimum, "small deck"),
            opt(10.0, 12.0, Nice, "deck"),
            opt(12.0, 14.0, Extra, "large deck"),
            opt(14.0, 16.0, Premium, "wraparound deck"),
        ]),
        ((RoomType::Circulation, false), vec![
            opt(3.0, 6.0, Minimum, "connector"),
            opt(3.5, 8.0, Nice, "circulation run"),
            opt(4.0, 10.0, Extra, "wide circulation run"),
            opt(4.0, 12.0, Premium, "long circulation run"),
        ]),
        ((RoomType::Stair, false), vec![
            opt(3.0, 14.0, Minimum, "minimum straight stair"),
            opt(3.5, 14.0, Nice, "standard straight stair"),
            opt(4.0, 14.0, Extra, "wide straight stair"),
            opt(4.0, 16.0, Premium, "stair with deep treads"),
        ]),
        ((RoomType::Landing, false), vec![
            opt(4.0, 5.0, Minimum, "minimum landing"),
            opt(5.0, 5.0, Nice, "square landing"),
            opt(5.0, 6.0, Extra, "generous landing"),
            opt(6.0, 6.0, Premium, "landing with seat"),
        ]),
        ((RoomType::GreatRoom, false), vec![
            opt(16.0, 18.0, Minimum, "compact great room"),
            opt(18.0, 20.0, Nice, "great room"),
            opt(20.0, 22.0, Extra, "large great room"),
            opt(22.0, 24.0, Premium, "vaulted great room"),
        ]),
        ((RoomType::Other, false), vec![
            opt(6.0, 8.0, Minimum, "small flex room"),
            opt(8.0, 10.0, Nice, "flex room"),
            opt(10.0, 12.0, Extra, "large flex room"),
            opt(12.0, 14.0, Premium, "bonus room"),
        ]),
    ]
});

/// The ordered options for a room type. Primary variants exist for
/// bedroom, bathroom, and closet; for other types the flag is ignored.
pub fn options_for(room_type: RoomType, primary: bool) -> &'static [RoomSizeOption] {
    let key = (room_type, primary && has_primary_variant(room_type));
    CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, options)| options.as_slice())
        .expect("every room type has a catalogue")
}

pub fn has_primary_variant(room_type: RoomType) -> bool {
    matches!(room_type, RoomType::Bedroom | RoomType::Bathroom | RoomType::Closet)
}

/// The smallest option at least as large as `target_area`, falling back to
/// the largest option when the target exceeds the whole catalogue.
pub fn find_option_for_area(
    room_type: RoomType,
    target_area: f32,
    primary: bool,
) -> &'static RoomSizeOption {
    let options = options_for(room_type, primary);
    options
        .iter()
        .find(|o| o.area >= target_area)
        .unwrap_or_else(|| options.last().expect("catalogues are non-empty"))
}

/// The smallest option strictly larger than `current_area` whose area delta
/// fits within `max_extra`. None when no such option exists.
pub fn find_next_size_up(
    room_type: RoomType,
    current_area: f32,
    max_extra: f32,
    primary: bool,
) -> Option<&'static RoomSizeOption> {
    options_for(room_type, primary)
        .iter()
        .find(|o| o.area > current_area && o.area - current_area <= max_extra)
}
