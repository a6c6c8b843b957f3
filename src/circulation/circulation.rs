//! Circulation-first requirement calculation.
//!
//! Circulation is budgeted before any room is sized: the calculator turns a
//! program into an ordered list of area requirements (foyer, bedroom
//! hallway, zone transition, stairs, ...) and chooses a spine topology for
//! the footprint. Nothing here can fail; underspecified programs just
//! produce fewer requirements.

#[cfg(test)]
mod test;

use std::fmt::{Display, Formatter};

use log::debug;
use serde::Serialize;

use crate::point::Point;
use crate::program::{AccessType, FloorProgram, Footprint, RoomType, ZoneType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CirculationComponent {
    Foyer,
    BedroomHallway,
    ZoneTransition,
    Stairwell,
    UpperLanding,
    LowerLanding,
    DoorClearances,
    Mudroom,
}

impl Display for CirculationComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CirculationComponent::Foyer => "foyer",
            CirculationComponent::BedroomHallway => "bedroom_hallway",
            CirculationComponent::ZoneTransition => "zone_transition",
            CirculationComponent::Stairwell => "stairwell",
            CirculationComponent::UpperLanding => "upper_landing",
            CirculationComponent::LowerLanding => "lower_landing",
            CirculationComponent::DoorClearances => "door_clearances",
            CirculationComponent::Mudroom => "mudroom",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CirculationRequirement {
    pub component: CirculationComponent,
    pub reason: String,
    pub area: f32,
    pub optional: bool,
}

/// Generates the requirement list for a program, in presentation order.
pub fn compute_requirements(program: &FloorProgram) -> Vec<CirculationRequirement> {
    let params = program.feel.params();
    let mut requirements = Vec::new();

    // 1. Every plan gets a foyer sized by feel.
    requirements.push(CirculationRequirement {
        component: CirculationComponent::Foyer,
        reason: format!("{} entry sequence", program.feel.foyer_style()),
        area: params.foyer_area,
        optional: false,
    });

    // 2. Bedroom hallway, sized by bedroom count.
    let bedrooms = program.count_of(RoomType::Bedroom);
    if bedrooms > 0 {
        let length = 4.0 * bedrooms as f32 + 8.0;
        requirements.push(CirculationRequirement {
            component: CirculationComponent::BedroomHallway,
            reason: format!("serves {bedrooms} bedroom(s), {length} ft run"),
            area: length * params.hallway_width,
            optional: false,
        });
    }

    // 3. Transition between the public and private zones.
    let has_public = program.rooms.iter().any(|r| r.room_type.is_open_plan());
    if has_public && bedrooms > 0 {
        requirements.push(CirculationRequirement {
            component: CirculationComponent::ZoneTransition,
            reason: "buffer between public and private zones".to_string(),
            area: 40.0 + 10.0 * params.transition_buffer,
            optional: false,
        });
    }

    // 4. Vertical circulation for multi-story plans.
    if program.stories >= 2 {
        requirements.push(CirculationRequirement {
            component: CirculationComponent::Stairwell,
            reason: format!("{}-story stair run", program.stories),
            area: params.hallway_width * 14.0,
            optional: false,
        });
        requirements.push(CirculationRequirement {
            component: CirculationComponent::UpperLanding,
            reason: "arrival space at the top of the stair".to_string(),
            area: 25.0,
            optional: false,
        });
        requirements.push(CirculationRequirement {
            component: CirculationComponent::LowerLanding,
            reason: "departure space at the bottom of the stair".to_string(),
            area: 20.0,
            optional: false,
        });
    }

    // 5. Swing clearance for the estimated door count.
    let doors = estimate_door_count(program);
    requirements.push(CirculationRequirement {
        component: CirculationComponent::DoorClearances,
        reason: format!("~{doors} door swings"),
        area: 4.0 * doors as f32,
        optional: true,
    });

    // 6. Mudroom when there is a garage to come in from.
    if program.count_of(RoomType::Garage) > 0 {
        requirements.push(CirculationRequirement {
            component: CirculationComponent::Mudroom,
            reason: "garage entry drop zone".to_string(),
            area: 48.0,
            optional: true,
        });
    }

    debug!(
        "computed {} circulation requirements, {} sq ft required",
        requirements.len(),
        sum_requirements(&requirements, false)
    );
    requirements
}

/// Door-count estimate by access type: direct/indirect/service rooms get a
/// door each, shared rooms share openings (half a door), foyer and mudroom
/// get an exterior door each. Rounds up.
pub fn estimate_door_count(program: &FloorProgram) -> u32 {
    let mut doors = 0.0f32;
    for room in &program.rooms {
        doors += match room.room_type.access() {
            AccessType::Direct => 1.0,
            AccessType::Shared => 0.5,
            AccessType::Indirect => 1.0,
            AccessType::Service => 1.0,
            AccessType::Hub => match room.room_type {
                RoomType::Foyer | RoomType::Mudroom => 1.0,
                _ => 0.0,
            },
        };
    }
    doors.ceil() as u32
}

pub fn sum_requirements(requirements: &[CirculationRequirement], include_optional: bool) -> f32 {
    requirements
        .iter()
        .filter(|r| include_optional || !r.optional)
        .map(|r| r.area)
        .sum()
}

/// Requirement-relative rating: how the achieved circulation share compares
/// to what the program actually needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CirculationRating {
    Cramped,
    Tight,
    Efficient,
    Comfortable,
    Wasteful,
}

pub fn rate_circulation(actual_pct: f32, required_pct: f32) -> CirculationRating {
    if required_pct <= 0.0 {
        return CirculationRating::Efficient;
    }
    let ratio = actual_pct / required_pct;
    if ratio < 0.8 {
        CirculationRating::Cramped
    } else if ratio < 0.95 {
        CirculationRating::Tight
    } else if ratio <= 1.1 {
        CirculationRating::Efficient
    } else if ratio <= 1.3 {
        CirculationRating::Comfortable
    } else {
        CirculationRating::Wasteful
    }
}

/// Area-only banding of circulation share, independent of the program.
/// Reported alongside the requirement-relative rating; callers choose which
/// to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaBand {
    Excellent,
    Good,
    Acceptable,
    High,
}

pub fn area_band(actual_pct: f32) -> AreaBand {
    if actual_pct <= 10.0 {
        AreaBand::Excellent
    } else if actual_pct <= 15.0 {
        AreaBand::Good
    } else if actual_pct <= 20.0 {
        AreaBand::Acceptable
    } else {
        AreaBand::High
    }
}

/// Both circulation metrics side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CirculationReport {
    pub required_area: f32,
    pub required_pct: f32,
    pub actual_area: f32,
    pub actual_pct: f32,
    pub rating: CirculationRating,
    pub band: AreaBand,
}

pub fn report(
    requirements: &[CirculationRequirement],
    footprint_area: f32,
    actual_area: f32,
) -> CirculationReport {
    let required_area = sum_requirements(requirements, false);
    let required_pct = 100.0 * required_area / footprint_area;
    let actual_pct = 100.0 * actual_area / footprint_area;
    CirculationReport {
        required_area,
        required_pct,
        actual_area,
        actual_pct,
        rating: rate_circulation(actual_pct, required_pct),
        band: area_band(actual_pct),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineType {
    Linear,
    Branching,
    HubAndSpoke,
}

impl Display for SpineType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpineType::Linear => write!(f, "linear"),
            SpineType::Branching => write!(f, "branching"),
            SpineType::HubAndSpoke => write!(f, "hub-and-spoke"),
        }
    }
}

/// A straight spine element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpineAxis {
    pub start: Point,
    pub end: Point,
}

impl SpineAxis {
    pub fn length(&self) -> f32 {
        self.start.dist(&self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCluster {
    pub zone: ZoneType,
    pub rooms: Vec<String>,
    pub total_area: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CirculationSpine {
    pub spine_type: SpineType,
    pub main_axis: SpineAxis,
    pub branches: Vec<SpineAxis>,
    pub zones: Vec<ZoneCluster>,
    pub total_area: f32,
}

/// Chooses the spine topology and lays out its axes inside the footprint.
///
/// Strongly elongated footprints (aspect beyond 1.5:1 either way) get a
/// linear spine along the long dimension; L-shaped plans branch; everything
/// else gets a hub at the centre.
pub fn compute_spine(
    footprint: &Footprint,
    program: &FloorProgram,
    is_l_shaped: bool,
) -> CirculationSpine {
    let ratio = footprint.aspect_ratio();
    let spine_type = if !(0.67..=1.5).contains(&ratio) {
        SpineType::Linear
    } else if is_l_shaped {
        SpineType::Branching
    } else {
        SpineType::HubAndSpoke
    };

    let center = footprint.center();
    let along_width = footprint.width >= footprint.depth;

    let main_axis = match spine_type {
        SpineType::Linear => {
            if along_width {
                SpineAxis {
                    start: Point::new(0.0, center.y),
                    end: Point::new(footprint.width, center.y),
                }
            } else {
                SpineAxis {
                    start: Point::new(center.x, 0.0),
                    end: Point::new(center.x, footprint.depth),
                }
            }
        }
        // Branching and hub spines keep a short run through the centre; the
        // hallway network grows the rest during realisation.
        _ => {
            let half = 0.1 * footprint.width.max(footprint.depth);
            if along_width {
                SpineAxis {
                    start: Point::new(center.x - half, center.y),
                    end: Point::new(center.x + half, center.y),
                }
            } else {
                SpineAxis {
                    start: Point::new(center.x, center.y - half),
                    end: Point::new(center.x, center.y + half),
                }
            }
        }
    };

    let branches = match spine_type {
        SpineType::Branching => {
            if along_width {
                vec![
                    SpineAxis { start: center, end: Point::new(center.x, 0.0) },
                    SpineAxis { start: center, end: Point::new(center.x, footprint.depth) },
                ]
            } else {
                vec![
                    SpineAxis { start: center, end: Point::new(0.0, center.y) },
                    SpineAxis { start: center, end: Point::new(footprint.width, center.y) },
                ]
            }
        }
        SpineType::HubAndSpoke => {
            let reach = 0.15 * footprint.width.min(footprint.depth);
            vec![
                SpineAxis { start: center, end: Point::new(center.x + reach, center.y) },
                SpineAxis { start: center, end: Point::new(center.x, center.y + reach) },
                SpineAxis { start: center, end: Point::new(center.x - reach, center.y) },
                SpineAxis { start: center, end: Point::new(center.x, center.y - reach) },
            ]
        }
        SpineType::Linear => Vec::new(),
    };

    let requirements = compute_requirements(program);
    CirculationSpine {
        spine_type,
        main_axis,
        branches,
        zones: cluster_zones(program),
        total_area: sum_requirements(&requirements, true),
    }
}

/// Groups program rooms into plan zones, in fixed zone order.
pub fn cluster_zones(program: &FloorProgram) -> Vec<ZoneCluster> {
    const ORDER: [ZoneType; 5] = [
        ZoneType::Entry,
        ZoneType::Public,
        ZoneType::Private,
        ZoneType::Service,
        ZoneType::Vertical,
    ];
    ORDER
        .iter()
        .filter_map(|&zone| {
            let rooms: Vec<&crate::program::RoomSpec> =
                program.rooms.iter().filter(|r| r.room_type.zone() == zone).collect();
            if rooms.is_empty() {
                return None;
            }
            Some(ZoneCluster {
                zone,
                total_area: rooms.iter().map(|r| r.area).sum(),
                rooms: rooms.into_iter().map(|r| r.name.clone()).collect(),
            })
        })
        .collect()
}

impl Display for CirculationRequirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.0} sq ft ({}){}",
            self.component,
            self.area,
            self.reason,
            if self.optional { " [optional]" } else { "" }
        )
    }
}
