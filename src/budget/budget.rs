//! Priority-driven space allocation.
//!
//! Every requested room first resolves to the smallest catalogue option that
//! satisfies it; whatever footprint area is left over is then spent upsizing
//! rooms tier by tier, highest adjacency priority first. Primary-suite rooms
//! jump the queue; circulation never grows.

#[cfg(test)]
mod test;

use std::fmt::{Display, Formatter};

use log::debug;
use serde::Serialize;

use crate::catalog::{find_next_size_up, find_option_for_area, RoomSizeOption};
use crate::errors::FloorweaveError;
use crate::program::{is_primary_name, FloorProgram, RoomType};

/// One room's slice of the budget. `current` tracks the option the room
/// holds after any expansions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomBudget {
    pub name: String,
    pub room_type: RoomType,
    pub is_primary: bool,
    pub requested_area: f32,
    pub current: RoomSizeOption,
    pub priority: u32,
}

/// A recorded tier bump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expansion {
    pub room: String,
    pub from: RoomSizeOption,
    pub to: RoomSizeOption,
}

impl Expansion {
    pub fn delta(&self) -> f32 {
        self.to.area - self.from.area
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    ExpandRoom,
    AddStorage,
    AddUtility,
    ShrinkFootprint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub expansions: Vec<Expansion>,
    pub total_allocated: f32,
    pub leftover: f32,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceBudget {
    pub footprint_area: f32,
    pub minimum_required: f32,
    pub excess: f32,
    pub rooms: Vec<RoomBudget>,
    pub plan: AllocationPlan,
}

/// Whether a room name marks it as part of the primary suite. Spelled out
/// here because the allocator is the documented owner of this heuristic.
pub fn is_primary_room(name: &str) -> bool {
    is_primary_name(name)
}

fn priority_of(room_type: RoomType, primary: bool) -> u32 {
    let base = room_type.priority();
    // Circulation stays at zero no matter what it's called.
    if primary && !room_type.is_circulation() {
        base + 20
    } else {
        base
    }
}

/// Resolves every program entry against the catalogue and distributes the
/// excess. Fails only when the resolved minimums alone exceed the footprint.
pub fn calculate_space_budget(
    footprint_area: f32,
    program: &FloorProgram,
) -> Result<SpaceBudget, FloorweaveError> {
    let mut rooms: Vec<RoomBudget> = program
        .rooms
        .iter()
        .map(|spec| {
            let primary = spec.is_primary || is_primary_room(&spec.name);
            RoomBudget {
                name: spec.name.clone(),
                room_type: spec.room_type,
                is_primary: primary,
                requested_area: spec.area,
                current: *find_option_for_area(spec.room_type, spec.area, primary),
                priority: priority_of(spec.room_type, primary),
            }
        })
        .collect();

    let minimum_required: f32 = rooms.iter().map(|r| r.current.area).sum();
    if minimum_required > footprint_area {
        return Err(FloorweaveError::UnsatisfiableRequirement {
            required: minimum_required,
            available: footprint_area,
        });
    }
    let excess = footprint_area - minimum_required;

    // Visit order: priority descending, input order on ties. The sort is
    // stable, so equal priorities keep their program order.
    let mut order: Vec<usize> = (0..rooms.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(rooms[i].priority));

    let mut remaining = excess;
    let mut expansions: Vec<Expansion> = Vec::new();

    // First pass: one tier bump per room, in priority order.
    for &i in &order {
        try_expand(&mut rooms[i], &mut remaining, &mut expansions);
    }

    // Second pass: with meaningful budget left, high-priority rooms get one
    // more look.
    if remaining > 50.0 {
        for &i in &order {
            if rooms[i].priority >= 50 {
                try_expand(&mut rooms[i], &mut remaining, &mut expansions);
            }
        }
    }

    let leftover = remaining;
    debug!(
        "allocated {:.0} of {excess:.0} excess sq ft over {} expansion(s), {leftover:.0} left",
        excess - leftover,
        expansions.len()
    );

    let plan = AllocationPlan {
        total_allocated: excess - leftover,
        suggestions: suggest(leftover),
        leftover,
        expansions,
    };

    Ok(SpaceBudget { footprint_area, minimum_required, excess, rooms, plan })
}

fn try_expand(room: &mut RoomBudget, remaining: &mut f32, expansions: &mut Vec<Expansion>) {
    if room.room_type.is_circulation() {
        return;
    }
    if let Some(next) =
        find_next_size_up(room.room_type, room.current.area, *remaining, room.is_primary)
    {
        *remaining -= next.area - room.current.area;
        expansions.push(Expansion { room: room.name.clone(), from: room.current, to: *next });
        room.current = *next;
    }
}

/// What to do with area the allocator couldn't spend, by leftover band.
fn suggest(leftover: f32) -> Vec<Suggestion> {
    if leftover <= 0.0 {
        return Vec::new();
    }
    let suggestion = if leftover < 20.0 {
        Suggestion {
            kind: SuggestionKind::ExpandRoom,
            message: format!("{leftover:.0} sq ft left; nudge one room up a tier"),
        }
    } else if leftover <= 50.0 {
        Suggestion {
            kind: SuggestionKind::AddStorage,
            message: format!("{leftover:.0} sq ft left; enough for a closet or pantry"),
        }
    } else if leftover <= 100.0 {
        Suggestion {
            kind: SuggestionKind::AddUtility,
            message: format!("{leftover:.0} sq ft left; enough for a utility or laundry room"),
        }
    } else {
        Suggestion {
            kind: SuggestionKind::ShrinkFootprint,
            message: format!("{leftover:.0} sq ft unusable; consider a smaller footprint"),
        }
    };
    vec![suggestion]
}

impl Display for SpaceBudget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Footprint: {:.0}\tMinimum: {:.0}\tExcess: {:.0}",
            self.footprint_area, self.minimum_required, self.excess
        )?;
        for room in &self.rooms {
            writeln!(
                f,
                "\t{} ({}): {:.0}x{:.0} = {:.0} sq ft [{}]",
                room.name,
                room.room_type,
                room.current.width,
                room.current.depth,
                room.current.area,
                room.current.tier
            )?;
        }
        for exp in &self.plan.expansions {
            writeln!(f, "\t+ {} {:.0} -> {:.0} sq ft", exp.room, exp.from.area, exp.to.area)?;
        }
        for s in &self.plan.suggestions {
            writeln!(f, "\t? {}", s.message)?;
        }
        Ok(())
    }
}
