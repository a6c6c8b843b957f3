use super::*;
use crate::catalog::SizeTier;
use crate::program::{Feel, FloorProgram, RoomSpec, RoomType};

/// A realistic 1200 sq ft cozy two-bed program. The footprint area handed
/// to the allocator is net of the circulation requirements (48 + 48 + 40).
fn two_bed_cozy() -> FloorProgram {
    FloorProgram::new(
        vec![
            RoomSpec::new("Living Room", RoomType::Living, 168.0),
            RoomSpec::new("Kitchen", RoomType::Kitchen, 120.0),
            RoomSpec::new("Dining Nook", RoomType::Dining, 110.0),
            RoomSpec::new("Bedroom 1", RoomType::Bedroom, 110.0),
            RoomSpec::new("Bedroom 2", RoomType::Bedroom, 110.0),
            RoomSpec::new("Bathroom", RoomType::Bathroom, 40.0),
            RoomSpec::new("Closet 1", RoomType::Closet, 20.0),
            RoomSpec::new("Closet 2", RoomType::Closet, 20.0),
            RoomSpec::new("Office", RoomType::Office, 100.0),
            RoomSpec::new("Pantry", RoomType::Pantry, 20.0),
            RoomSpec::new("Laundry", RoomType::Laundry, 48.0),
        ],
        1,
        Feel::Cozy,
    )
}

const TWO_BED_NET_AREA: f32 = 1200.0 - 136.0;

#[test]
fn minimum_and_excess_accounting() {
    let budget = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    assert_eq!(budget.minimum_required, 866.0);
    assert_eq!(budget.excess, TWO_BED_NET_AREA - 866.0);
    assert_eq!(budget.plan.total_allocated + budget.plan.leftover, budget.excess);
}

#[test]
fn cozy_two_bed_keeps_bedrooms_at_nice() {
    let budget = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    for room in budget.rooms.iter().filter(|r| r.room_type == RoomType::Bedroom) {
        assert!(
            room.current.tier <= SizeTier::Nice,
            "{} ended at {}",
            room.name,
            room.current.tier
        );
    }
}

#[test]
fn expansions_never_shrink_and_fit_excess() {
    let budget = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    assert!(!budget.plan.expansions.is_empty());
    let mut spent = 0.0;
    for exp in &budget.plan.expansions {
        assert!(exp.to.area >= exp.from.area);
        spent += exp.delta();
    }
    assert!(spent <= budget.excess + 1e-3);
}

#[test]
fn highest_priority_room_expands_first() {
    let budget = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    assert_eq!(budget.plan.expansions[0].room, "Bedroom 1");
    assert_eq!(budget.plan.expansions[1].room, "Bedroom 2");
}

#[test]
fn primary_rooms_jump_the_queue() {
    let program = FloorProgram::new(
        vec![
            RoomSpec::new("Bedroom 2", RoomType::Bedroom, 110.0),
            RoomSpec::primary("Primary Bedroom", RoomType::Bedroom, 168.0),
        ],
        1,
        Feel::Cozy,
    );
    // Enough for exactly one expansion of the primary (168 -> 196).
    let budget = calculate_space_budget(110.0 + 168.0 + 30.0, &program).unwrap();
    assert_eq!(budget.plan.expansions.len(), 1);
    assert_eq!(budget.plan.expansions[0].room, "Primary Bedroom");
}

#[test]
fn primary_detected_by_name_without_flag() {
    let program = FloorProgram::new(
        vec![RoomSpec::new("Master Bedroom", RoomType::Bedroom, 150.0)],
        1,
        Feel::Cozy,
    );
    let budget = calculate_space_budget(400.0, &program).unwrap();
    let room = &budget.rooms[0];
    assert!(room.is_primary);
    // Resolved against the primary catalogue, so the minimum is 168.
    assert_eq!(room.priority, 95);
    assert!(room.current.area >= 168.0);
}

#[test]
fn circulation_rooms_never_expand() {
    let program = FloorProgram::new(
        vec![
            RoomSpec::new("Hall", RoomType::Hallway, 24.0),
            RoomSpec::new("Stairs", RoomType::Stair, 42.0),
            RoomSpec::new("Bedroom", RoomType::Bedroom, 110.0),
        ],
        1,
        Feel::Cozy,
    );
    let budget = calculate_space_budget(1000.0, &program).unwrap();
    for exp in &budget.plan.expansions {
        assert!(!matches!(exp.room.as_str(), "Hall" | "Stairs"));
    }
    let hall = budget.rooms.iter().find(|r| r.name == "Hall").unwrap();
    assert_eq!(hall.current.area, 24.0);
    assert_eq!(hall.priority, 0);
}

#[test]
fn second_pass_revisits_high_priority_rooms() {
    // One bedroom, lots of excess: pass one takes it to Nice, pass two to
    // Extra (and onward passes don't exist, so it stops there).
    let program = FloorProgram::new(
        vec![RoomSpec::new("Bedroom", RoomType::Bedroom, 110.0)],
        1,
        Feel::Cozy,
    );
    let budget = calculate_space_budget(400.0, &program).unwrap();
    assert_eq!(budget.plan.expansions.len(), 2);
    let room = &budget.rooms[0];
    assert_eq!(room.current.tier, SizeTier::Extra);
}

#[test]
fn second_pass_skips_low_priority_rooms() {
    let program = FloorProgram::new(
        vec![RoomSpec::new("Closet", RoomType::Closet, 8.0)],
        1,
        Feel::Cozy,
    );
    // Closet priority 30 < 50: only the first pass applies.
    let budget = calculate_space_budget(300.0, &program).unwrap();
    assert_eq!(budget.plan.expansions.len(), 1);
}

#[test]
fn zero_excess_means_no_expansions() {
    let program = FloorProgram::new(
        vec![RoomSpec::new("Bedroom", RoomType::Bedroom, 110.0)],
        1,
        Feel::Cozy,
    );
    let budget = calculate_space_budget(110.0, &program).unwrap();
    assert!(budget.plan.expansions.is_empty());
    assert!(budget.plan.suggestions.is_empty());
    assert_eq!(budget.plan.leftover, 0.0);
}

#[test]
fn unsatisfiable_program_is_an_error() {
    let program = FloorProgram::new(
        vec![RoomSpec::new("Bedroom", RoomType::Bedroom, 110.0)],
        1,
        Feel::Cozy,
    );
    let err = calculate_space_budget(100.0, &program).unwrap_err();
    assert!(matches!(
        err,
        crate::errors::FloorweaveError::UnsatisfiableRequirement { .. }
    ));
    assert!(!err.recovery_hint().is_empty());
}

#[test]
fn suggestion_bands() {
    // Tiny leftover: nudge a room.
    let budget = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    assert!(budget.plan.leftover < 20.0 && budget.plan.leftover > 0.0);
    assert_eq!(budget.plan.suggestions[0].kind, SuggestionKind::ExpandRoom);

    // A closet that can't absorb much of a big excess: shrink the footprint.
    let small = FloorProgram::new(
        vec![RoomSpec::new("Closet", RoomType::Closet, 8.0)],
        1,
        Feel::Cozy,
    );
    let budget = calculate_space_budget(500.0, &small).unwrap();
    assert_eq!(budget.plan.suggestions[0].kind, SuggestionKind::ShrinkFootprint);
}

#[test]
fn allocation_is_deterministic() {
    let a = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    let b = calculate_space_budget(TWO_BED_NET_AREA, &two_bed_cozy()).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
