use super::*;
use crate::catalog::SizeTier;
use crate::layout::PositionSpec;
use crate::point::Point;
use crate::program::{Feel, FloorProgram, Footprint, RoomSpec, RoomType};

/// A compact cozy plan with hand-pinned positions: open-plan block to the
/// south, bedroom pair to the north-east, hall bathroom to the north-west.
/// Room sizes below are the post-allocation sizes for a 40x32 footprint.
fn pinned_request() -> SynthesisRequest {
    let program = FloorProgram::new(
        vec![
            RoomSpec::new("Foyer", RoomType::Foyer, 48.0),
            RoomSpec::new("Living Room", RoomType::Living, 168.0),
            RoomSpec::new("Kitchen", RoomType::Kitchen, 120.0),
            RoomSpec::new("Bedroom 1", RoomType::Bedroom, 110.0),
            RoomSpec::new("Bedroom 2", RoomType::Bedroom, 110.0),
            RoomSpec::new("Bathroom", RoomType::Bathroom, 40.0),
        ],
        1,
        Feel::Cozy,
    );
    let mut request =
        SynthesisRequest::new(program, Footprint::new(40.0, 32.0).unwrap());
    request.positions = vec![
        ("Living Room".to_string(), PositionSpec::Absolute(Point::new(0.0, 0.0))),
        ("Kitchen".to_string(), PositionSpec::Absolute(Point::new(16.0, 0.0))),
        ("Foyer".to_string(), PositionSpec::Absolute(Point::new(28.0, 0.0))),
        ("Bedroom 1".to_string(), PositionSpec::Absolute(Point::new(16.0, 20.0))),
        ("Bedroom 2".to_string(), PositionSpec::Absolute(Point::new(28.0, 20.0))),
        ("Bathroom".to_string(), PositionSpec::Absolute(Point::new(0.0, 20.0))),
    ];
    request
}

#[test]
fn full_run_produces_a_validated_plan() {
    let result = Synthesis::run(&pinned_request()).unwrap();

    assert_eq!(result.stage, SynthesisStage::Final);
    assert_eq!(result.layout.rooms.len(), 6);
    assert_eq!(result.entry_room.as_deref(), Some("Foyer"));

    // Two passes of upsizing land the bedrooms at the extra tier.
    for room in result.budget.rooms.iter().filter(|r| r.room_type == RoomType::Bedroom) {
        assert_eq!(room.current.tier, SizeTier::Extra);
    }

    // The bedroom pair clusters and gets a corridor with a door per served
    // room (two bedrooms plus the hall bathroom).
    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.corridors.len(), 1);
    assert_eq!(result.corridors[0].doors.len(), 3);

    // Living and kitchen merge into one open-plan cluster with overlays.
    assert_eq!(result.open_plan.len(), 1);
    assert!(result.traffic_paths.len() >= 2);

    // Hallway geometry exists and every room is walkable from the foyer.
    assert!(result.geometry.walled_area > 0.0);
    let reachability = result.reachability.as_ref().unwrap();
    assert!(reachability.all_reachable, "unreachable: {:?}", reachability.unreachable);

    // Overlay area is reported separately from walled circulation.
    assert!(result.geometry.traffic_path_area > 0.0);
    assert!(result.circulation.required_area > 0.0);
}

#[test]
fn graph_stage_runs_before_hallways_and_never_blocks() {
    // Before corridors exist, the detached bedrooms and bathroom show up in
    // the graph-stage report; the run still completes because the hallway
    // network serves them afterwards.
    let result = Synthesis::run(&pinned_request()).unwrap();
    let connectivity = result.connectivity.as_ref().unwrap();
    assert!(!connectivity.all_reachable());
    assert!(connectivity.unreachable.contains(&"Bathroom".to_string()));
    assert!(result.reachability.as_ref().unwrap().all_reachable);
}

#[test]
fn identical_requests_give_byte_identical_results() {
    let a = Synthesis::run(&pinned_request()).unwrap();
    let b = Synthesis::run(&pinned_request()).unwrap();
    assert_eq!(a.slug(), b.slug());
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn auto_placement_runs_end_to_end_without_reachability() {
    // No pinned positions at all: the placer tiles the rooms itself. The
    // walkability of an auto layout is not guaranteed, so this run only
    // goes as far as geometry.
    let mut request = pinned_request();
    request.positions.clear();
    request.flags.validate_reachability = false;
    let result = Synthesis::run(&request).unwrap();
    assert_eq!(result.layout.rooms.len(), 6);
    assert!(result.reachability.is_none());
    for i in 0..result.layout.rooms.len() {
        for j in (i + 1)..result.layout.rooms.len() {
            assert!(!result.layout.rooms[i].overlaps(&result.layout.rooms[j], 0.0));
        }
    }
}

#[test]
fn unsatisfiable_footprint_fails_early() {
    let program = FloorProgram::new(
        vec![RoomSpec::new("Living Room", RoomType::Living, 300.0)],
        1,
        Feel::Spacious,
    );
    let request = SynthesisRequest::new(program, Footprint::new(10.0, 10.0).unwrap());
    assert!(matches!(
        Synthesis::run(&request),
        Err(crate::errors::FloorweaveError::UnsatisfiableRequirement { .. })
    ));
}

fn isolated_living_request() -> SynthesisRequest {
    let program = FloorProgram::new(
        vec![
            RoomSpec::new("Foyer", RoomType::Foyer, 48.0),
            RoomSpec::new("Living", RoomType::Living, 168.0),
        ],
        1,
        Feel::Cozy,
    );
    let mut request =
        SynthesisRequest::new(program, Footprint::new(22.0, 14.0).unwrap());
    // A 1.5 ft gap: too wide to count as adjacency, no hallway serves a
    // shared room, so the living room is cut off.
    request.positions = vec![
        ("Foyer".to_string(), PositionSpec::Absolute(Point::new(0.0, 0.0))),
        ("Living".to_string(), PositionSpec::Absolute(Point::new(9.5, 0.0))),
    ];
    request
}

#[test]
fn unreachable_rooms_are_fatal() {
    let err = Synthesis::run(&isolated_living_request()).unwrap_err();
    assert_eq!(
        err,
        crate::errors::FloorweaveError::Unreachable { rooms: vec!["Living".to_string()] }
    );
}

#[test]
fn reachability_validation_can_be_switched_off() {
    let mut request = isolated_living_request();
    request.flags.validate_reachability = false;
    let result = Synthesis::run(&request).unwrap();
    assert!(result.reachability.is_none());
    assert_eq!(result.stage, SynthesisStage::Final);
}

#[test]
fn placement_conflicts_are_fatal() {
    let mut request = pinned_request();
    // Kitchen pinned on top of the living room.
    request.positions[1] =
        ("Kitchen".to_string(), PositionSpec::Absolute(Point::new(0.0, 0.0)));
    let err = Synthesis::run(&request).unwrap_err();
    assert_eq!(
        err,
        crate::errors::FloorweaveError::Overlap {
            room: "Kitchen".to_string(),
            conflict: "Living Room".to_string(),
        }
    );
}

#[test]
fn empty_program_synthesises_an_empty_plan() {
    let program = FloorProgram::new(Vec::new(), 1, Feel::Comfortable);
    let request = SynthesisRequest::new(program, Footprint::new(30.0, 30.0).unwrap());
    let result = Synthesis::run(&request).unwrap();
    assert!(result.layout.rooms.is_empty());
    assert!(result.connectivity.is_none());
    assert!(result.network.segments.is_empty());
    assert!(result.reachability.is_none());
}

#[test]
fn slug_distinguishes_different_programs() {
    let a = Synthesis::run(&pinned_request()).unwrap();
    let mut request = pinned_request();
    request.program.rooms[5].area = 25.0;
    let b = Synthesis::run(&request).unwrap();
    assert_ne!(a.slug(), b.slug());
}
