use super::*;
use crate::program::{Feel, FloorProgram, Footprint, RoomSpec, RoomType, ZoneType};

/// 2500 sq ft three-bed program used across the crate's scenario tests.
fn three_bed_program() -> FloorProgram {
    FloorProgram::new(
        vec![
            RoomSpec::new("Living Room", RoomType::Living, 196.0),
            RoomSpec::new("Kitchen", RoomType::Kitchen, 144.0),
            RoomSpec::new("Dining Room", RoomType::Dining, 132.0),
            RoomSpec::primary("Primary Bedroom", RoomType::Bedroom, 196.0),
            RoomSpec::primary("Primary Bathroom", RoomType::Bathroom, 80.0),
            RoomSpec::primary("Primary Closet", RoomType::Closet, 48.0),
            RoomSpec::new("Bedroom 2", RoomType::Bedroom, 120.0),
            RoomSpec::new("Bedroom 3", RoomType::Bedroom, 110.0),
            RoomSpec::new("Closet 2", RoomType::Closet, 20.0),
            RoomSpec::new("Closet 3", RoomType::Closet, 20.0),
            RoomSpec::new("Hall Bathroom", RoomType::Bathroom, 45.0),
            RoomSpec::new("Half Bath", RoomType::Bathroom, 25.0),
            RoomSpec::new("Laundry", RoomType::Laundry, 48.0),
        ],
        1,
        Feel::Comfortable,
    )
}

fn two_bed_cozy() -> FloorProgram {
    FloorProgram::new(
        vec![
            RoomSpec::new("Living Room", RoomType::Living, 168.0),
            RoomSpec::new("Kitchen", RoomType::Kitchen, 120.0),
            RoomSpec::new("Bedroom 1", RoomType::Bedroom, 110.0),
            RoomSpec::new("Bedroom 2", RoomType::Bedroom, 110.0),
            RoomSpec::new("Bathroom", RoomType::Bathroom, 40.0),
        ],
        1,
        Feel::Cozy,
    )
}

fn area_of(reqs: &[CirculationRequirement], component: CirculationComponent) -> Option<f32> {
    reqs.iter().find(|r| r.component == component).map(|r| r.area)
}

#[test]
fn comfortable_three_bed_requirements() {
    let reqs = compute_requirements(&three_bed_program());

    assert_eq!(area_of(&reqs, CirculationComponent::Foyer), Some(64.0));
    // 3 bedrooms: (3*4 + 8) ft at 3.5 ft wide.
    assert_eq!(area_of(&reqs, CirculationComponent::BedroomHallway), Some(70.0));
    assert_eq!(area_of(&reqs, CirculationComponent::ZoneTransition), Some(55.0));
    assert_eq!(area_of(&reqs, CirculationComponent::Stairwell), None);

    let required = sum_requirements(&reqs, false);
    assert!((required - 189.0).abs() < 1e-3, "required {required}");
}

#[test]
fn cozy_two_bed_requirements() {
    let reqs = compute_requirements(&two_bed_cozy());
    assert_eq!(area_of(&reqs, CirculationComponent::Foyer), Some(48.0));
    // 2 bedrooms: (2*4 + 8) ft at 3.0 ft wide.
    assert_eq!(area_of(&reqs, CirculationComponent::BedroomHallway), Some(48.0));
    assert_eq!(area_of(&reqs, CirculationComponent::ZoneTransition), Some(40.0));
}

#[test]
fn requirement_order_is_stable() {
    let reqs = compute_requirements(&three_bed_program());
    let components: Vec<CirculationComponent> = reqs.iter().map(|r| r.component).collect();
    assert_eq!(
        components,
        vec![
            CirculationComponent::Foyer,
            CirculationComponent::BedroomHallway,
            CirculationComponent::ZoneTransition,
            CirculationComponent::DoorClearances,
        ]
    );
}

#[test]
fn no_bedrooms_means_no_bedroom_hallway() {
    let program = FloorProgram::new(
        vec![
            RoomSpec::new("Studio", RoomType::Living, 300.0),
            RoomSpec::new("Kitchen", RoomType::Kitchen, 120.0),
        ],
        1,
        Feel::Cozy,
    );
    let reqs = compute_requirements(&program);
    assert_eq!(area_of(&reqs, CirculationComponent::BedroomHallway), None);
    // No private zone either, so no transition.
    assert_eq!(area_of(&reqs, CirculationComponent::ZoneTransition), None);
}

#[test]
fn single_story_has_no_stairwell() {
    let reqs = compute_requirements(&two_bed_cozy());
    assert_eq!(area_of(&reqs, CirculationComponent::Stairwell), None);
    assert_eq!(area_of(&reqs, CirculationComponent::UpperLanding), None);
    assert_eq!(area_of(&reqs, CirculationComponent::LowerLanding), None);
}

#[test]
fn two_stories_add_stair_and_landings() {
    let mut program = two_bed_cozy();
    program.stories = 2;
    let reqs = compute_requirements(&program);
    assert_eq!(area_of(&reqs, CirculationComponent::Stairwell), Some(3.0 * 14.0));
    assert_eq!(area_of(&reqs, CirculationComponent::UpperLanding), Some(25.0));
    assert_eq!(area_of(&reqs, CirculationComponent::LowerLanding), Some(20.0));
}

#[test]
fn garage_adds_optional_mudroom() {
    let mut program = two_bed_cozy();
    program.rooms.push(RoomSpec::new("Garage", RoomType::Garage, 400.0));
    let reqs = compute_requirements(&program);
    let mudroom = reqs.iter().find(|r| r.component == CirculationComponent::Mudroom).unwrap();
    assert_eq!(mudroom.area, 48.0);
    assert!(mudroom.optional);
}

#[test]
fn door_clearances_are_optional_and_counted() {
    let reqs = compute_requirements(&three_bed_program());
    let doors = reqs
        .iter()
        .find(|r| r.component == CirculationComponent::DoorClearances)
        .unwrap();
    assert!(doors.optional);
    // 6 direct + 3 shared/2 + 3 indirect + 1 service = 11.5, rounded up.
    assert_eq!(estimate_door_count(&three_bed_program()), 12);
    assert_eq!(doors.area, 48.0);
}

#[test]
fn optional_requirements_excluded_from_required_sum() {
    let reqs = compute_requirements(&three_bed_program());
    let with = sum_requirements(&reqs, true);
    let without = sum_requirements(&reqs, false);
    assert!(with > without);
}

#[test]
fn rating_bands() {
    assert_eq!(rate_circulation(7.0, 10.0), CirculationRating::Cramped);
    assert_eq!(rate_circulation(9.0, 10.0), CirculationRating::Tight);
    assert_eq!(rate_circulation(10.0, 10.0), CirculationRating::Efficient);
    assert_eq!(rate_circulation(11.0, 10.0), CirculationRating::Efficient);
    assert_eq!(rate_circulation(12.5, 10.0), CirculationRating::Comfortable);
    assert_eq!(rate_circulation(15.0, 10.0), CirculationRating::Wasteful);
}

#[test]
fn area_bands() {
    assert_eq!(area_band(8.0), AreaBand::Excellent);
    assert_eq!(area_band(12.0), AreaBand::Good);
    assert_eq!(area_band(18.0), AreaBand::Acceptable);
    assert_eq!(area_band(25.0), AreaBand::High);
}

#[test]
fn report_carries_both_metrics() {
    let reqs = compute_requirements(&three_bed_program());
    let report = report(&reqs, 2500.0, 200.0);
    assert_eq!(report.rating, rate_circulation(report.actual_pct, report.required_pct));
    assert_eq!(report.band, area_band(report.actual_pct));
    assert!((report.actual_pct - 8.0).abs() < 1e-3);
}

#[test]
fn three_bed_comfortable_rating_is_efficient() {
    let reqs = compute_requirements(&three_bed_program());
    let required = sum_requirements(&reqs, false);
    let report = report(&reqs, 2500.0, required);
    assert_eq!(report.rating, CirculationRating::Efficient);
}

#[test]
fn elongated_footprint_gets_linear_spine() {
    let program = two_bed_cozy();
    let wide = Footprint::new(80.0, 30.0).unwrap();
    let tall = Footprint::new(30.0, 80.0).unwrap();

    let spine = compute_spine(&wide, &program, false);
    assert_eq!(spine.spine_type, SpineType::Linear);
    assert!((spine.main_axis.length() - 80.0).abs() < 1e-3);
    assert_eq!(spine.main_axis.start.y, 15.0);

    let spine = compute_spine(&tall, &program, false);
    assert_eq!(spine.spine_type, SpineType::Linear);
    assert!((spine.main_axis.length() - 80.0).abs() < 1e-3);
}

#[test]
fn l_shaped_footprint_branches() {
    let program = two_bed_cozy();
    let fp = Footprint::new(50.0, 40.0).unwrap();
    let spine = compute_spine(&fp, &program, true);
    assert_eq!(spine.spine_type, SpineType::Branching);
    assert!(!spine.branches.is_empty());
}

#[test]
fn squarish_footprint_gets_hub() {
    let program = two_bed_cozy();
    let fp = Footprint::new(50.0, 40.0).unwrap();
    let spine = compute_spine(&fp, &program, false);
    assert_eq!(spine.spine_type, SpineType::HubAndSpoke);
    assert_eq!(spine.branches.len(), 4);
}

#[test]
fn zones_cluster_by_room_type() {
    let zones = cluster_zones(&three_bed_program());
    let public = zones.iter().find(|z| z.zone == ZoneType::Public).unwrap();
    assert_eq!(public.rooms.len(), 3);
    let private = zones.iter().find(|z| z.zone == ZoneType::Private).unwrap();
    // 3 bedrooms + 3 closets + 3 bathrooms.
    assert_eq!(private.rooms.len(), 9);
    assert!(zones.iter().all(|z| !z.rooms.is_empty()));
}
