use super::*;
use crate::program::RoomType;

#[test]
fn every_catalogue_is_strictly_ascending() {
    for rt in RoomType::ALL {
        for primary in [false, true] {
            let options = options_for(rt, primary);
            assert!(!options.is_empty());
            for pair in options.windows(2) {
                assert!(
                    pair[1].area > pair[0].area,
                    "{rt} catalogue must ascend: {} then {}",
                    pair[0].area,
                    pair[1].area
                );
            }
        }
    }
}

#[test]
fn areas_equal_width_times_depth() {
    for rt in RoomType::ALL {
        for primary in [false, true] {
            for o in options_for(rt, primary) {
                assert!((o.area - o.width * o.depth).abs() < 1e-4);
            }
        }
    }
}

#[test]
fn primary_variants_have_larger_minima() {
    for rt in [RoomType::Bedroom, RoomType::Bathroom, RoomType::Closet] {
        let standard = options_for(rt, false);
        let primary = options_for(rt, true);
        assert!(primary[0].area > standard[0].area, "{rt}");
    }
}

#[test]
fn non_suite_types_ignore_primary_flag() {
    assert_eq!(options_for(RoomType::Kitchen, true), options_for(RoomType::Kitchen, false));
}

#[test]
fn find_option_picks_smallest_fit() {
    let o = find_option_for_area(RoomType::Bedroom, 120.0, false);
    assert_eq!(o.area, 132.0);
    assert_eq!(o.tier, SizeTier::Nice);

    let exact = find_option_for_area(RoomType::Bedroom, 110.0, false);
    assert_eq!(exact.area, 110.0);
    assert_eq!(exact.tier, SizeTier::Minimum);
}

#[test]
fn find_option_falls_back_to_largest() {
    let o = find_option_for_area(RoomType::Bathroom, 500.0, false);
    assert_eq!(o.tier, SizeTier::Premium);
}

#[test]
fn primary_bedroom_at_196_is_nice_tier() {
    let o = find_option_for_area(RoomType::Bedroom, 196.0, true);
    assert_eq!(o.area, 196.0);
    assert_eq!(o.tier, SizeTier::Nice);
}

#[test]
fn next_size_up_respects_budget() {
    // Bedroom at 110; next is 132 (delta 22).
    assert_eq!(find_next_size_up(RoomType::Bedroom, 110.0, 25.0, false).unwrap().area, 132.0);
    assert!(find_next_size_up(RoomType::Bedroom, 110.0, 10.0, false).is_none());
}

#[test]
fn next_size_up_none_at_catalogue_top() {
    let top = options_for(RoomType::Bedroom, false).last().unwrap();
    assert!(find_next_size_up(RoomType::Bedroom, top.area, 1000.0, false).is_none());
}

#[test]
fn foyer_catalogue_matches_feel_areas() {
    let options = options_for(RoomType::Foyer, false);
    assert_eq!(options[0].area, 48.0);
    assert_eq!(options[1].area, 64.0);
    assert_eq!(options.last().unwrap().area, 100.0);
}
