//! Properties of the reference crossing table.

use crossing::fsm::INPUT_CODES;
use crossing::trafficlight::{self, PEDESTRIAN, Phase, SOUTH_CAR, TABLE, WEST_CAR};
use crossing::{InputCode, Outputs, PortMasks};
use enum_ordinalize::Ordinalize;
use proptest::prelude::*;

prop_compose! {
    fn any_phase()(ordinal in 0..Phase::VARIANT_COUNT) -> Phase {
        Phase::from_ordinal(ordinal).unwrap()
    }
}

proptest! {
    #[test]
    fn step_is_deterministic(phase in any_phase(), raw in any::<u8>()) {
        let fsm = trafficlight::fsm().unwrap();
        let code = InputCode::masked(raw);
        prop_assert_eq!(fsm.step(phase, code), fsm.step(phase, code));
    }

    #[test]
    fn bits_above_the_sensors_never_matter(phase in any_phase(), raw in any::<u8>()) {
        let fsm = trafficlight::fsm().unwrap();
        let low = InputCode::new(raw & 0b111).unwrap();
        prop_assert_eq!(fsm.step(phase, InputCode::masked(raw)), fsm.step(phase, low));
    }

    #[test]
    fn pedestrian_writes_preserve_unrelated_bits(phase in any_phase(), port in any::<u8>()) {
        let fsm = trafficlight::fsm().unwrap();
        let mask = PortMasks::REFERENCE.pedestrian;
        let merged = fsm.outputs_for(phase).merge_secondary(port, mask);
        prop_assert_eq!(merged & !mask, port & !mask);
        prop_assert_eq!(merged & mask, fsm.outputs_for(phase).secondary);
    }
}

#[test]
fn every_state_has_a_target_for_every_code() {
    let fsm = trafficlight::fsm().unwrap();
    for &phase in Phase::VARIANTS {
        let codes: Vec<InputCode> = InputCode::all().collect();
        assert_eq!(codes.len(), INPUT_CODES);
        for code in codes {
            let next = fsm.step(phase, code);
            assert!(Phase::VARIANTS.contains(&next), "{phase:?} on {code:?}");
        }
    }
}

#[test]
fn every_state_is_reachable_from_every_state() {
    let fsm = trafficlight::fsm().unwrap();
    for &phase in Phase::VARIANTS {
        assert_eq!(fsm.reachable_from(phase).len(), Phase::VARIANT_COUNT, "{phase:?}");
    }
}

#[test]
fn table_is_the_reference_layout() {
    let fsm = trafficlight::fsm().unwrap();
    assert_eq!(TABLE.len(), 9);
    assert_eq!(
        fsm.outputs_for(Phase::GoWest),
        Outputs {
            primary: 0x0C,
            secondary: 0x02
        }
    );
    assert_eq!(fsm.outputs_for(Phase::WaitWest).primary, 0x14);
    assert_eq!(fsm.outputs_for(Phase::GoSouth).primary, 0x21);
    assert_eq!(fsm.outputs_for(Phase::WaitSouth).primary, 0x22);
    assert_eq!(
        fsm.outputs_for(Phase::Walk),
        Outputs {
            primary: 0x24,
            secondary: 0x08
        }
    );
    assert_eq!(fsm.outputs_for(Phase::WalkOff1).secondary, 0x00);
    assert_eq!(fsm.dwell_for(Phase::GoSouth), 300);
    assert_eq!(fsm.dwell_for(Phase::NotWalk2), 150);
}

#[test]
fn vehicle_b_arriving_ends_west_green() {
    let fsm = trafficlight::fsm().unwrap();
    let code = InputCode::masked(SOUTH_CAR);
    assert_eq!(fsm.step(Phase::GoWest, code), Phase::WaitWest);
}

#[test]
fn pedestrian_request_goes_through_yellow() {
    let fsm = trafficlight::fsm().unwrap();
    let code = InputCode::masked(PEDESTRIAN);
    assert_eq!(fsm.step(Phase::GoWest, code), Phase::WaitWest);
    assert_ne!(fsm.step(Phase::GoWest, code), Phase::Walk);
}

#[test]
fn walk_holds_while_pedestrian_present() {
    let fsm = trafficlight::fsm().unwrap();
    assert_eq!(fsm.step(Phase::Walk, InputCode::masked(PEDESTRIAN)), Phase::Walk);
}

#[test]
fn idle_crossing_rests_on_west_green() {
    let fsm = trafficlight::fsm().unwrap();
    assert_eq!(fsm.step(Phase::WalkOff2, InputCode::masked(0)), Phase::GoWest);
    assert_eq!(fsm.step(Phase::GoWest, InputCode::masked(0)), Phase::GoWest);
    assert_eq!(fsm.step(Phase::GoWest, InputCode::masked(WEST_CAR)), Phase::GoWest);
}

#[test]
fn everybody_at_once_follows_the_table() {
    let fsm = trafficlight::fsm().unwrap();
    let all = InputCode::masked(PEDESTRIAN | SOUTH_CAR | WEST_CAR);
    assert_eq!(fsm.step(Phase::GoWest, all), Phase::WaitWest);
    assert_eq!(fsm.step(Phase::WaitWest, all), Phase::GoSouth);
    assert_eq!(fsm.step(Phase::GoSouth, all), Phase::WaitSouth);
    assert_eq!(fsm.step(Phase::WaitSouth, all), Phase::Walk);
    assert_eq!(fsm.step(Phase::Walk, all), Phase::NotWalk1);
    assert_eq!(fsm.step(Phase::WalkOff2, all), Phase::GoWest);
}
