/*
 * The reference crossing: an east/west road ("west"), a north/south road
 * ("south") and a pedestrian crossing over both.
 *
 * Each road gets a green phase followed by a yellow phase. The walk sequence
 * is walk, then two rounds of don't-walk / dark to blink the don't-walk lamp.
 * Which request wins when several sensors fire at once is written into the
 * rows below: a yellow phase always completes before anything else, a green
 * road yields to the other road or the pedestrians, and a yellow phase hands
 * over to the other road unless pedestrians are the only ones waiting. South
 * yellow also gives way to pedestrians when all three sensors fire. Leave the
 * rows as they are; the priorities are part of how the crossing behaves on
 * the street.
 */

use enum_ordinalize::Ordinalize;

use crate::config::PortMasks;
use crate::fsm::{Fsm, INPUT_CODES, State, TableError};

// Sensor bits.
pub const WEST_CAR: u8 = 0b001;
pub const SOUTH_CAR: u8 = 0b010;
pub const PEDESTRIAN: u8 = 0b100;

// Vehicle bank, bit 5..0.
pub const WEST_RED: u8 = 1 << 5;
pub const WEST_YELLOW: u8 = 1 << 4;
pub const WEST_GREEN: u8 = 1 << 3;
pub const SOUTH_RED: u8 = 1 << 2;
pub const SOUTH_YELLOW: u8 = 1 << 1;
pub const SOUTH_GREEN: u8 = 1 << 0;
pub const ALL_RED: u8 = WEST_RED | SOUTH_RED;

// Pedestrian lamps, sharing a port with other pins.
pub const DONT_WALK: u8 = 0x02;
pub const WALK: u8 = 0x08;
pub const DARK: u8 = 0x00;

/// Green and yellow phases hold for 3 s, everything else for 1.5 s, at the
/// 10 ms unit.
pub const LONG: u32 = 300;
pub const SHORT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinalize)]
#[repr(usize)]
pub enum Phase {
    GoWest,
    WaitWest,
    GoSouth,
    WaitSouth,
    Walk,
    NotWalk1,
    WalkOff1,
    NotWalk2,
    WalkOff2,
}

use Phase::*;

const fn phase(
    id: Phase,
    primary: u8,
    secondary: u8,
    dwell: u32,
    next: [Phase; INPUT_CODES],
) -> State<Phase> {
    State {
        id,
        primary,
        secondary,
        dwell,
        next,
    }
}

// Columns are input codes 0..=7: none, west, south, west+south, pedestrian,
// pedestrian+west, pedestrian+south, all three.
#[rustfmt::skip]
pub static TABLE: [State<Phase>; Phase::VARIANT_COUNT] = [
    phase(GoWest,    WEST_GREEN | SOUTH_RED,  DONT_WALK, LONG,  [GoWest, GoWest, WaitWest, WaitWest, WaitWest, WaitWest, WaitWest, WaitWest]),
    phase(WaitWest,  WEST_YELLOW | SOUTH_RED, DONT_WALK, SHORT, [GoSouth, GoSouth, GoSouth, GoSouth, Walk, GoSouth, GoSouth, GoSouth]),
    phase(GoSouth,   WEST_RED | SOUTH_GREEN,  DONT_WALK, LONG,  [GoSouth, WaitSouth, GoSouth, WaitSouth, WaitSouth, WaitSouth, WaitSouth, WaitSouth]),
    phase(WaitSouth, WEST_RED | SOUTH_YELLOW, DONT_WALK, SHORT, [GoWest, GoWest, GoWest, GoWest, Walk, GoWest, GoWest, Walk]),
    phase(Walk,      ALL_RED,                 WALK,      LONG,  [Walk, NotWalk1, NotWalk1, NotWalk1, Walk, NotWalk1, NotWalk1, NotWalk1]),
    phase(NotWalk1,  ALL_RED,                 DONT_WALK, SHORT, [NotWalk1, WalkOff1, WalkOff1, WalkOff1, WalkOff1, WalkOff1, WalkOff1, WalkOff1]),
    phase(WalkOff1,  ALL_RED,                 DARK,      SHORT, [WalkOff1, NotWalk2, NotWalk2, NotWalk2, NotWalk2, NotWalk2, NotWalk2, NotWalk2]),
    phase(NotWalk2,  ALL_RED,                 DONT_WALK, SHORT, [NotWalk2, WalkOff2, WalkOff2, WalkOff2, WalkOff2, WalkOff2, WalkOff2, WalkOff2]),
    phase(WalkOff2,  ALL_RED,                 DARK,      SHORT, [GoWest, GoWest, GoSouth, GoWest, Walk, GoWest, GoSouth, GoWest]),
];

pub const INITIAL: Phase = GoWest;

/// The reference table, validated against the reference port layout.
pub fn fsm() -> Result<Fsm<Phase>, TableError<Phase>> {
    Fsm::new(&TABLE, INITIAL, PortMasks::REFERENCE)
}
