/*
 * A Moore machine held as data.
 *
 * Each state is one row of a table: what to drive on the two light banks, how
 * long to hold, and where to go for every possible sensor code. Stepping is a
 * table lookup and nothing else, so the machine is total and deterministic by
 * construction and can be checked mechanically when it is built.
 *
 * States are fieldless enums deriving `Ordinalize`; a state's ordinal is its
 * row number. Targets are typed, so a transition cannot point outside the
 * table.
 */

pub mod validate;

use core::fmt::Debug;

use enum_ordinalize::Ordinalize;

use crate::config::PortMasks;
pub use validate::{MAX_STATES, StateSet, TableError};

/// Number of independent binary sensors.
pub const INPUT_BITS: u32 = 3;
/// Number of distinct sensor codes, one transition per code.
pub const INPUT_CODES: usize = 1 << INPUT_BITS;

/// Anything usable as a state name: a fieldless enum whose ordinals are the
/// row numbers of its table.
pub trait StateId: Ordinalize<VariantType = usize> + Copy + Eq + Debug + 'static {}

impl<T> StateId for T where T: Ordinalize<VariantType = usize> + Copy + Eq + Debug + 'static {}

/// A sampled sensor code, always within `0..INPUT_CODES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InputCode(u8);

impl InputCode {
    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < INPUT_CODES {
            Some(InputCode(raw))
        } else {
            None
        }
    }

    /// Keep only the sensor bits of a raw port value.
    pub const fn masked(raw: u8) -> Self {
        InputCode(raw & (INPUT_CODES as u8 - 1))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// True when every bit in `sensors` is set in this code.
    pub const fn has(self, sensors: u8) -> bool {
        self.0 & sensors == sensors
    }

    pub fn all() -> impl Iterator<Item = InputCode> {
        (0..INPUT_CODES as u8).map(InputCode)
    }
}

/// One row of the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State<S> {
    pub id: S,
    /// Vehicle light bank.
    pub primary: u8,
    /// Pedestrian lights, written through the pedestrian mask.
    pub secondary: u8,
    /// Calibrated units to hold before sampling the sensors.
    pub dwell: u32,
    pub next: [S; INPUT_CODES],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outputs {
    pub primary: u8,
    pub secondary: u8,
}

impl Outputs {
    /// Apply the secondary output to a port value, leaving bits outside
    /// `mask` alone.
    pub const fn merge_secondary(&self, port: u8, mask: u8) -> u8 {
        (port & !mask) | (self.secondary & mask)
    }
}

/// A validated, immutable state table plus its entry state.
#[derive(Debug, Clone, Copy)]
pub struct Fsm<S: 'static> {
    table: &'static [State<S>],
    initial: S,
    masks: PortMasks,
}

impl<S: StateId> Fsm<S> {
    pub fn new(
        table: &'static [State<S>],
        initial: S,
        masks: PortMasks,
    ) -> Result<Self, TableError<S>> {
        validate::check(table, initial, &masks)?;
        Ok(Fsm {
            table,
            initial,
            masks,
        })
    }

    pub fn step(&self, state: S, code: InputCode) -> S {
        self.row(state).next[code.index()]
    }

    pub fn outputs_for(&self, state: S) -> Outputs {
        let row = self.row(state);
        Outputs {
            primary: row.primary,
            secondary: row.secondary,
        }
    }

    pub fn dwell_for(&self, state: S) -> u32 {
        self.row(state).dwell
    }

    pub fn row(&self, state: S) -> &State<S> {
        &self.table[state.ordinal()]
    }

    pub fn initial(&self) -> S {
        self.initial
    }

    pub fn table(&self) -> &'static [State<S>] {
        self.table
    }

    pub fn masks(&self) -> &PortMasks {
        &self.masks
    }

    pub fn reachable_from(&self, state: S) -> StateSet {
        validate::reachable(self.table, state)
    }
}
