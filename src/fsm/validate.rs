/*
 * Checks run once, when a table is turned into an `Fsm`.
 *
 * The loop never revisits these: a table that passes here is total, ordered,
 * stays inside its output masks and has no state that the initial state
 * cannot reach.
 */

use core::fmt::Debug;

use enum_ordinalize::Ordinalize;
use thiserror::Error;

use super::{State, StateId};
use crate::config::PortMasks;

/// Capacity of a `StateSet`, and so the largest table we accept.
pub const MAX_STATES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError<S: Debug> {
    #[error("table has {rows} rows for {variants} states")]
    LengthMismatch { rows: usize, variants: usize },
    #[error("{count} states do not fit a state set")]
    TooManyStates { count: usize },
    #[error("row {row} describes {found:?}")]
    RowOutOfOrder { row: usize, found: S },
    #[error("{state:?} has a zero dwell")]
    ZeroDwell { state: S },
    #[error("{state:?} drives vehicle bits {bits:#04x} outside the bank")]
    PrimaryOutsideMask { state: S, bits: u8 },
    #[error("{state:?} drives pedestrian bits {bits:#04x} outside the bank")]
    SecondaryOutsideMask { state: S, bits: u8 },
    #[error("{state:?} cannot be reached from the initial state")]
    Unreachable { state: S },
}

/// A set of states, one bit per ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSet(u32);

impl StateSet {
    pub const fn empty() -> Self {
        StateSet(0)
    }

    /// Returns true when `state` was not in the set yet.
    pub fn insert<S: StateId>(&mut self, state: S) -> bool {
        let bit = Self::bit(state);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains<S: StateId>(&self, state: S) -> bool {
        self.0 & Self::bit(state) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn bit<S: StateId>(state: S) -> u32 {
        1u32.checked_shl(state.ordinal() as u32).unwrap_or(0)
    }
}

pub(crate) fn check<S: StateId>(
    table: &[State<S>],
    initial: S,
    masks: &PortMasks,
) -> Result<(), TableError<S>> {
    if table.len() != S::VARIANT_COUNT {
        return Err(TableError::LengthMismatch {
            rows: table.len(),
            variants: S::VARIANT_COUNT,
        });
    }
    if table.len() > MAX_STATES {
        return Err(TableError::TooManyStates { count: table.len() });
    }

    for (row, state) in table.iter().enumerate() {
        if state.id.ordinal() != row {
            return Err(TableError::RowOutOfOrder {
                row,
                found: state.id,
            });
        }
        if state.dwell == 0 {
            return Err(TableError::ZeroDwell { state: state.id });
        }
        if state.primary & !masks.vehicle != 0 {
            return Err(TableError::PrimaryOutsideMask {
                state: state.id,
                bits: state.primary,
            });
        }
        if state.secondary & !masks.pedestrian != 0 {
            return Err(TableError::SecondaryOutsideMask {
                state: state.id,
                bits: state.secondary,
            });
        }
    }

    let reached = reachable(table, initial);
    match S::VARIANTS.iter().find(|state| !reached.contains(**state)) {
        Some(&state) => Err(TableError::Unreachable { state }),
        None => Ok(()),
    }
}

/// Every state reachable from `from` over any sequence of input codes,
/// `from` included.
pub(crate) fn reachable<S: StateId>(table: &[State<S>], from: S) -> StateSet {
    let mut reached = StateSet::empty();
    reached.insert(from);

    loop {
        let mut grown = reached;
        for row in table.iter().filter(|row| reached.contains(row.id)) {
            for &next in &row.next {
                grown.insert(next);
            }
        }
        if grown == reached {
            return reached;
        }
        reached = grown;
    }
}
