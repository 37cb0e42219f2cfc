/*
 * The polling loop.
 *
 * One cycle drives the lamps for the current state, holds for the state's
 * dwell, samples the sensors once and looks up the next state. The engine
 * owns the only mutable piece of the controller, the current state, and is
 * the only writer of the light banks.
 *
 * Hardware is reached through `Boundary`, so the same loop runs against real
 * pins on the board and against `sim::SimBoundary` in tests.
 */

use log::{debug, info};

use crate::fsm::{Fsm, InputCode, StateId};
use crate::timing::{Countdown, Dwell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Vehicle,
    Pedestrian,
}

/// The sensor and lamp side of the controller.
pub trait Boundary {
    /// Raw sensor port value. Only the low sensor bits are looked at.
    fn read_inputs(&mut self) -> u8;

    /// Set the bits of `bank` selected by `mask` to the matching bits of
    /// `bits`. Bits outside `mask` keep their current value.
    fn write_outputs(&mut self, bank: Bank, bits: u8, mask: u8);
}

impl<B: Boundary + ?Sized> Boundary for &mut B {
    fn read_inputs(&mut self) -> u8 {
        (**self).read_inputs()
    }

    fn write_outputs(&mut self, bank: Bank, bits: u8, mask: u8) {
        (**self).write_outputs(bank, bits, mask)
    }
}

pub struct Engine<S: 'static, B, C> {
    fsm: Fsm<S>,
    boundary: B,
    dwell: Dwell<C>,
    current: S,
    cycles: u64,
}

impl<S, B, C> Engine<S, B, C>
where
    S: StateId,
    B: Boundary,
    C: Countdown,
{
    pub fn new(fsm: Fsm<S>, boundary: B, dwell: Dwell<C>) -> Self {
        Engine {
            current: fsm.initial(),
            fsm,
            boundary,
            dwell,
            cycles: 0,
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn fsm(&self) -> &Fsm<S> {
        &self.fsm
    }

    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    pub fn boundary_mut(&mut self) -> &mut B {
        &mut self.boundary
    }

    pub fn dwell(&self) -> &Dwell<C> {
        &self.dwell
    }

    /// Drive both light banks for the current state.
    pub fn apply_outputs(&mut self) {
        let outputs = self.fsm.outputs_for(self.current);
        let masks = *self.fsm.masks();
        self.boundary
            .write_outputs(Bank::Vehicle, outputs.primary, masks.vehicle);
        self.boundary
            .write_outputs(Bank::Pedestrian, outputs.secondary, masks.pedestrian);
    }

    /// One full iteration: outputs, dwell, sample, transition.
    pub fn cycle(&mut self) -> S {
        self.apply_outputs();
        self.dwell.wait_units(self.fsm.dwell_for(self.current));

        let raw = self.boundary.read_inputs();
        let code = InputCode::masked(raw & self.fsm.masks().inputs);
        let next = self.fsm.step(self.current, code);
        if next != self.current {
            debug!("{:?} -> {:?} on {:03b}", self.current, next, code.bits());
        }

        self.current = next;
        self.cycles = self.cycles.wrapping_add(1);
        next
    }

    pub fn run(mut self) -> ! {
        info!(
            "crossing running from {:?}, {} ticks per unit",
            self.current,
            self.dwell.ticks_per_unit()
        );
        loop {
            self.cycle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Calibration;
    use crate::sim::{SimBoundary, TickCounter};
    use crate::trafficlight::{self, DONT_WALK, PEDESTRIAN, Phase, SOUTH_CAR, WALK};

    fn engine(boundary: SimBoundary) -> Engine<Phase, SimBoundary, TickCounter> {
        let fsm = trafficlight::fsm().unwrap();
        Engine::new(fsm, boundary, Dwell::new(TickCounter::new(), Calibration::REFERENCE))
    }

    #[test]
    fn starts_in_the_initial_state() {
        let engine = engine(SimBoundary::new());
        assert_eq!(engine.current(), Phase::GoWest);
        assert_eq!(engine.cycles(), 0);
    }

    #[test]
    fn cycle_writes_dwells_then_steps() {
        let mut engine = engine(SimBoundary::with_script(&[SOUTH_CAR]));
        assert_eq!(engine.cycle(), Phase::WaitWest);

        let outputs = engine.fsm().outputs_for(Phase::GoWest);
        assert_eq!(engine.boundary().vehicle(), outputs.primary);
        assert_eq!(engine.boundary().pedestrian(), DONT_WALK);
        assert_eq!(engine.boundary().samples(), 1);
        assert_eq!(engine.dwell().countdown().waits(), trafficlight::LONG as u64);
        assert_eq!(engine.cycles(), 1);
    }

    #[test]
    fn high_sensor_bits_are_ignored() {
        let mut engine = engine(SimBoundary::with_script(&[0xF0 | PEDESTRIAN]));
        engine.cycle();
        assert_eq!(engine.current(), Phase::WaitWest);
        engine.cycle();
        assert_eq!(engine.current(), Phase::Walk);
        engine.apply_outputs();
        assert_eq!(engine.boundary().pedestrian(), WALK);
    }

    #[test]
    fn pedestrian_writes_keep_foreign_bits() {
        let mut boundary = SimBoundary::new();
        boundary.set_pedestrian_port(0b1111_0101);
        let mut engine = engine(boundary);
        engine.apply_outputs();
        // DONT_WALK on bit 1, WALK bit 3 cleared, rest untouched
        assert_eq!(engine.boundary().pedestrian(), 0b1111_0111);
    }
}
