/*
 * Stand-ins for the hardware, for tests and for running the controller off
 * the board.
 *
 * `SimBoundary` plays back a script of sensor samples and keeps the two light
 * ports as plain registers, including whatever unrelated bits the pedestrian
 * port carries. `TickCounter` counts countdown ticks instead of waiting them.
 */

use heapless::Deque;

use crate::config::MAX_TICKS;
use crate::engine::{Bank, Boundary};
use crate::timing::Countdown;

pub const SCRIPT_CAPACITY: usize = 64;

#[derive(Debug, Default)]
pub struct SimBoundary {
    script: Deque<u8, SCRIPT_CAPACITY>,
    held: u8,
    vehicle: u8,
    pedestrian: u8,
    samples: u64,
}

impl SimBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor samples to return in order. Once the script runs out the last
    /// sample repeats. Samples past `SCRIPT_CAPACITY` are dropped.
    pub fn with_script(samples: &[u8]) -> Self {
        let mut sim = Self::new();
        for &sample in samples {
            sim.push_sample(sample);
        }
        sim
    }

    /// Returns false when the script is full.
    pub fn push_sample(&mut self, sample: u8) -> bool {
        self.script.push_back(sample).is_ok()
    }

    /// Hold the sensors at `sample` from now on, discarding any script.
    pub fn hold(&mut self, sample: u8) {
        self.script.clear();
        self.held = sample;
    }

    pub fn set_pedestrian_port(&mut self, value: u8) {
        self.pedestrian = value;
    }

    pub fn vehicle(&self) -> u8 {
        self.vehicle
    }

    pub fn pedestrian(&self) -> u8 {
        self.pedestrian
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Boundary for SimBoundary {
    fn read_inputs(&mut self) -> u8 {
        if let Some(sample) = self.script.pop_front() {
            self.held = sample;
        }
        self.samples += 1;
        self.held
    }

    fn write_outputs(&mut self, bank: Bank, bits: u8, mask: u8) {
        let port = match bank {
            Bank::Vehicle => &mut self.vehicle,
            Bank::Pedestrian => &mut self.pedestrian,
        };
        *port = (*port & !mask) | (bits & mask);
    }
}

#[derive(Debug, Default, Clone)]
pub struct TickCounter {
    waits: u64,
    ticks: u64,
    last_wait: Option<u32>,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> u64 {
        self.waits
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_wait(&self) -> Option<u32> {
        self.last_wait
    }
}

impl Countdown for TickCounter {
    fn wait_ticks(&mut self, ticks: u32) {
        debug_assert!((1..=MAX_TICKS).contains(&ticks), "tick count {ticks} out of range");
        self.waits += 1;
        self.ticks += ticks as u64;
        self.last_wait = Some(ticks);
    }
}
