/*
 * Table-driven controller for a road crossing with pedestrian lights.
 *
 * Everything in this library is portable: the state table, the stepping
 * engine, the calibrated dwell and a simulated I/O boundary. The board binary
 * only adds pin bring-up, the SysTick countdown and a serial log sink. That
 * split keeps the whole controller testable on the host.
 */

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod engine;
pub mod fsm;
pub mod sim;
pub mod timing;
pub mod trafficlight;

pub use config::{Calibration, ConfigError, PortMasks};
pub use engine::{Bank, Boundary, Engine};
pub use fsm::{Fsm, INPUT_CODES, InputCode, Outputs, State, TableError};
pub use timing::{Countdown, Dwell};
