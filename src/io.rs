/*
 * The I/O module for the crossing.
 *
 * This module brings up the actual pins on the DESPI-M02 board and hands them
 * to the controller as a `Boundary`. The intention is for this module to be
 * the only part of the program that is device-specific.
 *
 * Light bank layout, bit 5..0: west red, west amber, west green, south red,
 * south amber, south green. The pedestrian lamps sit on bits 1 (don't walk)
 * and 3 (walk) of their bank. Sensor bits: 0 west car, 1 south car, 2
 * pedestrian button.
 *
 * It also owns USART1, which carries the log.
 */

use core::cell::RefCell;
use core::fmt::Write;

use crossing::trafficlight::{DONT_WALK, WALK};
use crossing::{Bank, Boundary};
use embassy_stm32::Peripherals;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::{Config, UartTx};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::String;
use log::{LevelFilter, Log, Metadata, Record};

/// Core clock after `embassy_stm32::init` with the default config (HSI).
pub const CORE_CLOCK_HZ: u32 = 8_000_000;

struct Sensor {
    input: Input<'static>,
    active_low: bool,
}

impl Sensor {
    fn active(&self) -> bool {
        self.input.is_high() != self.active_low
    }
}

pub struct Board {
    // index is the bit number in the vehicle bank
    vehicle: [Output<'static>; 6],
    pedestrian: [(u8, Output<'static>); 2],
    // index is the bit number in the sensor code
    sensors: [Sensor; 3],
}

/// Configure every pin once and start the serial log. Everything is dark
/// until the engine writes its first state.
pub fn bring_up(peripherals: Peripherals) -> Board {
    let serial = UartTx::new_blocking(
        peripherals.USART1,
        peripherals.PA9,
        Config::default(), // 115200 baud
    );
    install_log(serial.ok());

    let vehicle = [
        Output::new(peripherals.PE0, Level::Low, Speed::Low),
        Output::new(peripherals.PB8, Level::Low, Speed::Low),
        Output::new(peripherals.PB6, Level::Low, Speed::Low),
        Output::new(peripherals.PB7, Level::Low, Speed::Low),
        Output::new(peripherals.PB9, Level::Low, Speed::Low),
        Output::new(peripherals.PE1, Level::Low, Speed::Low),
    ];
    let pedestrian = [
        (DONT_WALK, Output::new(peripherals.PB10, Level::Low, Speed::Low)),
        (WALK, Output::new(peripherals.PB14, Level::Low, Speed::Low)),
    ];
    let sensors = [
        Sensor {
            input: Input::new(peripherals.PA0, Pull::Down),
            active_low: false,
        },
        Sensor {
            input: Input::new(peripherals.PA1, Pull::Down),
            active_low: false,
        },
        // the on-board key is active-low
        Sensor {
            input: Input::new(peripherals.PE11, Pull::Up),
            active_low: true,
        },
    ];

    Board {
        vehicle,
        pedestrian,
        sensors,
    }
}

fn light(output: &mut Output, on: bool) {
    output.set_level(if on { Level::High } else { Level::Low });
}

impl Boundary for Board {
    fn read_inputs(&mut self) -> u8 {
        self.sensors
            .iter()
            .enumerate()
            .filter(|(_, sensor)| sensor.active())
            .fold(0, |bits, (bit, _)| bits | 1 << bit)
    }

    fn write_outputs(&mut self, bank: Bank, bits: u8, mask: u8) {
        match bank {
            Bank::Vehicle => {
                for (bit, output) in self.vehicle.iter_mut().enumerate() {
                    if mask & 1 << bit != 0 {
                        light(output, bits & 1 << bit != 0);
                    }
                }
            }
            Bank::Pedestrian => {
                for (bit, output) in self.pedestrian.iter_mut() {
                    if mask & *bit != 0 {
                        light(output, bits & *bit != 0);
                    }
                }
            }
        }
    }
}

const LINE_CAPACITY: usize = 96;

static SERIAL: Mutex<CriticalSectionRawMutex, RefCell<Option<UartTx<'static, Blocking>>>> =
    Mutex::new(RefCell::new(None));

static LOGGER: SerialLog = SerialLog;

/// `log` sink writing one line per record to USART1.
struct SerialLog;

impl Log for SerialLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // long records are cut at LINE_CAPACITY
        let mut line: String<LINE_CAPACITY> = String::new();
        let _ = write!(line, "{} {}", record.level(), record.args());
        SERIAL.lock(|serial| {
            if let Some(tx) = serial.borrow_mut().as_mut() {
                let _ = tx.blocking_write(line.as_bytes());
                let _ = tx.blocking_write(b"\n");
            }
        });
    }

    fn flush(&self) {}
}

fn install_log(tx: Option<UartTx<'static, Blocking>>) {
    // without a serial port the controller simply runs silent
    SERIAL.lock(|serial| {
        serial.replace(tx);
    });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}
