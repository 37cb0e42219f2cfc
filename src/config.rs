/*
 * Compile-time configuration for the controller.
 *
 * Two things vary between boards: how fast the core clock runs, which decides
 * how many countdown ticks make up one calibrated unit, and which bits of the
 * ports are ours. Both are plain `const` values so that a board picks them at
 * build time. The constructors validate; the `REFERENCE` constants are known
 * good.
 */

use thiserror::Error;

use crate::fsm::INPUT_BITS;

/// Largest reload the 24-bit countdown accepts, plus one.
pub const MAX_TICKS: u32 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("calibrated unit is shorter than one clock tick")]
    UnitTooShort,
    #[error("calibrated unit needs more than 2^24 ticks")]
    UnitTooLong,
    #[error("input mask {0:#04x} reaches beyond the sensor bits")]
    InputMaskTooWide(u8),
    #[error("output mask for a light bank is empty")]
    EmptyOutputMask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    core_clock_hz: u32,
    unit_micros: u32,
    ticks_per_unit: u32,
}

impl Calibration {
    /// 80 MHz core clock and a 10 ms unit: 800 000 ticks per unit.
    pub const REFERENCE: Calibration = Calibration {
        core_clock_hz: 80_000_000,
        unit_micros: 10_000,
        ticks_per_unit: 800_000,
    };

    pub const fn new(core_clock_hz: u32, unit_micros: u32) -> Result<Self, ConfigError> {
        let ticks = core_clock_hz as u64 * unit_micros as u64 / 1_000_000;
        if ticks == 0 {
            return Err(ConfigError::UnitTooShort);
        }
        if ticks > MAX_TICKS as u64 {
            return Err(ConfigError::UnitTooLong);
        }
        Ok(Calibration {
            core_clock_hz,
            unit_micros,
            ticks_per_unit: ticks as u32,
        })
    }

    pub const fn core_clock_hz(&self) -> u32 {
        self.core_clock_hz
    }

    pub const fn unit_micros(&self) -> u32 {
        self.unit_micros
    }

    pub const fn ticks_per_unit(&self) -> u32 {
        self.ticks_per_unit
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Significant bits of the sensor port and of the two light banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMasks {
    pub inputs: u8,
    pub vehicle: u8,
    pub pedestrian: u8,
}

impl PortMasks {
    /// Three sensors, six vehicle lamps on bits 5..0, pedestrian lamps on
    /// bits 1 and 3 of a shared port.
    pub const REFERENCE: PortMasks = PortMasks {
        inputs: 0b0000_0111,
        vehicle: 0b0011_1111,
        pedestrian: 0b0000_1010,
    };

    pub const fn new(inputs: u8, vehicle: u8, pedestrian: u8) -> Result<Self, ConfigError> {
        if inputs >> INPUT_BITS != 0 {
            return Err(ConfigError::InputMaskTooWide(inputs));
        }
        if vehicle == 0 || pedestrian == 0 {
            return Err(ConfigError::EmptyOutputMask);
        }
        Ok(PortMasks {
            inputs,
            vehicle,
            pedestrian,
        })
    }
}

impl Default for PortMasks {
    fn default() -> Self {
        Self::REFERENCE
    }
}
