/*
 * Dwell timing.
 *
 * The controller holds every state for a whole number of calibrated units.
 * A unit is a fixed number of countdown ticks worked out once from the
 * calibration, so waiting N units is N identical sub-waits and the reload
 * value is never recomputed per call.
 *
 * Waits are busy-waits and cannot be cut short. Sensors are sampled once,
 * after the dwell.
 */

use crate::config::{Calibration, MAX_TICKS};

/// A free-running countdown timer that can block for a number of ticks.
pub trait Countdown {
    /// Block for `ticks` clock ticks, `1 <= ticks <= 2^24`.
    fn wait_ticks(&mut self, ticks: u32);
}

impl<C: Countdown + ?Sized> Countdown for &mut C {
    fn wait_ticks(&mut self, ticks: u32) {
        (**self).wait_ticks(ticks)
    }
}

pub struct Dwell<C> {
    countdown: C,
    calibration: Calibration,
}

impl<C: Countdown> Dwell<C> {
    pub fn new(countdown: C, calibration: Calibration) -> Self {
        Dwell {
            countdown,
            calibration,
        }
    }

    pub fn wait_ticks(&mut self, ticks: u32) {
        debug_assert!((1..=MAX_TICKS).contains(&ticks), "tick count {ticks} out of range");
        self.countdown.wait_ticks(ticks);
    }

    /// Busy-wait `units` calibrated units. Zero returns at once.
    pub fn wait_units(&mut self, units: u32) {
        let ticks = self.calibration.ticks_per_unit();
        for _ in 0..units {
            self.countdown.wait_ticks(ticks);
        }
    }

    pub fn ticks_per_unit(&self) -> u32 {
        self.calibration.ticks_per_unit()
    }

    /// Length of `units` calibrated units in microseconds.
    pub fn nominal_micros(&self, units: u32) -> u64 {
        (units as u64).saturating_mul(self.calibration.unit_micros() as u64)
    }

    pub fn countdown(&self) -> &C {
        &self.countdown
    }

    pub fn into_countdown(self) -> C {
        self.countdown
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub use systick::SysTickCountdown;

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod systick {
    use cortex_m::peripheral::SYST;
    use cortex_m::peripheral::syst::SystClkSource;

    use super::Countdown;
    use crate::config::MAX_TICKS;

    /// The Cortex-M SysTick used as a reload/count-down busy-wait.
    pub struct SysTickCountdown {
        syst: SYST,
    }

    impl SysTickCountdown {
        pub fn new(mut syst: SYST) -> Self {
            syst.disable_interrupt();
            syst.set_clock_source(SystClkSource::Core);
            syst.set_reload(1);
            syst.clear_current();
            syst.enable_counter();
            SysTickCountdown { syst }
        }
    }

    impl Countdown for SysTickCountdown {
        fn wait_ticks(&mut self, ticks: u32) {
            // the reload register is 24 bits wide
            debug_assert!((1..=MAX_TICKS).contains(&ticks), "tick count {ticks} out of range");
            // a reload of zero never sets the count flag
            self.syst.set_reload(ticks.max(2) - 1);
            // writing the current value also clears the count flag
            self.syst.clear_current();
            while !self.syst.has_wrapped() {}
        }
    }
}
