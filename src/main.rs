#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_std)]
#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_main)]

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod io;

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod firmware {
    use cortex_m_rt::entry;
    use crossing::timing::SysTickCountdown;
    use crossing::{Calibration, Dwell, Engine, trafficlight};
    use log::error;
    use panic_halt as _;

    use crate::io;

    const CALIBRATION: Calibration = match Calibration::new(io::CORE_CLOCK_HZ, 10_000) {
        Ok(calibration) => calibration,
        Err(_) => panic!("10 ms does not fit the SysTick reload"),
    };

    #[entry]
    fn main() -> ! {
        let peripherals = embassy_stm32::init(Default::default());
        let board = io::bring_up(peripherals);

        let core = cortex_m::Peripherals::take().unwrap();
        let dwell = Dwell::new(SysTickCountdown::new(core.SYST), CALIBRATION);

        let fsm = match trafficlight::fsm() {
            Ok(fsm) => fsm,
            Err(err) => {
                error!("state table rejected: {err}");
                panic!();
            }
        };

        Engine::new(fsm, board, dwell).run()
    }
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
fn main() {
    println!("despi-m02-crossing is firmware; build it for thumbv7m-none-eabi.");
}
