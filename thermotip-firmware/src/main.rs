//! Thermotip - Soldering Station Firmware
//!
//! Main firmware binary for an RP2040-based soldering station: one
//! heater, a tip temperature amplifier, a handle presence switch, two
//! buttons and a 3-digit 7-segment display with status icons.
//!
//! All regulation logic lives in thermotip-core; this crate only wires
//! the peripherals and runs the tasks.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use {defmt_rtt as _, panic_probe as _};

use thermotip_core::Board;
use thermotip_drivers::buzzer::PinBuzzer;
use thermotip_drivers::display::{CommonPolarity, MultiplexedDisplay};
use thermotip_drivers::heater::{OutputPolarity, PwmHeater};
use thermotip_drivers::sensor::ScaledAdc;
use thermotip_hal::ActiveLowButton;

use crate::board::{AdcInputs, BoardInput, FlashStore, PwmChannel, ADC_BITS, PWM_TOP};

mod board;
mod config;
mod tasks;

/// Each display position stays lit for this long
const DISPLAY_HOLD_MS: u32 = 1;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermotip firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let params = config::control_params();

    // Heater first, so the tip is parked off as early as possible
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, PwmConfig::default());
    let heater = PwmHeater::new(PwmChannel::new(pwm, PWM_TOP), OutputPolarity::Inverted);

    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let temperature = adc::Channel::new_pin(p.PIN_26, Pull::None);
    let power = adc::Channel::new_pin(p.PIN_27, Pull::None);
    let sensors = ScaledAdc::new(AdcInputs::new(adc, temperature, power), ADC_BITS);
    info!("ADC and heater initialized");

    let segments = [
        Output::new(p.PIN_0, Level::Low),
        Output::new(p.PIN_1, Level::Low),
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
    ];
    let commons = [
        Output::new(p.PIN_8, Level::High),
        Output::new(p.PIN_9, Level::High),
        Output::new(p.PIN_10, Level::High),
        Output::new(p.PIN_11, Level::High),
    ];
    let display = MultiplexedDisplay::new(
        segments,
        commons,
        CommonPolarity::ActiveLow,
        DISPLAY_HOLD_MS,
    );

    let buzzer = PinBuzzer::new(Output::new(p.PIN_17, Level::Low));

    let board = Board {
        sensors,
        presence: BoardInput(Input::new(p.PIN_15, Pull::Up)),
        increase: ActiveLowButton::new(BoardInput(Input::new(p.PIN_13, Pull::Up))),
        decrease: ActiveLowButton::new(BoardInput(Input::new(p.PIN_14, Pull::Up))),
        heater,
        display,
        buzzer,
        store: FlashStore::new(Flash::new(p.FLASH, p.DMA_CH0)),
    };
    info!("Board initialized");

    unwrap!(spawner.spawn(tasks::tick_task()));
    unwrap!(spawner.spawn(tasks::control_task(params, board)));

    info!("All tasks spawned, firmware running");
}
