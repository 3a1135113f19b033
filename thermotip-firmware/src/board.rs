//! RP2040 board wiring
//!
//! Adapts embassy-rp peripherals to the station traits:
//!
//! | function            | pin(s)           |
//! |---------------------|------------------|
//! | segments a-g, dp    | GPIO0-GPIO7      |
//! | position commons    | GPIO8-GPIO11     |
//! | "+" / "-" buttons   | GPIO13 / GPIO14  |
//! | presence sensor     | GPIO15           |
//! | heater PWM          | GPIO16 (PWM0 A)  |
//! | buzzer              | GPIO17           |
//! | tip amplifier       | GPIO26 (ADC0)    |
//! | supply divider      | GPIO27 (ADC1)    |

use core::convert::Infallible;
use core::ops::Range;

use defmt::*;
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::FLASH;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use thermotip_core::traits::{AnalogSource, Channel};
use thermotip_core::Board;
use thermotip_drivers::buzzer::PinBuzzer;
use thermotip_drivers::display::MultiplexedDisplay;
use thermotip_drivers::heater::PwmHeater;
use thermotip_drivers::sensor::ScaledAdc;
use thermotip_hal::{ConfigStore, InputPin, StorageError, StorageKey};

/// RP2040 ADC resolution
pub const ADC_BITS: u8 = 12;
/// Reported when a conversion fails; reads as an open sensor
const ADC_FULL_SCALE: u16 = (1 << ADC_BITS) - 1;

/// PWM counter wrap: 125 MHz / 62 500 = 2 kHz
pub const PWM_TOP: u16 = 62_500;

/// Flash size on the reference board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
/// Settings partition at the end of flash (excluded in memory.x)
pub const SETTINGS_PARTITION_SIZE: usize = 4 * ERASE_SIZE;
pub const SETTINGS_RANGE: Range<u32> =
    ((FLASH_SIZE - SETTINGS_PARTITION_SIZE) as u32)..(FLASH_SIZE as u32);

/// The concrete board the control task drives
pub type StationBoard = Board<
    ScaledAdc<AdcInputs>,
    BoardInput,
    PwmHeater<PwmChannel>,
    MultiplexedDisplay<Output<'static>>,
    PinBuzzer<Output<'static>>,
    FlashStore,
>;

/// Digital input with pull-up
pub struct BoardInput(pub Input<'static>);

impl InputPin for BoardInput {
    fn is_high(&mut self) -> bool {
        self.0.is_high()
    }
}

/// Blocking ADC with the two station channels
pub struct AdcInputs {
    adc: Adc<'static, Blocking>,
    temperature: adc::Channel<'static>,
    power: adc::Channel<'static>,
}

impl AdcInputs {
    pub fn new(
        adc: Adc<'static, Blocking>,
        temperature: adc::Channel<'static>,
        power: adc::Channel<'static>,
    ) -> Self {
        Self {
            adc,
            temperature,
            power,
        }
    }
}

impl AnalogSource for AdcInputs {
    fn read_channel(&mut self, channel: Channel) -> u16 {
        let pin = match channel {
            Channel::Temperature => &mut self.temperature,
            Channel::PowerInput => &mut self.power,
        };
        match self.adc.blocking_read(pin) {
            Ok(value) => value,
            Err(e) => {
                warn!("ADC read failed on {:?}: {:?}", channel, e);
                ADC_FULL_SCALE
            }
        }
    }
}

/// PWM slice output A as an `embedded-hal` duty-cycle channel
pub struct PwmChannel {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmChannel {
    /// Take a slice configured with `top`; output starts low
    pub fn new(mut pwm: Pwm<'static>, top: u16) -> Self {
        let mut config = PwmConfig::default();
        config.top = top;
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl ErrorType for PwmChannel {
    type Error = Infallible;
}

impl SetDutyCycle for PwmChannel {
    fn max_duty_cycle(&self) -> u16 {
        self.config.top
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.config.compare_a = duty;
        self.pwm.set_config(&self.config);
        Ok(())
    }
}

/// Wear-levelled settings record in the flash partition
///
/// Flash operations run to completion before returning. The control loop
/// only writes after a setpoint edit has settled, so the stall is rare.
pub struct FlashStore {
    flash: Flash<'static, FLASH, Async, FLASH_SIZE>,
}

/// Scratch space for sequential-storage item headers plus the record
const ITEM_BUFFER_SIZE: usize = 64;

impl FlashStore {
    pub fn new(flash: Flash<'static, FLASH, Async, FLASH_SIZE>) -> Self {
        Self { flash }
    }
}

impl ConfigStore for FlashStore {
    fn load(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = embassy_futures::block_on(map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &key,
        ));

        match result {
            Ok(Some(data)) => {
                let target = buffer
                    .get_mut(..data.len())
                    .ok_or(StorageError::BufferTooSmall)?;
                target.copy_from_slice(data);
                Ok(data.len())
            }
            Ok(None) => Err(StorageError::NotFound),
            Err(sequential_storage::Error::Corrupted { .. }) => Err(StorageError::Corrupted),
            Err(_) => Err(StorageError::Device),
        }
    }

    fn store(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        embassy_futures::block_on(map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &key,
            &data,
        ))
        .map_err(|_| StorageError::Device)
    }
}
