//! Station control loop
//!
//! [`Station`] owns every piece of loop state. [`Station::tick`] is the
//! pure per-iteration logic: raw inputs in, a [`Frame`] out.
//! [`Station::iterate`] wraps it with the board I/O.
//!
//! Iteration order:
//!
//! 1. Filter both ADC channels
//! 2. Fault check; on fault force the heater off, show `ER<n>` and stop
//! 3. Sleep state from presence-sensor activity
//! 4. Heater duty
//! 5. Setpoint buttons, clamp
//! 6. Compose the display frame
//! 7. Flush a pending save
//! 8. Render

use thermotip_hal::{ActiveLowButton, ConfigStore, InputPin};

use crate::config::{ConfigError, ControlParams, PersistedConfig};
use crate::control::{DutyPolicy, BOOT_DUTY_PERCENT, DUTY_OFF};
use crate::display::{ComposeInput, DisplayComposer, DisplayIntent};
use crate::filter::ExpFilter;
use crate::input::SetpointEditor;
use crate::persist::SaveDebouncer;
use crate::safety::{SafetyStatus, SensorFault, SensorMonitor};
use crate::state::{SleepMonitor, SleepState};
use crate::traits::{AnalogSource, Buzzer, Channel, HeaterDrive, SegmentDisplay};

/// Raw inputs sampled at the start of an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    pub power_raw: u16,
    pub temperature_raw: u16,
    /// Presence sensor pin level
    pub presence_high: bool,
    pub increase_pressed: bool,
    pub decrease_pressed: bool,
}

/// Whether this iteration wrote the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveOutcome {
    #[default]
    None,
    Saved,
    Failed(ConfigError),
}

/// Summary of one iteration, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// Filtered temperature ADC reading
    pub reading: u16,
    pub fault: Option<SensorFault>,
    /// Last evaluated sleep state (unchanged on a fault iteration)
    pub sleep: SleepState,
    pub sleep_changed: bool,
    pub duty: u8,
    /// Measured temperature in display units
    pub temperature: i32,
    pub heat_point: u16,
    pub save: SaveOutcome,
}

/// Everything one iteration wants done to the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub display: DisplayIntent,
    /// Short beeps to sound
    pub beeps: u8,
    /// Sound the alarm tone
    pub alarm: bool,
    /// Write the record to storage
    pub save: bool,
    pub report: Report,
}

/// Peripherals the loop drives
pub struct Board<A, P, H, D, B, S> {
    pub sensors: A,
    pub presence: P,
    pub increase: ActiveLowButton<P>,
    pub decrease: ActiveLowButton<P>,
    pub heater: H,
    pub display: D,
    pub buzzer: B,
    pub store: S,
}

impl<A, P, H, D, B, S> Board<A, P, H, D, B, S>
where
    A: AnalogSource,
    P: InputPin,
{
    /// Sample every input
    pub fn sample(&mut self) -> Inputs {
        Inputs {
            power_raw: self.sensors.read_channel(Channel::PowerInput),
            temperature_raw: self.sensors.read_channel(Channel::Temperature),
            presence_high: self.presence.is_high(),
            increase_pressed: self.increase.is_pressed(),
            decrease_pressed: self.decrease.is_pressed(),
        }
    }
}

/// Where the running configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSource {
    /// Stored record, used as is
    Stored,
    /// Stored record with the setpoint pulled back into range
    Clamped,
    /// Factory defaults (blank, missing or unreadable record)
    Defaults,
}

/// Outcome of the startup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub source: ConfigSource,
    /// Why the stored record was not used
    pub load_error: Option<ConfigError>,
    /// Writing the defaults back failed
    pub write_error: Option<ConfigError>,
}

/// Control-loop state
#[derive(Debug, Clone)]
pub struct Station {
    params: ControlParams,
    config: PersistedConfig,
    power: ExpFilter,
    temperature: ExpFilter,
    monitor: SensorMonitor,
    sleep: SleepMonitor,
    policy: DutyPolicy,
    editor: SetpointEditor,
    saver: SaveDebouncer,
    composer: DisplayComposer,
    /// Completed non-fault iterations, drives blinking
    iteration: u32,
}

impl Station {
    /// Create the loop state with `config` already loaded
    ///
    /// `now_ms` counts as the last presence activity and opens the
    /// setpoint display window.
    pub fn new(params: ControlParams, config: PersistedConfig, now_ms: u32) -> Self {
        Self {
            config,
            power: ExpFilter::new(),
            temperature: ExpFilter::new(),
            monitor: SensorMonitor::from_params(&params),
            sleep: SleepMonitor::new(now_ms),
            policy: DutyPolicy::from_params(&params),
            editor: SetpointEditor::new(&params, now_ms),
            saver: SaveDebouncer::from_params(&params),
            composer: DisplayComposer::from_params(&params),
            iteration: 0,
            params,
        }
    }

    /// Startup sequence
    ///
    /// Sounds the alarm tone, parks the heater at half power and loads the
    /// record. A blank, missing or unreadable record is replaced by the
    /// defaults and written back at once.
    pub fn boot<A, P, H, D, B, S>(
        params: ControlParams,
        board: &mut Board<A, P, H, D, B, S>,
        now_ms: u32,
    ) -> (Self, BootReport)
    where
        H: HeaterDrive,
        B: Buzzer,
        S: ConfigStore,
    {
        board.buzzer.beep_alarm();
        board.heater.set_duty_percent(BOOT_DUTY_PERCENT);

        let (config, report) = load_config(&params, &mut board.store);
        (Self::new(params, config, now_ms), report)
    }

    /// Run one iteration against the board
    pub fn iterate<A, P, H, D, B, S>(
        &mut self,
        board: &mut Board<A, P, H, D, B, S>,
        now_ms: u32,
    ) -> Report
    where
        A: AnalogSource,
        P: InputPin,
        H: HeaterDrive,
        D: SegmentDisplay,
        B: Buzzer,
        S: ConfigStore,
    {
        let inputs = board.sample();
        let mut frame = self.tick(&inputs, now_ms);

        board.heater.set_duty_percent(frame.report.duty);
        if frame.alarm {
            board.buzzer.beep_alarm();
        }
        for _ in 0..frame.beeps {
            board.buzzer.beep();
        }

        if frame.save {
            frame.report.save = match self.config.save(&mut board.store) {
                Ok(()) => SaveOutcome::Saved,
                Err(e) => SaveOutcome::Failed(e),
            };
        }

        board.display.show(&frame.display);
        board.display.refresh(now_ms);
        board.buzzer.poll(now_ms);

        frame.report
    }

    /// Per-iteration logic without any I/O
    ///
    /// When the returned frame asks for a save the caller writes
    /// [`Station::config`]; the pending edit is already cleared.
    pub fn tick(&mut self, inputs: &Inputs, now_ms: u32) -> Frame {
        self.power.update(inputs.power_raw);
        let reading = self.temperature.update(inputs.temperature_raw);
        let temperature = self.policy.temperature(reading);

        if let SafetyStatus::Fault(fault) = self.monitor.check(reading) {
            return Frame {
                display: DisplayIntent::fault(fault.code()),
                beeps: 1,
                alarm: false,
                save: false,
                report: Report {
                    reading,
                    fault: Some(fault),
                    sleep: self.sleep.state(),
                    sleep_changed: false,
                    duty: DUTY_OFF,
                    temperature,
                    heat_point: self.config.heat_point,
                    save: SaveOutcome::None,
                },
            };
        }

        let sleep = self.sleep.update(
            inputs.presence_high,
            now_ms,
            self.config.sleep_timeout_ms,
            self.config.deep_sleep_timeout_ms,
        );

        let duty = self
            .policy
            .duty(sleep.state, self.config.heat_point, temperature);

        let edit = self.editor.update(
            inputs.increase_pressed,
            inputs.decrease_pressed,
            &mut self.config.heat_point,
            now_ms,
        );
        if edit.stepped {
            self.saver.mark(now_ms);
        }

        let mut display = self.composer.compose(&ComposeInput {
            measured: temperature,
            heat_point: self.config.heat_point,
            buttons_active: edit.active,
            window_open: self.editor.setpoint_window_open(now_ms),
            sleep: sleep.state,
            duty,
            iteration: self.iteration,
            now_ms,
        });

        let save = self.saver.poll(now_ms);
        if save {
            display.mark_saving();
        }

        self.iteration = self.iteration.wrapping_add(1);

        Frame {
            display,
            beeps: edit.beeps,
            alarm: sleep.changed,
            save,
            report: Report {
                reading,
                fault: None,
                sleep: sleep.state,
                sleep_changed: sleep.changed,
                duty,
                temperature,
                heat_point: self.config.heat_point,
                save: SaveOutcome::None,
            },
        }
    }

    /// Running configuration
    pub const fn config(&self) -> &PersistedConfig {
        &self.config
    }

    /// Current setpoint
    pub const fn heat_point(&self) -> u16 {
        self.config.heat_point
    }

    /// Filtered power-input reading
    pub const fn power_input(&self) -> u16 {
        self.power.value()
    }

    /// Loop tuning
    pub const fn params(&self) -> &ControlParams {
        &self.params
    }

    /// Check if a setpoint edit is waiting to be written
    pub const fn save_pending(&self) -> bool {
        self.saver.is_pending()
    }
}

/// Load the record, falling back to (and persisting) the defaults
fn load_config<S: ConfigStore>(
    params: &ControlParams,
    store: &mut S,
) -> (PersistedConfig, BootReport) {
    let load_error = match PersistedConfig::load(store) {
        Ok(config) if !config.is_blank() => {
            let heat_point = params.clamp_heat_point(i32::from(config.heat_point));
            let source = if heat_point == config.heat_point {
                ConfigSource::Stored
            } else {
                ConfigSource::Clamped
            };
            let report = BootReport {
                source,
                load_error: None,
                write_error: None,
            };
            return (PersistedConfig { heat_point, ..config }, report);
        }
        Ok(_) => None,
        Err(e) => Some(e),
    };

    let config = params.default_config;
    let write_error = config.save(store).err();
    (
        config,
        BootReport {
            source: ConfigSource::Defaults,
            load_error,
            write_error,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Glyph, Symbols};
    use core::cell::Cell;
    use thermotip_hal::{StorageError, StorageKey};

    const SLEEP: u32 = 180_000;
    const DEEP: u32 = 600_000;
    /// Rising from zero the filter settles three counts below the raw
    /// value: 88 settles on 85, which maps to 200
    const ADC_200: u16 = 88;

    struct MockSensors<'a> {
        power: &'a Cell<u16>,
        temperature: &'a Cell<u16>,
    }

    impl AnalogSource for MockSensors<'_> {
        fn read_channel(&mut self, channel: Channel) -> u16 {
            match channel {
                Channel::PowerInput => self.power.get(),
                Channel::Temperature => self.temperature.get(),
            }
        }
    }

    struct ScriptedPin<'a>(&'a Cell<bool>);

    impl InputPin for ScriptedPin<'_> {
        fn is_high(&mut self) -> bool {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct RecordingHeater {
        duty: Option<u8>,
        writes: u32,
    }

    impl HeaterDrive for RecordingHeater {
        fn set_duty_percent(&mut self, percent: u8) {
            self.duty = Some(percent);
            self.writes += 1;
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        digits: [Glyph; 3],
        symbols: Symbols,
        refreshes: u32,
    }

    impl SegmentDisplay for RecordingDisplay {
        fn set_glyph(&mut self, pos: usize, glyph: Glyph) {
            self.digits[pos] = glyph;
        }

        fn set_symbols(&mut self, symbols: Symbols) {
            self.symbols = symbols;
        }

        fn refresh(&mut self, _now_ms: u32) {
            self.refreshes += 1;
        }
    }

    #[derive(Default)]
    struct CountingBuzzer {
        beeps: u32,
        alarms: u32,
    }

    impl Buzzer for CountingBuzzer {
        fn beep(&mut self) {
            self.beeps += 1;
        }

        fn beep_alarm(&mut self) {
            self.alarms += 1;
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        record: Option<PersistedConfig>,
        raw: Option<[u8; 1]>,
        writes: u32,
        fail_writes: bool,
    }

    impl ConfigStore for MemoryStore {
        fn load(&mut self, _key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
            if let Some(raw) = self.raw {
                buffer[..1].copy_from_slice(&raw);
                return Ok(1);
            }
            let record = self.record.ok_or(StorageError::NotFound)?;
            let bytes = record.encode(buffer).map_err(|_| StorageError::BufferTooSmall)?;
            Ok(bytes.len())
        }

        fn store(&mut self, _key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
            self.writes += 1;
            if self.fail_writes {
                return Err(StorageError::Device);
            }
            self.raw = None;
            self.record = Some(PersistedConfig::decode(data).map_err(|_| StorageError::Corrupted)?);
            Ok(())
        }
    }

    /// Shared input levels the scripted board reads
    struct Levels {
        power: Cell<u16>,
        temperature: Cell<u16>,
        presence: Cell<bool>,
        increase: Cell<bool>,
        decrease: Cell<bool>,
    }

    impl Levels {
        /// Buttons released (pins high), tip at `temperature`
        fn new(temperature: u16) -> Self {
            Self {
                power: Cell::new(700),
                temperature: Cell::new(temperature),
                presence: Cell::new(false),
                increase: Cell::new(true),
                decrease: Cell::new(true),
            }
        }

        fn press_increase(&self, pressed: bool) {
            self.increase.set(!pressed);
        }
    }

    type TestBoard<'a> = Board<
        MockSensors<'a>,
        ScriptedPin<'a>,
        RecordingHeater,
        RecordingDisplay,
        CountingBuzzer,
        MemoryStore,
    >;

    fn board(levels: &Levels, store: MemoryStore) -> TestBoard<'_> {
        Board {
            sensors: MockSensors {
                power: &levels.power,
                temperature: &levels.temperature,
            },
            presence: ScriptedPin(&levels.presence),
            increase: ActiveLowButton::new(ScriptedPin(&levels.increase)),
            decrease: ActiveLowButton::new(ScriptedPin(&levels.decrease)),
            heater: RecordingHeater::default(),
            display: RecordingDisplay::default(),
            buzzer: CountingBuzzer::default(),
            store,
        }
    }

    fn stored(config: PersistedConfig) -> MemoryStore {
        MemoryStore {
            record: Some(config),
            ..MemoryStore::default()
        }
    }

    /// Run `station` once per ms over `start..=end`
    fn run(station: &mut Station, board: &mut TestBoard<'_>, start: u32, end: u32) -> Report {
        let mut last = None;
        for now in start..=end {
            last = Some(station.iterate(board, now));
        }
        last.unwrap()
    }

    #[test]
    fn test_boot_with_empty_storage_writes_defaults() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, MemoryStore::default());

        let (station, report) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        assert_eq!(report.source, ConfigSource::Defaults);
        assert_eq!(
            report.load_error,
            Some(ConfigError::Storage(StorageError::NotFound))
        );
        assert_eq!(report.write_error, None);
        assert_eq!(*station.config(), PersistedConfig::new(270, 180_000, 600_000));
        assert_eq!(board.store.writes, 1);
        assert_eq!(board.store.record, Some(PersistedConfig::DEFAULT));
        assert_eq!(board.buzzer.alarms, 1);
        assert_eq!(board.heater.duty, Some(BOOT_DUTY_PERCENT));
    }

    #[test]
    fn test_boot_with_blank_record_writes_defaults() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::new(0, 0, 0)));

        let (station, report) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        assert_eq!(report.source, ConfigSource::Defaults);
        assert_eq!(report.load_error, None);
        assert_eq!(station.heat_point(), 270);
        assert_eq!(board.store.writes, 1);
    }

    #[test]
    fn test_boot_with_corrupt_record() {
        let levels = Levels::new(ADC_200);
        let mut store = MemoryStore::default();
        store.raw = Some([0x80]);
        let mut board = board(&levels, store);

        let (station, report) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        assert_eq!(report.load_error, Some(ConfigError::Decode));
        assert_eq!(station.heat_point(), 270);
        assert_eq!(board.store.record, Some(PersistedConfig::DEFAULT));
    }

    #[test]
    fn test_boot_uses_stored_record() {
        let levels = Levels::new(ADC_200);
        let config = PersistedConfig::new(320, 60_000, 120_000);
        let mut board = board(&levels, stored(config));

        let (station, report) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        assert_eq!(report.source, ConfigSource::Stored);
        assert_eq!(*station.config(), config);
        assert_eq!(board.store.writes, 0);
    }

    #[test]
    fn test_boot_clamps_stored_setpoint() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::new(999, SLEEP, DEEP)));

        let (station, report) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        assert_eq!(report.source, ConfigSource::Clamped);
        assert_eq!(station.heat_point(), 450);
    }

    #[test]
    fn test_boot_reports_write_failure() {
        let levels = Levels::new(ADC_200);
        let mut store = MemoryStore::default();
        store.fail_writes = true;
        let mut board = board(&levels, store);

        let (station, report) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        assert_eq!(
            report.write_error,
            Some(ConfigError::Storage(StorageError::Device))
        );
        assert_eq!(station.heat_point(), 270);
    }

    #[test]
    fn test_shorted_sensor_shows_er1() {
        let levels = Levels::new(5);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        let beeps_before = board.buzzer.beeps;

        // Keep a button down: the fault path must not edit the setpoint
        levels.press_increase(true);
        let report = run(&mut station, &mut board, 1, 2_000);

        assert_eq!(report.fault, Some(SensorFault::Shorted));
        assert_eq!(report.duty, DUTY_OFF);
        assert_eq!(board.heater.duty, Some(DUTY_OFF));
        assert_eq!(board.display.digits, [Glyph::E, Glyph::R, Glyph::Digit(1)]);
        assert_eq!(board.display.symbols, Symbols::NONE);
        assert_eq!(station.heat_point(), 270);
        assert!(!station.save_pending());
        assert_eq!(board.buzzer.beeps - beeps_before, 2_000);
        assert_eq!(board.display.refreshes, 2_000);
    }

    #[test]
    fn test_open_sensor_shows_er2() {
        let levels = Levels::new(1023);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        // The filter starts at zero, so it takes a few iterations to cross 1000
        let report = run(&mut station, &mut board, 1, 50);
        assert_eq!(report.fault, Some(SensorFault::Open));
        assert_eq!(board.display.digits, [Glyph::E, Glyph::R, Glyph::Digit(2)]);
    }

    #[test]
    fn test_fault_clears_when_reading_recovers() {
        let levels = Levels::new(1023);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        assert!(run(&mut station, &mut board, 1, 50).fault.is_some());

        // From above the filter settles on the raw value
        levels.temperature.set(85);
        let report = run(&mut station, &mut board, 51, 200);
        assert_eq!(report.fault, None);
        assert_eq!(report.temperature, 200);
    }

    #[test]
    fn test_regulates_toward_setpoint() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        let report = run(&mut station, &mut board, 1, 200);
        assert_eq!(report.temperature, 200);
        // 270 - 200 = 70, far below target
        assert_eq!(report.duty, 50);
        assert_eq!(board.heater.duty, Some(50));

        // Settles on 97, which maps to 253; diff 17
        levels.temperature.set(100);
        let report = run(&mut station, &mut board, 201, 400);
        assert_eq!(report.temperature, 253);
        assert_eq!(report.duty, 73);
    }

    #[test]
    fn test_display_switches_to_measured_after_window() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        // Boot opens the setpoint window
        run(&mut station, &mut board, 1, 4_999);
        assert_eq!(
            board.display.digits,
            [Glyph::Digit(2), Glyph::Digit(7), Glyph::Digit(0)]
        );

        run(&mut station, &mut board, 5_000, 5_001);
        assert_eq!(
            board.display.digits,
            [Glyph::Digit(2), Glyph::Digit(0), Glyph::Digit(0)]
        );
        assert!(board.display.symbols.contains(Symbols::CELSIUS));
        assert!(!board.display.symbols.contains(Symbols::TEMP));
    }

    #[test]
    fn test_short_press_steps_once_then_saves() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        run(&mut station, &mut board, 1, 10_000);
        let beeps_before = board.buzzer.beeps;

        levels.press_increase(true);
        run(&mut station, &mut board, 10_001, 10_800);
        levels.press_increase(false);

        assert_eq!(station.heat_point(), 271);
        assert_eq!(board.buzzer.beeps - beeps_before, 1);
        assert!(station.save_pending());
        assert_eq!(board.store.writes, 0);

        // Step fired at 10_702; the write follows 2 s of quiet
        let report = run(&mut station, &mut board, 10_801, 12_702);
        assert_eq!(report.save, SaveOutcome::None);
        let report = station.iterate(&mut board, 12_703);
        assert_eq!(report.save, SaveOutcome::Saved);
        assert_eq!(board.display.symbols, Symbols::SAVE);
        assert_eq!(board.store.writes, 1);
        assert_eq!(board.store.record.map(|c| c.heat_point), Some(271));

        run(&mut station, &mut board, 12_704, 20_000);
        assert_eq!(board.store.writes, 1);
    }

    #[test]
    fn test_long_press_auto_repeat_saves_once() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::new(440, SLEEP, DEEP)));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        levels.press_increase(true);
        let mut previous = station.heat_point();
        for now in 1..=3_800 {
            station.iterate(&mut board, now);
            assert!(station.heat_point() >= previous);
            assert!(station.heat_point() <= 450);
            previous = station.heat_point();
        }
        levels.press_increase(false);
        assert_eq!(station.heat_point(), 450);

        run(&mut station, &mut board, 3_801, 8_000);
        assert_eq!(board.store.writes, 1);
        assert_eq!(board.store.record.map(|c| c.heat_point), Some(450));
    }

    #[test]
    fn test_save_failure_is_reported_once() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        board.store.fail_writes = true;

        levels.press_increase(true);
        run(&mut station, &mut board, 1, 800);
        levels.press_increase(false);

        let mut failures = 0;
        for now in 801..=6_000 {
            if let SaveOutcome::Failed(e) = station.iterate(&mut board, now).save {
                assert_eq!(e, ConfigError::Storage(StorageError::Device));
                failures += 1;
            }
        }
        assert_eq!(failures, 1);
        assert!(!station.save_pending());
    }

    #[test]
    fn test_sleep_and_deep_sleep() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::new(270, 1_000, 3_000)));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);
        let alarms_before = board.buzzer.alarms;

        let report = run(&mut station, &mut board, 1, 1_001);
        assert_eq!(report.sleep, SleepState::Sleep);
        assert!(report.sleep_changed);
        // Target drops to 100 while the tip reads 200
        assert_eq!(report.duty, DUTY_OFF);
        assert_eq!(board.buzzer.alarms - alarms_before, 1);

        let report = run(&mut station, &mut board, 1_002, 3_001);
        assert_eq!(report.sleep, SleepState::DeepSleep);
        assert_eq!(report.duty, DUTY_OFF);
        assert_eq!(board.display.digits, [Glyph::Blank; 3]);
        assert_eq!(board.buzzer.alarms - alarms_before, 2);

        // Picking up the handle wakes the station
        levels.presence.set(true);
        let report = station.iterate(&mut board, 3_002);
        assert_eq!(report.sleep, SleepState::NoSleep);
        assert_eq!(report.duty, 50);
        assert_eq!(board.buzzer.alarms - alarms_before, 3);
    }

    #[test]
    fn test_sleep_regulates_to_sleep_temperature() {
        // Settles on 55, which maps to 66
        let levels = Levels::new(58);
        let mut board = board(&levels, stored(PersistedConfig::new(270, 1_000, 60_000)));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        let report = run(&mut station, &mut board, 1, 1_500);
        assert_eq!(report.sleep, SleepState::Sleep);
        assert_eq!(report.temperature, 66);
        assert_eq!(report.duty, 90 - 34);
    }

    #[test]
    fn test_power_input_is_filtered() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        station.iterate(&mut board, 1);
        assert_eq!(station.power_input(), 175);
        run(&mut station, &mut board, 2, 200);
        assert_eq!(station.power_input(), 697);
    }

    #[test]
    fn test_heat_icon_blinks_while_heating() {
        let levels = Levels::new(ADC_200);
        let mut board = board(&levels, stored(PersistedConfig::DEFAULT));
        let (mut station, _) = Station::boot(ControlParams::DEFAULT, &mut board, 0);

        let mut lit = 0;
        for now in 1..=1_000 {
            station.iterate(&mut board, now);
            if board.display.symbols.contains(Symbols::HEAT) {
                lit += 1;
            }
        }
        // Half of every 100 iterations
        assert_eq!(lit, 500);
    }
}
