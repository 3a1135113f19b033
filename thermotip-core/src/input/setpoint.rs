//! Button-driven setpoint editing
//!
//! Each button steps the setpoint by one unit. A press held past the
//! short-press threshold fires a single step (with a beep); held past the
//! long-press threshold the step auto-repeats every `fast_increment`
//! iterations until release.
//!
//! By default both buttons share one set of press timers. With
//! [`TimerSharing::Independent`] each button keeps its own, so holding one
//! button cannot delay or restart the other's timing.

use crate::config::{ControlParams, TimerSharing};

/// Setpoint buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// "+" button
    Increase,
    /// "-" button
    Decrease,
}

impl Button {
    /// Signed step applied to the setpoint
    pub const fn step(self) -> i32 {
        match self {
            Button::Increase => 1,
            Button::Decrease => -1,
        }
    }

    const fn index(self) -> usize {
        match self {
            Button::Increase => 0,
            Button::Decrease => 1,
        }
    }
}

/// Press-tracking state for one button (or both, when shared)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEditState {
    /// When the current short-press window opened
    pub press_start: Option<u32>,
    /// When the button first went down
    pub long_press_start: Option<u32>,
    /// Iterations spent in auto-repeat
    pub repeat_skip_counter: u16,
}

impl ButtonEditState {
    /// No button activity
    pub const IDLE: Self = Self {
        press_start: None,
        long_press_start: None,
        repeat_skip_counter: 0,
    };

    /// Check if no press is being tracked
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Result of one button evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ButtonOutcome {
    active: bool,
    stepped: bool,
    beeped: bool,
}

/// Result of one editor iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditOutcome {
    /// At least one button is held
    pub active: bool,
    /// A step was applied; the record needs saving
    pub stepped: bool,
    /// Short-press beeps to sound
    pub beeps: u8,
}

/// Setpoint editor for the two buttons
#[derive(Debug, Clone)]
pub struct SetpointEditor {
    sharing: TimerSharing,
    states: [ButtonEditState; 2],
    /// The setpoint stays on the display until this time; cleared once passed
    display_until_ms: Option<u32>,
    short_press_ms: u32,
    long_press_ms: u32,
    fast_increment: u16,
    setpoint_display_ms: u32,
    min_heat: u16,
    max_heat: u16,
}

impl SetpointEditor {
    /// Create an editor; the setpoint display window opens at `now_ms`
    pub fn new(params: &ControlParams, now_ms: u32) -> Self {
        Self {
            sharing: params.timer_sharing,
            states: [ButtonEditState::IDLE; 2],
            display_until_ms: Some(now_ms.wrapping_add(params.setpoint_display_ms)),
            short_press_ms: params.short_press_ms,
            long_press_ms: params.long_press_ms,
            fast_increment: params.fast_increment,
            setpoint_display_ms: params.setpoint_display_ms,
            min_heat: params.min_heat,
            max_heat: params.max_heat,
        }
    }

    /// Apply both buttons to `heat_point`, then clamp it into range
    pub fn update(
        &mut self,
        increase_pressed: bool,
        decrease_pressed: bool,
        heat_point: &mut u16,
        now_ms: u32,
    ) -> EditOutcome {
        let mut value = i32::from(*heat_point);

        let increase = self.check_button(Button::Increase, increase_pressed, &mut value, now_ms);
        let decrease = self.check_button(Button::Decrease, decrease_pressed, &mut value, now_ms);

        let active = increase.active || decrease.active;
        if !active {
            self.states = [ButtonEditState::IDLE; 2];
        }

        *heat_point = value.clamp(i32::from(self.min_heat), i32::from(self.max_heat)) as u16;

        EditOutcome {
            active,
            stepped: increase.stepped || decrease.stepped,
            beeps: u8::from(increase.beeped) + u8::from(decrease.beeped),
        }
    }

    /// True while the post-edit setpoint display window is open
    ///
    /// The deadline is dropped on the first call past it, so a long idle
    /// period cannot bring the window back through counter wrap.
    pub fn setpoint_window_open(&mut self, now_ms: u32) -> bool {
        let Some(until) = self.display_until_ms else {
            return false;
        };
        // Signed difference keeps the comparison valid across counter wrap
        if (until.wrapping_sub(now_ms) as i32) > 0 {
            true
        } else {
            self.display_until_ms = None;
            false
        }
    }

    /// Press state tracked for `button`
    pub fn state(&self, button: Button) -> &ButtonEditState {
        &self.states[self.slot(button)]
    }

    fn slot(&self, button: Button) -> usize {
        match self.sharing {
            TimerSharing::Shared => 0,
            TimerSharing::Independent => button.index(),
        }
    }

    fn check_button(
        &mut self,
        button: Button,
        pressed: bool,
        value: &mut i32,
        now_ms: u32,
    ) -> ButtonOutcome {
        if !pressed {
            return ButtonOutcome::default();
        }

        let mut outcome = ButtonOutcome {
            active: true,
            ..ButtonOutcome::default()
        };

        let slot = self.slot(button);
        let (long_press_ms, short_press_ms, fast_increment) =
            (self.long_press_ms, self.short_press_ms, self.fast_increment);
        let state = &mut self.states[slot];

        let press_start = *state.press_start.get_or_insert(now_ms);
        let long_press_start = *state.long_press_start.get_or_insert(press_start);

        if now_ms.wrapping_sub(long_press_start) > long_press_ms {
            let fire = state.repeat_skip_counter % fast_increment == 0;
            state.repeat_skip_counter = state.repeat_skip_counter.wrapping_add(1);
            if fire {
                *value += button.step();
                outcome.stepped = true;
            }
        } else if now_ms.wrapping_sub(press_start) > short_press_ms {
            *value += button.step();
            state.press_start = None;
            outcome.stepped = true;
            outcome.beeped = true;
        }

        self.display_until_ms = Some(now_ms.wrapping_add(self.setpoint_display_ms));
        outcome
    }
}
