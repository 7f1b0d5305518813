//! Push-button interpretation
//!
//! Buttons are wired to GND with the internal pull-up enabled, so a
//! low level means pressed.

/// Debounce-free button state sampled once per loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    /// Interpret a pin level on an active-low input
    pub fn from_level(is_high: bool) -> Self {
        if is_high {
            ButtonState::Released
        } else {
            ButtonState::Pressed
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self, ButtonState::Pressed)
    }

    /// Label used in the MQTT JSON payload
    pub fn switch_label(&self) -> &'static str {
        match self {
            ButtonState::Pressed => "ON",
            ButtonState::Released => "OFF",
        }
    }

    /// Label used in the UDP text payload
    pub fn press_label(&self) -> &'static str {
        match self {
            ButtonState::Pressed => "PRESSIONADO",
            ButtonState::Released => "LIBERADO",
        }
    }
}
