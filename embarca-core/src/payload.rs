//! Wire payload and display line formatting
//!
//! Everything is written into fixed-capacity `heapless::String`s; a value
//! that does not fit is reported instead of truncated.

use core::fmt::Write;

use heapless::String;

use crate::button::ButtonState;
use crate::calibration::CalibrationError;
use crate::joystick::Direction;

/// Capacity of a network payload
pub const PAYLOAD_CAPACITY: usize = 128;

/// Capacity of one OLED text line (128 px / 6 px font, rounded up)
pub const LINE_CAPACITY: usize = 24;

/// A network payload
pub type Payload = String<PAYLOAD_CAPACITY>;

/// One display line
pub type Line = String<LINE_CAPACITY>;

/// Payload formatting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Formatted text exceeds the buffer capacity
    Overflow,
}

impl From<core::fmt::Error> for PayloadError {
    fn from(_: core::fmt::Error) -> Self {
        PayloadError::Overflow
    }
}

fn render<const N: usize>(args: core::fmt::Arguments<'_>) -> Result<String<N>, PayloadError> {
    let mut out = String::new();
    out.write_fmt(args)?;
    Ok(out)
}

/// MQTT status document: `{"botao":"ON","temperatura":27.34}`
pub fn status_json(button: ButtonState, celsius: f32) -> Result<Payload, PayloadError> {
    render(format_args!(
        "{{\"botao\":\"{}\",\"temperatura\":{:.2}}}",
        button.switch_label(),
        celsius
    ))
}

/// UDP button/temperature line
pub fn button_temp_text(button: ButtonState, celsius: f32) -> Result<Payload, PayloadError> {
    render(format_args!(
        "Botao: {},Temperatura: {:.2} Celsius",
        button.press_label(),
        celsius
    ))
}

/// UDP joystick line
pub fn joystick_text(x: u16, y: u16, direction: Direction) -> Result<Payload, PayloadError> {
    render(format_args!("X:{},Y:{},Direcao:{}", x, y, direction.label()))
}

pub fn accel_line(ax_g: f32) -> Result<Line, PayloadError> {
    render(format_args!("AX: {:.2}g", ax_g))
}

pub fn angle_line(current: f32, target: f32) -> Result<Line, PayloadError> {
    render(format_args!("Ang: {:.0}/{:.0}", current, target))
}

pub fn calibration_line(rotation_ms: u32) -> Result<Line, PayloadError> {
    render(format_args!("Calib: {}ms", rotation_ms))
}

/// Display text after a calibration write
pub fn calibration_saved_text(result: &Result<(), CalibrationError>) -> &'static str {
    match result {
        Ok(()) => "Calibracao salva!",
        Err(_) => "Falha ao salvar!",
    }
}
