//! Perceptual brightness curve.
//!
//! The eye sees brightness roughly logarithmically, so a linear slider
//! driven straight into a PWM duty cycle looks like it saturates early.
//! [`scale`] bends a linear 0-100 value so the ramp looks even.

use log::debug;

/// Highest brightness value, on both sides of the curve.
pub const MAX_BRIGHTNESS: u8 = 100;

/// Map a linear brightness (0-100) onto the log curve (0-100).
///
/// Both end points are fixed: `scale(0) == 0` and `scale(100) == 100`. Between
/// them the result is `round(100 - 50 * log10(100 - value))`.
///
/// Values above 100 are clamped to 100.
///
/// ```
/// use genie_rgb::curve::scale;
///
/// assert_eq!(scale(0), 0);
/// assert_eq!(scale(50), 15);
/// assert_eq!(scale(100), 100);
/// ```
pub fn scale(value: u16) -> u8 {
    let value = clamp(value);
    match value {
        0 => 0,
        MAX_BRIGHTNESS => MAX_BRIGHTNESS,
        v => {
            let remaining = f64::from(MAX_BRIGHTNESS - v);
            (100.0 - remaining.log10() * 50.0).round() as u8
        }
    }
}

/// Clamp a raw widget value into the 0-100 brightness range.
pub fn clamp(value: u16) -> u8 {
    if value > u16::from(MAX_BRIGHTNESS) {
        debug!("brightness {} out of range, clamping to {}", value, MAX_BRIGHTNESS);
        MAX_BRIGHTNESS
    } else {
        value as u8
    }
}
