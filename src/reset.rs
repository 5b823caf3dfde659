//! Pushing one set of RGB values to both the LEDs and the display.

use crate::curve;
use crate::display::DisplayLink;
use crate::event::Object;
use crate::pwm::{LedChannel, PwmOutput};

/// Gauge-family widget that mirrors each channel, in channel order.
pub const CHANNEL_GAUGES: [Object; 3] = [Object::Gauge, Object::AngularMeter, Object::CoolGauge];

/// Set the LEDs to `rgb` and mirror the raw values on the display.
///
/// Order matters: the three LEDs (through the brightness curve), then the
/// three sliders, then gauge, angular meter and cool gauge.
pub fn apply_rgb<P, D>(pwm: &mut P, display: &mut D, rgb: [u16; 3])
where
    P: PwmOutput + ?Sized,
    D: DisplayLink + ?Sized,
{
    for (channel, &value) in LedChannel::ALL.iter().zip(rgb.iter()) {
        pwm.write(*channel, curve::scale(value));
    }
    for (index, &value) in rgb.iter().enumerate() {
        display.write_widget(Object::Slider, index as u8, value);
    }
    for (gauge, &value) in CHANNEL_GAUGES.iter().zip(rgb.iter()) {
        display.write_widget(*gauge, 0, value);
    }
}

/// Turn every LED off and zero every slider and gauge.
pub fn reset_all<P, D>(pwm: &mut P, display: &mut D)
where
    P: PwmOutput + ?Sized,
    D: DisplayLink + ?Sized,
{
    apply_rgb(pwm, display, [0; 3]);
}
