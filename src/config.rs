//! Hardware settings for the bridge.

use crate::dispatcher::DEFAULT_IDLE;

use std::path::PathBuf;
use std::time::Duration;

/// Where the display and the LEDs are wired up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Serial device the display is attached to.
    pub serial_device: PathBuf,
    /// Baud rate the display's firmware was built for.
    pub baud_rate: u32,
    /// Sysfs directory of the PWM chip driving the LEDs.
    pub pwm_chip: PathBuf,
    /// PWM channel numbers for red, green and blue.
    pub pwm_channels: [u32; 3],
    /// PWM period in nanoseconds.
    pub pwm_period_ns: u32,
    /// Sleep between polls when no events are waiting.
    pub idle: Duration,
}

impl Default for Config {
    /// The Raspberry Pi's on-board serial port at 115200 baud and the first
    /// three channels of `pwmchip0` at 1 kHz.
    fn default() -> Self {
        Self {
            serial_device: PathBuf::from("/dev/ttyS0"),
            baud_rate: 115_200,
            pwm_chip: PathBuf::from("/sys/class/pwm/pwmchip0"),
            pwm_channels: [0, 1, 2],
            pwm_period_ns: 1_000_000,
            idle: DEFAULT_IDLE,
        }
    }
}
