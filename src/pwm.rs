//! PWM output for the RGB LEDs.

use crate::error::BridgeError;

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// LED Channels
// =============================================================================

/// One of the three LED colour channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedChannel {
    /// Red, channel 0.
    Red,
    /// Green, channel 1.
    Green,
    /// Blue, channel 2.
    Blue,
}

impl LedChannel {
    /// All channels in index order.
    pub const ALL: [LedChannel; 3] = [LedChannel::Red, LedChannel::Green, LedChannel::Blue];

    /// Channel for a widget index, if there is one.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(LedChannel::Red),
            1 => Some(LedChannel::Green),
            2 => Some(LedChannel::Blue),
            _ => None,
        }
    }

    /// Position of this channel (0 = red).
    pub fn index(self) -> usize {
        match self {
            LedChannel::Red => 0,
            LedChannel::Green => 1,
            LedChannel::Blue => 2,
        }
    }
}

// =============================================================================
// PWM Output Trait
// =============================================================================

/// Trait for PWM output implementations.
///
/// Writes are fire-and-forget. Implementations deal with their own failures
/// (typically by logging them) since there is nobody to report them to.
pub trait PwmOutput {
    /// Set a channel's duty cycle as a percentage (0-100).
    fn write(&mut self, channel: LedChannel, duty_percent: u8);
}

impl<P: PwmOutput + ?Sized> PwmOutput for &mut P {
    fn write(&mut self, channel: LedChannel, duty_percent: u8) {
        (**self).write(channel, duty_percent);
    }
}

// =============================================================================
// SysfsPwm
// =============================================================================

/// PWM channels driven through the Linux `/sys/class/pwm` interface.
///
/// # Example
///
/// ```no_run
/// use genie_rgb::{LedChannel, PwmOutput, SysfsPwm};
///
/// let mut pwm = SysfsPwm::new("/sys/class/pwm/pwmchip0", [0, 1, 2], 1_000_000)?;
/// pwm.write(LedChannel::Green, 50);
/// # Ok::<(), genie_rgb::BridgeError>(())
/// ```
#[derive(Debug)]
pub struct SysfsPwm {
    duty_paths: [PathBuf; 3],
    period_ns: u32,
}

impl SysfsPwm {
    /// Export and enable three channels on a PWM chip.
    ///
    /// `channels` lists the chip's channel numbers for red, green and blue.
    /// Every channel starts at a duty cycle of zero.
    ///
    /// # Errors
    ///
    /// [`BridgeError::PwmSetup`] if any sysfs attribute can't be written.
    pub fn new(
        chip: impl AsRef<Path>,
        channels: [u32; 3],
        period_ns: u32,
    ) -> Result<Self, BridgeError> {
        let chip = chip.as_ref();
        let mut duty_paths: [PathBuf; 3] = Default::default();

        for (slot, &channel) in duty_paths.iter_mut().zip(channels.iter()) {
            let dir = export_channel(chip, channel)?;
            write_attr(&dir.join("duty_cycle"), 0, channel)?;
            write_attr(&dir.join("period"), period_ns, channel)?;
            write_attr(&dir.join("enable"), 1, channel)?;
            debug!("pwm channel {} ready at {}", channel, dir.display());
            *slot = dir.join("duty_cycle");
        }

        info!(
            "created {} PWM channels on {} (period {} ns)",
            channels.len(),
            chip.display(),
            period_ns
        );
        Ok(Self {
            duty_paths,
            period_ns,
        })
    }

    /// Duty cycle in nanoseconds for a percentage of the period.
    pub fn duty_ns(&self, duty_percent: u8) -> u32 {
        let percent = u64::from(duty_percent.min(100));
        (u64::from(self.period_ns) * percent / 100) as u32
    }
}

impl PwmOutput for SysfsPwm {
    fn write(&mut self, channel: LedChannel, duty_percent: u8) {
        let path = &self.duty_paths[channel.index()];
        let duty = self.duty_ns(duty_percent);
        if let Err(e) = fs::write(path, duty.to_string()) {
            warn!("failed to set {:?} to {}%: {}", channel, duty_percent, e);
        }
    }
}

fn export_channel(chip: &Path, channel: u32) -> Result<PathBuf, BridgeError> {
    let dir = chip.join(format!("pwm{}", channel));
    if !dir.exists() {
        write_attr(&chip.join("export"), channel, channel)?;
    }
    Ok(dir)
}

fn write_attr(path: &Path, value: u32, channel: u32) -> Result<(), BridgeError> {
    fs::write(path, value.to_string()).map_err(|source| BridgeError::PwmSetup {
        channel,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_chip(name: &str) -> PathBuf {
        let chip = std::env::temp_dir().join(format!("genie-rgb-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&chip);
        for channel in 0..3 {
            fs::create_dir_all(chip.join(format!("pwm{}", channel))).unwrap();
        }
        chip
    }

    #[test]
    fn test_channel_indices() {
        for (i, channel) in LedChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
            assert_eq!(LedChannel::from_index(i as u8), Some(*channel));
        }
        assert_eq!(LedChannel::from_index(3), None);
    }

    #[test]
    fn test_sysfs_setup_and_write() {
        let chip = fake_chip("write");
        let mut pwm = SysfsPwm::new(&chip, [0, 1, 2], 1_000_000).unwrap();

        let read = |channel: u32, attr: &str| {
            fs::read_to_string(chip.join(format!("pwm{}", channel)).join(attr)).unwrap()
        };
        assert_eq!(read(0, "period"), "1000000");
        assert_eq!(read(1, "enable"), "1");
        assert_eq!(read(2, "duty_cycle"), "0");

        pwm.write(LedChannel::Green, 50);
        assert_eq!(read(1, "duty_cycle"), "500000");

        pwm.write(LedChannel::Blue, 100);
        assert_eq!(read(2, "duty_cycle"), "1000000");

        fs::remove_dir_all(&chip).unwrap();
    }

    #[test]
    fn test_missing_chip_is_setup_error() {
        let chip = std::env::temp_dir().join("genie-rgb-no-such-chip");
        let err = SysfsPwm::new(&chip, [0, 1, 2], 1_000_000).unwrap_err();
        assert!(matches!(err, BridgeError::PwmSetup { channel: 0, .. }));
    }

    #[test]
    fn test_duty_ns_clamps() {
        let chip = fake_chip("duty");
        let pwm = SysfsPwm::new(&chip, [0, 1, 2], 20_000).unwrap();
        assert_eq!(pwm.duty_ns(0), 0);
        assert_eq!(pwm.duty_ns(25), 5_000);
        assert_eq!(pwm.duty_ns(200), 20_000);
        fs::remove_dir_all(&chip).unwrap();
    }
}
