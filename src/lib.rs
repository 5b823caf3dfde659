//! Bridge a 4D Systems Visi-Genie touchscreen to three PWM-driven LEDs.
//!
//! The display reports button presses and slider drags over a serial line.
//! [`EventDispatcher`] turns those into LED brightness changes and, for the
//! bulk actions, mirrors the same values back onto the display's sliders and
//! gauges so both stay in step.
//!
//! # Requirements
//!
//! - Linux with a sysfs PWM chip (`/sys/class/pwm`) exposing three channels
//! - A Visi-Genie panel on a serial port, running the slider demo
//!
//! # Example
//!
//! ```no_run
//! use genie_rgb::{Config, EventDispatcher, GenieLink, SysfsPwm};
//!
//! fn main() -> Result<(), genie_rgb::BridgeError> {
//!     let config = Config::default();
//!
//!     let pwm = SysfsPwm::new(&config.pwm_chip, config.pwm_channels, config.pwm_period_ns)?;
//!     let display = GenieLink::open(&config.serial_device, config.baud_rate)?;
//!
//!     let mut dispatcher = EventDispatcher::new(pwm, display, rand::thread_rng());
//!     dispatcher.start();
//!     dispatcher.run(config.idle)
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockPwm`] and [`MockDisplay`] to drive the dispatcher without hardware:
//!
//! ```
//! use genie_rgb::{Event, EventDispatcher, LedChannel, MockDisplay, MockPwm, Object};
//!
//! let display = MockDisplay::with_events([Event::report(Object::WinButton, 2, 1)]);
//! let mut dispatcher = EventDispatcher::new(MockPwm::new(), display, rand::thread_rng());
//! dispatcher.drain();
//! assert_eq!(dispatcher.pwm().duty(LedChannel::Blue), Some(100));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod curve;
mod dispatcher;
mod display;
mod error;
mod event;
pub mod genie;
mod mock;
mod pwm;
pub mod reset;

// Re-export public API
pub use config::Config;
pub use dispatcher::{DEFAULT_IDLE, Dispatch, EventDispatcher};
pub use display::DisplayLink;
pub use error::BridgeError;
pub use event::{Command, Event, Object};
pub use genie::GenieLink;
pub use mock::{MockDisplay, MockPwm, WidgetWrite};
pub use pwm::{LedChannel, PwmOutput, SysfsPwm};
