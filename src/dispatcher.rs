//! Routing display events to the LEDs and back to the display.

use crate::curve::{self, MAX_BRIGHTNESS};
use crate::display::DisplayLink;
use crate::event::{Event, Object};
use crate::pwm::{LedChannel, PwmOutput};
use crate::reset;

use log::{debug, info, warn};
use rand::Rng;
use std::time::Duration;

/// Idle time between polls when the display has nothing for us.
pub const DEFAULT_IDLE: Duration = Duration::from_millis(10);

/// What [`EventDispatcher::dispatch`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Button 0: everything reset to zero.
    Reset,
    /// Button 1: LEDs and widgets set to these raw RGB values.
    Randomized([u16; 3]),
    /// Button 2: everything at full brightness.
    Maximized,
    /// A slider moved one LED.
    Slider {
        /// Channel that was written.
        channel: LedChannel,
        /// Duty cycle after the brightness curve.
        duty: u8,
    },
    /// A report we have no handler for.
    Unhandled,
    /// Not a report event at all.
    UnexpectedCommand,
}

/// Keeps the LEDs and the display in step.
///
/// Owns both capabilities and the random source used by the "random colour"
/// button. Each event is handled completely before the next one is read.
///
/// # Example
///
/// ```
/// use genie_rgb::{Dispatch, Event, EventDispatcher, LedChannel, MockDisplay, MockPwm, Object};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let display = MockDisplay::with_events([Event::report(Object::Slider, 1, 90)]);
/// let mut dispatcher = EventDispatcher::new(MockPwm::new(), display, StdRng::seed_from_u64(1));
///
/// assert_eq!(dispatcher.drain(), 1);
/// assert_eq!(dispatcher.pwm().duty(LedChannel::Green), Some(50));
/// ```
#[derive(Debug)]
pub struct EventDispatcher<P, D, R> {
    pwm: P,
    display: D,
    rng: R,
}

impl<P: PwmOutput, D: DisplayLink, R: Rng> EventDispatcher<P, D, R> {
    /// Create a dispatcher from its capabilities.
    pub fn new(pwm: P, display: D, rng: R) -> Self {
        Self { pwm, display, rng }
    }

    /// Show the first form and zero everything.
    pub fn start(&mut self) {
        self.display.write_widget(Object::Form, 0, 0);
        self.reset_all();
        info!("display on form 0, LEDs off");
    }

    /// Turn every LED off and zero every slider and gauge.
    pub fn reset_all(&mut self) {
        reset::reset_all(&mut self.pwm, &mut self.display);
    }

    /// Handle one event.
    ///
    /// Never fails: events without a handler are logged and dropped.
    pub fn dispatch(&mut self, event: &Event) -> Dispatch {
        if !event.is_report() {
            warn!(
                "Invalid event from the display: 0x{:02X}",
                event.command.code()
            );
            return Dispatch::UnexpectedCommand;
        }

        match event.object {
            Object::WinButton => self.on_button(event),
            Object::Slider => self.on_slider(event),
            _ => {
                warn!("Unhandled event: {}", event);
                Dispatch::Unhandled
            }
        }
    }

    fn on_button(&mut self, event: &Event) -> Dispatch {
        match event.index {
            0 => {
                debug!("reset button");
                self.reset_all();
                Dispatch::Reset
            }
            1 => {
                let max = u16::from(MAX_BRIGHTNESS);
                let rgb = [
                    self.rng.gen_range(0..=max),
                    self.rng.gen_range(0..=max),
                    self.rng.gen_range(0..=max),
                ];
                debug!("random colour {:?}", rgb);
                reset::apply_rgb(&mut self.pwm, &mut self.display, rgb);
                Dispatch::Randomized(rgb)
            }
            2 => {
                debug!("full brightness");
                reset::apply_rgb(&mut self.pwm, &mut self.display, [u16::from(MAX_BRIGHTNESS); 3]);
                Dispatch::Maximized
            }
            _ => {
                warn!(
                    "Unhandled WINBUTTON event: {}, {}",
                    event.index, event.value
                );
                Dispatch::Unhandled
            }
        }
    }

    fn on_slider(&mut self, event: &Event) -> Dispatch {
        let Some(channel) = LedChannel::from_index(event.index) else {
            warn!("Unhandled SLIDER event: {}, {}", event.index, event.value);
            return Dispatch::Unhandled;
        };
        let duty = curve::scale(event.value);
        self.pwm.write(channel, duty);
        Dispatch::Slider { channel, duty }
    }

    /// Dispatch everything the display has buffered.
    ///
    /// Returns the number of events handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.display.poll_event() {
            self.dispatch(&event);
            handled += 1;
        }
        handled
    }

    /// Poll forever, sleeping for `idle` whenever the queue is empty.
    pub fn run(&mut self, idle: Duration) -> ! {
        loop {
            self.drain();
            std::thread::sleep(idle);
        }
    }

    /// Get a reference to the PWM output.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Get a reference to the display link.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Get a mutable reference to the display link.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Decompose the dispatcher into its capabilities.
    pub fn into_parts(self) -> (P, D, R) {
        (self.pwm, self.display, self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Command;
    use crate::mock::{MockDisplay, MockPwm, WidgetWrite};
    use crate::reset::CHANNEL_GAUGES;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    /// Logger that keeps each test thread's records to itself.
    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;
    static INIT: Once = Once::new();

    fn capture_logs() {
        INIT.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });
        RECORDS.with(|r| r.borrow_mut().clear());
    }

    fn warnings() -> Vec<String> {
        RECORDS.with(|r| {
            r.borrow_mut()
                .drain(..)
                .filter(|(level, _)| *level == log::Level::Warn)
                .map(|(_, text)| text)
                .collect()
        })
    }

    type TestDispatcher = EventDispatcher<MockPwm, MockDisplay, StdRng>;

    fn dispatcher() -> TestDispatcher {
        EventDispatcher::new(MockPwm::new(), MockDisplay::new(), StdRng::seed_from_u64(7))
    }

    fn button(index: u8) -> Event {
        Event::report(Object::WinButton, index, 1)
    }

    #[test]
    fn test_reset_button_writes_nine_zeros() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(&button(0)), Dispatch::Reset);

        assert_eq!(d.pwm().writes().len(), 3);
        assert!(d.pwm().writes().iter().all(|&(_, duty)| duty == 0));
        assert_eq!(d.display().writes().len(), 6);
        assert!(d.display().writes().iter().all(|w| w.value == 0));
    }

    #[test]
    fn test_random_button_uses_one_draw_for_both_surfaces() {
        let mut d = dispatcher();
        for _ in 0..20 {
            let Dispatch::Randomized(rgb) = d.dispatch(&button(1)) else {
                panic!("button 1 should randomize");
            };
            for (i, channel) in LedChannel::ALL.into_iter().enumerate() {
                assert!(rgb[i] <= 100);
                assert_eq!(d.pwm().duty(channel), Some(curve::scale(rgb[i])));
                assert_eq!(d.display().widget(Object::Slider, i as u8), Some(rgb[i]));
                assert_eq!(d.display().widget(CHANNEL_GAUGES[i], 0), Some(rgb[i]));
            }
        }
    }

    #[test]
    fn test_random_button_is_reproducible_with_seed() {
        let mut a = dispatcher();
        let mut b = dispatcher();
        assert_eq!(a.dispatch(&button(1)), b.dispatch(&button(1)));
    }

    #[test]
    fn test_max_button() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(&button(2)), Dispatch::Maximized);

        assert_eq!(d.pwm().writes().len(), 3);
        for channel in LedChannel::ALL {
            assert_eq!(d.pwm().duty(channel), Some(100));
        }
        assert_eq!(d.display().writes().len(), 6);
        assert!(d.display().writes().iter().all(|w| w.value == 100));
    }

    #[test]
    fn test_slider_writes_one_channel_only() {
        for (index, channel) in LedChannel::ALL.into_iter().enumerate() {
            let mut d = dispatcher();
            let outcome = d.dispatch(&Event::report(Object::Slider, index as u8, 50));
            assert_eq!(outcome, Dispatch::Slider { channel, duty: 15 });
            assert_eq!(d.pwm().writes(), &[(channel, 15)]);
            assert!(d.display().writes().is_empty());
        }
    }

    #[test]
    fn test_slider_zero() {
        let mut d = dispatcher();
        d.dispatch(&Event::report(Object::Slider, 0, 0));
        assert_eq!(d.pwm().writes(), &[(LedChannel::Red, 0)]);
    }

    #[test]
    fn test_slider_out_of_range_is_clamped() {
        let mut d = dispatcher();
        d.dispatch(&Event::report(Object::Slider, 2, 500));
        assert_eq!(d.pwm().writes(), &[(LedChannel::Blue, 100)]);
    }

    #[test]
    fn test_unhandled_events_touch_nothing() {
        let mut d = dispatcher();
        let events = [
            button(5),
            Event::report(Object::Slider, 3, 50),
            Event::report(Object::Knob, 0, 10),
            Event::report(Object::Gauge, 0, 10),
            Event {
                command: Command::ReportObj,
                object: Object::Slider,
                index: 0,
                value: 10,
            },
        ];
        let outcomes: Vec<_> = events.iter().map(|e| d.dispatch(e)).collect();

        assert_eq!(
            outcomes,
            vec![
                Dispatch::Unhandled,
                Dispatch::Unhandled,
                Dispatch::Unhandled,
                Dispatch::Unhandled,
                Dispatch::UnexpectedCommand,
            ]
        );
        assert!(d.pwm().writes().is_empty());
        assert!(d.display().writes().is_empty());
    }

    #[test]
    fn test_unhandled_events_log_one_warning_each() {
        capture_logs();
        let mut d = dispatcher();
        let cases = [
            (button(5), "Unhandled WINBUTTON event: 5, 1"),
            (
                Event::report(Object::Slider, 3, 50),
                "Unhandled SLIDER event: 3, 50",
            ),
            (
                Event::report(Object::Knob, 0, 10),
                "Unhandled event: object:  1, index: 0 data: 10 [01 00 000A]",
            ),
            (
                Event {
                    command: Command::ReportObj,
                    object: Object::Slider,
                    index: 0,
                    value: 10,
                },
                "Invalid event from the display: 0x05",
            ),
        ];

        for (event, expected) in cases {
            d.dispatch(&event);
            assert_eq!(warnings(), vec![expected.to_string()], "for {:?}", event);
        }
    }

    #[test]
    fn test_handled_events_log_no_warning() {
        capture_logs();
        let mut d = dispatcher();
        for event in [button(0), button(1), button(2), Event::report(Object::Slider, 2, 40)] {
            d.dispatch(&event);
        }
        assert!(warnings().is_empty());
    }

    #[test]
    fn test_slider_after_start_leaves_other_channels() {
        let mut d = dispatcher();
        d.start();
        let (mut pwm, mut display, rng) = d.into_parts();
        pwm.clear_log();
        display.clear_log();

        let mut d = EventDispatcher::new(pwm, display, rng);
        d.dispatch(&Event::report(Object::Slider, 1, 90));

        assert_eq!(d.pwm().writes(), &[(LedChannel::Green, 50)]);
        assert!(d.display().writes().is_empty());
        assert_eq!(d.pwm().duty(LedChannel::Red), Some(0));
        assert_eq!(d.pwm().duty(LedChannel::Blue), Some(0));
        // Cleared log, but the widgets keep their last values.
        assert_eq!(d.display().widget(Object::Form, 0), Some(0));
        assert_eq!(d.display().widget(Object::Slider, 1), Some(0));
    }

    #[test]
    fn test_start_shows_form_then_resets() {
        let mut d = dispatcher();
        d.start();
        assert_eq!(
            d.display().writes()[0],
            WidgetWrite {
                object: Object::Form,
                index: 0,
                value: 0
            }
        );
        assert_eq!(d.display().writes().len(), 7);
        assert_eq!(d.pwm().writes().len(), 3);
    }

    #[test]
    fn test_drain_handles_everything_in_order() {
        let mut d = dispatcher();
        d.display_mut().push_event(button(2));
        d.display_mut().push_event(Event::report(Object::Slider, 0, 90));
        d.display_mut().push_event(button(9));

        assert_eq!(d.drain(), 3);
        assert_eq!(d.drain(), 0);

        let (pwm, display, _) = d.into_parts();
        assert_eq!(pwm.duty(LedChannel::Red), Some(50));
        assert_eq!(pwm.duty(LedChannel::Green), Some(100));
        // The slider reflects the user's own drag, so the mirror still says 100.
        assert_eq!(display.widget(Object::Slider, 0), Some(100));
    }
}
