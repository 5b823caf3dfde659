//! In-memory capabilities for testing.

use crate::display::DisplayLink;
use crate::event::{Event, Object};
use crate::pwm::{LedChannel, PwmOutput};
use std::collections::{HashMap, VecDeque};

/// A mock PWM output that records every write.
///
/// # Example
///
/// ```
/// use genie_rgb::{LedChannel, MockPwm, PwmOutput};
///
/// let mut pwm = MockPwm::new();
/// pwm.write(LedChannel::Red, 42);
/// assert_eq!(pwm.duty(LedChannel::Red), Some(42));
/// assert_eq!(pwm.writes(), &[(LedChannel::Red, 42)]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockPwm {
    writes: Vec<(LedChannel, u8)>,
    duty: [Option<u8>; 3],
}

impl MockPwm {
    /// Create a mock with no writes yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write so far, oldest first.
    pub fn writes(&self) -> &[(LedChannel, u8)] {
        &self.writes
    }

    /// Last duty cycle written to a channel.
    pub fn duty(&self, channel: LedChannel) -> Option<u8> {
        self.duty[channel.index()]
    }

    /// Forget the write log, keeping the current duty cycles.
    pub fn clear_log(&mut self) {
        self.writes.clear();
    }
}

impl PwmOutput for MockPwm {
    fn write(&mut self, channel: LedChannel, duty_percent: u8) {
        self.writes.push((channel, duty_percent));
        self.duty[channel.index()] = Some(duty_percent);
    }
}

/// A single widget write seen by [`MockDisplay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetWrite {
    /// Widget kind.
    pub object: Object,
    /// Widget instance.
    pub index: u8,
    /// Value written.
    pub value: u16,
}

/// A mock display that replays queued events and records widget writes.
///
/// # Example
///
/// ```
/// use genie_rgb::{DisplayLink, Event, MockDisplay, Object};
///
/// let mut display = MockDisplay::with_events([Event::report(Object::WinButton, 0, 1)]);
/// assert!(display.has_event());
/// assert_eq!(display.poll_event().unwrap().object, Object::WinButton);
/// assert!(display.poll_event().is_none());
///
/// display.write_widget(Object::Gauge, 0, 55);
/// assert_eq!(display.widget(Object::Gauge, 0), Some(55));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockDisplay {
    pending: VecDeque<Event>,
    writes: Vec<WidgetWrite>,
    widgets: HashMap<(Object, u8), u16>,
}

impl MockDisplay {
    /// Create a mock with no pending events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that will report `events` in order.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            pending: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue another event.
    pub fn push_event(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Every widget write so far, oldest first.
    pub fn writes(&self) -> &[WidgetWrite] {
        &self.writes
    }

    /// Last value written to a widget.
    pub fn widget(&self, object: Object, index: u8) -> Option<u16> {
        self.widgets.get(&(object, index)).copied()
    }

    /// Forget the write log, keeping the current widget values.
    pub fn clear_log(&mut self) {
        self.writes.clear();
    }
}

impl DisplayLink for MockDisplay {
    fn write_widget(&mut self, object: Object, index: u8, value: u16) {
        self.writes.push(WidgetWrite {
            object,
            index,
            value,
        });
        self.widgets.insert((object, index), value);
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    fn has_event(&mut self) -> bool {
        !self.pending.is_empty()
    }
}
