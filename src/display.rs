//! The display side of the bridge.

use crate::event::{Event, Object};

/// Trait for display link implementations.
///
/// This allows the dispatcher to run against [`MockDisplay`](crate::MockDisplay)
/// in tests and against a real serial panel in production.
pub trait DisplayLink {
    /// Set the value of a widget on the display.
    ///
    /// Best effort: there is no acknowledgement and failures are not reported.
    fn write_widget(&mut self, object: Object, index: u8, value: u16);

    /// Take the next buffered event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<Event>;

    /// Whether [`poll_event`](Self::poll_event) would return an event.
    fn has_event(&mut self) -> bool;
}

impl<D: DisplayLink + ?Sized> DisplayLink for &mut D {
    fn write_widget(&mut self, object: Object, index: u8, value: u16) {
        (**self).write_widget(object, index, value);
    }

    fn poll_event(&mut self) -> Option<Event> {
        (**self).poll_event()
    }

    fn has_event(&mut self) -> bool {
        (**self).has_event()
    }
}
