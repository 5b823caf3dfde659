//! Example: replay a handful of panel events against in-memory hardware.
//!
//! Run with: `RUST_LOG=debug cargo run --example replay_events`

use genie_rgb::{Command, Event, EventDispatcher, LedChannel, MockDisplay, MockPwm, Object};

fn main() {
    env_logger::init();

    let events = [
        Event::report(Object::WinButton, 1, 1),
        Event::report(Object::Slider, 1, 50),
        Event::report(Object::WinButton, 2, 1),
        Event::report(Object::WinButton, 5, 1),
        Event {
            command: Command::ReportObj,
            object: Object::Gauge,
            index: 0,
            value: 12,
        },
        Event::report(Object::WinButton, 0, 1),
    ];

    let mut dispatcher = EventDispatcher::new(MockPwm::new(), MockDisplay::new(), rand::thread_rng());
    dispatcher.start();

    for event in &events {
        let outcome = dispatcher.dispatch(event);
        let pwm = dispatcher.pwm();
        let duty: Vec<_> = LedChannel::ALL
            .iter()
            .map(|&c| pwm.duty(c).unwrap_or_default())
            .collect();
        println!("{:<48} -> {:?}, LEDs now {:?}", event.to_string(), outcome, duty);
    }

    println!(
        "{} PWM writes, {} widget writes",
        dispatcher.pwm().writes().len(),
        dispatcher.display().writes().len()
    );
}
