use genie_rgb::{BridgeError, Config, EventDispatcher, GenieLink, SysfsPwm};
use log::{error, info};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Visi-Genie Slider Demo number 2");

    let config = Config::default();
    if let Err(e) = run(&config) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), BridgeError> {
    // Red, green and blue; the display's sliders run 0-100, same as the duty cycle.
    let pwm = SysfsPwm::new(&config.pwm_chip, config.pwm_channels, config.pwm_period_ns)?;
    let display = GenieLink::open(&config.serial_device, config.baud_rate)?;

    let mut dispatcher = EventDispatcher::new(pwm, display, rand::thread_rng());
    dispatcher.start();
    dispatcher.run(config.idle)
}
