//! Widget kinds, reply commands and decoded display events.

use std::fmt;

/// Declares a closed enum backed by a single protocol byte.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in code order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// The byte used for this value on the wire.
            pub const fn code(self) -> u8 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Look up a value by its wire byte.
            pub const fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

wire_enum! {
    /// Kind of widget on the display.
    pub enum Object {
        /// DIP switch.
        DipSwitch = 0,
        /// Rotary knob.
        Knob = 1,
        /// Rocker switch.
        RockerSwitch = 2,
        /// Rotary switch.
        RotarySwitch = 3,
        /// Slider.
        Slider = 4,
        /// Track bar.
        TrackBar = 5,
        /// Windows-style push button.
        WinButton = 6,
        /// Angular meter.
        AngularMeter = 7,
        /// Cool gauge.
        CoolGauge = 8,
        /// Custom digits.
        CustomDigits = 9,
        /// A whole form (screen).
        Form = 10,
        /// Bar gauge.
        Gauge = 11,
        /// Static image.
        Image = 12,
        /// On-screen keyboard.
        Keyboard = 13,
        /// LED indicator.
        Led = 14,
        /// LED digits.
        LedDigits = 15,
        /// Meter.
        Meter = 16,
        /// String box.
        Strings = 17,
        /// Thermometer.
        Thermometer = 18,
        /// User LED.
        UserLed = 19,
        /// Video.
        Video = 20,
        /// Static text.
        StaticText = 21,
        /// Sound.
        Sound = 22,
        /// Timer.
        Timer = 23,
        /// Spectrum.
        Spectrum = 24,
        /// Scope.
        Scope = 25,
        /// Tank.
        Tank = 26,
        /// User images.
        UserImages = 27,
        /// Pin output.
        PinOutput = 28,
        /// Pin input.
        PinInput = 29,
        /// 4D button.
        FourDButton = 30,
        /// Animated button.
        AniButton = 31,
        /// Colour picker.
        ColorPicker = 32,
        /// User button.
        UserButton = 33,
    }
}

wire_enum! {
    /// Command byte that leads every frame.
    pub enum Command {
        /// Ask the display for an object's value.
        ReadObj = 0x00,
        /// Set an object's value.
        WriteObj = 0x01,
        /// Write an ASCII string.
        WriteStr = 0x02,
        /// Write a unicode string.
        WriteStrU = 0x03,
        /// Set display contrast.
        WriteContrast = 0x04,
        /// Reply to [`Command::ReadObj`].
        ReportObj = 0x05,
        /// Positive acknowledgement.
        Ack = 0x06,
        /// Unsolicited user interaction report.
        ReportEvent = 0x07,
        /// Negative acknowledgement.
        Nak = 0x15,
    }
}

/// A report decoded from the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Frame command. Only [`Command::ReportEvent`] describes a user action.
    pub command: Command,
    /// Widget kind that raised the report.
    pub object: Object,
    /// Which instance of `object`.
    pub index: u8,
    /// Payload, e.g. a slider position.
    pub value: u16,
}

impl Event {
    /// A user interaction report.
    pub fn report(object: Object, index: u8, value: u16) -> Self {
        Self {
            command: Command::ReportEvent,
            object,
            index,
            value,
        }
    }

    /// Whether this is a user interaction report.
    pub fn is_report(&self) -> bool {
        self.command == Command::ReportEvent
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "object: {:2}, index: {} data: {} [{:02X} {:02X} {:04X}]",
            self.object.code(),
            self.index,
            self.value,
            self.object.code(),
            self.index,
            self.value
        )
    }
}
