//! Visi-Genie serial protocol.
//!
//! Every message the display sends is either a single `ACK`/`NAK` byte or a
//! six byte frame:
//!
//! ```text
//! [command, object, index, value_hi, value_lo, checksum]
//! ```
//!
//! where `checksum` is the XOR of the five bytes before it. Writes from the
//! host use the same layout with [`Command::WriteObj`].

use crate::display::DisplayLink;
use crate::error::BridgeError;
use crate::event::{Command, Event, Object};

use log::{debug, info, trace, warn};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::process;

/// Length of every multi-byte frame, checksum included.
pub const FRAME_LEN: usize = 6;

/// Reports held before the oldest one is dropped.
pub const MAX_QUEUED_EVENTS: usize = 64;

/// Baud rates the panel can be configured for.
pub const SUPPORTED_BAUD_RATES: &[u32] = &[9600, 19200, 38400, 57600, 115200, 230400];

// =============================================================================
// Framing
// =============================================================================

/// XOR of every byte in `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Build the frame that sets `object[index]` to `value`.
pub fn encode_write(object: Object, index: u8, value: u16) -> [u8; FRAME_LEN] {
    let [hi, lo] = value.to_be_bytes();
    let mut frame = [Command::WriteObj.code(), object.code(), index, hi, lo, 0];
    frame[FRAME_LEN - 1] = checksum(&frame[..FRAME_LEN - 1]);
    frame
}

/// Something the display sent us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The last write was accepted.
    Ack,
    /// The last write was rejected.
    Nak,
    /// A report frame.
    Report(Event),
}

/// Byte-at-a-time reply decoder.
///
/// Bytes that can't start a frame are skipped, which resynchronises the
/// stream after line noise.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: [u8; FRAME_LEN],
    len: usize,
}

impl Decoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte, returning a reply once one is complete.
    pub fn push(&mut self, byte: u8) -> Option<Reply> {
        if self.len == 0 {
            return match Command::from_code(byte) {
                Some(Command::Ack) => Some(Reply::Ack),
                Some(Command::Nak) => Some(Reply::Nak),
                Some(Command::ReportEvent | Command::ReportObj) => {
                    self.buf[0] = byte;
                    self.len = 1;
                    None
                }
                Some(
                    Command::ReadObj
                    | Command::WriteObj
                    | Command::WriteStr
                    | Command::WriteStrU
                    | Command::WriteContrast,
                )
                | None => {
                    debug!("skipping stray byte 0x{:02X}", byte);
                    None
                }
            };
        }

        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < FRAME_LEN {
            return None;
        }
        self.len = 0;
        self.finish()
    }

    /// Whether a frame is partly received.
    pub fn is_mid_frame(&self) -> bool {
        self.len != 0
    }

    fn finish(&self) -> Option<Reply> {
        let frame = &self.buf;
        if checksum(frame) != 0 {
            warn!("dropping frame with bad checksum: {:02X?}", frame);
            return None;
        }
        let command = Command::from_code(frame[0])?;
        let Some(object) = Object::from_code(frame[1]) else {
            warn!("dropping frame for unknown object 0x{:02X}", frame[1]);
            return None;
        };
        Some(Reply::Report(Event {
            command,
            object,
            index: frame[2],
            value: u16::from_be_bytes([frame[3], frame[4]]),
        }))
    }
}

// =============================================================================
// GenieLink
// =============================================================================

/// A Visi-Genie panel on the other end of a byte stream.
///
/// Reads are expected not to block: when nothing is waiting the port should
/// return `Ok(0)` or [`ErrorKind::WouldBlock`]. [`GenieLink::open`] sets a
/// serial device up that way.
///
/// # Example
///
/// ```no_run
/// use genie_rgb::{DisplayLink, GenieLink, Object};
///
/// let mut link = GenieLink::open("/dev/ttyS0", 115200)?;
/// link.write_widget(Object::Form, 0, 0);
/// while let Some(event) = link.poll_event() {
///     println!("{}", event);
/// }
/// # Ok::<(), genie_rgb::BridgeError>(())
/// ```
#[derive(Debug)]
pub struct GenieLink<T> {
    port: T,
    decoder: Decoder,
    events: VecDeque<Event>,
}

impl GenieLink<File> {
    /// Open a serial device and configure it for the panel.
    ///
    /// The line is put in raw mode at `baud` with `stty`, modem control lines
    /// are ignored, and reads are made non-blocking (`min 0 time 0`). The
    /// device is opened with `O_NOCTTY` so it never becomes our controlling
    /// terminal.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::UnsupportedBaud`] if the panel can't run at `baud`
    /// - [`BridgeError::SttyUnavailable`] if `stty` can't be run
    /// - [`BridgeError::SerialConfig`] if `stty` fails
    /// - [`BridgeError::SerialOpen`] if the device can't be opened
    pub fn open(path: impl AsRef<Path>, baud: u32) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        configure_line(STTY, path, baud)?;
        let port = open_port(path)?;

        info!("opened Genie display on {} at {} baud", path.display(), baud);
        Ok(Self::new(port))
    }
}

/// Program used to configure the serial line.
const STTY: &str = "stty";

/// `stty` settings for the panel at `baud`.
fn stty_args(baud: u32) -> Vec<String> {
    let mut args = vec![baud.to_string()];
    args.extend(
        ["raw", "-echo", "clocal", "cread", "min", "0", "time", "0"]
            .iter()
            .map(|s| s.to_string()),
    );
    args
}

fn configure_line(program: &str, path: &Path, baud: u32) -> Result<(), BridgeError> {
    if !SUPPORTED_BAUD_RATES.contains(&baud) {
        return Err(BridgeError::UnsupportedBaud(baud));
    }

    let status = process::Command::new(program)
        .arg("-F")
        .arg(path)
        .args(stty_args(baud))
        .status()
        .map_err(|source| BridgeError::SttyUnavailable {
            program: program.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(BridgeError::SerialConfig {
            path: path.to_path_buf(),
            status,
        });
    }
    debug!("configured {} with {} {:?}", path.display(), program, stty_args(baud));
    Ok(())
}

fn open_port(path: &Path) -> Result<File, BridgeError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
        .map_err(|source| BridgeError::SerialOpen {
            path: path.to_path_buf(),
            source,
        })
}

impl<T: Read + Write> GenieLink<T> {
    /// Wrap an already configured port.
    pub fn new(port: T) -> Self {
        Self {
            port,
            decoder: Decoder::new(),
            events: VecDeque::with_capacity(MAX_QUEUED_EVENTS),
        }
    }

    /// Get a reference to the underlying port.
    pub fn get_ref(&self) -> &T {
        &self.port
    }

    /// Give back the underlying port.
    pub fn into_inner(self) -> T {
        self.port
    }

    /// Read everything the port has and decode it.
    fn fill(&mut self) {
        let mut buf = [0u8; 64];
        loop {
            match self.port.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    for &byte in &buf[..n] {
                        self.accept(byte);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!("serial read failed: {}", e);
                    break;
                }
            }
        }
    }

    fn accept(&mut self, byte: u8) {
        match self.decoder.push(byte) {
            Some(Reply::Ack) => trace!("ack"),
            Some(Reply::Nak) => warn!("display rejected a write (NAK)"),
            Some(Reply::Report(event)) => {
                if self.events.len() == MAX_QUEUED_EVENTS {
                    if let Some(dropped) = self.events.pop_front() {
                        warn!("event queue full, dropping {}", dropped);
                    }
                }
                trace!("queued {:?}", event);
                self.events.push_back(event);
            }
            None => {}
        }
    }
}

impl<T: Read + Write> DisplayLink for GenieLink<T> {
    fn write_widget(&mut self, object: Object, index: u8, value: u16) {
        let frame = encode_write(object, index, value);
        trace!("write {:?}[{}] = {}", object, index, value);
        if let Err(e) = self.port.write_all(&frame).and_then(|_| self.port.flush()) {
            warn!("failed to write {:?}[{}] = {}: {}", object, index, value, e);
        }
    }

    fn poll_event(&mut self) -> Option<Event> {
        if self.events.is_empty() {
            self.fill();
        }
        self.events.pop_front()
    }

    fn has_event(&mut self) -> bool {
        if self.events.is_empty() {
            self.fill();
        }
        !self.events.is_empty()
    }
}
