//! Port traits: the hexagonal boundary between lock logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LockService / NetworkWorker (domain)
//! ```
//!
//! Control-core peripherals are bundled by [`LockPeripherals`], so the
//! state handlers hold a single `&mut dyn LockPeripherals`.  The network
//! core sees only [`ConnectivityPort`] and [`NetworkClient`].
//!
//! Method names are unique across all traits so one adapter can implement
//! several ports without call-site ambiguity.

use core::time::Duration;

use crate::animation::matrix::MatrixFrame;
use crate::drivers::buzzer::Melody;
use crate::error::{CommsError, SensorError};
use crate::sensors::ColorReading;

// ───────────────────────────────────────────────────────────────
// Control-core inputs
// ───────────────────────────────────────────────────────────────

/// Raw keypad scan.  No debouncing: a held key is reported on every poll.
pub trait KeypadPort {
    fn poll_key(&mut self) -> Option<char>;
}

pub trait ColorSensorPort {
    /// Identify and configure the sensor.  Failure is fatal at boot.
    fn init_sensor(&mut self) -> Result<(), SensorError>;

    fn read_color(&mut self) -> Result<ColorReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Control-core outputs
// ───────────────────────────────────────────────────────────────

/// Three-line text display.  An empty string leaves a line blank.
pub trait DisplayPort {
    fn show_lines(&mut self, line1: &str, line2: &str, line3: &str);
}

/// Piezo buzzer.  Tone and melody playback block the caller.
pub trait BuzzerPort {
    /// Frequency 0 is a silent pause of the given length.
    fn play_tone(&mut self, freq_hz: u32, duration_ms: u32);

    fn play_melody(&mut self, melody: Melody) {
        for &(freq_hz, duration_ms) in melody.notes() {
            self.play_tone(freq_hz, duration_ms);
        }
    }

    /// Silence any continuous tone.
    fn stop_continuous(&mut self);
}

/// Latch servo.
pub trait ServoPort {
    /// Start moving toward `angle` degrees.
    fn move_servo(&mut self, angle: u8);

    /// Release the holding pulse once the move has had time to finish.
    fn stop_servo(&mut self);
}

/// 16-bit-per-channel RGB status LED.
pub trait IndicatorPort {
    fn set_indicator(&mut self, r: u16, g: u16, b: u16);
}

/// 5×5 addressable LED matrix.
pub trait MatrixPort {
    fn show_frame(&mut self, frame: &MatrixFrame);
}

/// Everything the control core drives.
pub trait LockPeripherals:
    KeypadPort + ColorSensorPort + DisplayPort + BuzzerPort + ServoPort + IndicatorPort + MatrixPort
{
}

impl<T> LockPeripherals for T where
    T: KeypadPort
        + ColorSensorPort
        + DisplayPort
        + BuzzerPort
        + ServoPort
        + IndicatorPort
        + MatrixPort
{
}

// ───────────────────────────────────────────────────────────────
// Network-core ports
// ───────────────────────────────────────────────────────────────

/// Wireless association.
pub trait ConnectivityPort {
    /// Associate, giving up after `timeout`.  Blocks the network core.
    fn connect(&mut self, timeout: Duration) -> Result<(), CommsError>;
}

/// Inbound command text, e.g. `"3"` or `"fire"`.
pub type CommandPayload = heapless::String<32>;

/// Pub/sub session.
pub trait NetworkClient {
    /// Broker session is established.
    fn session_up(&self) -> bool;

    /// A previous publish has not been acknowledged yet.
    fn is_publishing(&self) -> bool;

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError>;

    /// Next remote mode command received on the command topic, if any.
    fn poll_command(&mut self) -> Option<CommandPayload>;

    /// Service the network stack.  Called once per network tick.
    fn service(&mut self) {}
}
