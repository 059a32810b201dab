//! Mock adapters for integration tests.
//!
//! [`MockHardware`] records every output call and replays scripted
//! sensor readings and keypad scans.  [`ManualClock`] only moves when a
//! test advances it.  [`RecordingLink`] stands in for one end of the
//! inter-core FIFO.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use bitdoglock::animation::matrix::MatrixFrame;
use bitdoglock::app::LockService;
use bitdoglock::app::ports::{
    BuzzerPort, ColorSensorPort, DisplayPort, IndicatorPort, KeypadPort, MatrixPort, ServoPort,
};
use bitdoglock::config::LockConfig;
use bitdoglock::error::SensorError;
use bitdoglock::fsm::LockMode;
use bitdoglock::link::{ChannelMessage, FifoPort, MessageKind};
use bitdoglock::sensors::{CardColor, ColorReading};
use bitdoglock::timer::{Clock, Instant};
use embedded_hal::delay::DelayNs;

// ── Output record ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    Show(String, String, String),
    Tone { freq: u32, ms: u32 },
    StopTone,
    Servo(u8),
    ServoStop,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Popped one per sensor read; an empty script reads as "no card".
    pub readings: VecDeque<Result<ColorReading, SensorError>>,
    /// Raw keypad scans, popped one per poll.
    pub scans: VecDeque<Option<char>>,
    pub sensor_init: Result<(), SensorError>,
    pub indicator: (u16, u16, u16),
    pub frame: MatrixFrame,
    pub frames_shown: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            readings: VecDeque::new(),
            scans: VecDeque::new(),
            sensor_init: Ok(()),
            indicator: (0, 0, 0),
            frame: MatrixFrame::new(),
            frames_shown: 0,
        }
    }

    pub fn present(&mut self, color: CardColor) {
        self.readings.push_back(Ok(reading(color)));
    }

    /// Queue one press (followed by a release scan) per character.
    pub fn type_keys(&mut self, keys: &str) {
        for key in keys.chars() {
            self.scans.push_back(Some(key));
            self.scans.push_back(None);
        }
    }

    pub fn shows(&self) -> Vec<(String, String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Show(a, b, c) => Some((a.clone(), b.clone(), c.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn showed(&self, line: &str) -> bool {
        self.shows()
            .iter()
            .any(|(a, b, c)| a == line || b == line || c == line)
    }

    pub fn tones(&self) -> Vec<(u32, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Tone { freq, ms } => Some((*freq, *ms)),
                _ => None,
            })
            .collect()
    }

    pub fn servo_moves(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Servo(angle) => Some(*angle),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &HwCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts a card of `color` produces under the sensor.
pub fn reading(color: CardColor) -> ColorReading {
    let (clear, red, green, blue) = match color {
        CardColor::Green => (300, 10, 100, 10),
        CardColor::Red => (300, 100, 10, 10),
        CardColor::Blue => (300, 40, 10, 100),
        CardColor::None => (30, 10, 10, 10),
    };
    ColorReading {
        clear,
        red,
        green,
        blue,
    }
}

impl KeypadPort for MockHardware {
    fn poll_key(&mut self) -> Option<char> {
        self.scans.pop_front().flatten()
    }
}

impl ColorSensorPort for MockHardware {
    fn init_sensor(&mut self) -> Result<(), SensorError> {
        self.sensor_init
    }

    fn read_color(&mut self) -> Result<ColorReading, SensorError> {
        self.readings
            .pop_front()
            .unwrap_or(Ok(reading(CardColor::None)))
    }
}

impl DisplayPort for MockHardware {
    fn show_lines(&mut self, line1: &str, line2: &str, line3: &str) {
        self.calls
            .push(HwCall::Show(line1.into(), line2.into(), line3.into()));
    }
}

impl BuzzerPort for MockHardware {
    fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.calls.push(HwCall::Tone {
            freq: freq_hz,
            ms: duration_ms,
        });
    }

    fn stop_continuous(&mut self) {
        self.calls.push(HwCall::StopTone);
    }
}

impl ServoPort for MockHardware {
    fn move_servo(&mut self, angle: u8) {
        self.calls.push(HwCall::Servo(angle));
    }

    fn stop_servo(&mut self) {
        self.calls.push(HwCall::ServoStop);
    }
}

impl IndicatorPort for MockHardware {
    fn set_indicator(&mut self, r: u16, g: u16, b: u16) {
        self.indicator = (r, g, b);
    }
}

impl MatrixPort for MockHardware {
    fn show_frame(&mut self, frame: &MatrixFrame) {
        self.frame = *frame;
        self.frames_shown += 1;
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    micros: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.micros.set(self.micros.get() + by.as_micros() as u64);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.micros.get())
    }
}

/// Delay that moves a [`ManualClock`] instead of sleeping.
pub struct ClockDelay<'a>(pub &'a ManualClock);

impl DelayNs for ClockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(Duration::from_nanos(u64::from(ns)));
    }
}

// ── RecordingLink ─────────────────────────────────────────────

/// One end of the FIFO: words pushed are recorded, words to pop are
/// queued by the test.
#[derive(Default)]
pub struct RecordingLink {
    pub inbound: RefCell<VecDeque<u32>>,
    pub outbound: RefCell<Vec<u32>>,
}

#[allow(dead_code)]
impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&self, message: ChannelMessage) {
        self.inbound.borrow_mut().push_back(message.encode());
    }

    pub fn send_mode(&self, ordinal: u16) {
        self.deliver(ChannelMessage::ModeChange { ordinal });
    }

    /// Publish requests sent so far, heartbeats excluded.
    pub fn published(&self) -> Vec<(MessageKind, CardColor)> {
        self.outbound
            .borrow()
            .iter()
            .filter_map(|w| match ChannelMessage::decode(*w) {
                Ok(ChannelMessage::Publish { kind, color }) if kind != MessageKind::Heartbeat => {
                    Some((kind, color))
                }
                _ => None,
            })
            .collect()
    }

    pub fn heartbeats(&self) -> usize {
        self.outbound
            .borrow()
            .iter()
            .filter(|w| {
                ChannelMessage::decode(**w)
                    == Ok(ChannelMessage::publish(MessageKind::Heartbeat, CardColor::None))
            })
            .count()
    }

    pub fn clear(&self) {
        self.outbound.borrow_mut().clear();
    }
}

impl FifoPort for RecordingLink {
    fn try_push(&self, word: u32) -> Result<(), u32> {
        self.outbound.borrow_mut().push(word);
        Ok(())
    }

    fn try_pop(&self) -> Option<u32> {
        self.inbound.borrow_mut().pop_front()
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A lock service wired to mocks.
pub struct Rig {
    pub service: LockService,
    pub hw: MockHardware,
    pub link: RecordingLink,
    pub clock: ManualClock,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(LockConfig::default())
    }

    pub fn with_config(config: LockConfig) -> Self {
        Self {
            service: LockService::new(config, 7),
            hw: MockHardware::new(),
            link: RecordingLink::new(),
            clock: ManualClock::new(),
        }
    }

    pub fn tick(&mut self) {
        self.service.tick(&mut self.hw, &self.link, &self.clock);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Tick every 10 ms for `ms` of simulated time.
    pub fn run_for(&mut self, ms: u64) {
        for _ in 0..ms / 10 {
            self.clock.advance_ms(10);
            self.tick();
        }
    }

    pub fn mode(&self) -> LockMode {
        self.service.mode()
    }

    /// Present `color` and tick until the code prompt is up.
    pub fn card(&mut self, color: CardColor) {
        self.hw.present(color);
        self.tick();
    }

    /// Type `keys`, one scan per tick.  Scans left over once the mode
    /// stops polling the keypad are dropped.
    pub fn keys(&mut self, keys: &str) {
        self.hw.type_keys(keys);
        for _ in 0..keys.chars().count() * 2 {
            self.tick();
        }
        self.hw.scans.clear();
    }

    /// Idle → card → correct code → `Open`.
    pub fn open_with_green(&mut self) {
        self.tick();
        self.card(CardColor::Green);
        self.keys("1337#");
        assert_eq!(self.mode(), LockMode::Open);
    }
}
