//! Console-driven stand-in for the lock's local peripherals.
//!
//! A reader thread turns stdin lines into [`ConsoleCommand`]s; panel
//! inputs are forwarded to [`SimPanel`] over an mpsc channel and remote
//! commands to the simulated broker.
//!
//! ```text
//!   card <green|red|blue>     present a card for one sensor read
//!   key <chars>               type keys, e.g. `key 1337#`
//!   remote <ordinal|admin|fire>
//! ```

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use log::{debug, info, trace};

use crate::animation::matrix::MatrixFrame;
use crate::app::ports::{
    BuzzerPort, ColorSensorPort, CommandPayload, DisplayPort, IndicatorPort, KeypadPort,
    MatrixPort, ServoPort,
};
use crate::error::SensorError;
use crate::sensors::{CardColor, ColorReading};
use crate::text::truncated;

/// Inputs that reach the simulated panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelInput {
    Card(CardColor),
    Keys(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Panel(PanelInput),
    Remote(CommandPayload),
}

/// Parse one console line.  `None` for blank or unrecognised input.
pub fn parse_console_line(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let arg = words.next()?;
    match verb {
        "card" => {
            let color = match arg {
                "green" => CardColor::Green,
                "red" => CardColor::Red,
                "blue" => CardColor::Blue,
                _ => return None,
            };
            Some(ConsoleCommand::Panel(PanelInput::Card(color)))
        }
        "key" => Some(ConsoleCommand::Panel(PanelInput::Keys(arg.to_owned()))),
        "remote" => Some(ConsoleCommand::Remote(truncated(arg))),
        _ => None,
    }
}

/// Raw RGBC counts a card of `color` would produce under the sensor.
pub fn reading_for(color: CardColor) -> ColorReading {
    match color {
        CardColor::Green => ColorReading {
            clear: 400,
            red: 30,
            green: 220,
            blue: 40,
        },
        CardColor::Red => ColorReading {
            clear: 400,
            red: 240,
            green: 35,
            blue: 30,
        },
        CardColor::Blue => ColorReading {
            clear: 400,
            red: 40,
            green: 60,
            blue: 200,
        },
        CardColor::None => ColorReading {
            clear: 20,
            red: 8,
            green: 8,
            blue: 6,
        },
    }
}

pub struct SimPanel {
    inputs: Receiver<PanelInput>,
    card: Option<CardColor>,
    keys: VecDeque<char>,
    /// The previous scan reported a key; this one reports release.
    key_down: bool,
    lines: [String; 3],
    indicator: (u16, u16, u16),
    servo_angle: Option<u8>,
}

impl SimPanel {
    pub fn new(inputs: Receiver<PanelInput>) -> Self {
        Self {
            inputs,
            card: None,
            keys: VecDeque::new(),
            key_down: false,
            lines: Default::default(),
            indicator: (0, 0, 0),
            servo_angle: None,
        }
    }

    fn pump_inputs(&mut self) {
        while let Ok(input) = self.inputs.try_recv() {
            match input {
                PanelInput::Card(color) => self.card = Some(color),
                PanelInput::Keys(keys) => self.keys.extend(keys.chars()),
            }
        }
    }
}

impl KeypadPort for SimPanel {
    fn poll_key(&mut self) -> Option<char> {
        self.pump_inputs();
        if self.key_down {
            self.key_down = false;
            return None;
        }
        let key = self.keys.pop_front()?;
        self.key_down = true;
        Some(key)
    }
}

impl ColorSensorPort for SimPanel {
    fn init_sensor(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn read_color(&mut self) -> Result<ColorReading, SensorError> {
        self.pump_inputs();
        let color = self.card.take().unwrap_or(CardColor::None);
        Ok(reading_for(color))
    }
}

impl DisplayPort for SimPanel {
    fn show_lines(&mut self, line1: &str, line2: &str, line3: &str) {
        let next = [line1, line2, line3];
        if self.lines.iter().zip(next).all(|(a, b)| a == b) {
            return;
        }
        for (slot, text) in self.lines.iter_mut().zip(next) {
            text.clone_into(slot);
        }
        info!("[oled] {:<20} | {:<20} | {}", line1, line2, line3);
    }
}

impl BuzzerPort for SimPanel {
    fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        debug!("[buzzer] {} Hz for {} ms", freq_hz, duration_ms);
        std::thread::sleep(std::time::Duration::from_millis(u64::from(duration_ms)));
    }

    fn stop_continuous(&mut self) {
        debug!("[buzzer] off");
    }
}

impl ServoPort for SimPanel {
    fn move_servo(&mut self, angle: u8) {
        info!("[servo] -> {} deg", angle);
        self.servo_angle = Some(angle);
    }

    fn stop_servo(&mut self) {
        debug!("[servo] released at {:?}", self.servo_angle);
    }
}

impl IndicatorPort for SimPanel {
    fn set_indicator(&mut self, r: u16, g: u16, b: u16) {
        if self.indicator != (r, g, b) {
            debug!("[rgb] {} {} {}", r, g, b);
            self.indicator = (r, g, b);
        }
    }
}

impl MatrixPort for SimPanel {
    fn show_frame(&mut self, frame: &MatrixFrame) {
        trace!("[matrix] {} cells lit", frame.lit_count());
    }
}
