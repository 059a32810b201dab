//! TCS34725 RGBC light sensor over I2C.
//!
//! Generic over any `embedded-hal` 1.0 bus and delay so the same driver
//! runs on the board and against a scripted bus in tests.
//!
//! | Register | Addr | Value written                  |
//! |----------|------|--------------------------------|
//! | ENABLE   | 0x00 | PON, then PON + AEN            |
//! | ATIME    | 0x01 | 0xEB (~50 ms integration)      |
//! | CONTROL  | 0x0F | 0x00 (1x gain)                 |
//! | ID       | 0x12 | read: 0x44 / 0x4D              |
//! | CDATAL.. | 0x14 | read 8 bytes: C, R, G, B (LE)  |

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::color::ColorReading;
use crate::app::ports::ColorSensorPort;
use crate::error::SensorError;

pub const I2C_ADDRESS: u8 = 0x29;

const COMMAND_BIT: u8 = 0x80;
const REG_ENABLE: u8 = 0x00;
const REG_ATIME: u8 = 0x01;
const REG_CONTROL: u8 = 0x0F;
const REG_ID: u8 = 0x12;
const REG_CDATAL: u8 = 0x14;

const ENABLE_PON: u8 = 0x01;
const ENABLE_AEN: u8 = 0x02;
const ATIME_50MS: u8 = 0xEB;
const GAIN_1X: u8 = 0x00;

/// Part IDs of the TCS34725 and TCS34727.
const KNOWN_IDS: [u8; 2] = [0x44, 0x4D];

pub struct Tcs34725<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Tcs34725<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Verify the part ID, configure integration time and gain, then
    /// power up the ADC.
    pub fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_register(REG_ID)?;
        if !KNOWN_IDS.contains(&id) {
            return Err(SensorError::UnexpectedId(id));
        }

        self.write_register(REG_ATIME, ATIME_50MS)
            .map_err(|_| SensorError::InitFailed)?;
        self.write_register(REG_CONTROL, GAIN_1X)
            .map_err(|_| SensorError::InitFailed)?;
        self.write_register(REG_ENABLE, ENABLE_PON)
            .map_err(|_| SensorError::InitFailed)?;
        // Oscillator needs 2.4 ms after PON before AEN.
        self.delay.delay_ms(3);
        self.write_register(REG_ENABLE, ENABLE_PON | ENABLE_AEN)
            .map_err(|_| SensorError::InitFailed)?;
        Ok(())
    }

    /// Read the latest clear/red/green/blue counts.
    pub fn read(&mut self) -> Result<ColorReading, SensorError> {
        let mut raw = [0u8; 8];
        self.i2c
            .write_read(I2C_ADDRESS, &[COMMAND_BIT | REG_CDATAL], &mut raw)
            .map_err(|_| SensorError::BusFault)?;

        Ok(ColorReading {
            clear: u16::from_le_bytes([raw[0], raw[1]]),
            red: u16::from_le_bytes([raw[2], raw[3]]),
            green: u16::from_le_bytes([raw[4], raw[5]]),
            blue: u16::from_le_bytes([raw[6], raw[7]]),
        })
    }

    /// Give the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDRESS, &[COMMAND_BIT | reg], &mut buf)
            .map_err(|_| SensorError::BusFault)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(I2C_ADDRESS, &[COMMAND_BIT | reg, value])
            .map_err(|_| SensorError::BusFault)
    }
}

impl<I2C: I2c, D: DelayNs> ColorSensorPort for Tcs34725<I2C, D> {
    fn init_sensor(&mut self) -> Result<(), SensorError> {
        self.init()
    }

    fn read_color(&mut self) -> Result<ColorReading, SensorError> {
        self.read()
    }
}
