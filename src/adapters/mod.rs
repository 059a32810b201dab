//! Concrete implementations of the port traits.
//!
//! | Adapter       | Implements                        | Connects to          |
//! |---------------|-----------------------------------|----------------------|
//! | `time`        | Clock, `embedded_hal` DelayNs     | `std::time`          |
//! | `sim`         | LockPeripherals (all panel ports) | stdin console        |
//! | `sim_network` | ConnectivityPort, NetworkClient   | logging broker       |
//!
//! The on-target colour sensor is `sensors::tcs34725`, generic over any
//! `embedded_hal` I2C bus.

pub mod sim;
pub mod sim_network;
pub mod time;
