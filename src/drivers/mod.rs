//! Peripheral helpers shared by the control and network loops.

pub mod buzzer;
pub mod keypad;
pub mod task_pin;
