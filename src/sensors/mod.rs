//! Card sensing: raw RGBC sampling and colour classification.

pub mod color;
pub mod tcs34725;

pub use color::{CardColor, ColorReading, classify};
