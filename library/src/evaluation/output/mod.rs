//! Values flowing through component pins.

pub mod pin_value;

pub use pin_value::PinValue;
