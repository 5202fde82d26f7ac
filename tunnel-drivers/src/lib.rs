//! Hardware adapters
//!
//! This crate implements the collaborator traits defined in tunnel-hal
//! on top of the embedded ecosystem traits, so any HAL that speaks
//! `embedded-io` or `embedded-hal` can drive the audio module:
//!
//! - Serial byte stream over a buffered UART
//! - Busy line over a digital input

#![no_std]
#![deny(unsafe_code)]

pub mod busy;
pub mod serial;

pub use busy::BusyPin;
pub use serial::IoStream;
