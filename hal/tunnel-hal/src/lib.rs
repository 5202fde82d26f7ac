//! Laser Tunnel Hardware Abstraction Layer
//!
//! This crate defines the narrow collaborator interfaces the audio protocol
//! layer consumes. Board crates (or the firmware binary) implement them on
//! top of real peripherals; tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tunnel-core (dispatcher, sound fx)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tunnel-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tunnel-       │       │ tunnel-       │
//! │   drivers     │       │   firmware    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::ByteStream`] - Half-duplex serial byte source/sink
//! - [`clock::Clock`], [`clock::Ticks`] - Free-running wrapping counter
//! - [`gpio::InputPin`] - Digital input (audio module busy line)

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::{Clock, Ticks};
pub use gpio::InputPin;
pub use uart::ByteStream;
