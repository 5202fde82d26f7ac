//! Serial Audio Module Protocol
//!
//! This crate defines the UART protocol spoken by the YX5200/YX5300 family
//! of audio playback modules (DFPlayer Mini, Catalex, ...), which the laser
//! tunnel uses for its sound effects.
//!
//! # Protocol Overview
//!
//! Every message is one fixed-layout frame:
//! ```text
//! ┌───────┬─────────┬────────┬────┬──────────┬─────────┬──────────┬─────┐
//! │ START │ VERSION │ LENGTH │ ID │ FEEDBACK │ PARAM   │ CHECKSUM │ END │
//! │ 0x7E  │ 0xFF    │ 0x06   │ 1B │ 1B       │ 2B (BE) │ 2B (BE)  │0xEF │
//! └───────┴─────────┴────────┴────┴──────────┴─────────┴──────────┴─────┘
//! ```
//!
//! The checksum is optional on the receive side; some module firmware sends
//! 8-byte frames without it. The receiver is a byte-at-a-time scanner that
//! resynchronizes on its own after noise or a partial frame.
//!
//! Received frames are turned into typed [`AudioEvent`]s by [`classify`].

#![no_std]
#![deny(unsafe_code)]

pub mod events;
pub mod frame;
pub mod messages;

pub use events::{classify, AudioEvent, Decoded, ModuleEvent};
pub use frame::{Frame, FRAME_END, FRAME_LENGTH, FRAME_START, FRAME_VERSION};
pub use messages::{Device, DeviceSet, Equalizer, ErrorCode, Feedback, ModuleState, MsgId, Sequence};
