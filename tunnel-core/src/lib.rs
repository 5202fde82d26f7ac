//! Board-agnostic core logic for the laser tunnel sound effects
//!
//! This crate contains everything between the raw byte stream and the
//! application that does not depend on specific hardware:
//!
//! - Wraparound-tolerant software timeout
//! - Request/response dispatcher for the serial audio module
//! - High-level command and query API
//! - Link configuration with flash persistence
//! - Sound effect tracking for the tunnel prop

#![no_std]
#![deny(unsafe_code)]

pub mod audio;
pub mod config;
pub mod sound;
pub mod timeout;

#[cfg(test)]
mod mock;
