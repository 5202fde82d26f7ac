//! Audio module link
//!
//! [`AudioModule`] owns the byte stream to the module, encodes requests,
//! decodes incoming frames and times out unanswered requests. It queues
//! [`ModuleEvent`](tunnel_protocol::ModuleEvent)s for the caller, who
//! turns them into semantic events with
//! [`classify`](tunnel_protocol::classify).

mod commands;
mod error;
mod module;

pub use error::AudioError;
pub use module::{AudioModule, EVENT_QUEUE_DEPTH};
