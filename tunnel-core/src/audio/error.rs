//! Errors returned by the audio module API

use tunnel_protocol::Device;

/// Errors from issuing a request
///
/// Protocol failures (garbled frames, peer error codes, missing replies)
/// are not errors here. They arrive later as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError<E> {
    /// The byte stream rejected the write
    Stream(E),
    /// The device has no command for this operation
    UnsupportedDevice(Device),
    /// Folder/track pair cannot be encoded by any folder command
    TrackOutOfRange,
}

