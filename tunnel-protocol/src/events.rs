//! Events surfaced by the audio link
//!
//! Two layers of events:
//! - [`ModuleEvent`]: what the dispatcher saw (a frame went out, a frame
//!   came in, the module never answered)
//! - [`AudioEvent`]: the semantic meaning of a received frame, produced by
//!   [`classify`]

use heapless::Vec;

use crate::frame::Frame;
use crate::messages::{Device, DeviceSet, Equalizer, ErrorCode, ModuleState, MsgId, Sequence};

/// Maximum number of audio events one module event can decode into
pub const MAX_DECODED_EVENTS: usize = 3;

/// Decoded events for one module event
pub type Decoded = Vec<AudioEvent, MAX_DECODED_EVENTS>;

/// Raw link events emitted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleEvent {
    /// A frame was written to the stream
    Sent(Frame),
    /// A complete frame arrived (not necessarily valid)
    Received(Frame),
    /// The pending request was not answered in time
    TimedOut,
}

/// Semantic notifications from the audio module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioEvent {
    /// A storage device was inserted
    DeviceInserted(Device),
    /// A storage device was removed
    DeviceRemoved(Device),
    /// A file finished playing on its own
    ///
    /// The module sometimes reports the same completion more than once in
    /// quick succession. The index is the file system index even when the
    /// track was started some other way. Not sent when playback is stopped
    /// or when an inserted advert finishes.
    FinishedFile { device: Device, file_index: u16 },
    /// Hardware initialization finished; the set lists online devices
    InitComplete(DeviceSet),
    /// Error reported by the module, or a local timeout
    Error(ErrorCode),
    /// Command acknowledged
    Ack,
    /// Status query result
    ///
    /// Some firmware always reports the SD card as the device regardless of
    /// the actual selection; the value is passed on as received.
    Status { device: Device, state: ModuleState },
    Volume(u8),
    Equalizer(Equalizer),
    PlaybackSequence(Sequence),
    FirmwareVersion(u16),
    /// Total number of audio files on a device
    DeviceFileCount { device: Device, count: u16 },
    /// Index of the file currently playing on a device
    CurrentTrack { device: Device, file_index: u16 },
    FolderTrackCount(u16),
    FolderCount(u16),
    /// A complete frame failed its checksum or carried an out-of-range value
    MessageInvalid,
}

impl AudioEvent {
    /// Check if this event indicates an error
    pub fn is_error(&self) -> bool {
        matches!(self, AudioEvent::Error(_) | AudioEvent::MessageInvalid)
    }

    /// Check if this event answers a query
    pub fn is_query_result(&self) -> bool {
        matches!(
            self,
            AudioEvent::Status { .. }
                | AudioEvent::Volume(_)
                | AudioEvent::Equalizer(_)
                | AudioEvent::PlaybackSequence(_)
                | AudioEvent::FirmwareVersion(_)
                | AudioEvent::DeviceFileCount { .. }
                | AudioEvent::CurrentTrack { .. }
                | AudioEvent::FolderTrackCount(_)
                | AudioEvent::FolderCount(_)
        )
    }
}

/// Decode a dispatcher event into semantic audio events
///
/// `Sent` decodes to nothing and `TimedOut` to a timeout error. Frames with
/// an unknown message ID are dropped without an event.
pub fn classify(event: &ModuleEvent) -> Decoded {
    match event {
        ModuleEvent::Sent(_) => Vec::new(),
        ModuleEvent::TimedOut => single(AudioEvent::Error(ErrorCode::TimedOut)),
        ModuleEvent::Received(frame) => decode_frame(frame),
    }
}

/// Decode a received frame
pub fn decode_frame(frame: &Frame) -> Decoded {
    if !frame.is_valid() {
        return single(AudioEvent::MessageInvalid);
    }
    let Some(msg_id) = frame.message_id() else {
        return Vec::new();
    };

    let event = match msg_id {
        MsgId::DeviceInserted => {
            return presence_events(frame.param_lo(), AudioEvent::DeviceInserted)
        }
        MsgId::DeviceRemoved => {
            return presence_events(frame.param_lo(), AudioEvent::DeviceRemoved)
        }
        MsgId::FinishedUsbFile => finished(Device::Usb, frame),
        MsgId::FinishedSdFile => finished(Device::SdCard, frame),
        MsgId::FinishedFlashFile => finished(Device::Flash, frame),
        MsgId::InitComplete => AudioEvent::InitComplete(online_devices(frame.param_lo())),
        MsgId::Error => AudioEvent::Error(ErrorCode::from_code(frame.param_lo() as u16)),
        MsgId::Ack => AudioEvent::Ack,
        MsgId::Status => AudioEvent::Status {
            device: status_device(frame.param_hi()),
            state: status_state(frame.param_lo()),
        },
        MsgId::Volume => AudioEvent::Volume(frame.param_lo()),
        MsgId::Eq => match Equalizer::from_byte(frame.param_lo()) {
            Some(eq) => AudioEvent::Equalizer(eq),
            None => AudioEvent::MessageInvalid,
        },
        MsgId::PlaybackSequence => match Sequence::from_byte(frame.param_lo()) {
            Some(seq) => AudioEvent::PlaybackSequence(seq),
            None => AudioEvent::MessageInvalid,
        },
        MsgId::FirmwareVersion => AudioEvent::FirmwareVersion(frame.param()),
        MsgId::UsbFileCount => file_count(Device::Usb, frame),
        MsgId::SdFileCount => file_count(Device::SdCard, frame),
        MsgId::FlashFileCount => file_count(Device::Flash, frame),
        MsgId::CurrentUsbFile => current_track(Device::Usb, frame),
        MsgId::CurrentSdFile => current_track(Device::SdCard, frame),
        MsgId::CurrentFlashFile => current_track(Device::Flash, frame),
        MsgId::FolderTrackCount => AudioEvent::FolderTrackCount(frame.param()),
        MsgId::FolderCount => AudioEvent::FolderCount(frame.param()),
        // Commands echoed back, or IDs the module never sends
        _ => return Vec::new(),
    };
    single(event)
}

fn single(event: AudioEvent) -> Decoded {
    let mut events = Vec::new();
    // Capacity is at least one
    let _ = events.push(event);
    events
}

/// Insert/remove bitmask: bit 0 USB, bit 1 SD card, bit 2 AUX
fn presence_events(mask: u8, make: fn(Device) -> AudioEvent) -> Decoded {
    let mut events = Vec::new();
    for (bit, device) in [(0x01, Device::Usb), (0x02, Device::SdCard), (0x04, Device::Aux)] {
        if mask & bit != 0 {
            let _ = events.push(make(device));
        }
    }
    events
}

/// Init-complete bitmask: bit 0 USB, bit 1 SD card, bit 2 AUX, bit 4 flash
fn online_devices(mask: u8) -> DeviceSet {
    let mut devices = DeviceSet::empty();
    for (bit, device) in [
        (0x01, Device::Usb),
        (0x02, Device::SdCard),
        (0x04, Device::Aux),
        (0x10, Device::Flash),
    ] {
        if mask & bit != 0 {
            devices.insert(device);
        }
    }
    devices
}

fn status_device(hi: u8) -> Device {
    match hi {
        0x01 => Device::Usb,
        0x02 => Device::SdCard,
        _ => Device::Sleep,
    }
}

fn status_state(lo: u8) -> ModuleState {
    match lo {
        0x00 => ModuleState::Stopped,
        0x01 => ModuleState::Playing,
        0x02 => ModuleState::Paused,
        _ => ModuleState::Asleep,
    }
}

fn finished(device: Device, frame: &Frame) -> AudioEvent {
    AudioEvent::FinishedFile {
        device,
        file_index: frame.param(),
    }
}

fn file_count(device: Device, frame: &Frame) -> AudioEvent {
    AudioEvent::DeviceFileCount {
        device,
        count: frame.param(),
    }
}

fn current_track(device: Device, frame: &Frame) -> AudioEvent {
    AudioEvent::CurrentTrack {
        device,
        file_index: frame.param(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Feedback;

    fn received(bytes: &[u8]) -> ModuleEvent {
        let mut frame = Frame::new();
        let mut done = false;
        for &b in bytes {
            done = frame.receive(b);
        }
        assert!(done, "bytes did not complete a frame");
        ModuleEvent::Received(frame)
    }

    fn reply(msg_id: MsgId, param: u16) -> ModuleEvent {
        let mut frame = Frame::new();
        frame.set(msg_id, param, Feedback::NoFeedback);
        ModuleEvent::Received(frame)
    }

    #[test]
    fn test_short_form_device_inserted() {
        let event = received(&[0x7E, 0xFF, 0x06, 0x3A, 0x00, 0x00, 0x07, 0xEF]);
        let decoded = classify(&event);
        assert_eq!(
            decoded.as_slice(),
            &[
                AudioEvent::DeviceInserted(Device::Usb),
                AudioEvent::DeviceInserted(Device::SdCard),
                AudioEvent::DeviceInserted(Device::Aux),
            ]
        );
    }

    #[test]
    fn test_device_inserted_sd_and_aux() {
        let event = received(&[0x7E, 0xFF, 0x06, 0x3A, 0x00, 0x00, 0x06, 0xEF]);
        let decoded = classify(&event);
        assert_eq!(
            decoded.as_slice(),
            &[
                AudioEvent::DeviceInserted(Device::SdCard),
                AudioEvent::DeviceInserted(Device::Aux),
            ]
        );
    }

    #[test]
    fn test_device_removed_ignores_high_bits() {
        let decoded = classify(&reply(MsgId::DeviceRemoved, 0xFF_F2));
        assert_eq!(
            decoded.as_slice(),
            &[AudioEvent::DeviceRemoved(Device::SdCard)]
        );
    }

    #[test]
    fn test_finished_file_per_device() {
        let decoded = classify(&reply(MsgId::FinishedSdFile, 2));
        assert_eq!(
            decoded.as_slice(),
            &[AudioEvent::FinishedFile {
                device: Device::SdCard,
                file_index: 2
            }]
        );
        let decoded = classify(&reply(MsgId::FinishedFlashFile, 0x0102));
        assert_eq!(
            decoded.as_slice(),
            &[AudioEvent::FinishedFile {
                device: Device::Flash,
                file_index: 0x0102
            }]
        );
    }

    #[test]
    fn test_init_complete_layout_includes_flash() {
        let decoded = classify(&reply(MsgId::InitComplete, 0x12));
        let AudioEvent::InitComplete(devices) = decoded[0] else {
            panic!("expected InitComplete, got {:?}", decoded);
        };
        assert!(devices.contains(Device::SdCard));
        assert!(devices.contains(Device::Flash));
        assert!(!devices.contains(Device::Usb));
        assert!(!devices.contains(Device::Aux));
        // Bit 3 of the wire mask has no meaning
        let decoded = classify(&reply(MsgId::InitComplete, 0x08));
        assert_eq!(decoded.as_slice(), &[AudioEvent::InitComplete(DeviceSet::empty())]);
    }

    #[test]
    fn test_peer_error() {
        let decoded = classify(&reply(MsgId::Error, 0x06));
        assert_eq!(
            decoded.as_slice(),
            &[AudioEvent::Error(ErrorCode::TrackNotFound)]
        );
    }

    #[test]
    fn test_timeout_becomes_error() {
        let decoded = classify(&ModuleEvent::TimedOut);
        assert_eq!(decoded.as_slice(), &[AudioEvent::Error(ErrorCode::TimedOut)]);
    }

    #[test]
    fn test_sent_decodes_to_nothing() {
        let mut frame = Frame::new();
        frame.set(MsgId::Stop, 0, Feedback::Feedback);
        assert!(classify(&ModuleEvent::Sent(frame)).is_empty());
    }

    #[test]
    fn test_status_reports_device_as_received() {
        let decoded = classify(&reply(MsgId::Status, 0x0201));
        assert_eq!(
            decoded.as_slice(),
            &[AudioEvent::Status {
                device: Device::SdCard,
                state: ModuleState::Playing
            }]
        );
        let decoded = classify(&reply(MsgId::Status, 0x0008));
        assert_eq!(
            decoded.as_slice(),
            &[AudioEvent::Status {
                device: Device::Sleep,
                state: ModuleState::Asleep
            }]
        );
    }

    #[test]
    fn test_query_results() {
        assert_eq!(
            classify(&reply(MsgId::Volume, 25)).as_slice(),
            &[AudioEvent::Volume(25)]
        );
        assert_eq!(
            classify(&reply(MsgId::Eq, 3)).as_slice(),
            &[AudioEvent::Equalizer(Equalizer::Jazz)]
        );
        assert_eq!(
            classify(&reply(MsgId::PlaybackSequence, 2)).as_slice(),
            &[AudioEvent::PlaybackSequence(Sequence::LoopTrack)]
        );
        assert_eq!(
            classify(&reply(MsgId::FirmwareVersion, 0x0108)).as_slice(),
            &[AudioEvent::FirmwareVersion(0x0108)]
        );
        assert_eq!(
            classify(&reply(MsgId::SdFileCount, 3)).as_slice(),
            &[AudioEvent::DeviceFileCount {
                device: Device::SdCard,
                count: 3
            }]
        );
        assert_eq!(
            classify(&reply(MsgId::CurrentUsbFile, 7)).as_slice(),
            &[AudioEvent::CurrentTrack {
                device: Device::Usb,
                file_index: 7
            }]
        );
        assert_eq!(
            classify(&reply(MsgId::FolderTrackCount, 40)).as_slice(),
            &[AudioEvent::FolderTrackCount(40)]
        );
        assert_eq!(
            classify(&reply(MsgId::FolderCount, 4)).as_slice(),
            &[AudioEvent::FolderCount(4)]
        );
        assert_eq!(classify(&reply(MsgId::Ack, 0)).as_slice(), &[AudioEvent::Ack]);
    }

    #[test]
    fn test_out_of_range_enum_is_invalid() {
        assert_eq!(
            classify(&reply(MsgId::Eq, 9)).as_slice(),
            &[AudioEvent::MessageInvalid]
        );
    }

    #[test]
    fn test_unknown_id_is_dropped() {
        // 0x4A is a gap in the catalog; valid checksum, no event
        let sum: u16 = 0xFF + 0x06 + 0x4A;
        let [hi, lo] = sum.wrapping_neg().to_be_bytes();
        let event = received(&[0x7E, 0xFF, 0x06, 0x4A, 0x00, 0x00, 0x00, hi, lo, 0xEF]);
        assert!(classify(&event).is_empty());
    }

    #[test]
    fn test_echoed_command_is_dropped() {
        assert!(classify(&reply(MsgId::SetVolume, 10)).is_empty());
    }

    #[test]
    fn test_bad_checksum_is_invalid() {
        let event = received(&[0x7E, 0xFF, 0x06, 0x43, 0x00, 0x00, 0x14, 0xFE, 0x00, 0xEF]);
        assert_eq!(classify(&event).as_slice(), &[AudioEvent::MessageInvalid]);
    }

    #[test]
    fn test_event_categories() {
        assert!(AudioEvent::MessageInvalid.is_error());
        assert!(AudioEvent::Error(ErrorCode::Sleeping).is_error());
        assert!(!AudioEvent::Ack.is_error());
        assert!(AudioEvent::Volume(1).is_query_result());
        assert!(!AudioEvent::DeviceInserted(Device::Usb).is_query_result());
    }
}
