//! Message catalog for the serial audio module protocol
//!
//! Message IDs and parameter encodings used by the YX5200/YX5300 family of
//! chips (DFPlayer Mini, Catalex and similar boards). IDs 0x01-0x1C are
//! commands, 0x3A-0x3F asynchronous notifications, 0x40/0x41 basic replies
//! and 0x42-0x4F query responses.

/// Message identifier (sometimes called the command byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MsgId {
    /// Reserved for state machines built on top of the protocol.
    /// Never sent on the wire.
    EnterState = 0x00,

    // Commands
    PlayNext = 0x01,
    PlayPrevious = 0x02,
    PlayFile = 0x03,
    VolumeUp = 0x04,
    VolumeDown = 0x05,
    SetVolume = 0x06,
    SelectEq = 0x07,
    LoopFile = 0x08,
    SelectSource = 0x09,
    Sleep = 0x0A,
    Wake = 0x0B,
    Reset = 0x0C,
    Resume = 0x0D,
    Pause = 0x0E,
    PlayFromFolder = 0x0F,
    /// Broken on most modules, use `SetVolume`
    VolumeAdjust = 0x10,
    LoopAll = 0x11,
    /// Play from the top-level folder named "MP3"
    PlayFromMp3 = 0x12,
    InsertAdvert = 0x13,
    PlayFromBigFolder = 0x14,
    StopAdvert = 0x15,
    Stop = 0x16,
    LoopFolder = 0x17,
    RandomPlay = 0x18,
    LoopCurrentFile = 0x19,
    DisableDac = 0x1A,
    /// Unusual message length, may not work
    Playlist = 0x1B,
    PlayWithVolume = 0x1C,

    // Asynchronous messages from the module
    DeviceInserted = 0x3A,
    DeviceRemoved = 0x3B,
    FinishedUsbFile = 0x3C,
    FinishedSdFile = 0x3D,
    FinishedFlashFile = 0x3E,

    // Quasi-asynchronous
    InitComplete = 0x3F,

    // Basic replies
    Error = 0x40,
    Ack = 0x41,

    // Query responses
    Status = 0x42,
    Volume = 0x43,
    Eq = 0x44,
    PlaybackSequence = 0x45,
    FirmwareVersion = 0x46,
    UsbFileCount = 0x47,
    SdFileCount = 0x48,
    FlashFileCount = 0x49,
    CurrentUsbFile = 0x4B,
    CurrentSdFile = 0x4C,
    CurrentFlashFile = 0x4D,
    FolderTrackCount = 0x4E,
    FolderCount = 0x4F,
}

impl MsgId {
    /// Datasheet synonym for `Resume`
    pub const UNPAUSE: MsgId = MsgId::Resume;
    /// Datasheet synonym for `LoopFile`
    pub const LOOP_FLASH_TRACK: MsgId = MsgId::LoopFile;

    /// Parse a message ID from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        use MsgId::*;
        let id = match byte {
            0x00 => EnterState,
            0x01 => PlayNext,
            0x02 => PlayPrevious,
            0x03 => PlayFile,
            0x04 => VolumeUp,
            0x05 => VolumeDown,
            0x06 => SetVolume,
            0x07 => SelectEq,
            0x08 => LoopFile,
            0x09 => SelectSource,
            0x0A => Sleep,
            0x0B => Wake,
            0x0C => Reset,
            0x0D => Resume,
            0x0E => Pause,
            0x0F => PlayFromFolder,
            0x10 => VolumeAdjust,
            0x11 => LoopAll,
            0x12 => PlayFromMp3,
            0x13 => InsertAdvert,
            0x14 => PlayFromBigFolder,
            0x15 => StopAdvert,
            0x16 => Stop,
            0x17 => LoopFolder,
            0x18 => RandomPlay,
            0x19 => LoopCurrentFile,
            0x1A => DisableDac,
            0x1B => Playlist,
            0x1C => PlayWithVolume,
            0x3A => DeviceInserted,
            0x3B => DeviceRemoved,
            0x3C => FinishedUsbFile,
            0x3D => FinishedSdFile,
            0x3E => FinishedFlashFile,
            0x3F => InitComplete,
            0x40 => Error,
            0x41 => Ack,
            0x42 => Status,
            0x43 => Volume,
            0x44 => Eq,
            0x45 => PlaybackSequence,
            0x46 => FirmwareVersion,
            0x47 => UsbFileCount,
            0x48 => SdFileCount,
            0x49 => FlashFileCount,
            0x4B => CurrentUsbFile,
            0x4C => CurrentSdFile,
            0x4D => CurrentFlashFile,
            0x4E => FolderTrackCount,
            0x4F => FolderCount,
            _ => return None,
        };
        Some(id)
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns true for IDs the host sends to the module
    pub fn is_command(self) -> bool {
        matches!(self.to_byte(), 0x01..=0x1C)
    }

    /// Returns true for IDs the module sends unprompted
    pub fn is_notification(self) -> bool {
        matches!(self.to_byte(), 0x3A..=0x3F)
    }

    /// Returns true for replies to a command or query
    pub fn is_reply(self) -> bool {
        matches!(self.to_byte(), 0x40..=0x4F)
    }
}

/// Feedback flag: whether the module should ACK the command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Feedback {
    NoFeedback = 0x00,
    Feedback = 0x01,
}

impl From<bool> for Feedback {
    fn from(feedback: bool) -> Self {
        if feedback {
            Feedback::Feedback
        } else {
            Feedback::NoFeedback
        }
    }
}

/// Error codes
///
/// Codes below 0x100 come from the module in an `Error` message. `TimedOut`
/// is synthesized locally when the module does not answer at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Message ID is not supported
    Unsupported,
    /// Module busy or no sources installed
    NoSources,
    /// Module is sleeping
    Sleeping,
    /// Serial communication error
    SerialError,
    /// Module received a bad checksum
    BadChecksum,
    /// File index out of range
    FileOutOfRange,
    /// No track with the requested numeric prefix
    TrackNotFound,
    /// Could not start an ADVERT track
    InsertionError,
    /// Storage (SD card) error
    SdCardError,
    /// Module entered sleep mode
    EnteredSleep,
    /// No response within the request window
    TimedOut,
    /// Code not in the catalog
    Other(u16),
}

impl ErrorCode {
    /// Map a raw code to its catalog entry
    pub fn from_code(code: u16) -> Self {
        match code {
            0x00 => ErrorCode::Unsupported,
            0x01 => ErrorCode::NoSources,
            0x02 => ErrorCode::Sleeping,
            0x03 => ErrorCode::SerialError,
            0x04 => ErrorCode::BadChecksum,
            0x05 => ErrorCode::FileOutOfRange,
            0x06 => ErrorCode::TrackNotFound,
            0x07 => ErrorCode::InsertionError,
            0x08 => ErrorCode::SdCardError,
            0x0A => ErrorCode::EnteredSleep,
            0x0100 => ErrorCode::TimedOut,
            other => ErrorCode::Other(other),
        }
    }

    /// Raw code
    pub fn code(self) -> u16 {
        match self {
            ErrorCode::Unsupported => 0x00,
            ErrorCode::NoSources => 0x01,
            ErrorCode::Sleeping => 0x02,
            ErrorCode::SerialError => 0x03,
            ErrorCode::BadChecksum => 0x04,
            ErrorCode::FileOutOfRange => 0x05,
            ErrorCode::TrackNotFound => 0x06,
            ErrorCode::InsertionError => 0x07,
            ErrorCode::SdCardError => 0x08,
            ErrorCode::EnteredSleep => 0x0A,
            ErrorCode::TimedOut => 0x0100,
            ErrorCode::Other(code) => code,
        }
    }

    /// Returns true if the error was reported by the module itself
    pub fn is_peer_error(self) -> bool {
        self != ErrorCode::TimedOut
    }

    /// Human readable description
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::Unsupported => "Unsupported command",
            ErrorCode::NoSources => "Module busy or no sources available",
            ErrorCode::Sleeping => "Module sleeping",
            ErrorCode::SerialError => "Serial communication error",
            ErrorCode::BadChecksum => "Bad checksum",
            ErrorCode::FileOutOfRange => "File index out of range",
            ErrorCode::TrackNotFound => "Track not found",
            ErrorCode::InsertionError => "Insertion error",
            ErrorCode::SdCardError => "SD card error",
            ErrorCode::EnteredSleep => "Entered sleep mode",
            ErrorCode::TimedOut => "Timed out",
            ErrorCode::Other(_) => "Unknown error code",
        }
    }
}

/// Storage device (or pseudo-device) known to the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Device {
    /// Storage connected via USB
    Usb = 0,
    /// Micro SD card in the TF slot
    SdCard = 1,
    /// AUX input, typically a PC connection
    Aux = 2,
    /// Pseudo-device reported while the module sleeps
    Sleep = 3,
    /// Internal (SPI) flash memory
    Flash = 4,
}

impl Device {
    /// Datasheet synonym: the SD slot is sometimes called TF
    pub const TF: Device = Device::SdCard;
    /// Datasheet synonym: AUX is typically a PC connection
    pub const PC: Device = Device::Aux;
    /// Datasheet synonym: internal flash is an SPI device
    pub const SPI: Device = Device::Flash;

    /// Bit index used by [`DeviceSet`]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Device::Usb => "USB",
            Device::SdCard => "SD Card",
            Device::Aux => "AUX",
            Device::Sleep => "SLEEP",
            Device::Flash => "FLASH",
        }
    }
}

/// Set of devices, one bit per [`Device::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSet(u8);

impl DeviceSet {
    /// Empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits (bit N = device with index N)
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Add a device
    pub fn insert(&mut self, device: Device) {
        self.0 |= 1 << device.index();
    }

    /// Check membership
    pub fn contains(self, device: Device) -> bool {
        self.0 & (1 << device.index()) != 0
    }

    /// Returns true if no device is in the set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Equalizer presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Equalizer {
    Normal = 0,
    Pop = 1,
    Rock = 2,
    Jazz = 3,
    Classical = 4,
    Bass = 5,
}

impl Equalizer {
    /// Parse from the low parameter byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Equalizer::Normal),
            1 => Some(Equalizer::Pop),
            2 => Some(Equalizer::Rock),
            3 => Some(Equalizer::Jazz),
            4 => Some(Equalizer::Classical),
            5 => Some(Equalizer::Bass),
            _ => None,
        }
    }
}

/// Playback state reported by a status query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleState {
    Stopped,
    Playing,
    Paused,
    Asleep,
}

/// Playback sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Sequence {
    LoopAll = 0,
    LoopFolder = 1,
    LoopTrack = 2,
    Random = 3,
    Single = 4,
}

impl Sequence {
    /// Parse from the low parameter byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Sequence::LoopAll),
            1 => Some(Sequence::LoopFolder),
            2 => Some(Sequence::LoopTrack),
            3 => Some(Sequence::Random),
            4 => Some(Sequence::Single),
            _ => None,
        }
    }
}

/// Combine two bytes into a big-endian 16-bit param
pub const fn combine(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// High byte of a param
pub const fn high(param: u16) -> u8 {
    (param >> 8) as u8
}

/// Low byte of a param
pub const fn low(param: u16) -> u8 {
    (param & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_id_roundtrip() {
        for byte in 0..=u8::MAX {
            if let Some(id) = MsgId::from_byte(byte) {
                assert_eq!(id.to_byte(), byte);
            }
        }
    }

    #[test]
    fn test_msg_id_gaps() {
        assert!(MsgId::from_byte(0x4A).is_none());
        assert!(MsgId::from_byte(0x1D).is_none());
        assert!(MsgId::from_byte(0x50).is_none());
        assert!(MsgId::from_byte(0xFF).is_none());
    }

    #[test]
    fn test_msg_id_synonyms() {
        assert_eq!(MsgId::UNPAUSE, MsgId::Resume);
        assert_eq!(MsgId::LOOP_FLASH_TRACK.to_byte(), 0x08);
    }

    #[test]
    fn test_msg_id_categories() {
        assert!(MsgId::SetVolume.is_command());
        assert!(!MsgId::EnterState.is_command());
        assert!(MsgId::InitComplete.is_notification());
        assert!(MsgId::Ack.is_reply());
        assert!(MsgId::FolderCount.is_reply());
        assert!(!MsgId::DeviceInserted.is_reply());
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(ErrorCode::from_code(0x04), ErrorCode::BadChecksum);
        assert_eq!(ErrorCode::from_code(0x0A), ErrorCode::EnteredSleep);
        assert_eq!(ErrorCode::from_code(0x09), ErrorCode::Other(0x09));
        assert_eq!(ErrorCode::from_code(0x100), ErrorCode::TimedOut);
        assert_eq!(ErrorCode::TimedOut.code(), 0x0100);
    }

    #[test]
    fn test_timeout_code_distinct_from_peer_codes() {
        for code in 0..=0xFFu16 {
            let err = ErrorCode::from_code(code);
            assert_ne!(err, ErrorCode::TimedOut);
            assert!(err.is_peer_error());
            assert_eq!(err.code(), code);
        }
        assert!(!ErrorCode::TimedOut.is_peer_error());
    }

    #[test]
    fn test_device_set() {
        let mut set = DeviceSet::empty();
        assert!(set.is_empty());
        set.insert(Device::SdCard);
        set.insert(Device::Flash);
        assert!(set.contains(Device::SdCard));
        assert!(set.contains(Device::SPI));
        assert!(!set.contains(Device::Usb));
        assert_eq!(set.bits(), 0b1_0010);
    }

    #[test]
    fn test_param_helpers() {
        assert_eq!(combine(0x12, 0x34), 0x1234);
        assert_eq!(high(0x1234), 0x12);
        assert_eq!(low(0x1234), 0x34);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(Equalizer::from_byte(5), Some(Equalizer::Bass));
        assert_eq!(Equalizer::from_byte(6), None);
        assert_eq!(Sequence::from_byte(4), Some(Sequence::Single));
        assert_eq!(Sequence::from_byte(9), None);
    }
}
