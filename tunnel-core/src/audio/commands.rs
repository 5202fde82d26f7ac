//! High-level command and query API
//!
//! Commands ask the module for an ACK so that a lost command shows up as a
//! timeout. Queries do not, since the reply itself confirms receipt.
//! Results arrive later as events.

use tunnel_hal::{ByteStream, Clock};
use tunnel_protocol::{Device, Equalizer, Feedback, MsgId};

use super::error::AudioError;
use super::module::AudioModule;

/// Largest track number `play_track` can reach in a small folder
const MAX_SMALL_FOLDER_TRACK: u16 = 255;
/// Folders addressable by the large-folder command
const LARGE_FOLDER_COUNT: u16 = 16;
/// Largest track number in a large folder
const MAX_LARGE_FOLDER_TRACK: u16 = 3000;

type Result<E> = core::result::Result<(), AudioError<E>>;

impl<S: ByteStream, C: Clock> AudioModule<S, C> {
    fn command(&mut self, msg_id: MsgId, param: u16) -> Result<S::Error> {
        self.send_command(msg_id, param, Feedback::Feedback)
    }

    /// Select the playback source
    ///
    /// Many modules default to the SD card, but selecting it explicitly is
    /// good practice. Only USB, SD card and flash can be selected.
    pub fn select_source(&mut self, device: Device) -> Result<S::Error> {
        let param = match device {
            Device::Usb => 1,
            Device::SdCard => 2,
            Device::Flash => 5,
            other => return Err(AudioError::UnsupportedDevice(other)),
        };
        self.command(MsgId::SelectSource, param)
    }

    /// Play a file by its file system index
    pub fn play_file(&mut self, file_index: u16) -> Result<S::Error> {
        self.command(MsgId::PlayFile, file_index)
    }

    /// Play a file by index, choosing whether the module should ACK
    pub fn play_file_with(&mut self, file_index: u16, feedback: Feedback) -> Result<S::Error> {
        self.send_command(MsgId::PlayFile, file_index, feedback)
    }

    pub fn play_next_file(&mut self) -> Result<S::Error> {
        self.command(MsgId::PlayNext, 0)
    }

    pub fn play_previous_file(&mut self) -> Result<S::Error> {
        self.command(MsgId::PlayPrevious, 0)
    }

    /// Play one file repeatedly
    pub fn loop_file(&mut self, file_index: u16) -> Result<S::Error> {
        self.command(MsgId::LoopFile, file_index)
    }

    /// Play every file on the device in index order, repeatedly
    pub fn loop_all_files(&mut self) -> Result<S::Error> {
        self.command(MsgId::LoopAll, 1)
    }

    /// Play every file in a numbered folder, repeatedly
    pub fn loop_folder(&mut self, folder: u16) -> Result<S::Error> {
        self.command(MsgId::LoopFolder, folder)
    }

    pub fn play_files_in_random_order(&mut self) -> Result<S::Error> {
        self.command(MsgId::RandomPlay, 0)
    }

    /// Play a track from a numbered folder ("01/001.mp3" is folder 1, track 1)
    ///
    /// Tracks up to 255 use the small-folder command. Larger track numbers
    /// need the large-folder command, which only reaches folders 0-15 and
    /// tracks up to 3000.
    pub fn play_track(&mut self, folder: u16, track: u16) -> Result<S::Error> {
        if track <= MAX_SMALL_FOLDER_TRACK {
            self.command(MsgId::PlayFromFolder, (folder << 8) | track)
        } else if folder < LARGE_FOLDER_COUNT && track <= MAX_LARGE_FOLDER_TRACK {
            self.command(MsgId::PlayFromBigFolder, (folder << 12) | track)
        } else {
            Err(AudioError::TrackOutOfRange)
        }
    }

    /// Play a track from the top-level "MP3" folder
    pub fn play_mp3_track(&mut self, track: u16) -> Result<S::Error> {
        self.command(MsgId::PlayFromMp3, track)
    }

    /// Interrupt playback with a track from the "ADVERT" folder
    ///
    /// The interrupted track resumes afterwards. Fails with an insertion
    /// error event if nothing is playing.
    pub fn insert_advert(&mut self, track: u16) -> Result<S::Error> {
        self.command(MsgId::InsertAdvert, track)
    }

    pub fn stop_advert(&mut self) -> Result<S::Error> {
        self.command(MsgId::StopAdvert, 0)
    }

    /// Stop playback and return to single-file sequencing
    pub fn stop(&mut self) -> Result<S::Error> {
        self.command(MsgId::Stop, 0)
    }

    pub fn pause(&mut self) -> Result<S::Error> {
        self.command(MsgId::Pause, 0)
    }

    pub fn unpause(&mut self) -> Result<S::Error> {
        self.command(MsgId::UNPAUSE, 0)
    }

    /// Set the volume, clamped to the configured maximum
    pub fn set_volume(&mut self, volume: u8) -> Result<S::Error> {
        let volume = volume.min(self.config().max_volume);
        self.command(MsgId::SetVolume, volume as u16)
    }

    pub fn volume_up(&mut self) -> Result<S::Error> {
        self.command(MsgId::VolumeUp, 0)
    }

    pub fn volume_down(&mut self) -> Result<S::Error> {
        self.command(MsgId::VolumeDown, 0)
    }

    /// Select an equalizer preset (interrupts playback)
    pub fn select_eq(&mut self, eq: Equalizer) -> Result<S::Error> {
        self.command(MsgId::SelectEq, eq as u16)
    }

    pub fn sleep(&mut self) -> Result<S::Error> {
        self.command(MsgId::Sleep, 0)
    }

    pub fn wake(&mut self) -> Result<S::Error> {
        self.command(MsgId::Wake, 0)
    }

    /// Power down the DACs to save a few milliamps (clicks)
    pub fn disable_dacs(&mut self) -> Result<S::Error> {
        self.command(MsgId::DisableDac, 1)
    }

    pub fn enable_dacs(&mut self) -> Result<S::Error> {
        self.command(MsgId::DisableDac, 0)
    }

    /// Ask how many audio files a device holds, across all folders
    pub fn query_file_count(&mut self, device: Device) -> Result<S::Error> {
        let msg_id = match device {
            Device::Usb => MsgId::UsbFileCount,
            Device::SdCard => MsgId::SdFileCount,
            Device::Flash => MsgId::FlashFileCount,
            other => return Err(AudioError::UnsupportedDevice(other)),
        };
        self.send_query(msg_id)
    }

    /// Ask for the index of the file playing on a device
    pub fn query_current_file(&mut self, device: Device) -> Result<S::Error> {
        let msg_id = match device {
            Device::Usb => MsgId::CurrentUsbFile,
            Device::SdCard => MsgId::CurrentSdFile,
            Device::Flash => MsgId::CurrentFlashFile,
            other => return Err(AudioError::UnsupportedDevice(other)),
        };
        self.send_query(msg_id)
    }

    pub fn query_folder_count(&mut self) -> Result<S::Error> {
        self.send_query(MsgId::FolderCount)
    }

    pub fn query_status(&mut self) -> Result<S::Error> {
        self.send_query(MsgId::Status)
    }

    pub fn query_volume(&mut self) -> Result<S::Error> {
        self.send_query(MsgId::Volume)
    }

    pub fn query_eq(&mut self) -> Result<S::Error> {
        self.send_query(MsgId::Eq)
    }

    pub fn query_playback_sequence(&mut self) -> Result<S::Error> {
        self.send_query(MsgId::PlaybackSequence)
    }

    /// Some modules (Catalex) never answer this; expect a timeout
    pub fn query_firmware_version(&mut self) -> Result<S::Error> {
        self.send_query(MsgId::FirmwareVersion)
    }
}
