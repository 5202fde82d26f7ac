//! Sound effects for the laser tunnel
//!
//! The SD card holds the effects as files 1, 2 and 3. Any number of extra
//! files may follow, as long as the effects keep these indices.
//!
//! The module's busy line is low while it plays. The startle effect is
//! also treated as busy from the moment it is requested, since the busy
//! line lags the command.

use tunnel_hal::{ByteStream, Clock, InputPin};
use tunnel_protocol::{AudioEvent, Device, Feedback};

use crate::audio::{AudioError, AudioModule};

/// Effect file indices on the SD card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Track {
    Startle = 1,
    Ambient = 2,
    Emergency = 3,
}

impl Track {
    pub fn file_index(self) -> u16 {
        self as u16
    }

    pub fn from_file_index(index: u16) -> Option<Self> {
        match index {
            1 => Some(Track::Startle),
            2 => Some(Track::Ambient),
            3 => Some(Track::Emergency),
            _ => None,
        }
    }
}

/// Tracks which effects are available and which one is playing
pub struct SoundFx<P: InputPin> {
    busy: P,
    file_count: u16,
    file_playing: u16,
}

impl<P: InputPin> SoundFx<P> {
    pub fn new(busy: P) -> Self {
        Self {
            busy,
            file_count: 0,
            file_playing: 0,
        }
    }

    /// Reset the module; the SD card file count follows from the
    /// init-complete notification
    pub fn begin<S: ByteStream, C: Clock>(
        &mut self,
        audio: &mut AudioModule<S, C>,
    ) -> Result<(), AudioError<S::Error>> {
        self.clear();
        audio.reset()
    }

    /// Returns true if the SD card has the effect's file
    pub fn has(&self, track: Track) -> bool {
        self.file_count >= track.file_index()
    }

    pub fn is_busy(&mut self) -> bool {
        self.file_playing == Track::Startle.file_index() || self.busy.is_low()
    }

    /// Play an effect, or stop playback for `None` or a missing effect
    pub fn play<S: ByteStream, C: Clock>(
        &mut self,
        track: Option<Track>,
        audio: &mut AudioModule<S, C>,
    ) -> Result<(), AudioError<S::Error>> {
        match track.filter(|track| self.has(*track)) {
            Some(track) => {
                audio.play_file_with(track.file_index(), Feedback::NoFeedback)?;
                self.file_playing = track.file_index();
            }
            None => {
                let busy = self.is_busy();
                self.file_playing = 0;
                if busy {
                    audio.stop()?;
                }
            }
        }
        Ok(())
    }

    pub fn stop<S: ByteStream, C: Clock>(
        &mut self,
        audio: &mut AudioModule<S, C>,
    ) -> Result<(), AudioError<S::Error>> {
        self.play(None, audio)
    }

    /// React to a classified event from the module
    pub fn handle<S: ByteStream, C: Clock>(
        &mut self,
        event: &AudioEvent,
        audio: &mut AudioModule<S, C>,
    ) -> Result<(), AudioError<S::Error>> {
        match *event {
            AudioEvent::DeviceInserted(Device::SdCard) => {
                self.clear();
                audio.query_file_count(Device::SdCard)?;
            }
            AudioEvent::DeviceRemoved(Device::SdCard) => self.clear(),
            AudioEvent::DeviceFileCount {
                device: Device::SdCard,
                count,
            } => self.file_count = count,
            // Init-complete also follows a source selection, so never
            // answer it with one.
            AudioEvent::InitComplete(devices) if devices.contains(Device::SdCard) => {
                audio.query_file_count(Device::SdCard)?;
            }
            AudioEvent::FinishedFile { device, file_index } => {
                if device == Device::SdCard && file_index == self.file_playing {
                    self.file_playing = 0;
                }
                // Module-side looping is unreliable with short clips
                if file_index == Track::Ambient.file_index() {
                    self.play(Some(Track::Ambient), audio)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Number of files on the SD card, zero if unknown
    pub fn file_count(&self) -> u16 {
        self.file_count
    }

    /// The effect last started and not yet finished
    pub fn playing(&self) -> Option<Track> {
        Track::from_file_index(self.file_playing)
    }

    fn clear(&mut self) {
        self.file_count = 0;
        self.file_playing = 0;
    }
}
