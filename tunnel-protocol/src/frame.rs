//! Frame encoding and decoding for the serial audio module protocol.
//!
//! Frame format (long form, 10 bytes):
//! - START (1 byte): 0x7E synchronization byte
//! - VERSION (1 byte): 0xFF
//! - LENGTH (1 byte): 0x06, the number of bytes from VERSION to PARAM_LO
//! - ID (1 byte): message identifier
//! - FEEDBACK (1 byte): 0x01 if the sender wants an ACK
//! - PARAM (2 bytes): big-endian 16-bit parameter
//! - CHECKSUM (2 bytes): big-endian two's complement of the sum of bytes 1..=6
//! - END (1 byte): 0xEF
//!
//! Some module firmware omits the checksum. Those frames arrive in the
//! 8-byte short form with END immediately after PARAM_LO.
//!
//! A [`Frame`] is a fixed 10-byte buffer that is reused for every message it
//! carries; nothing is allocated per message.

use crate::messages::{combine, Feedback, MsgId};

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Protocol version byte
pub const FRAME_VERSION: u8 = 0xFF;

/// Fixed value of the length field
pub const FRAME_LENGTH: u8 = 0x06;

/// Frame terminator
pub const FRAME_END: u8 = 0xEF;

/// Size of a frame with checksum
pub const LONG_FRAME_SIZE: usize = 10;

/// Size of a frame without checksum
pub const SHORT_FRAME_SIZE: usize = 8;

const TEMPLATE: [u8; LONG_FRAME_SIZE] = [
    FRAME_START,
    FRAME_VERSION,
    FRAME_LENGTH,
    0,
    Feedback::Feedback as u8,
    0,
    0,
    0,
    0,
    FRAME_END,
];

/// Two's complement of a payload sum
pub fn checksum_of(sum: u16) -> u16 {
    sum.wrapping_neg()
}

/// One protocol message, used both as send slot and receive slot
///
/// `len` doubles as the receive position while a frame is being scanned:
/// it counts how many bytes of the current frame have been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    buf: [u8; LONG_FRAME_SIZE],
    len: usize,
    complete: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create an empty frame holding the protocol template
    pub const fn new() -> Self {
        Self {
            buf: TEMPLATE,
            len: 0,
            complete: false,
        }
    }

    /// Fill in an outgoing message
    ///
    /// Only the ID, feedback and param bytes change; the framing bytes
    /// come from the template. The result is always the long form.
    pub fn set(&mut self, msg_id: MsgId, param: u16, feedback: Feedback) {
        self.buf[3] = msg_id.to_byte();
        self.buf[4] = feedback as u8;
        self.buf[5..7].copy_from_slice(&param.to_be_bytes());
        let checksum = checksum_of(self.sum());
        self.buf[7..9].copy_from_slice(&checksum.to_be_bytes());
        self.len = LONG_FRAME_SIZE;
        self.complete = true;
    }

    /// Feed one received byte to the scanner
    ///
    /// Returns true if `byte` completes a frame. A completed frame is not
    /// validated here; call [`Frame::is_valid`] before acting on it.
    pub fn receive(&mut self, byte: u8) -> bool {
        if self.complete {
            // The previous frame was handed out; this byte starts a new one.
            self.complete = false;
            self.len = 0;
        }

        match self.len {
            0 | 1 | 2 | 9 => self.match_template(byte),
            7 if byte == FRAME_END => {
                // No checksum: the message ends here.
                self.buf[7] = byte;
                self.len = SHORT_FRAME_SIZE;
                self.complete = true;
                true
            }
            3..=8 => {
                self.buf[self.len] = byte;
                self.len += 1;
                false
            }
            _ => {
                self.len = 0;
                self.match_template(byte)
            }
        }
    }

    /// Fixed positions must match the template, otherwise try to resync
    fn match_template(&mut self, byte: u8) -> bool {
        if byte == TEMPLATE[self.len] {
            self.len += 1;
            if self.len == LONG_FRAME_SIZE {
                self.complete = true;
            }
            return self.complete;
        }
        self.len = if byte == FRAME_START { 1 } else { 0 };
        false
    }

    /// Check the frame's integrity
    ///
    /// A short-form frame is valid by construction. A long-form frame is
    /// valid iff its checksum cancels the payload sum.
    pub fn is_valid(&self) -> bool {
        match self.len {
            SHORT_FRAME_SIZE => self.buf[7] == FRAME_END,
            LONG_FRAME_SIZE => self.sum().wrapping_add(self.checksum()) == 0,
            _ => false,
        }
    }

    /// Returns true once a whole frame has been set or received
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns true if the frame arrived without a checksum
    pub fn is_short_form(&self) -> bool {
        self.complete && self.len == SHORT_FRAME_SIZE
    }

    /// Encoded bytes (or the bytes received so far)
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Number of encoded or received bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no byte has been set or received
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw message ID byte
    pub fn msg_id(&self) -> u8 {
        self.buf[3]
    }

    /// Message ID, if it is in the catalog
    pub fn message_id(&self) -> Option<MsgId> {
        MsgId::from_byte(self.buf[3])
    }

    /// Feedback flag
    pub fn feedback(&self) -> bool {
        self.buf[4] == Feedback::Feedback as u8
    }

    pub fn param_hi(&self) -> u8 {
        self.buf[5]
    }

    pub fn param_lo(&self) -> u8 {
        self.buf[6]
    }

    /// 16-bit parameter
    pub fn param(&self) -> u16 {
        combine(self.buf[5], self.buf[6])
    }

    /// Stored checksum (meaningless for the short form)
    pub fn checksum(&self) -> u16 {
        combine(self.buf[7], self.buf[8])
    }

    /// Sum of VERSION through PARAM_LO
    fn sum(&self) -> u16 {
        self.buf[1..=FRAME_LENGTH as usize]
            .iter()
            .fold(0u16, |sum, &b| sum.wrapping_add(b as u16))
    }
}
