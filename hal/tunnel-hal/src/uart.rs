//! Serial byte-stream abstraction
//!
//! The audio module talks over a half-duplex UART. The protocol layer only
//! needs to know how many bytes are already buffered, pull them one at a
//! time, and push a complete frame out. Ordering between the receive
//! interrupt (producer) and the polling consumer is the implementor's job.

/// Byte-stream collaborator
///
/// The stream is ordered but may drop or corrupt bytes; the frame decoder
/// resynchronizes on its own.
pub trait ByteStream {
    /// Error type for write operations
    type Error;

    /// Number of received bytes that can be read without waiting
    fn available(&mut self) -> usize;

    /// Read one buffered byte
    ///
    /// Returns `None` if nothing is buffered.
    fn read(&mut self) -> Option<u8>;

    /// Write all of `bytes` to the stream
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    type Error = S::Error;

    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }
}
