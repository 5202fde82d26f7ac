//! Serial byte stream over `embedded-io`
//!
//! The audio link polls the stream and must never block on reads, so
//! bytes are pulled from the UART only while it reports them ready and
//! staged in a fixed-size receive buffer.

use embedded_io::{ErrorType, Read, ReadReady, Write};
use heapless::Deque;
use tunnel_hal::ByteStream;

/// Bytes moved from the UART per read call
const CHUNK_SIZE: usize = 16;

/// Non-blocking byte stream over a UART with an `N`-byte receive buffer
pub struct IoStream<U, const N: usize> {
    uart: U,
    rx: Deque<u8, N>,
    read_errors: u32,
}

impl<U: Read + ReadReady + Write, const N: usize> IoStream<U, N> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            rx: Deque::new(),
            read_errors: 0,
        }
    }

    /// Number of failed UART reads so far
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    pub fn into_inner(self) -> U {
        self.uart
    }

    /// Move ready bytes from the UART into the receive buffer
    fn fill(&mut self) {
        let mut chunk = [0u8; CHUNK_SIZE];
        while !self.rx.is_full() {
            match self.uart.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(_) => {
                    self.note_read_error();
                    break;
                }
            }

            let room = (N - self.rx.len()).min(CHUNK_SIZE);
            match self.uart.read(&mut chunk[..room]) {
                Ok(0) => break,
                Ok(n) => {
                    for &byte in &chunk[..n] {
                        // Room was checked above
                        let _ = self.rx.push_back(byte);
                    }
                }
                Err(_) => {
                    self.note_read_error();
                    break;
                }
            }
        }
    }

    fn note_read_error(&mut self) {
        self.read_errors = self.read_errors.wrapping_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!("UART read failed ({} so far)", self.read_errors);
    }
}

impl<U: Read + ReadReady + Write, const N: usize> ByteStream for IoStream<U, N> {
    type Error = <U as ErrorType>::Error;

    fn available(&mut self) -> usize {
        self.fill();
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        if self.rx.is_empty() {
            self.fill();
        }
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.uart.write_all(bytes)
    }
}
