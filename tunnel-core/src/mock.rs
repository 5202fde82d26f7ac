//! Test doubles for the collaborator traits

use core::cell::Cell;

use heapless::{Deque, Vec};
use tunnel_hal::{ByteStream, Clock, InputPin, Ticks};

/// Clock that only moves when told to
pub struct ManualClock<T: Ticks> {
    now: Cell<T>,
}

impl<T: Ticks> ManualClock<T> {
    pub fn new(start: T) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, ticks: T) {
        self.now.set(self.now.get().wrapping_add(ticks));
    }
}

impl<T: Ticks> Clock for ManualClock<T> {
    type Ticks = T;

    fn now(&self) -> T {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteFailed;

/// In-memory half-duplex stream
#[derive(Default)]
pub struct MockStream {
    rx: Deque<u8, 128>,
    tx: Vec<u8, 256>,
    pub fail_writes: bool,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the module had sent them
    pub fn inject(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.rx.push_back(b).unwrap();
        }
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// The last `n` bytes written
    pub fn last_written(&self, n: usize) -> &[u8] {
        &self.tx[self.tx.len() - n..]
    }

    pub fn clear_written(&mut self) {
        self.tx.clear();
    }
}

impl ByteStream for MockStream {
    type Error = WriteFailed;

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), WriteFailed> {
        if self.fail_writes {
            return Err(WriteFailed);
        }
        self.tx.extend_from_slice(bytes).map_err(|_| WriteFailed)
    }
}

/// Input pin with a settable level
pub struct MockPin {
    pub high: bool,
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> bool {
        self.high
    }
}
