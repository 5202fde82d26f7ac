//! Busy line input
//!
//! The audio module pulls its BUSY pin low while it plays.

use embedded_hal::digital::InputPin as HalInputPin;
use tunnel_hal::InputPin;

/// Busy line on an `embedded-hal` digital input
pub struct BusyPin<P> {
    pin: P,
}

impl<P: HalInputPin> BusyPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: HalInputPin> InputPin for BusyPin<P> {
    /// A pin read error reads as high (idle), so a faulty line never
    /// blocks playback.
    fn is_high(&mut self) -> bool {
        self.pin.is_high().unwrap_or(true)
    }
}
