//! GPIO pin abstractions
//!
//! Only digital inputs are needed by the audio layer: the module's busy
//! line is read to tell whether a track is still playing.

/// Digital input pin
///
/// Reads take `&mut self` so adapters over `embedded-hal` pins (whose
/// reads are fallible and mutable) can implement this directly.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

impl<P: InputPin + ?Sized> InputPin for &mut P {
    fn is_high(&mut self) -> bool {
        (**self).is_high()
    }
}
