//! Millisecond clock over the embassy time driver

use embassy_time::Instant;
use tunnel_hal::Clock;

/// Free-running `u32` millisecond counter; wraps after about 49 days
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    type Ticks = u32;

    fn now(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
