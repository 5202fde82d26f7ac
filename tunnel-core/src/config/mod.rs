//! Audio link configuration
//!
//! Timing and limits for talking to the audio module. Configuration is
//! stored in flash as postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tunnel_hal::Ticks;

/// Serial speed of the YX5200/YX5300 family
pub const DEFAULT_BAUDRATE: u32 = 9600;

/// Request window for ordinary commands and queries (ticks)
pub const DEFAULT_REQUEST_TIMEOUT: u32 = 200;

/// Request window after a reset, which takes a while (ticks)
pub const DEFAULT_RESET_TIMEOUT: u32 = 10_000;

/// DFPlayer Mini clamps at 30; Catalex accepts 31 but does not clamp
pub const DEFAULT_MAX_VOLUME: u8 = 30;

/// Highest volume any supported module understands
pub const MAX_SUPPORTED_VOLUME: u8 = 31;

/// Upper bound on the serialized size of [`AudioConfig`]
pub const MAX_CONFIG_SIZE: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A request window of zero ticks would time out immediately
    ZeroTimeout,
    /// A request window is not below half of the clock's range
    TimeoutTooLong,
    /// Maximum volume above what the module understands
    VolumeOutOfRange,
    /// Failed to serialize configuration
    Serialize,
    /// Failed to deserialize configuration
    Deserialize,
}

/// Audio link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioConfig {
    /// UART baud rate
    pub baudrate: u32,
    /// Ticks to wait for a reply to a command or query
    pub request_timeout_ticks: u32,
    /// Ticks to wait for a reply after a reset
    pub reset_timeout_ticks: u32,
    /// Volume ceiling applied by `set_volume`
    pub max_volume: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            baudrate: DEFAULT_BAUDRATE,
            request_timeout_ticks: DEFAULT_REQUEST_TIMEOUT,
            reset_timeout_ticks: DEFAULT_RESET_TIMEOUT,
            max_volume: DEFAULT_MAX_VOLUME,
        }
    }
}

impl AudioConfig {
    /// Check clock-independent constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ticks == 0 || self.reset_timeout_ticks == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_volume > MAX_SUPPORTED_VOLUME {
            return Err(ConfigError::VolumeOutOfRange);
        }
        Ok(())
    }

    /// Check constraints, including that both windows fit a clock of tick type `T`
    pub fn validate_for<T: Ticks>(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if !T::is_valid_delta(self.request_timeout_ticks) || !T::is_valid_delta(self.reset_timeout_ticks) {
            return Err(ConfigError::TimeoutTooLong);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AudioConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.request_timeout_ticks, 200);
        assert_eq!(config.reset_timeout_ticks, 10_000);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.validate_for::<u16>(), Ok(()));
        assert_eq!(config.validate_for::<u32>(), Ok(()));
    }

    #[test]
    fn test_windows_must_fit_clock() {
        let config = AudioConfig::default();
        // 200 ticks is more than half of a u8 clock
        assert_eq!(config.validate_for::<u8>(), Err(ConfigError::TimeoutTooLong));

        let config = AudioConfig {
            reset_timeout_ticks: 40_000,
            ..AudioConfig::default()
        };
        assert_eq!(config.validate_for::<u16>(), Err(ConfigError::TimeoutTooLong));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AudioConfig {
            request_timeout_ticks: 0,
            ..AudioConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_volume_limit() {
        let config = AudioConfig {
            max_volume: 32,
            ..AudioConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::VolumeOutOfRange));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_persistence() {
        let config = AudioConfig {
            max_volume: 24,
            request_timeout_ticks: 350,
            ..AudioConfig::default()
        };
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let bytes = config.to_bytes(&mut buf).unwrap();
        assert!(bytes.len() <= MAX_CONFIG_SIZE);

        let loaded = AudioConfig::from_bytes(bytes).unwrap();
        assert_eq!(loaded, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_truncated_bytes_rejected() {
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let len = AudioConfig::default().to_bytes(&mut buf).unwrap().len();
        assert_eq!(
            AudioConfig::from_bytes(&buf[..len - 1]),
            Err(ConfigError::Deserialize)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialized_into_fixed_buffer() {
        // Widest varints for every field
        let config = AudioConfig {
            baudrate: u32::MAX,
            request_timeout_ticks: u32::MAX,
            reset_timeout_ticks: u32::MAX,
            max_volume: u8::MAX,
        };
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        assert!(config.to_bytes(&mut buf).unwrap().len() <= MAX_CONFIG_SIZE);

        let mut small = [0u8; 4];
        assert_eq!(
            config.to_bytes(&mut small).map(|bytes| bytes.len()),
            Err(ConfigError::Serialize)
        );
    }
}
