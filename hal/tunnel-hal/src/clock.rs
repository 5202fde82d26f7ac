//! Free-running clock abstractions
//!
//! A clock is an unsigned counter that ticks up and wraps silently. The
//! tick unit and width are a board choice (milliseconds in a `u32` is the
//! usual pairing; a microsecond counter is the fine-grained alternative).

use core::fmt::Debug;

/// Unsigned fixed-width tick representation
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. The methods are the small
/// set of modular operations a wraparound-tolerant timer needs.
pub trait Ticks: Copy + Eq + Ord + Debug {
    /// The zero tick
    const ZERO: Self;
    /// One tick
    const ONE: Self;
    /// Only the most significant bit set
    const MSB: Self;

    /// Modular addition
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Returns true if the most significant bits of `self` and `other` differ
    fn msb_differs(self, other: Self) -> bool;

    /// Returns true if `delta` ticks is strictly less than half of this
    /// type's range
    fn is_valid_delta(delta: u32) -> bool;

    /// Convert a tick count, clamping to this type's maximum
    fn saturating_from_u32(value: u32) -> Self;
}

macro_rules! impl_ticks {
    ($($t:ty),*) => {
        $(
            impl Ticks for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MSB: Self = 1 << (<$t>::BITS - 1);

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }

                #[inline]
                fn msb_differs(self, other: Self) -> bool {
                    (self ^ other) & Self::MSB != 0
                }

                #[inline]
                fn is_valid_delta(delta: u32) -> bool {
                    (delta as u64) < (Self::MSB as u64)
                }

                #[inline]
                fn saturating_from_u32(value: u32) -> Self {
                    <$t>::try_from(value).unwrap_or(<$t>::MAX)
                }
            }
        )*
    };
}

impl_ticks!(u8, u16, u32, u64);

/// Free-running clock
pub trait Clock {
    /// Tick representation
    type Ticks: Ticks;

    /// Current tick count
    fn now(&self) -> Self::Ticks;
}

impl<C: Clock + ?Sized> Clock for &C {
    type Ticks = C::Ticks;

    fn now(&self) -> Self::Ticks {
        (**self).now()
    }
}
