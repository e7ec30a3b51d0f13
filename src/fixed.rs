//! Fixed-point number formats.
//!
//! A value is a signed integer with an implicit binary point `FRAC_BITS`
//! places from the right. Every operation widens into `i128`, which is at
//! least double width for both supported containers, and saturates back
//! into the container. Nothing in this module wraps.
//!
//! Two formats are provided:
//! - [`Q16`]: 16 fractional bits in an `i32` (the compact embedded variant)
//! - [`Q32`]: 32 fractional bits in an `i64` (the production format, aliased as [`Fixed`])

use core::fmt;
use core::ops::{Add, Neg, Sub};

/// Nanoseconds per second, the denominator of every duration conversion.
pub const NS_PER_SEC: u64 = 1_000_000_000;

/// A saturating fixed-point format.
///
/// Implementors only supply the container bounds and the raw bit
/// conversions; the arithmetic is shared by every precision.
pub trait FixedPoint:
    Copy + Ord + Default + fmt::Debug + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self>
{
    /// Position of the implicit binary point.
    const FRAC_BITS: u32;
    /// Smallest raw value the container holds.
    const MIN_BITS: i64;
    /// Largest raw value the container holds.
    const MAX_BITS: i64;

    const ZERO: Self;
    const ONE: Self;
    const MIN: Self;
    const MAX: Self;

    /// Build a value from raw bits, clamping to the container range.
    fn from_bits(bits: i64) -> Self;

    /// Raw bits, sign-extended to `i64`.
    fn to_bits(self) -> i64;

    /// Raw bits in the wide accumulator domain.
    #[inline]
    fn to_wide(self) -> i128 {
        self.to_bits() as i128
    }

    /// Clamp a wide intermediate into the container.
    #[inline]
    fn saturating_narrow(wide: i128) -> Self {
        let clamped = wide.clamp(Self::MIN_BITS as i128, Self::MAX_BITS as i128);
        Self::from_bits(clamped as i64)
    }

    /// Product rounded to nearest, ties away from zero, saturated.
    ///
    /// Rounding is applied to the magnitude so negative products round the
    /// same way as positive ones.
    #[inline]
    fn saturating_mul(self, rhs: Self) -> Self {
        let product = self.to_wide() * rhs.to_wide();
        let half = 1u128 << (Self::FRAC_BITS - 1);
        let magnitude = ((product.unsigned_abs() + half) >> Self::FRAC_BITS) as i128;
        Self::saturating_narrow(if product < 0 { -magnitude } else { magnitude })
    }

    /// `floor(|numerator| * 2^F / |denominator|)` with the quotient's sign restored.
    ///
    /// A zero denominator saturates to the extreme matching the numerator's
    /// sign; `0 / 0` yields [`FixedPoint::MAX`].
    #[inline]
    fn from_ratio(numerator: i64, denominator: i64) -> Self {
        let negative = (numerator < 0) != (denominator < 0);
        ratio_from_magnitudes(numerator.unsigned_abs(), denominator.unsigned_abs(), negative)
    }

    /// Nanoseconds to seconds.
    #[inline]
    fn from_duration(nanoseconds: u64) -> Self {
        ratio_from_magnitudes(nanoseconds, NS_PER_SEC, false)
    }

    /// Integer to fixed point, saturating when it does not fit.
    #[inline]
    fn from_integer(value: i64) -> Self {
        Self::saturating_narrow((value as i128) << Self::FRAC_BITS)
    }
}

#[inline]
fn ratio_from_magnitudes<T: FixedPoint>(numerator: u64, denominator: u64, negative: bool) -> T {
    if denominator == 0 {
        return if negative { T::MIN } else { T::MAX };
    }
    // numerator < 2^64 and FRAC_BITS <= 32, so the shift stays below 2^96.
    let quotient = (((numerator as u128) << T::FRAC_BITS) / denominator as u128) as i128;
    T::saturating_narrow(if negative { -quotient } else { quotient })
}

/// Decimal rendering without floating point: six fractional digits, truncated.
fn write_fixed(f: &mut fmt::Formatter<'_>, bits: i64, frac_bits: u32) -> fmt::Result {
    let magnitude = bits.unsigned_abs() as u128;
    let mask = (1u128 << frac_bits) - 1;
    let integer = magnitude >> frac_bits;
    let micros = ((magnitude & mask) * 1_000_000) >> frac_bits;
    let sign = if bits < 0 { "-" } else { "" };
    write!(f, "{}{}.{:06}", sign, integer, micros)
}

macro_rules! fixed_format {
    ($(#[$meta:meta])* $name:ident, $raw:ty, $frac:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name($raw);

        impl $name {
            /// Wrap raw container bits without conversion.
            #[inline]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// The raw container bits.
            #[inline]
            pub const fn raw(self) -> $raw {
                self.0
            }
        }

        impl FixedPoint for $name {
            const FRAC_BITS: u32 = $frac;
            const MIN_BITS: i64 = <$raw>::MIN as i64;
            const MAX_BITS: i64 = <$raw>::MAX as i64;

            const ZERO: Self = Self(0);
            const ONE: Self = Self(1 << $frac);
            const MIN: Self = Self(<$raw>::MIN);
            const MAX: Self = Self(<$raw>::MAX);

            #[inline]
            fn from_bits(bits: i64) -> Self {
                Self(bits.clamp(Self::MIN_BITS, Self::MAX_BITS) as $raw)
            }

            #[inline]
            fn to_bits(self) -> i64 {
                self.0 as i64
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self(self.0.saturating_add(rhs.0))
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0.saturating_sub(rhs.0))
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self(self.0.saturating_neg())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_fixed(f, self.to_bits(), Self::FRAC_BITS)
            }
        }
    };
}

fixed_format!(
    /// 16.16 fixed point in an `i32`.
    Q16,
    i32,
    16
);

fixed_format!(
    /// 32.32 fixed point in an `i64`.
    Q32,
    i64,
    32
);

/// Production precision.
pub type Fixed = Q32;
