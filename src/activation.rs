//! Bounded activation approximations.
//!
//! Both functions are branch-bounded and use only fixed-point arithmetic,
//! so their cost does not depend on the input value.

use crate::fixed::FixedPoint;

/// Inputs beyond ±4.0 short-circuit to ±1.0.
const TANH_CLAMP: i64 = 4;

/// Lower edge of the exponential's domain.
const EXP_FLOOR: i64 = -8;

/// The series runs on `x / 2^3` and the result is squared back up three times.
const EXP_REDUCTION_SHIFT: u32 = 3;

/// Maclaurin denominators of `e^r`, highest order first, for Horner evaluation.
const EXP_SERIES: [i128; 6] = [120, 24, 6, 2, 1, 1];

/// Fractional bits the exponential is evaluated at before narrowing.
/// Intermediates stay within 2^62, so every product fits in `i128`.
const EXP_WORK_BITS: u32 = 62;

/// In-place tanh over a slice.
///
/// Uses the rational approximation `x(27 + x²) / (27 + 9x²)`, which is odd,
/// monotone, and reaches exactly 1.0 at |x| = 3. The result is clamped to
/// [-1.0, 1.0] so the stretch between 3 and the ±4 cut-off stays flat.
pub fn tanh_approx<T: FixedPoint>(values: &mut [T]) {
    let limit = T::from_integer(TANH_CLAMP);
    for value in values.iter_mut() {
        *value = if *value > limit {
            T::ONE
        } else if *value < -limit {
            -T::ONE
        } else {
            tanh_rational(*value)
        };
    }
}

#[inline]
fn tanh_rational<T: FixedPoint>(x: T) -> T {
    // Evaluated at 2F/3F fractional bits: rounding x² back to F bits first
    // makes neighbouring inputs come out in the wrong order.
    let one_sq = T::ONE.to_wide() * T::ONE.to_wide();
    let x = x.to_wide();
    let x2 = x * x;
    // |x| <= 4, so the numerator stays below 2^105 for 32 fractional bits.
    let numerator = x * (27 * one_sq + x2);
    let denominator = 27 * one_sq + 9 * x2;
    T::saturating_narrow(numerator / denominator).clamp(-T::ONE, T::ONE)
}

/// `e^x` for `x` in [-8.0, 0.0]; inputs outside are clamped to that range.
///
/// A six-term Maclaurin series on `x / 8`, then three squarings. The
/// reduced argument stays in [-1, 0], where the truncated series is positive
/// and increasing, so the result is never negative and `exp_approx(0) == 1`.
///
/// Everything runs at 62 fractional bits and is rounded to `FRAC_BITS` once
/// at the end. Rounding each step at `FRAC_BITS` lets the squarings amplify
/// the error until neighbouring inputs come out in the wrong order.
pub fn exp_approx<T: FixedPoint>(x: T) -> T {
    let x = x.clamp(T::from_integer(EXP_FLOOR), T::ZERO);
    let one = 1i128 << EXP_WORK_BITS;
    // x / 8 at working precision, exact: the shift only appends zero bits
    let reduced = x.to_wide() << (EXP_WORK_BITS - EXP_REDUCTION_SHIFT - T::FRAC_BITS);

    let mut y = one / EXP_SERIES[0];
    for &denominator in &EXP_SERIES[1..] {
        y = ((y * reduced) >> EXP_WORK_BITS) + one / denominator;
    }
    for _ in 0..EXP_REDUCTION_SHIFT {
        y = (y * y) >> EXP_WORK_BITS;
    }

    let shift = EXP_WORK_BITS - T::FRAC_BITS;
    T::saturating_narrow((y + (1 << (shift - 1))) >> shift)
}
