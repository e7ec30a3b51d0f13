//! Numerically stable softmax.

use crate::activation::exp_approx;
use crate::fixed::FixedPoint;

/// Normalize `logits` into `probs`.
///
/// The maximum is subtracted first so every exponent is <= 0. The
/// exponentials are written into `probs`, summed in an unsigned wide
/// accumulator, then replaced by `floor(e * 2^F / sum)`. A zero sum leaves
/// `probs` all zero. `probs` must be the same length as `logits`; an empty
/// input is a no-op.
pub fn softmax<T: FixedPoint>(logits: &[T], probs: &mut [T]) {
    debug_assert_eq!(logits.len(), probs.len());

    let Some(&max) = logits.iter().max() else {
        return;
    };

    let mut sum: u128 = 0;
    for (prob, &logit) in probs.iter_mut().zip(logits) {
        let shifted = T::saturating_narrow(logit.to_wide() - max.to_wide());
        let e = exp_approx(shifted);
        sum += e.to_bits().max(0) as u128;
        *prob = e;
    }

    if sum == 0 {
        probs.fill(T::ZERO);
        return;
    }

    for prob in probs.iter_mut() {
        let e = prob.to_bits().max(0) as u128;
        let scaled = (e << T::FRAC_BITS) / sum;
        *prob = T::saturating_narrow(scaled as i128);
    }
}
