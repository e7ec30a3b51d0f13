//! Affine transform: `y = W·x + b` over fixed-point rows.

use crate::fixed::FixedPoint;

/// Multiply a row-major weight matrix by `input` and add an optional bias.
///
/// Each row is summed in the wide domain: every term is a rounded
/// fixed-point product, and saturation into the container happens once per
/// row, after the bias. A `None` bias skips the add entirely.
pub fn affine<T: FixedPoint, const ROWS: usize, const COLS: usize>(
    weights: &[[T; COLS]; ROWS],
    input: &[T; COLS],
    bias: Option<&[T; ROWS]>,
    output: &mut [T; ROWS],
) {
    for (i, (row, out)) in weights.iter().zip(output.iter_mut()).enumerate() {
        let mut acc = row
            .iter()
            .zip(input)
            .fold(0i128, |acc, (&w, &x)| acc.saturating_add(w.saturating_mul(x).to_wide()));
        if let Some(bias) = bias {
            acc = acc.saturating_add(bias[i].to_wide());
        }
        *out = T::saturating_narrow(acc);
    }
}
