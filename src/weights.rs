//! Compiled-in model parameters.
//!
//! Placeholder tables. Replace them with the Q32.32 values from
//! `policy_weights.json` (see [`crate::model_io`] for the layout) after
//! training. Each weight matrix is stored as `[output_neurons][input_neurons]`
//! for row-wise iteration during inference. With all-zero weights every
//! decision lands on output 0.

use crate::fixed::{FixedPoint, Q32};
use crate::network::{ModelParams, HIDDEN_1_SIZE, HIDDEN_2_SIZE, INPUT_SIZE, OUTPUT_SIZE};

pub static MODEL: ModelParams<Q32> = ModelParams {
    w1: [[Q32::ZERO; INPUT_SIZE]; HIDDEN_1_SIZE],
    b1: None,
    w2: [[Q32::ZERO; HIDDEN_1_SIZE]; HIDDEN_2_SIZE],
    b2: None,
    w3: [[Q32::ZERO; HIDDEN_2_SIZE]; OUTPUT_SIZE],
    b3: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_matches_zeroed() {
        assert_eq!(MODEL, ModelParams::zeroed());
    }
}
