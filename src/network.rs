//! Fixed three-layer policy network.
//!
//! Topology: 8 inputs -> 50 (tanh) -> 70 (tanh) -> 11 outputs, then softmax.
//! Weight matrices are stored as `[output_neurons][input_neurons]` so each
//! output row is a contiguous dot product.

use crate::activation::tanh_approx;
use crate::affine::affine;
use crate::fixed::FixedPoint;
use crate::softmax::softmax;

pub const INPUT_SIZE: usize = 8;
pub const HIDDEN_1_SIZE: usize = 50;
pub const HIDDEN_2_SIZE: usize = 70;
pub const OUTPUT_SIZE: usize = 11;

/// Trained weights and biases. Read-only once built; share it freely.
///
/// A `None` bias means the layer has no bias term at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParams<T> {
    pub w1: [[T; INPUT_SIZE]; HIDDEN_1_SIZE],
    pub b1: Option<[T; HIDDEN_1_SIZE]>,
    pub w2: [[T; HIDDEN_1_SIZE]; HIDDEN_2_SIZE],
    pub b2: Option<[T; HIDDEN_2_SIZE]>,
    pub w3: [[T; HIDDEN_2_SIZE]; OUTPUT_SIZE],
    pub b3: Option<[T; OUTPUT_SIZE]>,
}

impl<T: FixedPoint> ModelParams<T> {
    /// All-zero weights, no biases.
    pub fn zeroed() -> Self {
        Self {
            w1: [[T::ZERO; INPUT_SIZE]; HIDDEN_1_SIZE],
            b1: None,
            w2: [[T::ZERO; HIDDEN_1_SIZE]; HIDDEN_2_SIZE],
            b2: None,
            w3: [[T::ZERO; HIDDEN_2_SIZE]; OUTPUT_SIZE],
            b3: None,
        }
    }
}

/// Scratch buffers for one in-flight forward pass.
///
/// Every call overwrites all of them. Give each concurrent caller its own
/// workspace; the parameters can stay shared.
#[derive(Debug, Clone)]
pub struct Workspace<T> {
    hidden_1: [T; HIDDEN_1_SIZE],
    hidden_2: [T; HIDDEN_2_SIZE],
    logits: [T; OUTPUT_SIZE],
    probabilities: [T; OUTPUT_SIZE],
}

impl<T: FixedPoint> Workspace<T> {
    pub fn new() -> Self {
        Self {
            hidden_1: [T::ZERO; HIDDEN_1_SIZE],
            hidden_2: [T::ZERO; HIDDEN_2_SIZE],
            logits: [T::ZERO; OUTPUT_SIZE],
            probabilities: [T::ZERO; OUTPUT_SIZE],
        }
    }

    /// Output layer before normalization.
    pub fn logits(&self) -> &[T; OUTPUT_SIZE] {
        &self.logits
    }

    /// Softmax of [`Workspace::logits`].
    pub fn probabilities(&self) -> &[T; OUTPUT_SIZE] {
        &self.probabilities
    }

    pub fn hidden_1(&self) -> &[T; HIDDEN_1_SIZE] {
        &self.hidden_1
    }

    pub fn hidden_2(&self) -> &[T; HIDDEN_2_SIZE] {
        &self.hidden_2
    }
}

impl<T: FixedPoint> Default for Workspace<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward pass over a borrowed parameter set.
#[derive(Debug, Clone, Copy)]
pub struct Network<'a, T> {
    params: &'a ModelParams<T>,
}

impl<'a, T: FixedPoint> Network<'a, T> {
    pub const fn new(params: &'a ModelParams<T>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &'a ModelParams<T> {
        self.params
    }

    /// Run all three layers and the softmax.
    ///
    /// On return the workspace holds both the raw logits and their
    /// probabilities; the returned slice is the probabilities.
    pub fn forward<'w>(
        &self,
        input: &[T; INPUT_SIZE],
        ws: &'w mut Workspace<T>,
    ) -> &'w [T; OUTPUT_SIZE] {
        let p = self.params;

        // Layer 1: IN -> H1 with tanh
        affine(&p.w1, input, p.b1.as_ref(), &mut ws.hidden_1);
        tanh_approx(&mut ws.hidden_1);

        // Layer 2: H1 -> H2 with tanh
        affine(&p.w2, &ws.hidden_1, p.b2.as_ref(), &mut ws.hidden_2);
        tanh_approx(&mut ws.hidden_2);

        // Output layer: H2 -> OUT, no activation
        affine(&p.w3, &ws.hidden_2, p.b3.as_ref(), &mut ws.logits);
        softmax(&ws.logits, &mut ws.probabilities);

        log::trace!("forward: logits={:?}", ws.logits);
        &ws.probabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Q16, Q32};

    #[test]
    fn test_zero_model_is_uniform() {
        let params = ModelParams::<Q32>::zeroed();
        let mut ws = Workspace::new();
        let input = [Q32::from_integer(1); INPUT_SIZE];

        let probs = Network::new(&params).forward(&input, &mut ws);

        // 2^32 / 11, floored
        assert!(probs.iter().all(|&p| p == Q32::from_ratio(1, 11)));
        assert!(ws.logits().iter().all(|&l| l == Q32::ZERO));
    }

    #[test]
    fn test_output_bias_only() {
        let mut params = ModelParams::<Q16>::zeroed();
        let mut b3 = [Q16::ZERO; OUTPUT_SIZE];
        b3[7] = Q16::from_integer(2);
        params.b3 = Some(b3);
        let mut ws = Workspace::new();

        let probs = *Network::new(&params).forward(&[Q16::ZERO; INPUT_SIZE], &mut ws);

        assert_eq!(ws.logits()[7], Q16::from_integer(2));
        let best = probs.iter().max().copied().unwrap_or(Q16::ZERO);
        assert_eq!(best, probs[7]);
    }

    #[test]
    fn test_hidden_layers_bounded() {
        let mut params = ModelParams::<Q32>::zeroed();
        for row in params.w1.iter_mut() {
            row.fill(Q32::from_integer(100));
        }
        params.b2 = Some([Q32::from_integer(-100); HIDDEN_2_SIZE]);
        let mut ws = Workspace::new();

        Network::new(&params).forward(&[Q32::ONE; INPUT_SIZE], &mut ws);

        assert!(ws.hidden_1().iter().all(|&h| h == Q32::ONE));
        assert!(ws.hidden_2().iter().all(|&h| h == -Q32::ONE));
    }

    #[test]
    fn test_workspace_overwritten_between_calls() {
        let mut params = ModelParams::<Q32>::zeroed();
        params.w1[0][0] = Q32::ONE;
        params.w2[0][0] = Q32::ONE;
        params.w3[3][0] = Q32::from_integer(4);
        let network = Network::new(&params);
        let mut ws = Workspace::new();

        network.forward(&[Q32::ONE; INPUT_SIZE], &mut ws);
        let first = *ws.logits();
        network.forward(&[Q32::ZERO; INPUT_SIZE], &mut ws);

        assert!(first[3] > Q32::ZERO);
        assert_eq!(ws.logits()[3], Q32::ZERO);
    }
}
