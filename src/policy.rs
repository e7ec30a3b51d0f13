/// Time-quantum policy: statistics in, scheduling decision out.
///
/// The network's output index selects an entry from an externally supplied
/// decision table (normally time-quantum lengths). No floating point is
/// involved anywhere, so the decision is fast, bounded, and identical on
/// every target.
use crate::features::{encode_features, SchedStats};
use crate::fixed::FixedPoint;
use crate::network::{ModelParams, Network, Workspace, OUTPUT_SIZE};

/// Quantum lengths, 1 ms to 11 ms, used when no table is configured.
pub const DEFAULT_QUANTA_NS: [u64; OUTPUT_SIZE] = [
    1_000_000, 2_000_000, 3_000_000, 4_000_000, 5_000_000, 6_000_000, 7_000_000, 8_000_000,
    9_000_000, 10_000_000, 11_000_000,
];

/// Index of the largest value. Ties go to the lowest index; empty input gives 0.
pub fn argmax<T: Ord>(values: &[T]) -> usize {
    let mut best_idx = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best_idx] {
            best_idx = i;
        }
    }
    best_idx
}

/// A network plus the table its outputs index into.
#[derive(Debug, Clone)]
pub struct QuantumPolicy<'a, T, D> {
    network: Network<'a, T>,
    table: [D; OUTPUT_SIZE],
}

impl<'a, T: FixedPoint, D: Copy> QuantumPolicy<'a, T, D> {
    pub const fn new(params: &'a ModelParams<T>, table: [D; OUTPUT_SIZE]) -> Self {
        Self { network: Network::new(params), table }
    }

    pub fn network(&self) -> &Network<'a, T> {
        &self.network
    }

    pub fn table(&self) -> &[D; OUTPUT_SIZE] {
        &self.table
    }

    /// Run the network and return the arg-max output index.
    ///
    /// The arg-max is taken over the raw logits. Softmax is still computed
    /// and left in the workspace, but its floor rounding can merge nearly
    /// equal logits, so it is not used to pick.
    pub fn decide_index(&self, stats: &SchedStats, ws: &mut Workspace<T>) -> usize {
        let input = encode_features::<T>(stats);
        self.network.forward(&input, ws);
        let index = argmax(ws.logits());
        log::debug!(
            "quantum policy: index={} logit={:?} p={:?}",
            index,
            ws.logits()[index],
            ws.probabilities()[index]
        );
        index
    }

    /// Map the arg-max index through the decision table.
    pub fn decide(&self, stats: &SchedStats, ws: &mut Workspace<T>) -> D {
        self.table[self.decide_index(stats, ws)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Q32;

    #[test]
    fn test_argmax_ties_lowest_index() {
        assert_eq!(argmax(&[1, 5, 5, 2]), 1);
        assert_eq!(argmax(&[7, 7, 7]), 0);
        assert_eq!(argmax(&[-3, -1, -2]), 1);
        assert_eq!(argmax::<i32>(&[]), 0);
    }

    #[test]
    fn test_zero_model_picks_first_entry() {
        let params = ModelParams::<Q32>::zeroed();
        let policy = QuantumPolicy::new(&params, DEFAULT_QUANTA_NS);
        let mut ws = Workspace::new();

        assert_eq!(policy.decide(&SchedStats::default(), &mut ws), 1_000_000);
    }

    #[test]
    fn test_bias_selects_entry() {
        let mut params = ModelParams::<Q32>::zeroed();
        let mut b3 = [Q32::ZERO; OUTPUT_SIZE];
        b3[9] = Q32::ONE;
        params.b3 = Some(b3);
        let table = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k'];
        let policy = QuantumPolicy::new(&params, table);
        let mut ws = Workspace::new();

        assert_eq!(policy.decide_index(&SchedStats::default(), &mut ws), 9);
        assert_eq!(policy.decide(&SchedStats::default(), &mut ws), 'j');
    }

    #[test]
    fn test_feature_routes_to_output() {
        // output 2 follows the task's last burst, output 5 its last wait
        let mut params = ModelParams::<Q32>::zeroed();
        params.w1[0][0] = Q32::ONE;
        params.w1[1][2] = Q32::ONE;
        params.w2[0][0] = Q32::ONE;
        params.w2[1][1] = Q32::ONE;
        params.w3[5][0] = Q32::ONE;
        params.w3[2][1] = Q32::ONE;
        let policy = QuantumPolicy::new(&params, DEFAULT_QUANTA_NS);
        let mut ws = Workspace::new();

        let waits = SchedStats { task_last_wait_ns: 4_000_000, last_burst_ns: 1_000_000, ..Default::default() };
        let bursts = SchedStats { task_last_wait_ns: 1_000_000, last_burst_ns: 4_000_000, ..Default::default() };

        assert_eq!(policy.decide_index(&waits, &mut ws), 5);
        assert_eq!(policy.decide_index(&bursts, &mut ws), 2);
        assert_eq!(policy.decide(&bursts, &mut ws), 3_000_000);
    }
}
