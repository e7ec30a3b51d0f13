//! Feature encoding: raw scheduler statistics to network inputs.

use crate::fixed::FixedPoint;
use crate::network::INPUT_SIZE;

/// Raw per-task and run-queue statistics handed over by the scheduler.
///
/// Durations are nanoseconds; counts are plain event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SchedStats {
    pub task_last_wait_ns: u64,
    pub task_total_wait_ns: u64,
    pub task_wait_count: u64,
    pub last_burst_ns: u64,
    pub total_burst_ns: u64,
    pub task_burst_count: u64,
    pub task_vruntime_ns: u64,
    pub task_sum_exec_ns: u64,
    pub queue_total_wait_ns: u64,
    pub queue_wait_count: u64,
    pub queue_total_burst_ns: u64,
    pub total_burst_count: u64,
}

impl SchedStats {
    /// Counters in entry-point order: task wait (last, total, count), task
    /// burst (last, total, count), vruntime, executed time, then queue wait
    /// (total, count) and queue burst (total, count).
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        task_last_wait_ns: u64,
        task_total_wait_ns: u64,
        task_wait_count: u64,
        last_burst_ns: u64,
        total_burst_ns: u64,
        task_burst_count: u64,
        task_vruntime_ns: u64,
        task_sum_exec_ns: u64,
        queue_total_wait_ns: u64,
        queue_wait_count: u64,
        queue_total_burst_ns: u64,
        total_burst_count: u64,
    ) -> Self {
        Self {
            task_last_wait_ns,
            task_total_wait_ns,
            task_wait_count,
            last_burst_ns,
            total_burst_ns,
            task_burst_count,
            task_vruntime_ns,
            task_sum_exec_ns,
            queue_total_wait_ns,
            queue_wait_count,
            queue_total_burst_ns,
            total_burst_count,
        }
    }
}

impl From<[u64; 12]> for SchedStats {
    fn from(c: [u64; 12]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7], c[8], c[9], c[10], c[11])
    }
}

/// Build the 8-element input vector, every element in seconds.
///
/// | idx | feature                                  |
/// |-----|------------------------------------------|
/// | 0   | last wait                                |
/// | 1   | mean wait (0 when the task never waited) |
/// | 2   | last burst                               |
/// | 3   | mean burst (0 when it never ran)         |
/// | 4   | virtual runtime                          |
/// | 5   | executed runtime                         |
/// | 6   | queue mean wait                          |
/// | 7   | queue mean burst                         |
pub fn encode_features<T: FixedPoint>(stats: &SchedStats) -> [T; INPUT_SIZE] {
    [
        T::from_duration(stats.task_last_wait_ns),
        mean_duration(stats.task_total_wait_ns, stats.task_wait_count),
        T::from_duration(stats.last_burst_ns),
        mean_duration(stats.total_burst_ns, stats.task_burst_count),
        T::from_duration(stats.task_vruntime_ns),
        T::from_duration(stats.task_sum_exec_ns),
        mean_duration(stats.queue_total_wait_ns, stats.queue_wait_count),
        mean_duration(stats.queue_total_burst_ns, stats.total_burst_count),
    ]
}

/// Integer-nanosecond mean, then converted. Zero samples encode as zero.
#[inline]
fn mean_duration<T: FixedPoint>(total_ns: u64, count: u64) -> T {
    if count == 0 {
        T::ZERO
    } else {
        T::from_duration(total_ns / count)
    }
}
