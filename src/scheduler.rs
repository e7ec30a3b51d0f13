/// Round-robin demo scheduler driven by the quantum policy.
///
/// Each dispatch: release due tasks, pick the next ready task in round-robin
/// order, build its statistics, ask the policy for a time quantum, and run the
/// task for that long (or until its job finishes). The clock is in
/// nanoseconds and only moves by executed slices or idle gaps.
use crate::features::SchedStats;
use crate::fixed::FixedPoint;
use crate::network::Workspace;
use crate::policy::QuantumPolicy;
use crate::task::{Task, TaskState};

/// Run-queue-wide totals fed into features 6 and 7.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub total_wait_ns: u64,
    pub wait_count: u64,
    pub total_burst_ns: u64,
    pub burst_count: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedSummary {
    pub dispatches: u32,
    pub completions: u32,
    pub busy_ns: u64,
    pub idle_ns: u64,
}

pub struct Scheduler<'a, T, const N: usize> {
    pub tasks: [Task; N],
    pub now_ns: u64,
    pub queue: QueueStats,
    pub summary: SchedSummary,
    policy: QuantumPolicy<'a, T, u64>,
    workspace: Workspace<T>,
    cursor: usize,
}

impl<'a, T: FixedPoint, const N: usize> Scheduler<'a, T, N> {
    pub fn new(tasks: [Task; N], policy: QuantumPolicy<'a, T, u64>) -> Self {
        Self {
            tasks,
            now_ns: 0,
            queue: QueueStats::default(),
            summary: SchedSummary::default(),
            policy,
            workspace: Workspace::new(),
            cursor: 0,
        }
    }

    /// Release tasks whose period has arrived.
    fn do_releases(&mut self) {
        for t in self.tasks.iter_mut() {
            while t.next_release_ns <= self.now_ns && t.next_release_ns != u64::MAX {
                t.release(self.now_ns);
            }
        }
    }

    /// Next ready task at or after the round-robin cursor.
    fn pick_next(&self) -> Option<usize> {
        (0..N)
            .map(|offset| (self.cursor + offset) % N)
            .find(|&i| self.tasks[i].state == TaskState::Ready)
    }

    /// Statistics for task `idx` as the policy sees them.
    pub fn stats_for(&self, idx: usize) -> SchedStats {
        let t = &self.tasks[idx];
        SchedStats {
            task_last_wait_ns: t.last_wait_ns,
            task_total_wait_ns: t.total_wait_ns,
            task_wait_count: t.wait_count,
            last_burst_ns: t.last_burst_ns,
            total_burst_ns: t.total_burst_ns,
            task_burst_count: t.burst_count,
            task_vruntime_ns: t.vruntime_ns,
            task_sum_exec_ns: t.sum_exec_ns,
            queue_total_wait_ns: self.queue.total_wait_ns,
            queue_wait_count: self.queue.wait_count,
            queue_total_burst_ns: self.queue.total_burst_ns,
            total_burst_count: self.queue.burst_count,
        }
    }

    /// Dispatch one task, idling first if nothing is ready.
    /// Returns the task run and its slice, or `None` once no task can ever
    /// become ready again.
    pub fn dispatch_once(&mut self) -> Option<(usize, u64)> {
        self.do_releases();

        let idx = match self.pick_next() {
            Some(idx) => idx,
            None => {
                let wake = self.tasks.iter().map(|t| t.next_release_ns).min()?;
                if wake == u64::MAX {
                    return None;
                }
                self.summary.idle_ns += wake - self.now_ns;
                self.now_ns = wake;
                self.do_releases();
                self.pick_next()?
            }
        };

        let wait = self.tasks[idx].record_wait(self.now_ns);
        self.queue.total_wait_ns = self.queue.total_wait_ns.saturating_add(wait);
        self.queue.wait_count += 1;

        let stats = self.stats_for(idx);
        // a zero-length quantum would never make progress
        let quantum = self.policy.decide(&stats, &mut self.workspace).max(1);

        let ran = self.tasks[idx].execute(quantum, self.now_ns);
        self.now_ns = self.now_ns.saturating_add(ran);
        self.queue.total_burst_ns = self.queue.total_burst_ns.saturating_add(ran);
        self.queue.burst_count += 1;

        self.summary.dispatches += 1;
        self.summary.busy_ns += ran;
        if self.tasks[idx].state == TaskState::Completed {
            self.summary.completions += 1;
        }
        self.cursor = (idx + 1) % N;

        log::debug!(
            "dispatch: task={} wait={}ns quantum={}ns ran={}ns now={}ns",
            self.tasks[idx].id,
            wait,
            quantum,
            ran,
            self.now_ns
        );
        Some((idx, ran))
    }

    /// Dispatch up to `max_dispatches` times; stops early if the system drains.
    pub fn run(&mut self, max_dispatches: u32) -> SchedSummary {
        for _ in 0..max_dispatches {
            if self.dispatch_once().is_none() {
                break;
            }
        }
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Q32;
    use crate::network::{ModelParams, OUTPUT_SIZE};
    use crate::policy::DEFAULT_QUANTA_NS;

    #[test]
    fn test_round_robin_with_fixed_quantum() {
        // zero model: always output 0, a 1 ms quantum
        let params = ModelParams::<Q32>::zeroed();
        let policy = QuantumPolicy::new(&params, DEFAULT_QUANTA_NS);
        let tasks = [Task::new(0, 0, 2_500_000), Task::new(1, 0, 1_000_000)];
        let mut sched = Scheduler::new(tasks, policy);

        assert_eq!(sched.dispatch_once(), Some((0, 1_000_000)));
        assert_eq!(sched.dispatch_once(), Some((1, 1_000_000)));
        assert_eq!(sched.dispatch_once(), Some((0, 1_000_000)));
        assert_eq!(sched.dispatch_once(), Some((0, 500_000)));
        assert_eq!(sched.dispatch_once(), None);

        assert_eq!(sched.summary.completions, 2);
        assert_eq!(sched.summary.busy_ns, 3_500_000);
        assert_eq!(sched.now_ns, 3_500_000);
        // task 1 waited 1 ms before its only run
        assert_eq!(sched.tasks[1].total_wait_ns, 1_000_000);
        assert_eq!(sched.queue.wait_count, 4);
        assert_eq!(sched.queue.burst_count, 4);
    }

    #[test]
    fn test_idle_until_next_release() {
        let params = ModelParams::<Q32>::zeroed();
        let policy = QuantumPolicy::new(&params, DEFAULT_QUANTA_NS);
        let mut sched = Scheduler::new([Task::new(0, 10_000_000, 1_000_000)], policy);

        let summary = sched.run(3);

        assert_eq!(summary.dispatches, 3);
        assert_eq!(summary.completions, 3);
        assert_eq!(summary.idle_ns, 18_000_000);
        assert_eq!(sched.now_ns, 21_000_000);
    }

    #[test]
    fn test_stats_reflect_history() {
        let params = ModelParams::<Q32>::zeroed();
        let policy = QuantumPolicy::new(&params, [2_000_000; OUTPUT_SIZE]);
        let tasks = [Task::new(0, 0, 5_000_000), Task::new(1, 0, 5_000_000)];
        let mut sched = Scheduler::new(tasks, policy);

        sched.run(3);
        let stats = sched.stats_for(0);

        assert_eq!(stats.task_burst_count, 2);
        assert_eq!(stats.total_burst_ns, 4_000_000);
        assert_eq!(stats.task_last_wait_ns, 2_000_000);
        assert_eq!(stats.queue_wait_count, 3);
        assert_eq!(stats.total_burst_count, 3);
        assert_eq!(stats.queue_total_burst_ns, 6_000_000);
    }

    #[test]
    fn test_zero_quantum_still_progresses() {
        let params = ModelParams::<Q32>::zeroed();
        let policy = QuantumPolicy::new(&params, [0; OUTPUT_SIZE]);
        let mut sched = Scheduler::new([Task::new(0, 0, 3)], policy);

        let summary = sched.run(10);

        assert_eq!(summary.dispatches, 3);
        assert_eq!(summary.completions, 1);
    }
}
