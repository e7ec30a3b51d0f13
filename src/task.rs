/// Task states seen by the demo scheduler.
/// Ready: released and waiting in the run queue. Running: on the CPU right now.
/// Completed: finished the current job, waiting for its next release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Running,
    Completed,
}

/// Load weight of a nice-0 task; vruntime advances at wall-clock speed at this weight.
pub const NICE_0_WEIGHT: u64 = 1024;

/// A periodic CPU-bound task and the statistics the quantum policy reads.
///
/// Each release queues a job of `burst_ns` CPU time. A task with
/// `period_ns == 0` is released once and never again.
#[derive(Clone, Copy, Debug)]
pub struct Task {
    pub id: usize,
    pub period_ns: u64,
    pub burst_ns: u64,
    pub weight: u64,
    pub remaining_ns: u64,
    pub next_release_ns: u64,
    pub ready_since_ns: u64,
    pub state: TaskState,
    pub overruns: u32,

    pub last_wait_ns: u64,
    pub total_wait_ns: u64,
    pub wait_count: u64,
    pub last_burst_ns: u64,
    pub total_burst_ns: u64,
    pub burst_count: u64,
    pub vruntime_ns: u64,
    pub sum_exec_ns: u64,
}

impl Task {
    pub const fn new(id: usize, period_ns: u64, burst_ns: u64) -> Self {
        Self {
            id,
            period_ns,
            burst_ns,
            weight: NICE_0_WEIGHT,
            remaining_ns: 0,
            next_release_ns: 0,
            ready_since_ns: 0,
            state: TaskState::Completed,
            overruns: 0,
            last_wait_ns: 0,
            total_wait_ns: 0,
            wait_count: 0,
            last_burst_ns: 0,
            total_burst_ns: 0,
            burst_count: 0,
            vruntime_ns: 0,
            sum_exec_ns: 0,
        }
    }

    /// Heavier tasks accumulate vruntime more slowly.
    pub const fn with_weight(mut self, weight: u64) -> Self {
        self.weight = if weight == 0 { 1 } else { weight };
        self
    }

    /// Period boundary reached. Starts a new job unless the previous one is
    /// still pending, in which case the overrun is counted and the pending
    /// job keeps its remaining work.
    pub fn release(&mut self, now_ns: u64) {
        if self.state == TaskState::Completed {
            self.remaining_ns = self.burst_ns;
            self.ready_since_ns = now_ns;
            self.state = TaskState::Ready;
        } else {
            self.overruns += 1;
        }
        self.next_release_ns = if self.period_ns == 0 {
            u64::MAX
        } else {
            self.next_release_ns.saturating_add(self.period_ns)
        };
    }

    /// Close the current wait interval. Returns how long the task waited.
    pub fn record_wait(&mut self, now_ns: u64) -> u64 {
        let wait = now_ns.saturating_sub(self.ready_since_ns);
        self.last_wait_ns = wait;
        self.total_wait_ns = self.total_wait_ns.saturating_add(wait);
        self.wait_count += 1;
        wait
    }

    /// Run for up to `slice_ns`. Returns the time actually consumed.
    /// The task goes back to Ready, or to Completed when its job finishes.
    pub fn execute(&mut self, slice_ns: u64, now_ns: u64) -> u64 {
        self.state = TaskState::Running;
        let ran = slice_ns.min(self.remaining_ns);
        self.remaining_ns -= ran;

        self.last_burst_ns = ran;
        self.total_burst_ns = self.total_burst_ns.saturating_add(ran);
        self.burst_count += 1;
        self.sum_exec_ns = self.sum_exec_ns.saturating_add(ran);
        self.vruntime_ns = self
            .vruntime_ns
            .saturating_add(ran.saturating_mul(NICE_0_WEIGHT) / self.weight.max(1));

        if self.remaining_ns == 0 {
            self.state = TaskState::Completed;
        } else {
            self.state = TaskState::Ready;
            self.ready_since_ns = now_ns.saturating_add(ran);
        }
        ran
    }
}
