//! Quantum-policy RTOS demo: bare-metal entry point.
//!
//! Runs on ARM Cortex-M4 (STM32F411) under QEMU. Defines a 6-task periodic
//! taskset, then lets the round-robin scheduler dispatch it with time
//! quanta chosen by the fixed-point policy network. Output goes via
//! semihosting to the QEMU console.
//!
//! Build with `--no-default-features --features cortex-m-demo`.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use cortex_m_semihosting::{debug, hprintln};
use panic_halt as _;

use rtos_quantum_nn::{weights, QuantumPolicy, Scheduler, Task, DEFAULT_QUANTA_NS};

const MS: u64 = 1_000_000;

#[entry]
fn main() -> ! {
    let _ = hprintln!("========================================");
    let _ = hprintln!("  Quantum-policy RTOS Cortex-M4 Demo");
    let _ = hprintln!("========================================\n");

    // (id, period, burst). Total utilization ~1.03, overloaded on purpose
    // so job overruns show up in the final stats.
    let tasks = [
        Task::new(0, 10 * MS, 2 * MS),
        Task::new(1, 15 * MS, 3 * MS),
        Task::new(2, 20 * MS, 4 * MS),
        Task::new(3, 30 * MS, 5 * MS).with_weight(2048),
        Task::new(4, 50 * MS, 8 * MS),
        Task::new(5, 100 * MS, 10 * MS),
    ];

    let policy = QuantumPolicy::new(&weights::MODEL, DEFAULT_QUANTA_NS);
    let mut sched = Scheduler::new(tasks, policy);

    let _ = hprintln!("Scheduler starting for 600 dispatches");
    for _ in 0..600 {
        if sched.dispatch_once().is_none() {
            break;
        }

        // Log every 100 dispatches to avoid flooding semihosting
        if sched.summary.dispatches % 100 == 0 {
            let _ = hprintln!(
                "dispatches={} now={}us completions={} idle={}us",
                sched.summary.dispatches,
                sched.now_ns / 1_000,
                sched.summary.completions,
                sched.summary.idle_ns / 1_000
            );
        }
    }

    let _ = hprintln!("\n=== Final Stats ===");
    let _ = hprintln!("Dispatches:  {}", sched.summary.dispatches);
    let _ = hprintln!("Completions: {}", sched.summary.completions);
    let _ = hprintln!("Busy:        {}us", sched.summary.busy_ns / 1_000);
    let _ = hprintln!("Idle:        {}us", sched.summary.idle_ns / 1_000);
    for t in &sched.tasks {
        let _ = hprintln!(
            "  Task {}: overruns={} mean_wait={}us vruntime={}us",
            t.id,
            t.overruns,
            t.total_wait_ns / t.wait_count.max(1) / 1_000,
            t.vruntime_ns / 1_000
        );
    }

    let _ = hprintln!("\nScheduler finished. Halting.");
    debug::exit(debug::EXIT_SUCCESS);

    loop {}
}
