//! Fixed-point neural time-quantum policy for an RTOS dispatcher.
//!
//! A small feed-forward network (8 -> 50 -> 70 -> 11) turns per-task and
//! run-queue statistics into one of 11 scheduling decisions, normally a
//! time-quantum length. Everything runs in saturating fixed point: no
//! floating point, no allocation, and a worst-case cost fixed by the
//! topology constants.
//!
//! The core is `no_std`. The `std` feature (on by default) adds model
//! loading from JSON, TOML configuration, and their error types.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod activation;
pub mod affine;
pub mod features;
pub mod fixed;
pub mod network;
pub mod policy;
pub mod scheduler;
pub mod softmax;
pub mod task;
pub mod weights;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod model_io;

pub use activation::{exp_approx, tanh_approx};
pub use affine::affine;
pub use features::{encode_features, SchedStats};
pub use fixed::{Fixed, FixedPoint, Q16, Q32, NS_PER_SEC};
pub use network::{
    ModelParams, Network, Workspace, HIDDEN_1_SIZE, HIDDEN_2_SIZE, INPUT_SIZE, OUTPUT_SIZE,
};
pub use policy::{argmax, QuantumPolicy, DEFAULT_QUANTA_NS};
pub use scheduler::{QueueStats, SchedSummary, Scheduler};
pub use softmax::softmax;
pub use task::{Task, TaskState};

#[cfg(feature = "std")]
pub use config::PolicyConfig;
#[cfg(feature = "std")]
pub use error::{ConfigError, ModelError};
#[cfg(feature = "std")]
pub use model_io::{load_model, parse_model};
