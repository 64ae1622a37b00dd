//! Experience collection for the autopilot.
//!
//! This crate owns the data side of the simulate-then-learn loop:
//!
//! 1. **Sampling** - Every few ticks the controller records a
//!    ([`TrainingSample`]) of the extracted feature vector and the movement
//!    that produced it.
//! 2. **Retention** - Samples accumulate in a per-flight [`TrainingBuffer`];
//!    flights that qualify as good merge their buffer into a retained corpus
//!    that survives across flights.
//! 3. **Persistence** - Snapshots of samples are handed to a [`SampleSink`],
//!    whose file-backed implementation appends CSV rows from a background
//!    worker so slow I/O never delays the tick loop.
//!
//! The policy itself lives in `cavernaut-autopilot`; this crate only carries
//! the experience between the simulation and the learner.

pub use self::{buffer::*, sample::*, sample_log::*};

pub mod buffer;
pub mod sample;
pub mod sample_log;
