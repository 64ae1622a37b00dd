//! Decision-making side of the simulate-then-learn loop.
//!
//! # How the loop works
//!
//! 1. **Observe** - [`extract_features`] projects the visible cavern ahead of
//!    the plane (plus a few scalars) into a fixed-length vector.
//! 2. **Decide** - a [`Policy`] maps that vector to a [`Movement`]. The
//!    [`NeuralPolicy`] runs a small feed-forward [`Network`] and samples from
//!    a temperature-scaled softmax over the three movement classes.
//! 3. **Record** - the [`FlightController`] appends samples to the in-flight
//!    buffer and, on good flights, retains them across resets.
//! 4. **Learn** - at flight boundaries the controller retrains the policy on
//!    the retained corpus, closing the loop.
//!
//! # Exploration
//!
//! Movement selection is stochastic on purpose. The softmax temperature rises
//! a step whenever the sampled movement repeats the previous one and falls
//! otherwise, bounded to `[0.5, 2.0]`. The hysteresis keeps the policy from
//! locking into a degenerate always-same-action loop while still letting it
//! converge on confident choices.
//!
//! [`Movement`]: cavernaut_engine::Movement

pub use self::{controller::*, features::*, network::*, policy::*};

pub mod controller;
pub mod features;
pub mod network;
pub mod policy;
