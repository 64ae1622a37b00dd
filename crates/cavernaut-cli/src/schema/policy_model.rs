use cavernaut_autopilot::Network;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk form of a trained autopilot, with enough provenance to tell
/// saved models apart.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub flights: u64,
    pub best_time_secs: f64,
    pub network: Network,
}
