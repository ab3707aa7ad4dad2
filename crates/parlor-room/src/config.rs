//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for [`RoomRegistry`](crate::RoomRegistry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How many random codes `create_room` tries before giving up.
    ///
    /// Collisions only become likely once most of the 10,000 codes are
    /// taken, so the cap matters only for a saturated server.
    pub max_code_attempts: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_code_attempts: 1000,
        }
    }
}
