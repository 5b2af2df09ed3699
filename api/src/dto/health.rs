use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `running`, or `degraded` when a dependency is down
    pub api_status: String,
    pub database_status: String,
    pub version: String,
}
