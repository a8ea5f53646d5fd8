/*
 * Responsibility
 * - dashboard 登録/削除の request/response DTO
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterDashboardRequest {
    pub dashboard_name: String,
}

impl RegisterDashboardRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.dashboard_name.trim().is_empty() {
            return Err("dashboard_name is required");
        }
        if self.dashboard_name.len() > 128 {
            return Err("dashboard_name must be <= 128 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterDashboardResponse {
    pub dashboard_id: String,
}
