// Admin service: dashboards, user management, node health, logs
//
// Shares the same session (and storage keys) as every other service;
// errors propagate to the caller, nothing degrades here.

use serde_json::json;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{AdminUser, DashboardStats, NodeStats, SystemLog};

/// Client for the `/api/admin` surface
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.client.get_json("/dashboard/stats").await
    }

    pub async fn users(&self) -> Result<Vec<AdminUser>> {
        self.client.get_json("/users").await
    }

    /// Crawler node health counters.
    pub async fn node_stats(&self) -> Result<Vec<NodeStats>> {
        self.client.get_json("/nodes/stats").await
    }

    pub async fn system_logs(&self, limit: u32) -> Result<Vec<SystemLog>> {
        self.client
            .get_json_with(
                "/logs",
                &[("limit".to_string(), limit.to_string())],
            )
            .await
    }

    pub async fn update_user_status(&self, user_id: &str, status: &str) -> Result<()> {
        self.client
            .patch_unit(
                &format!("/users/{}/status", user_id),
                &json!({ "status": status }),
            )
            .await
    }

    pub async fn update_user_role(&self, user_id: &str, role: &str) -> Result<()> {
        self.client
            .patch_unit(
                &format!("/users/{}/role", user_id),
                &json!({ "role": role }),
            )
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.client.delete(&format!("/users/{}", user_id)).await
    }
}
