// Admin dashboard types

use serde::{Deserialize, Serialize};

/// Usage and revenue aggregates shown on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub policy_count: u64,
    pub bid_count: u64,
    pub push_success_rate: f64,
    pub crawl_success_rate: f64,
}

/// User row in the admin user list (flattened subscription view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_login_at: String,
    pub subscription: AdminSubscription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubscription {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default)]
    pub expire_at: String,
}

/// Crawler node health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Healthy,
    Warning,
    Error,
}

/// Health counters for one crawler node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStats {
    pub node_id: String,
    pub node_name: String,
    pub success_count: u64,
    pub failure_count: u64,
    pub avg_response_time: f64,
    #[serde(default)]
    pub last_success_at: String,
    #[serde(default)]
    pub last_failure_at: String,
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub id: String,
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub created_at: String,
}
