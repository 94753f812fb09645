// Policy and bid item projections
// Read-only shapes returned by the listing endpoints; no mutation contract.

use serde::{Deserialize, Serialize};

/// AI-summarized government policy item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    pub region: String,
    pub industry: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub signals: Vec<String>,
    /// Interpretation confidence in [0, 1]
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// AI-summarized procurement bid item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    pub region: String,
    pub industry: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub opportunity: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
