// Notification service
// Reads degrade to safe defaults; mutations propagate their errors.

use serde::Deserialize;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Notification, NotificationSettings};
use crate::query::{ListQuery, PaginatedResult};

#[derive(Deserialize)]
struct UnreadCountResponse {
    #[serde(default)]
    count: u64,
}

/// Client for the `/api/notifications` surface
pub struct NotificationService {
    client: ApiClient,
}

impl NotificationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Paginated notification listing; degrades to an empty page.
    pub async fn list(&self, page: u32, page_size: u32) -> PaginatedResult<Notification> {
        let query = ListQuery::new().page(page).page_size(page_size);
        match self
            .client
            .get_json_with("/notifications", &query.to_params())
            .await
        {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "Notification fetch failed, returning empty page");
                PaginatedResult::empty(query.effective_page(), query.effective_page_size())
            }
        }
    }

    /// Unread badge count; degrades to 0.
    pub async fn unread_count(&self) -> u64 {
        match self
            .client
            .get_json::<UnreadCountResponse>("/notifications/unread-count")
            .await
        {
            Ok(response) => response.count,
            Err(err) => {
                tracing::warn!(error = %err, "Unread count fetch failed");
                0
            }
        }
    }

    pub async fn mark_as_read(&self, id: &str) -> Result<()> {
        self.client
            .patch_empty(&format!("/notifications/{}/read", id))
            .await
    }

    pub async fn mark_all_as_read(&self) -> Result<()> {
        self.client.patch_empty("/notifications/read-all").await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/notifications/{}", id)).await
    }

    /// Delivery-channel settings; degrades to the defaults.
    pub async fn settings(&self) -> NotificationSettings {
        match self.client.get_json("/notifications/settings").await {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "Settings fetch failed, using defaults");
                NotificationSettings::default()
            }
        }
    }

    pub async fn update_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings> {
        self.client
            .patch_json("/notifications/settings", settings)
            .await
    }
}
