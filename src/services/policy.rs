// Policy and bid listings with the degrade-to-empty policy
//
// List fetches never hard-fail: any error resolves to a well-formed empty
// page echoing the requested pagination, with the swallowed error logged
// as the out-of-band signal.

use serde::de::DeserializeOwned;

use crate::http::ApiClient;
use crate::models::{BidItem, PolicyItem};
use crate::query::{ListQuery, PaginatedResult};

/// Client for the `/api` policy and bid listing surface
pub struct PolicyService {
    client: ApiClient,
}

impl PolicyService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
        search: Option<&str>,
    ) -> PaginatedResult<T> {
        let mut params = query.to_params();
        if let Some(q) = search {
            params.push(("q".to_string(), q.to_string()));
        }

        match self.client.get_json_with(path, &params).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(path = path, error = %err, "List fetch failed, returning empty page");
                PaginatedResult::empty(query.effective_page(), query.effective_page_size())
            }
        }
    }

    /// Paginated policy listing.
    pub async fn get_policies(&self, query: &ListQuery) -> PaginatedResult<PolicyItem> {
        self.fetch_page("/policies", query, None).await
    }

    /// Paginated procurement-bid listing.
    pub async fn get_bids(&self, query: &ListQuery) -> PaginatedResult<BidItem> {
        self.fetch_page("/bids", query, None).await
    }

    /// Full-text policy search; same query shape plus `q`.
    pub async fn search_policies(
        &self,
        q: &str,
        query: &ListQuery,
    ) -> PaginatedResult<PolicyItem> {
        self.fetch_page("/policies/search", query, Some(q)).await
    }

    /// Full-text bid search; same query shape plus `q`.
    pub async fn search_bids(&self, q: &str, query: &ListQuery) -> PaginatedResult<BidItem> {
        self.fetch_page("/bids/search", query, Some(q)).await
    }

    /// Single policy by id; `None` on any failure.
    pub async fn get_policy(&self, id: &str) -> Option<PolicyItem> {
        match self.client.get_json(&format!("/policies/{}", id)).await {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(id = id, error = %err, "Policy fetch failed");
                None
            }
        }
    }

    /// Single bid by id; `None` on any failure.
    pub async fn get_bid(&self, id: &str) -> Option<BidItem> {
        match self.client.get_json(&format!("/bids/{}", id)).await {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(id = id, error = %err, "Bid fetch failed");
                None
            }
        }
    }
}
