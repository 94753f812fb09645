// Token refresh call

use anyhow::Context;
use reqwest::{Client, Url};

use crate::error::{Error, Result};
use crate::models::{RefreshRequest, RefreshResponse};

/// Mint a new access token from the stored refresh token.
///
/// The refresh token itself is never sent as a bearer header; it travels
/// only in this request body.
pub async fn refresh_access_token(
    client: &Client,
    refresh_url: &Url,
    refresh_token: &str,
) -> Result<String> {
    tracing::debug!("Refreshing access token...");

    let request = RefreshRequest {
        refresh_token: refresh_token.to_string(),
    };

    let response = client
        .post(refresh_url.clone())
        .json(&request)
        .send()
        .await
        .context("Failed to send refresh request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            body = %error_text,
            "Token refresh rejected by backend"
        );
        return Err(Error::Api {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let data: RefreshResponse = response
        .json()
        .await
        .context("Failed to parse refresh response")?;

    if data.access_token.is_empty() {
        return Err(Error::Internal(anyhow::anyhow!(
            "Refresh response does not contain access_token"
        )));
    }

    tracing::info!("Access token refreshed");
    Ok(data.access_token)
}
