// Auth service: login, registration, verification codes, password reset

use std::sync::Arc;

use serde::Deserialize;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{
    CodePurpose, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    SendCodeRequest, User, VerifyCodeRequest,
};
use crate::session::SessionManager;

#[derive(Deserialize)]
struct MeResponse {
    user: User,
}

/// Client for the `/api/auth` surface
pub struct AuthService {
    client: ApiClient,
    session: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(client: ApiClient, session: Arc<SessionManager>) -> Self {
        Self { client, session }
    }

    /// Log in and establish a session from the returned token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let response: LoginResponse = self
            .client
            .post_json(
                "/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        self.session
            .establish(
                response.access_token,
                response.refresh_token,
                response.user.clone(),
            )
            .await?;

        tracing::info!(email = %email, "Login successful");
        Ok(response.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.client.post_unit("/register", request).await
    }

    /// Log out. The local session is cleared even if the backend call
    /// fails; the server error, if any, is still reported.
    pub async fn logout(&self) -> Result<()> {
        let result = self.client.post_empty("/logout").await;
        self.session.clear().await?;
        result
    }

    /// Fetch the authenticated user and refresh the cached copy.
    pub async fn current_user(&self) -> Result<User> {
        let response: MeResponse = self.client.get_json("/me").await?;
        self.session.cache_user(response.user.clone()).await?;
        Ok(response.user)
    }

    pub async fn send_verification_code(&self, email: &str, purpose: CodePurpose) -> Result<()> {
        self.client
            .post_unit(
                "/send-code",
                &SendCodeRequest {
                    email: email.to_string(),
                    purpose,
                },
            )
            .await
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> Result<()> {
        self.client
            .post_unit(
                "/verify-code",
                &VerifyCodeRequest {
                    email: email.to_string(),
                    code: code.to_string(),
                },
            )
            .await
    }

    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Result<()> {
        self.client
            .post_unit(
                "/reset-password",
                &ResetPasswordRequest {
                    email: email.to_string(),
                    verification_code: code.to_string(),
                    new_password: new_password.to_string(),
                },
            )
            .await
    }
}
