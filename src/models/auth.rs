// Authentication types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Trial,
    Suspended,
}

/// Which feeds the subscription covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Policy,
    Bid,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<DateTime<Utc>>,
}

/// Stored filter defaults plus the AI interpretation mode.
/// `conservative` selects cautious vs. aggressive interpretation; the
/// backend computes with it, this client only carries it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub signal_types: Vec<String>,
    #[serde(default)]
    pub conservative: bool,
}

/// Authenticated user record, cached for the lifetime of the session.
/// Owned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub subscription: Subscription,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub verification_code: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// What a verification code is being requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    Register,
    ResetPassword,
}

#[derive(Debug, Serialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub purpose: CodePurpose,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub verification_code: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserialization() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1",
            "email": "a@b.com",
            "name": "a",
            "role": "admin",
            "status": "trial",
            "subscription": {
                "type": "all",
                "status": "active",
                "expire_at": "2026-12-31T00:00:00Z"
            },
            "preferences": {
                "keywords": ["新能源"],
                "regions": ["上海"],
                "industries": [],
                "signal_types": [],
                "conservative": true
            }
        }))
        .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.status, UserStatus::Trial);
        assert_eq!(user.subscription.kind, SubscriptionType::All);
        assert!(user.preferences.conservative);
        assert!(user.subscription.trial_end.is_none());
    }

    #[test]
    fn test_code_purpose_wire_format() {
        assert_eq!(
            serde_json::to_string(&CodePurpose::ResetPassword).unwrap(),
            "\"reset_password\""
        );
        assert_eq!(
            serde_json::to_string(&CodePurpose::Register).unwrap(),
            "\"register\""
        );
    }

    #[test]
    fn test_refresh_request_body() {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: "rt-1".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "refresh_token": "rt-1" }));
    }
}
