// Wire models for the PolicyPulse backend API

pub mod admin;
pub mod auth;
pub mod notification;
pub mod policy;

pub use admin::{AdminUser, DashboardStats, NodeStats, NodeStatus, SystemLog};
pub use auth::{
    CodePurpose, LoginRequest, LoginResponse, Preferences, RefreshRequest, RefreshResponse,
    RegisterRequest, ResetPasswordRequest, Role, SendCodeRequest, Subscription,
    SubscriptionStatus, SubscriptionType, User, UserStatus, VerifyCodeRequest,
};
pub use notification::{Notification, NotificationKind, NotificationSettings};
pub use policy::{BidItem, PolicyItem};
