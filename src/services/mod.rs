// Service clients over the backend REST surface

mod admin;
mod auth;
mod notification;
mod policy;

pub use admin::AdminService;
pub use auth::AuthService;
pub use notification::NotificationService;
pub use policy::PolicyService;
