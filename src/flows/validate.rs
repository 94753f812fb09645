// Local form validation
// Purely synchronous gates: regex and length/equality checks. A submit
// that fails here never reaches the network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationErrors;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("e-mail regex"));

/// User-facing validation messages (product locale)
pub mod messages {
    pub const EMAIL_REQUIRED: &str = "邮箱不能为空";
    pub const EMAIL_INVALID: &str = "邮箱格式不正确";
    pub const PASSWORD_REQUIRED: &str = "密码不能为空";
    pub const PASSWORD_TOO_SHORT: &str = "密码长度至少8位";
    pub const CODE_REQUIRED: &str = "验证码不能为空";
    pub const NEW_PASSWORD_REQUIRED: &str = "新密码不能为空";
    pub const CONFIRM_REQUIRED: &str = "确认密码不能为空";
    pub const PASSWORD_MISMATCH: &str = "两次输入的密码不一致";
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", messages::EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.add("email", messages::EMAIL_INVALID);
    }
}

pub fn validate_password(errors: &mut ValidationErrors, password: &str) {
    if password.is_empty() {
        errors.add("password", messages::PASSWORD_REQUIRED);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", messages::PASSWORD_TOO_SHORT);
    }
}

pub fn validate_code(errors: &mut ValidationErrors, code: &str) {
    if code.is_empty() {
        errors.add("verificationCode", messages::CODE_REQUIRED);
    }
}

/// Gate for the reset step: new password rules plus confirmation equality.
pub fn validate_new_password(
    errors: &mut ValidationErrors,
    new_password: &str,
    confirm_password: &str,
) {
    if new_password.is_empty() {
        errors.add("newPassword", messages::NEW_PASSWORD_REQUIRED);
    } else if new_password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("newPassword", messages::PASSWORD_TOO_SHORT);
    }

    if confirm_password.is_empty() {
        errors.add("confirmPassword", messages::CONFIRM_REQUIRED);
    } else if new_password != confirm_password {
        errors.add("confirmPassword", messages::PASSWORD_MISMATCH);
    }
}
