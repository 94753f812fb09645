// Forgot-password flow: email -> verify -> reset
//
// Strictly ordered; each step validates locally before its network call,
// a failed verify stays on the verify step, and the only way back is a
// full restart.

use std::sync::Arc;

use super::{validate, CodeCountdown};
use crate::error::{Error, Result, ValidationErrors};
use crate::models::CodePurpose;
use crate::services::AuthService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    /// Collect the account e-mail and request a code
    Email,
    /// Submit the received code for validation
    Verify,
    /// Set the new password
    Reset,
    /// Flow finished; host redirects to login
    Done,
}

pub struct PasswordResetFlow {
    auth: Arc<AuthService>,
    step: ResetStep,
    email: String,
    code: String,
    countdown: CodeCountdown,
}

impl PasswordResetFlow {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            step: ResetStep::Email,
            email: String::new(),
            code: String::new(),
            countdown: CodeCountdown::new(),
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    fn expect_step(&self, expected: ResetStep) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::Internal(anyhow::anyhow!(
                "reset flow is at step {:?}, expected {:?}",
                self.step,
                expected
            )))
        }
    }

    /// Step 1: validate the address, request a reset code, advance to verify.
    pub async fn submit_email(&mut self, email: &str) -> Result<()> {
        self.expect_step(ResetStep::Email)?;

        let mut errors = ValidationErrors::new();
        validate::validate_email(&mut errors, email);
        if let Some(remaining) = self.countdown.remaining(email) {
            errors.add("email", &format!("{}秒后重试", remaining));
        }
        errors.into_result()?;

        self.auth
            .send_verification_code(email, CodePurpose::ResetPassword)
            .await?;
        self.countdown.record(email);
        self.email = email.to_string();
        self.step = ResetStep::Verify;
        Ok(())
    }

    /// Step 2: submit the code; advance to reset on success. A rejected
    /// code leaves the flow on this step.
    pub async fn submit_code(&mut self, code: &str) -> Result<()> {
        self.expect_step(ResetStep::Verify)?;

        let mut errors = ValidationErrors::new();
        validate::validate_code(&mut errors, code);
        errors.into_result()?;

        self.auth.verify_code(&self.email, code).await?;
        self.code = code.to_string();
        self.step = ResetStep::Reset;
        Ok(())
    }

    /// Re-send the reset code while on the verify step, countdown permitting.
    pub async fn resend_code(&mut self) -> Result<()> {
        self.expect_step(ResetStep::Verify)?;

        let mut errors = ValidationErrors::new();
        if let Some(remaining) = self.countdown.remaining(&self.email) {
            errors.add("email", &format!("{}秒后重试", remaining));
        }
        errors.into_result()?;

        self.auth
            .send_verification_code(&self.email, CodePurpose::ResetPassword)
            .await?;
        self.countdown.record(&self.email);
        Ok(())
    }

    /// Step 3: require a matching password pair, then submit the reset.
    pub async fn submit_password(
        &mut self,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        self.expect_step(ResetStep::Reset)?;

        let mut errors = ValidationErrors::new();
        validate::validate_new_password(&mut errors, new_password, confirm_password);
        errors.into_result()?;

        self.auth
            .reset_password(&self.email, &self.code, new_password)
            .await?;
        self.step = ResetStep::Done;
        Ok(())
    }

    /// Abandon progress and return to the first step.
    pub fn restart(&mut self) {
        self.step = ResetStep::Email;
        self.email.clear();
        self.code.clear();
    }
}
