// Login/register toggle flow
//
// `LoggingIn` submits credentials; a server rejection indicating an
// unverified registration flips the same form into `Registering`, which
// additionally requires a verification code and submits
// register-then-login.

use std::sync::Arc;

use super::{validate, CodeCountdown};
use crate::error::{Error, Result, ValidationErrors};
use crate::models::{CodePurpose, RegisterRequest, User};
use crate::services::AuthService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    LoggingIn,
    Registering,
}

/// Form fields as entered by the user
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub verification_code: String,
}

/// Outcome of a submit
#[derive(Debug)]
pub enum LoginOutcome {
    /// Session established
    LoggedIn(User),
    /// The server wants e-mail verification first; the flow switched to
    /// `Registering` and the form now needs a verification code
    VerificationRequired,
}

pub struct LoginFlow {
    auth: Arc<AuthService>,
    mode: LoginMode,
    countdown: CodeCountdown,
}

impl LoginFlow {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            mode: LoginMode::LoggingIn,
            countdown: CodeCountdown::new(),
        }
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    /// Manual toggle between the two faces of the form.
    pub fn set_mode(&mut self, mode: LoginMode) {
        self.mode = mode;
    }

    fn validate(&self, form: &LoginForm) -> Result<()> {
        let mut errors = ValidationErrors::new();
        validate::validate_email(&mut errors, &form.email);
        validate::validate_password(&mut errors, &form.password);
        if self.mode == LoginMode::Registering {
            validate::validate_code(&mut errors, &form.verification_code);
        }
        errors.into_result()
    }

    /// Submit the form in the current mode.
    pub async fn submit(&mut self, form: &LoginForm) -> Result<LoginOutcome> {
        self.validate(form)?;

        match self.mode {
            LoginMode::LoggingIn => match self.auth.login(&form.email, &form.password).await {
                Ok(user) => Ok(LoginOutcome::LoggedIn(user)),
                Err(Error::Api { message, .. }) if message.contains("验证码") => {
                    tracing::info!("Login requires e-mail verification, switching to register");
                    self.mode = LoginMode::Registering;
                    Ok(LoginOutcome::VerificationRequired)
                }
                Err(err) => Err(err),
            },
            LoginMode::Registering => {
                // Display name defaults to the e-mail local part
                let name = form
                    .email
                    .split('@')
                    .next()
                    .unwrap_or(&form.email)
                    .to_string();

                self.auth
                    .register(&RegisterRequest {
                        email: form.email.clone(),
                        name,
                        password: form.password.clone(),
                        verification_code: form.verification_code.clone(),
                    })
                    .await?;

                let user = self.auth.login(&form.email, &form.password).await?;
                self.mode = LoginMode::LoggingIn;
                Ok(LoginOutcome::LoggedIn(user))
            }
        }
    }

    /// Request a registration verification code, rate-limited to one per
    /// address per 60 seconds.
    pub async fn send_code(&mut self, email: &str) -> Result<()> {
        let mut errors = ValidationErrors::new();
        validate::validate_email(&mut errors, email);
        if let Some(remaining) = self.countdown.remaining(email) {
            errors.add("verificationCode", &format!("{}秒后重试", remaining));
        }
        errors.into_result()?;

        self.auth
            .send_verification_code(email, CodePurpose::Register)
            .await?;
        self.countdown.record(email);
        Ok(())
    }
}
