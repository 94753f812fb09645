// Auth UI flow state machines

mod forgot_password;
mod login;
pub mod validate;

pub use forgot_password::{PasswordResetFlow, ResetStep};
pub use login::{LoginFlow, LoginForm, LoginMode, LoginOutcome};

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum interval between verification-code requests per address
pub const RESEND_INTERVAL: Duration = Duration::from_secs(60);

/// Client-side rate limit on "send verification code", per address.
#[derive(Debug, Default)]
pub struct CodeCountdown {
    sent_at: HashMap<String, Instant>,
}

impl CodeCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds until this address may request another code; `None` when
    /// a request is allowed now.
    pub fn remaining(&self, email: &str) -> Option<u64> {
        let sent_at = self.sent_at.get(email)?;
        let elapsed = sent_at.elapsed();
        if elapsed >= RESEND_INTERVAL {
            None
        } else {
            Some((RESEND_INTERVAL - elapsed).as_secs().max(1))
        }
    }

    /// Record a successful send, starting the countdown for this address.
    pub fn record(&mut self, email: &str) {
        self.sent_at.insert(email.to_string(), Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_is_per_address() {
        let mut countdown = CodeCountdown::new();
        assert!(countdown.remaining("a@b.com").is_none());

        countdown.record("a@b.com");
        let remaining = countdown.remaining("a@b.com").unwrap();
        assert!(remaining > 0 && remaining <= 60);

        // Another address is unaffected
        assert!(countdown.remaining("c@d.com").is_none());
    }
}
