// Session types

/// The token pair for an authenticated session.
///
/// The access token is the only value ever sent as a bearer header; the
/// refresh token is sent only in the refresh request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session lifecycle notifications delivered to subscribers.
///
/// `Cleared` doubles as the "navigate to the login entry point" signal
/// for the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was created from a successful login or registration
    Established,
    /// The access token was replaced after a successful refresh
    Refreshed,
    /// The session ended (logout or irrecoverable refresh failure)
    Cleared,
}

/// Observer for session lifecycle changes
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: SessionEvent);
}
