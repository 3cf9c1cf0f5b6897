//! Client session state.
//!
//! A [`Session`] is either anonymous or authenticated (token plus user). It
//! persists both into a [`SessionStorage`] on every change, re-hydrates them at
//! startup, tracks the last known credit balance and queues the notices a
//! front-end shows as toasts.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{AuthReply, SessionUser};
use crate::storage::SessionStorage;

/// Storage key for the session token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-encoded user projection.
pub const USER_KEY: &str = "user";

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated { token: String, user: SessionUser },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// UI delays. They shape presentation only; state transitions happen after
/// the delay elapses.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Pause before a logout takes effect.
    pub logout_delay: Duration,
    /// Pause before switching to the pricing view once credits run out.
    pub pricing_redirect_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            logout_delay: Duration::from_millis(1200),
            pricing_redirect_delay: Duration::from_millis(100),
        }
    }
}

impl Timing {
    /// No delays.
    pub fn immediate() -> Self {
        Self {
            logout_delay: Duration::ZERO,
            pricing_redirect_delay: Duration::ZERO,
        }
    }
}

/// Result of [`Session::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The image as a `data:image/png;base64,...` URI.
    Image { data_uri: String, credit_balance: i64 },
    /// Not logged in; the login prompt has been raised.
    LoginRequired,
    /// Generation failed. `show_pricing` is set when the reported balance is
    /// zero and the front-end should move to the pricing view.
    Failed { message: String, show_pricing: bool },
}

/// Injectable session context.
pub struct Session {
    api: ApiClient,
    storage: Box<dyn SessionStorage>,
    timing: Timing,
    state: AuthState,
    credit: Option<i64>,
    show_login: bool,
    notices: VecDeque<Notice>,
}

impl Session {
    /// Restore the session from `storage`.
    ///
    /// A missing, empty, `"undefined"` or otherwise unparsable user value, or
    /// a missing token, yields an anonymous session and the leftover keys are
    /// cleared.
    pub fn hydrate(
        api: ApiClient,
        storage: Box<dyn SessionStorage>,
        timing: Timing,
    ) -> Result<Self, ClientError> {
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = storage.get(USER_KEY).and_then(|raw| parse_stored_user(&raw));

        let state = match (token, user) {
            (Some(token), Some(user)) => AuthState::Authenticated { token, user },
            (token, _) => {
                if token.is_some() || storage.get(USER_KEY).is_some() {
                    warn!("discarding incomplete stored session");
                    storage.remove(TOKEN_KEY)?;
                    storage.remove(USER_KEY)?;
                }
                AuthState::Anonymous
            }
        };
        debug!(
            authenticated = matches!(state, AuthState::Authenticated { .. }),
            "session hydrated"
        );

        Ok(Self {
            api,
            storage,
            timing,
            state,
            credit: None,
            show_login: false,
            notices: VecDeque::new(),
        })
    }

    /// Hydrate from `storage` and, when a stored session is restored, load
    /// its balance from the server. Front-ends mount through this.
    pub async fn start(
        api: ApiClient,
        storage: Box<dyn SessionStorage>,
        timing: Timing,
    ) -> Result<Self, ClientError> {
        let mut session = Self::hydrate(api, storage, timing)?;
        session.refresh_credits().await;
        Ok(session)
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match &self.state {
            AuthState::Authenticated { user, .. } => Some(user),
            AuthState::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token, .. } => Some(token),
            AuthState::Anonymous => None,
        }
    }

    /// Last balance fetched from the server.
    pub fn credit(&self) -> Option<i64> {
        self.credit
    }

    /// Whether the login prompt should be visible.
    pub fn show_login(&self) -> bool {
        self.show_login
    }

    pub fn set_show_login(&mut self, show: bool) {
        self.show_login = show;
    }

    /// Take all queued notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Register a new account and become authenticated as it.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let result = self.api.signup(name, email, password).await;
        self.finish_auth(result, "Signup successful").await
    }

    /// Log in and become authenticated.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let result = self.api.login(email, password).await;
        self.finish_auth(result, "Login successful").await
    }

    async fn finish_auth(
        &mut self,
        result: Result<AuthReply, ClientError>,
        fallback: &str,
    ) -> Result<(), ClientError> {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                self.notices.push_back(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        self.storage.set(TOKEN_KEY, &reply.token)?;
        self.storage
            .set(USER_KEY, &serde_json::to_string(&reply.user)?)?;
        info!(user_id = %reply.user.id, "session authenticated");

        let message = if reply.message.is_empty() {
            fallback.to_string()
        } else {
            reply.message
        };
        self.state = AuthState::Authenticated {
            token: reply.token,
            user: reply.user,
        };
        self.show_login = false;
        self.notices.push_back(Notice::success(message));

        // New token: pick up its balance.
        self.refresh_credits().await;
        Ok(())
    }

    /// Clear the session after the logout delay.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        tokio::time::sleep(self.timing.logout_delay).await;
        self.storage.remove(USER_KEY)?;
        self.storage.remove(TOKEN_KEY)?;
        self.state = AuthState::Anonymous;
        self.credit = None;
        self.show_login = false;
        self.notices.push_back(Notice::success("Logged Out Successfully"));
        info!("session cleared");
        Ok(())
    }

    /// Fetch the balance for the current token. Anonymous sessions make no
    /// call. A rejected token leaves the last known balance in place.
    pub async fn refresh_credits(&mut self) -> Option<i64> {
        let token = self.token()?.to_string();
        match self.api.credits(&token).await {
            Ok(reply) => {
                self.credit = Some(reply.credits);
                Some(reply.credits)
            }
            Err(ClientError::Rejected { message, .. }) => {
                debug!(%message, "credits refresh rejected");
                None
            }
            Err(e) => {
                self.notices.push_back(Notice::error(e.user_message()));
                None
            }
        }
    }

    /// Ask the server for an image.
    ///
    /// Anonymous sessions raise the login prompt without calling the server.
    /// A failure reporting a zero balance waits the redirect delay and asks
    /// for the pricing view.
    pub async fn generate(&mut self, prompt: &str) -> GenerateOutcome {
        let Some(token) = self.token().map(str::to_string) else {
            self.show_login = true;
            return GenerateOutcome::LoginRequired;
        };

        match self.api.generate_image(&token, prompt).await {
            Ok(image) => {
                self.credit = Some(image.credit_balance);
                GenerateOutcome::Image {
                    data_uri: image.result_image,
                    credit_balance: image.credit_balance,
                }
            }
            Err(e) => {
                let message = e.user_message();
                self.notices.push_back(Notice::error(message.clone()));
                let exhausted = matches!(
                    e,
                    ClientError::Rejected {
                        credit_balance: Some(0),
                        ..
                    }
                );
                if matches!(e, ClientError::Rejected { .. }) {
                    self.refresh_credits().await;
                }
                if exhausted {
                    tokio::time::sleep(self.timing.pricing_redirect_delay).await;
                }
                GenerateOutcome::Failed {
                    message,
                    show_pricing: exhausted,
                }
            }
        }
    }
}

fn parse_stored_user(raw: &str) -> Option<SessionUser> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" {
        return None;
    }
    serde_json::from_str(raw).ok()
}
