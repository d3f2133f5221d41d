//! Login, registration, logout and profile management.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Gateway};
use crate::models::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User};
use crate::session::{SessionEvent, SessionState, SessionStore, StorageError};

/// Orchestrates the session lifecycle over the gateway and the session store.
///
/// Concurrent calls are allowed and are not serialized; a profile update
/// racing a logout may leave whichever write landed last.
#[derive(Clone)]
pub struct AuthService {
    gateway: Gateway,
    in_flight: Arc<AtomicUsize>,
}

/// Marks a login or registration as in flight until dropped.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AuthService {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn store(&self) -> &SessionStore {
        self.gateway.store()
    }

    /// Log in and persist the returned token and user.
    ///
    /// On a request failure the stored session is left untouched; if saving
    /// the new session fails part way, token and user are both cleared.
    /// A success response without a token is returned as-is and does not
    /// authenticate.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let _in_flight = InFlight::start(&self.in_flight);

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.gateway.post("/auth/login", &request).await?;

        let Some(ref token) = response.token else {
            warn!("Login response carried no token");
            return Ok(response);
        };

        if let Err(e) = self.persist_session(token, response.user.as_ref()).await {
            warn!(error = %e, "Failed to persist session, rolling back");
            if let Err(clear_err) = self.store().clear().await {
                warn!(error = %clear_err, "Failed to roll back partial session");
            }
            return Err(e.into());
        }

        info!(
            user_id = response.user.as_ref().map(|u| u.id.as_str()),
            "Logged in"
        );
        self.gateway.events().publish(SessionEvent::LoggedIn);
        Ok(response)
    }

    /// The previous user is dropped before the new token lands, so a token
    /// is never stored next to another account's profile.
    async fn persist_session(&self, token: &str, user: Option<&User>) -> Result<(), StorageError> {
        self.store().clear_user().await?;
        self.store().set_token(token).await?;
        if let Some(user) = user {
            self.store().set_user(user).await?;
        }
        Ok(())
    }

    /// Create an account. Registration alone does not sign the user in.
    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        data.validate().map_err(ApiError::Validation)?;

        let _in_flight = InFlight::start(&self.in_flight);
        let response: AuthResponse = self.gateway.post("/auth/register", data).await?;
        info!("Registration accepted");
        Ok(response)
    }

    /// Clear the local session, then tell the server.
    ///
    /// The local session is gone even when the server call fails; that
    /// failure is still returned.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store().clear().await?;
        self.gateway.events().publish(SessionEvent::LoggedOut);
        info!("Local session cleared");

        match self
            .gateway
            .request::<Value, _>(Method::POST, "/auth/logout", |r| r)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Logout request failed");
                Err(e)
            }
        }
    }

    /// Cached user, if any. Read failures are reported as no user.
    pub async fn current_user(&self) -> Option<User> {
        match self.store().get_user().await {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "Could not read cached user");
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        match self.store().get_token().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Could not read stored token");
                false
            }
        }
    }

    /// Update the profile and replace the cached user with the server's copy.
    pub async fn update_profile(&self, data: &ProfileUpdate) -> Result<User, ApiError> {
        let user: User = self.gateway.put("/auth/profile", data).await?;
        self.store().set_user(&user).await?;
        debug!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn state(&self) -> SessionState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SessionState::Authenticating
        } else if self.is_authenticated().await {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.gateway.events().subscribe()
    }
}
