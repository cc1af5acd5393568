//! Session and identity: login, the persisted credential, route guarding.

mod claims;
mod error;
mod route;

pub use claims::*;
pub use error::*;
pub use route::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::api::{Credentials, StoreApi};
use crate::domain::Role;
use crate::storage::{keys, KeyValueStore};

/// A decoded, unexpired credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub claims: Claims,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }

    pub fn role(&self) -> Role {
        self.claims.role()
    }

    /// Where a freshly signed-in user lands.
    pub fn landing_route(&self) -> Route {
        if self.role().is_admin() {
            Route::AdminPage
        } else {
            Route::UserPage
        }
    }
}

/// Owns the credential kept in the persistent store.
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<dyn StoreApi>,
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn StoreApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store }
    }

    /// Exchanges credentials for a token and persists it along with the user
    /// id and role. Any previous credential is dropped first.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, SessionError> {
        self.logout()?;

        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let auth = self.api.login(credentials).await.map_err(|e| {
            warn!(error = %e, "Login rejected");
            SessionError::Login(e)
        })?;
        let claims = Claims::decode(&auth.token)?;

        self.store.set(keys::TOKEN, &auth.token)?;
        self.store.set(keys::USER_ID, &claims.sub)?;
        self.store.set(keys::ROLE, &claims.scope)?;
        self.api.set_bearer_token(Some(auth.token.clone()));

        info!(user_id = %claims.sub, role = %claims.role(), "Signed in");
        Ok(Session { token: auth.token, claims })
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(keys::TOKEN)?;
        self.store.remove(keys::USER_ID)?;
        self.store.remove(keys::ROLE)?;
        self.api.set_bearer_token(None);
        Ok(())
    }

    /// Loads the persisted credential and checks it is still usable at `now`.
    /// A valid credential is also installed as the API bearer token.
    pub fn current(&self, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let token = self.store.get(keys::TOKEN)?.ok_or(SessionError::Missing)?;
        let claims = Claims::decode(&token)?;
        if claims.is_expired_at(now) {
            return Err(SessionError::Expired(claims.exp));
        }
        self.api.set_bearer_token(Some(token.clone()));
        Ok(Session { token, claims })
    }

    /// The route that should actually be shown when `requested` is asked for.
    #[instrument(skip(self, now), fields(requested = %requested))]
    pub fn guard(&self, requested: Route, now: DateTime<Utc>) -> Route {
        if !requested.requires_session() {
            return requested;
        }
        match self.current(now) {
            Ok(session) if requested == Route::AdminPage && !session.role().is_admin() => {
                warn!(user_id = %session.user_id(), "Admin page denied");
                Route::UserPage
            }
            Ok(_) => requested,
            Err(e) => {
                warn!(error = %e, "Redirecting to login");
                Route::Login
            }
        }
    }
}
