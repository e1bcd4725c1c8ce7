use crate::auth::UpdateProfileRequest;
use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::client::store::TokenStore;
use crate::models::User;

/// The client-side auth state. Authenticated holds both the identity and
/// the token; they only ever change together.
#[derive(Debug)]
pub enum Session {
    /// Constructed, restore not yet attempted.
    Uninitialized,
    /// Restore from the persisted token is in flight.
    Restoring,
    /// No usable session.
    Anonymous,
    /// Logged in.
    Authenticated { user: User, token: String },
}

/// Owns the session lifecycle for a client process: one silent restore
/// attempt at startup, then explicit login/signup/logout/profile updates.
///
/// The manager does not react to `Unauthorized` results from other calls on
/// its own; the holder decides when to call [`SessionManager::logout`].
pub struct SessionManager<S: TokenStore> {
    api: ApiClient,
    store: S,
    session: Session,
}

impl<S: TokenStore> SessionManager<S> {
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        Self {
            api: ApiClient::new(base_url),
            store,
            session: Session::Uninitialized,
        }
    }

    /// Attempts to restore the session from the persisted token. Runs at
    /// most once; later calls are no-ops.
    ///
    /// A token the server rejects is cleared from storage and the session
    /// becomes anonymous. A transport failure also leaves the session
    /// anonymous but keeps the stored token, since nothing proved it stale,
    /// and propagates the error.
    pub async fn initialize(&mut self) -> Result<(), ClientError> {
        if !matches!(self.session, Session::Uninitialized) {
            return Ok(());
        }

        let Some(token) = self.store.load() else {
            self.session = Session::Anonymous;
            return Ok(());
        };

        self.session = Session::Restoring;
        match self.api.me(&token).await {
            Ok(user) => {
                self.session = Session::Authenticated { user, token };
                Ok(())
            }
            Err(e) if e.is_auth_failure() => {
                self.store.clear()?;
                self.session = Session::Anonymous;
                Ok(())
            }
            Err(e) => {
                self.session = Session::Anonymous;
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let auth = self.api.login(email, password).await?;
        self.store.save(&auth.token)?;
        self.session = Session::Authenticated {
            user: auth.user,
            token: auth.token,
        };
        Ok(())
    }

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let auth = self.api.register(name, email, password).await?;
        self.store.save(&auth.token)?;
        self.session = Session::Authenticated {
            user: auth.user,
            token: auth.token,
        };
        Ok(())
    }

    /// Tears the session down. In-memory state is cleared even if removing
    /// the persisted token fails.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session = Session::Anonymous;
        self.store.clear()?;
        Ok(())
    }

    /// Replaces the held identity with the server-returned record; the
    /// token is unchanged.
    pub async fn update_profile(
        &mut self,
        updates: &UpdateProfileRequest,
    ) -> Result<(), ClientError> {
        let Session::Authenticated { token, .. } = &self.session else {
            return Err(ClientError::Unauthorized("Not authenticated".into()));
        };

        let user = self.api.update_profile(token, updates).await?;
        if let Session::Authenticated { user: held, .. } = &mut self.session {
            *held = user;
        }
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, Session::Authenticated { .. })
    }

    /// True while the startup restore has not settled yet.
    pub fn is_loading(&self) -> bool {
        matches!(self.session, Session::Uninitialized | Session::Restoring)
    }

    pub fn user(&self) -> Option<&User> {
        match &self.session {
            Session::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.session {
            Session::Authenticated { token, .. } => Some(token.as_str()),
            _ => None,
        }
    }

    /// The API client, for calls outside the session lifecycle (tasks).
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
