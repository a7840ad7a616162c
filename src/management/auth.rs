use std::{sync::Arc, time::Duration};

use crate::{
    config,
    error::AuthError,
    info,
    management::{
        Session,
        store::{KeyValueStore, TOKEN_KEY},
    },
    types::Token,
    warning,
    youtube::auth::{AuthFlowHandle, TokenIssuer},
};

/// Obtains and caches the bearer token for a session.
///
/// The token lives in the session's memory and in the key-value store. A
/// cached token is trusted until the remote API rejects it, at which point
/// [`CredentialProvider::invalidate`] drops it everywhere.
pub struct CredentialProvider {
    issuer: Arc<dyn TokenIssuer>,
    store: Arc<dyn KeyValueStore>,
    session: Arc<Session>,
    flow_timeout: Duration,
}

impl CredentialProvider {
    pub fn new(
        issuer: Arc<dyn TokenIssuer>,
        store: Arc<dyn KeyValueStore>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            issuer,
            store,
            session,
            flow_timeout: config::auth_timeout(),
        }
    }

    pub fn with_flow_timeout(mut self, timeout: Duration) -> Self {
        self.flow_timeout = timeout;
        self
    }

    /// Returns a bearer token, running an authorization round trip if needed.
    ///
    /// Non-interactive calls return the cached token without touching the
    /// network. Without a cached token they try a silent issuance first and
    /// fall back to an interactive one. Interactive calls always issue a fresh
    /// token and report failures as is.
    ///
    /// Only call this in direct response to a user action: an interactive
    /// round trip may need to show a consent prompt.
    pub async fn get_token(&self, interactive: bool) -> Result<Token, AuthError> {
        if !interactive {
            if let Some(token) = self.cached().await {
                return Ok(Token::cached(token));
            }

            match self.issue(false).await {
                Ok(token) => return Ok(token),
                Err(AuthError::InteractionRequired) => {}
                Err(e) => {
                    info!("Silent authorization failed ({}), asking for consent...", e);
                }
            }
        }

        self.issue(true).await
    }

    /// Starts an authorization flow without waiting for it.
    ///
    /// Pair with [`CredentialProvider::complete_login`], which waits for the
    /// flow's completion notification and stores the token.
    pub async fn begin_login(&self) -> Result<AuthFlowHandle, AuthError> {
        self.issuer.begin(true).await
    }

    pub async fn complete_login(&self, handle: AuthFlowHandle) -> Result<Token, AuthError> {
        let value = handle.wait(self.flow_timeout).await?;
        self.remember(&value).await;
        Ok(Token::issued(value))
    }

    /// Drops the token from memory and from the store.
    pub async fn invalidate(&self) {
        let in_memory = self.session.take_token().await;
        let persisted = self.store.get(TOKEN_KEY).await.ok().flatten();

        if let Err(e) = self.store.remove(TOKEN_KEY).await {
            warning!("Failed to remove token from cache: {}", e);
        }

        if let Some(token) = in_memory.or(persisted) {
            self.issuer.revoke(&token).await;
        }
    }

    async fn cached(&self) -> Option<String> {
        if let Some(token) = self.session.token().await {
            return Some(token);
        }

        match self.store.get(TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => {
                self.session.set_token(token.clone()).await;
                Some(token)
            }
            Ok(_) => None,
            Err(e) => {
                warning!("Failed to read cached token: {}", e);
                None
            }
        }
    }

    async fn issue(&self, interactive: bool) -> Result<Token, AuthError> {
        let handle = self.issuer.begin(interactive).await?;
        self.complete_login(handle).await
    }

    async fn remember(&self, value: &str) {
        self.session.set_token(value.to_string()).await;
        if let Err(e) = self.store.set(TOKEN_KEY, value).await {
            warning!("Failed to save token to cache: {}", e);
        }
    }
}
