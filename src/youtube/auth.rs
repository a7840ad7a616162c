use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::{process::Command, sync::watch};
use url::Url;

use crate::{
    config,
    error::AuthError,
    server::{self, CallbackState},
    utils, warning,
};

/// Environment variable carrying the token into the revoke command.
pub const TOKEN_ENV: &str = "TUBESTASH_TOKEN";

/// Progress of an authorization flow, published on a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFlowStatus {
    Pending,
    Completed(String),
    Failed(AuthError),
}

/// Handle to an authorization flow that was started but may not be finished.
///
/// Starting a flow never waits for it. Completion is delivered separately:
/// callers either poll [`AuthFlowHandle::status`], subscribe to the watch
/// channel, or await [`AuthFlowHandle::wait`].
#[derive(Debug)]
pub struct AuthFlowHandle {
    auth_url: Option<String>,
    status: watch::Receiver<AuthFlowStatus>,
}

impl AuthFlowHandle {
    pub fn new(auth_url: Option<String>, status: watch::Receiver<AuthFlowStatus>) -> Self {
        Self { auth_url, status }
    }

    /// A handle for a flow that already finished.
    pub fn completed(result: Result<String, AuthError>) -> Self {
        let status = match result {
            Ok(token) => AuthFlowStatus::Completed(token),
            Err(e) => AuthFlowStatus::Failed(e),
        };
        let (_tx, rx) = watch::channel(status);
        Self::new(None, rx)
    }

    /// URL the user has to visit, for flows that go through a browser.
    pub fn auth_url(&self) -> Option<&str> {
        self.auth_url.as_deref()
    }

    pub fn status(&self) -> AuthFlowStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthFlowStatus> {
        self.status.clone()
    }

    /// Waits for the flow to leave the pending state.
    pub async fn wait(mut self, timeout: Duration) -> Result<String, AuthError> {
        let settled = self
            .status
            .wait_for(|s| !matches!(s, AuthFlowStatus::Pending));

        match tokio::time::timeout(timeout, settled).await {
            Err(_) => Err(AuthError::TimedOut(timeout.as_secs())),
            Ok(Err(_)) => Err(AuthError::Flow(
                "authorization flow ended without a result".to_string(),
            )),
            Ok(Ok(status)) => match &*status {
                AuthFlowStatus::Completed(token) => Ok(token.clone()),
                AuthFlowStatus::Failed(e) => Err(e.clone()),
                AuthFlowStatus::Pending => Err(AuthError::Flow(
                    "authorization flow is still pending".to_string(),
                )),
            },
        }
    }
}

/// Source of fresh bearer tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Starts issuing a token and returns without awaiting the result.
    async fn begin(&self, interactive: bool) -> Result<AuthFlowHandle, AuthError>;

    /// Drops whatever the issuer itself cached for `token`.
    async fn revoke(&self, _token: &str) {}
}

/// Builds a command that runs `line` through the platform shell.
fn shell(line: &str) -> Command {
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C");
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c");
        c
    };
    command.arg(line);
    command
}

/// Runs an external command that prints a bearer token to stdout.
///
/// The command owns consent and caching, e.g. `gcloud auth print-access-token`.
/// An optional revoke command lets the broker drop a token the remote API
/// rejected.
pub struct CommandBroker {
    command: String,
    revoke_command: Option<String>,
}

impl CommandBroker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            revoke_command: None,
        }
    }

    /// Sets the command run by [`TokenIssuer::revoke`]. It receives the token
    /// in the `TUBESTASH_TOKEN` environment variable.
    pub fn with_revoke_command(mut self, command: Option<String>) -> Self {
        self.revoke_command = command;
        self
    }

    async fn run(&self) -> Result<String, AuthError> {
        let output = shell(&self.command)
            .output()
            .await
            .map_err(|e| AuthError::Flow(format!("cannot run token command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AuthError::Flow(format!(
                "token command exited with {}: {}",
                output.status, stderr
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(AuthError::Flow("token command printed no token".to_string()));
        }
        Ok(token)
    }
}

#[async_trait]
impl TokenIssuer for CommandBroker {
    async fn begin(&self, _interactive: bool) -> Result<AuthFlowHandle, AuthError> {
        Ok(AuthFlowHandle::completed(self.run().await))
    }

    async fn revoke(&self, token: &str) {
        let Some(revoke_command) = &self.revoke_command else {
            return;
        };

        match shell(revoke_command)
            .env(TOKEN_ENV, token)
            .output()
            .await
        {
            Ok(output) if output.status.success() => {}
            Ok(output) => warning!("Token revoke command exited with {}", output.status),
            Err(e) => warning!("Cannot run token revoke command: {}", e),
        }
    }
}

/// Implicit-grant authorization through the system browser.
///
/// The token comes back in the fragment of the redirect URL, which the local
/// callback server relays to itself and publishes on the flow's channel.
pub struct RedirectFlow {
    client_id: Option<String>,
    auth_url: String,
    redirect_uri: String,
    scope: String,
    server_addr: String,
    revoke_url: String,
    client: Client,
}

impl RedirectFlow {
    pub fn new(
        client_id: Option<String>,
        auth_url: String,
        redirect_uri: String,
        scope: String,
        server_addr: String,
    ) -> Self {
        Self {
            client_id,
            auth_url,
            redirect_uri,
            scope,
            server_addr,
            revoke_url: config::DEFAULT_REVOKE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            config::youtube_client_id(),
            config::youtube_auth_url(),
            config::youtube_redirect_uri(),
            config::youtube_auth_scope(),
            config::server_addr(),
        )
        .with_revoke_url(config::youtube_revoke_url())
    }

    pub fn with_revoke_url(mut self, revoke_url: impl Into<String>) -> Self {
        self.revoke_url = revoke_url.into();
        self
    }

    /// Builds the authorization URL for the given anti-forgery state.
    pub fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let client_id = self.client_id.as_deref().ok_or(AuthError::MissingClientId)?;
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", client_id),
                ("response_type", "token"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Flow(format!("invalid authorization url: {}", e)))?;
        Ok(url.to_string())
    }
}

#[async_trait]
impl TokenIssuer for RedirectFlow {
    async fn begin(&self, interactive: bool) -> Result<AuthFlowHandle, AuthError> {
        // a browser round trip always needs the user
        if !interactive {
            return Err(AuthError::InteractionRequired);
        }

        let state = utils::generate_state();
        let auth_url = self.authorization_url(&state)?;

        let listener = server::bind(&self.server_addr)
            .await
            .map_err(|e| AuthError::Flow(format!("cannot start callback server: {}", e)))?;

        let (tx, rx) = watch::channel(AuthFlowStatus::Pending);
        let callback_state = CallbackState {
            expected_state: state,
            status: Arc::new(tx),
        };
        tokio::spawn(server::serve_callback(listener, callback_state));

        if webbrowser::open(&auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        }

        Ok(AuthFlowHandle::new(Some(auth_url), rx))
    }

    /// Revokes the token at the authorization server.
    ///
    /// A 400 answer means the token is already invalid and is not reported.
    async fn revoke(&self, token: &str) {
        let response = self
            .client
            .post(&self.revoke_url)
            .form(&[("token", token)])
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() || res.status() == StatusCode::BAD_REQUEST => {}
            Ok(res) => warning!("Token revocation failed with status {}", res.status()),
            Err(e) => warning!("Token revocation failed: {}", e),
        }
    }
}

/// Picks the issuer configured in the environment.
///
/// A configured `TOKEN_COMMAND` wins over the browser redirect flow.
pub fn issuer_from_env() -> Arc<dyn TokenIssuer> {
    match config::token_command() {
        Some(command) => Arc::new(
            CommandBroker::new(command).with_revoke_command(config::token_revoke_command()),
        ),
        None => Arc::new(RedirectFlow::from_env()),
    }
}
