use std::sync::Arc;

use crate::{
    error, info,
    management::{CredentialProvider, FileStore, Session},
    success,
    youtube::auth::issuer_from_env,
};

fn credentials() -> CredentialProvider {
    CredentialProvider::new(
        issuer_from_env(),
        Arc::new(FileStore::default()),
        Arc::new(Session::new()),
    )
}

pub async fn auth() {
    let credentials = credentials();

    let handle = match credentials.begin_login().await {
        Ok(handle) => handle,
        Err(e) => error!("Cannot start authorization. Err: {}", e),
    };

    if handle.auth_url().is_some() {
        info!("Waiting for the authorization to complete in the browser...");
    }

    match credentials.complete_login(handle).await {
        Ok(_) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed. Err: {}", e),
    }
}

pub async fn logout() {
    credentials().invalidate().await;
    success!("Cached token removed.");
}
