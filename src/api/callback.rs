use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{server::CallbackState, utils, warning, youtube::auth::AuthFlowStatus};

const RELAY_PAGE: &str = r#"<!doctype html>
<html>
  <body>
    <p>Completing sign-in...</p>
    <script>
      const params = window.location.hash.length > 1
        ? window.location.hash.substring(1)
        : window.location.search.substring(1);
      window.location.replace('/token?' + params);
    </script>
  </body>
</html>"#;

pub async fn callback() -> Html<&'static str> {
    Html(RELAY_PAGE)
}

pub async fn token(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    match utils::token_from_params(&params, Some(&state.expected_state)) {
        Ok(token) => {
            if state.settle(AuthFlowStatus::Completed(token)) {
                Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>")
            } else {
                Html("<h4>This sign-in was already completed.</h4>")
            }
        }
        Err(e) => {
            warning!("Authorization failed: {}", e);
            state.settle(AuthFlowStatus::Failed(e));
            Html("<h4>Login failed.</h4>")
        }
    }
}
