use std::{collections::HashMap, sync::LazyLock};

use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use url::Url;

use crate::error::AuthError;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|shorts/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video url pattern is valid")
});

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// Extracts the 11-character video id from a YouTube URL or a bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }

    VIDEO_URL
        .captures(input)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
        .filter(|id| id.len() == 11)
        .map(str::to_string)
}

/// Random value for the `state` parameter of the authorization request.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Derives the ordinal of a playlist title under the given base name.
///
/// Returns `None` when the title doesn't start with the base name. The bare
/// base name is ordinal 1, `"<base> N"` is ordinal N, and any other suffix
/// falls back to 1.
pub fn playlist_ordinal(title: &str, base_name: &str) -> Option<u32> {
    let rest = title.strip_prefix(base_name)?;
    let ordinal = rest
        .strip_prefix(' ')
        .and_then(|n| n.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1);
    Some(ordinal)
}

/// Title of the playlist with the given ordinal.
pub fn playlist_title(base_name: &str, ordinal: u32) -> String {
    if ordinal <= 1 {
        base_name.to_string()
    } else {
        format!("{} {}", base_name, ordinal)
    }
}

/// Parses the fragment parameters of a redirect URL.
pub fn fragment_params(redirect_url: &str) -> Result<HashMap<String, String>, String> {
    let url = Url::parse(redirect_url).map_err(|e| e.to_string())?;
    let fragment = url.fragment().unwrap_or_default();
    Ok(url::form_urlencoded::parse(fragment.as_bytes())
        .into_owned()
        .collect())
}

/// Picks the access token out of implicit-grant response parameters.
///
/// When `expected_state` is given the response must carry the same `state`.
pub fn token_from_params(
    params: &HashMap<String, String>,
    expected_state: Option<&str>,
) -> Result<String, AuthError> {
    if let Some(error) = params.get("error") {
        return Err(match error.as_str() {
            "access_denied" => AuthError::ConsentDenied(error.clone()),
            _ => AuthError::Flow(error.clone()),
        });
    }

    if let Some(expected) = expected_state {
        if params.get("state").map(String::as_str) != Some(expected) {
            return Err(AuthError::Flow("state mismatch in redirect".to_string()));
        }
    }

    params
        .get("access_token")
        .filter(|t| !t.is_empty())
        .cloned()
        .ok_or_else(|| AuthError::Flow("no token in response".to_string()))
}

/// Picks the access token out of the fragment of a redirect URL.
pub fn token_from_redirect_url(
    redirect_url: &str,
    expected_state: Option<&str>,
) -> Result<String, AuthError> {
    let params = fragment_params(redirect_url).map_err(AuthError::Flow)?;
    token_from_params(&params, expected_state)
}
