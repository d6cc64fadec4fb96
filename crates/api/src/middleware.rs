use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use letmeask_core::UserId;

use crate::app::errors::json_error;
use crate::auth::{AuthError, TokenVerifier};
use crate::context::UserContext;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let user_id = match authenticate(&state, req.headers()) {
        Ok(user_id) => user_id,
        Err(err) => {
            debug!(error = %err, "rejecting unauthenticated request");
            return json_error(StatusCode::UNAUTHORIZED, "unauthorized", err.to_string());
        }
    };

    req.extensions_mut().insert(UserContext::new(user_id));
    next.run(req).await
}

fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<UserId, AuthError> {
    let token = extract_bearer(headers).ok_or(AuthError::MissingToken)?;
    state.verifier.verify(token)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_tokens_only() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
