//! Session middleware and identity extractors.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use entities::Identity;
use task_store::TaskStore;

use crate::error::ServerError;
use crate::state::AppState;

/// Cookie carrying the session token for browser page requests.
pub const SESSION_COOKIE: &str = "tarefas_session";

/// Extracts the session token from the Authorization header, falling back to
/// the session cookie.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    bearer.or_else(|| {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, token)| token)
    })
}

/// Session middleware.
///
/// Resolves the caller identity from the session token and stores it in the
/// request extensions. Requests without a valid token continue anonymously;
/// handlers that need a session reject them through [`CurrentUser`].
pub async fn session_middleware<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = extract_token(request.headers()).and_then(|token| {
        match state.jwt_manager.authenticate(token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                None
            }
        }
    });

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// The authenticated caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ServerError::AuthenticationRequired)
    }
}

/// The caller identity, if any.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Identity>().cloned()))
    }
}
