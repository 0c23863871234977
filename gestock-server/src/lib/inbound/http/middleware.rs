use auth::Identity;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that validates bearer tokens and attaches the caller's
/// [`Identity`] to request extensions.
///
/// A request that already carries an identity is admitted unchanged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = state
        .authenticator
        .authorize(req.extensions().get::<Identity>(), header)
        .map_err(|e| {
            tracing::warn!(reason = %e, uri = %req.uri(), "Authentication failed");
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Middleware that admits only administrators.
///
/// Must run after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| ApiError::from(auth::AccessError::MissingCredential).into_response())?;

    auth::guard::require_role(identity, auth::Role::Admin).map_err(|e| {
        tracing::warn!(user_id = %identity.id, role = %identity.role, "Administrator route refused");
        ApiError::from(e).into_response()
    })?;

    Ok(next.run(req).await)
}
