// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Axum extractors that enforce authentication at the server boundary.
//!
//! Handlers name one of two extractors in their signature:
//! [`SessionOperator`] for routes that require a live session, and
//! [`SessionToken`] for logout, which takes the raw token. Extraction
//! failures become 401 responses before the handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use memberd_api::{AuthenticatedActor, AuthenticationService};
use memberd_persistence::OperatorData;
use tracing::{debug, warn};

use crate::AppState;

/// The operator behind a request, resolved from a bearer token.
///
/// Pulls `Authorization: Bearer <token>` from the request and runs it
/// through [`AuthenticationService::validate_session`], which checks
/// the token, its expiration, and the operator's disabled flag in one
/// pass. A missing or malformed header, a stale or unknown token, and
/// a disabled account all reject with 401.
pub struct SessionOperator(pub AuthenticatedActor, pub OperatorData);

impl FromRequestParts<AppState> for SessionOperator {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let mut persistence = state.persistence.lock().await;
        let (actor, operator) = AuthenticationService::validate_session(&mut persistence, &token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;

        debug!(
            login_name = %operator.login_name,
            role = ?actor.role,
            "Session validated successfully"
        );

        Ok(Self(actor, operator))
    }
}

/// Extractor for the raw session token, without validation.
///
/// Used by logout, where the token is the subject of the request rather
/// than a credential to check first.
pub struct SessionToken(pub String);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(parts).map(Self)
    }
}

fn bearer_token(parts: &Parts) -> Result<String, SessionError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Authorization header does not start with 'Bearer '");
        SessionError::InvalidAuthorizationHeader
    })?;

    Ok(token.to_string())
}

/// Rejections from the session extractors. All of them map to 401.
#[derive(Debug)]
pub enum SessionError {
    /// No Authorization header on the request.
    MissingAuthorizationHeader,
    /// The header was present but not `Bearer <token>`.
    InvalidAuthorizationHeader,
    /// The token did not resolve to a live session.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header")
            }
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    format!("Session validation failed: {reason}"),
                )
                    .into_response();
            }
        };

        (status, message).into_response()
    }
}
