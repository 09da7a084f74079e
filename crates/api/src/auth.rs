// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator authentication and role-based authorization.
//!
//! Sessions are opaque bearer tokens persisted alongside the operator
//! account. `AuthenticationService` owns login, session validation,
//! and logout. `AuthorizationService` owns partner scoping, the one
//! check that needs more than a role comparison; plain admin-only
//! gates live inline in the handlers.

use memberd_audit::Actor;
use memberd_persistence::{OperatorData, PersistenceError, SessionData, Persistence};
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated operator may perform.
/// Roles apply only to operators, never to members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators with full administrative authority.
    ///
    /// Admins may perform:
    /// - bulk spreadsheet imports (members, partners, doctors)
    /// - partner application approval and rejection
    /// - operator account management
    /// - record deletion and listing queries
    /// - any other system-level or corrective actions
    Admin,
    /// Partner role: operators acting for a single partner facility.
    ///
    /// Partner operators may:
    /// - verify memberships presented at their facility
    /// - record visits for their own facility
    /// - read their own facility's activity feed
    ///
    /// A Partner operator is linked to exactly one partner record and
    /// cannot act for any other facility.
    Partner,
}

/// A logged-in operator, reduced to what authorization needs.
///
/// Carries the login name as identifier plus the parsed role; the
/// full `OperatorData` travels separately when handlers need more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Builds the audit `Actor` that attributes an action to this
    /// operator, snapshotting login and display name at event time.
    #[must_use]
    pub fn to_audit_actor(&self, operator: &OperatorData) -> Actor {
        Actor::with_operator(
            operator.operator_id.to_string(),
            String::from("operator"),
            operator.operator_id,
            operator.login_name.clone(),
            operator.display_name.clone(),
        )
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Admin-only gates are enforced inline by each handler so the rejected
/// action carries the handler's own name. This service owns the one check
/// that needs more than a role comparison.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may act on behalf of a specific partner facility.
    ///
    /// Admin actors may act for any facility. Partner actors may act only
    /// for the facility their operator account is linked to.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `operator` - The operator data carrying the linked partner id
    /// * `partner_id` - The facility the action targets
    /// * `action` - The action name reported on rejection
    ///
    /// # Errors
    ///
    /// Returns an error if a Partner actor targets a facility other than
    /// its own.
    pub fn authorize_partner_scope(
        actor: &AuthenticatedActor,
        operator: &OperatorData,
        partner_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Partner => {
                if operator.partner_id == Some(partner_id) {
                    Ok(())
                } else {
                    Err(AuthError::Unauthorized {
                        action: String::from(action),
                        required_role: String::from("Admin"),
                    })
                }
            }
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates an operator and creates a session.
    ///
    /// Validates the password against the stored bcrypt hash. Rejects
    /// disabled operators. Login name lookup is case-insensitive (login
    /// names are stored uppercase-normalized).
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `login_name` - The operator login name
    /// * `password` - The plaintext password to verify
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, OperatorData), AuthError> {
        // An unknown login and a wrong password produce the same
        // message, so callers cannot probe which logins exist
        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid login or password"),
            })?;

        let password_valid: bool = persistence
            .verify_password(password, &operator.password_hash)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Password verification failed: {e}"),
            })?;

        if !password_valid {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid login or password"),
            });
        }

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let role: Role = Self::parse_role(&operator.role)?;
        let session_token: String = Self::generate_session_token();

        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, operator.operator_id, &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(operator.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((session_token, authenticated_actor, operator))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, OperatorData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        // Disabling an operator invalidates their live sessions on the
        // next request, not just future logins
        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let role: Role = Self::parse_role(&operator.role)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((authenticated_actor, operator))
    }

    /// Logs out by deleting the session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to delete
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Parses a stored role string, rejecting anything unrecognized.
    fn parse_role(role: &str) -> Result<Role, AuthError> {
        match role {
            "Admin" => Ok(Role::Admin),
            "Partner" => Ok(Role::Partner),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {role}"),
            }),
        }
    }

    /// Generates an opaque session token.
    ///
    /// Nanosecond timestamp plus a random suffix; the suffix keeps
    /// tokens distinct even if two logins land on the same tick.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
