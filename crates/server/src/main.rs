// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use memberd_api::{
    ActivityResponse, ApiError, ApprovePartnerRequest, ApprovePartnerResponse, BatchOutcome,
    BootstrapAuthStatusResponse, BootstrapLoginRequest, BootstrapLoginResponse,
    ChangePasswordRequest, ChangePasswordResponse, CreateFirstAdminRequest,
    CreateFirstAdminResponse, CreateOperatorRequest, CreateOperatorResponse, CreatePartnerRequest,
    CreatePartnerResponse, DashboardStatsResponse, DeleteMemberRequest, DeleteMemberResponse,
    DeleteOperatorRequest, DeleteOperatorResponse, DeletePartnerRequest, DeletePartnerResponse,
    DisableOperatorRequest, DisableOperatorResponse, EnableOperatorRequest, EnableOperatorResponse,
    ImportSheetRequest, ListDoctorsResponse, ListMembersResponse, ListOperatorsResponse,
    ListPartnersRequest, ListPartnersResponse, ListPendingPartnersResponse, LoginRequest,
    LoginResponse, MemberVisitHistoryResponse, PartnerStatsResponse, RecentMembersResponse,
    RecentPartnersResponse, RecordVisitRequest, RecordVisitResponse, RegisterMemberRequest,
    RegisterMemberResponse, RegisterPartnerRequest, RegisterPartnerResponse, RejectPartnerRequest,
    RejectPartnerResponse, ResetPasswordRequest, ResetPasswordResponse, VerifyMembershipResponse,
    WhoAmIResponse, handlers,
};
use memberd_audit::Cause;
use memberd_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::{SessionOperator, SessionToken};

/// Memberd Server - HTTP server for the membership services backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer for records, sessions, and audit events.
    persistence: Arc<Mutex<Persistence>>,
}

/// Query parameters for the partner listing.
#[derive(Debug, Deserialize)]
struct ListPartnersQuery {
    /// Substring match on the partner name.
    name: Option<String>,
    /// Exact match on the partner type.
    partner_type: Option<String>,
    /// Exact match on the city.
    city: Option<String>,
    /// Exact match on the state.
    state: Option<String>,
}

/// Plain acknowledgement response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageResponse {
    /// A success message.
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } | ApiError::PasswordPolicyViolation { .. } => {
                Self {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    message: err.to_string(),
                }
            }
            ApiError::InvalidInput { .. } | ApiError::StructuralFailure { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                // Detail goes to the log, not the client
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                }
            }
        }
    }
}

/// Builds the audit cause for a request handled by the given endpoint.
fn http_cause(endpoint: &str) -> Cause {
    Cause::new(
        format!("http-{endpoint}"),
        format!("Operator request via {endpoint} endpoint"),
    )
}

// ========================================================================
// Authentication & Bootstrap
// ========================================================================

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = handlers::login(&mut persistence, &req)?;
    drop(persistence);

    info!(login_name = %response.login_name, "Operator logged in");
    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        message: String::from("Logged out successfully"),
    }))
}

/// Handler for GET `/auth/whoami`.
// axum handlers must be async even without an await point
#[allow(clippy::unused_async)]
async fn handle_whoami(SessionOperator(_, operator): SessionOperator) -> Json<WhoAmIResponse> {
    Json(handlers::whoami(&operator))
}

/// Handler for GET `/auth/bootstrap/status`.
async fn handle_bootstrap_status(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BootstrapAuthStatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BootstrapAuthStatusResponse =
        handlers::check_bootstrap_status(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/bootstrap/login`.
async fn handle_bootstrap_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BootstrapLoginRequest>,
) -> Result<Json<BootstrapLoginResponse>, HttpError> {
    info!("Handling bootstrap login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: BootstrapLoginResponse = handlers::bootstrap_login(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/bootstrap/create-admin`.
///
/// Only available while no operators exist; the API layer enforces the
/// bootstrap-mode guard.
async fn handle_create_first_admin(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateFirstAdminRequest>,
) -> Result<Json<CreateFirstAdminResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling create first admin request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateFirstAdminResponse =
        handlers::create_first_admin(&mut persistence, req)?;
    drop(persistence);

    info!(
        operator_id = response.operator_id,
        "First admin operator created"
    );
    Ok(Json(response))
}

/// Handler for POST `/auth/change-password`.
async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, HttpError> {
    info!(login_name = %operator.login_name, "Handling change password request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ChangePasswordResponse = handlers::change_password(
        &mut persistence,
        &req,
        &actor,
        &operator,
        http_cause("change-password"),
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ========================================================================
// Members
// ========================================================================

/// Handler for POST `/members/register`.
///
/// Self-service registration; no session required.
async fn handle_register_member(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterMemberRequest>,
) -> Result<Json<RegisterMemberResponse>, HttpError> {
    info!(name = %req.name, "Handling member registration request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterMemberResponse = handlers::register_member(&mut persistence, req)?;
    drop(persistence);

    info!(
        member_id = response.member_id,
        membership_id = ?response.membership_id,
        "Member registered"
    );
    Ok(Json(response))
}

/// Handler for GET `/membership/{membership_id}`.
async fn handle_verify_membership(
    AxumState(app_state): AxumState<AppState>,
    Path(membership_id): Path<String>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<VerifyMembershipResponse>, HttpError> {
    info!(membership_id = %membership_id, "Handling membership verification request");

    let mut persistence = app_state.persistence.lock().await;
    let response: VerifyMembershipResponse =
        handlers::verify_membership(&mut persistence, &membership_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/visits`.
async fn handle_record_visit(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<RecordVisitRequest>,
) -> Result<Json<RecordVisitResponse>, HttpError> {
    info!(
        membership_id = %req.membership_id,
        partner_id = req.partner_id,
        "Handling record visit request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RecordVisitResponse = handlers::record_visit(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("visits"),
    )?;
    drop(persistence);

    info!(visit_id = response.visit_id, "Visit recorded");
    Ok(Json(response))
}

/// Handler for GET `/members`.
async fn handle_list_members(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<ListMembersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListMembersResponse = handlers::list_members(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/members/recent`.
async fn handle_recent_members(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<RecentMembersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RecentMembersResponse = handlers::recent_members(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/members/delete`.
async fn handle_delete_member(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<DeleteMemberRequest>,
) -> Result<Json<DeleteMemberResponse>, HttpError> {
    info!(member_id = req.member_id, "Handling delete member request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteMemberResponse = handlers::delete_member(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("members/delete"),
    )?;
    drop(persistence);

    info!(member_id = response.member_id, "Member deleted");
    Ok(Json(response))
}

/// Handler for GET `/members/{member_id}/visits`.
async fn handle_member_visits(
    AxumState(app_state): AxumState<AppState>,
    Path(member_id): Path<i64>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<MemberVisitHistoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MemberVisitHistoryResponse =
        handlers::member_visit_history(&mut persistence, member_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ========================================================================
// Partners
// ========================================================================

/// Handler for POST `/partners/register`.
///
/// Self-service registration; no session required.
async fn handle_register_partner(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterPartnerRequest>,
) -> Result<Json<RegisterPartnerResponse>, HttpError> {
    info!(name = %req.name, "Handling partner registration request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterPartnerResponse = handlers::register_partner(&mut persistence, req)?;
    drop(persistence);

    info!(partner_id = response.partner_id, "Partner registered");
    Ok(Json(response))
}

/// Handler for POST `/partners`.
async fn handle_create_partner(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<CreatePartnerRequest>,
) -> Result<Json<CreatePartnerResponse>, HttpError> {
    info!(name = %req.name, "Handling create partner request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatePartnerResponse = handlers::create_partner(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("partners"),
    )?;
    drop(persistence);

    info!(
        partner_id = response.partner_id,
        event_id = response.event_id,
        "Partner created"
    );
    Ok(Json(response))
}

/// Handler for GET `/partners`.
async fn handle_list_partners(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListPartnersQuery>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<ListPartnersResponse>, HttpError> {
    let request: ListPartnersRequest = ListPartnersRequest {
        name: query.name,
        partner_type: query.partner_type,
        city: query.city,
        state: query.state,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListPartnersResponse =
        handlers::list_partners(&mut persistence, request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/partners/recent`.
async fn handle_recent_partners(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<RecentPartnersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RecentPartnersResponse = handlers::recent_partners(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/partners/pending`.
async fn handle_pending_partners(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<ListPendingPartnersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListPendingPartnersResponse =
        handlers::list_pending_partners(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/partners/{partner_id}/stats`.
async fn handle_partner_stats(
    AxumState(app_state): AxumState<AppState>,
    Path(partner_id): Path<i64>,
    SessionOperator(actor, operator): SessionOperator,
) -> Result<Json<PartnerStatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PartnerStatsResponse =
        handlers::partner_stats(&mut persistence, partner_id, &actor, &operator)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/partners/{partner_id}/activity`.
async fn handle_partner_activity(
    AxumState(app_state): AxumState<AppState>,
    Path(partner_id): Path<i64>,
    SessionOperator(actor, operator): SessionOperator,
) -> Result<Json<ActivityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ActivityResponse =
        handlers::partner_activity(&mut persistence, partner_id, &actor, &operator)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/partners/approve`.
async fn handle_approve_partner(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<ApprovePartnerRequest>,
) -> Result<Json<ApprovePartnerResponse>, HttpError> {
    info!(pending_id = req.pending_id, "Handling approve partner request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ApprovePartnerResponse = handlers::approve_partner(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("partners/approve"),
    )?;
    drop(persistence);

    info!(partner_id = response.partner_id, "Partner application approved");
    Ok(Json(response))
}

/// Handler for POST `/partners/reject`.
async fn handle_reject_partner(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<RejectPartnerRequest>,
) -> Result<Json<RejectPartnerResponse>, HttpError> {
    info!(pending_id = req.pending_id, "Handling reject partner request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RejectPartnerResponse = handlers::reject_partner(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("partners/reject"),
    )?;
    drop(persistence);

    info!(pending_id = response.pending_id, "Partner application rejected");
    Ok(Json(response))
}

/// Handler for POST `/partners/delete`.
async fn handle_delete_partner(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<DeletePartnerRequest>,
) -> Result<Json<DeletePartnerResponse>, HttpError> {
    info!(partner_id = req.partner_id, "Handling delete partner request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeletePartnerResponse = handlers::delete_partner(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("partners/delete"),
    )?;
    drop(persistence);

    info!(partner_id = response.partner_id, "Partner deleted");
    Ok(Json(response))
}

// ========================================================================
// Bulk Imports & Doctor Directory
// ========================================================================

/// Handler for POST `/import/members`.
async fn handle_import_members(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Json(req): Json<ImportSheetRequest>,
) -> Result<Json<BatchOutcome>, HttpError> {
    info!("Handling member sheet import request");

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BatchOutcome = handlers::import_member_sheet(&mut persistence, req, &actor)?;
    drop(persistence);

    info!(
        total = outcome.summary.total,
        success = outcome.summary.success,
        skipped = outcome.summary.skipped,
        failure = outcome.summary.failure,
        "Member sheet import complete"
    );
    Ok(Json(outcome))
}

/// Handler for POST `/import/partners`.
async fn handle_import_partners(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Json(req): Json<ImportSheetRequest>,
) -> Result<Json<BatchOutcome>, HttpError> {
    info!("Handling partner sheet import request");

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BatchOutcome = handlers::import_partner_sheet(&mut persistence, req, &actor)?;
    drop(persistence);

    info!(
        total = outcome.summary.total,
        success = outcome.summary.success,
        skipped = outcome.summary.skipped,
        failure = outcome.summary.failure,
        "Partner sheet import complete"
    );
    Ok(Json(outcome))
}

/// Handler for POST `/import/doctors`.
async fn handle_import_doctors(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Json(req): Json<ImportSheetRequest>,
) -> Result<Json<BatchOutcome>, HttpError> {
    info!("Handling doctor sheet import request");

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BatchOutcome = handlers::import_doctor_sheet(&mut persistence, req, &actor)?;
    drop(persistence);

    info!(
        total = outcome.summary.total,
        success = outcome.summary.success,
        failure = outcome.summary.failure,
        "Doctor sheet import complete"
    );
    Ok(Json(outcome))
}

/// Handler for GET `/doctors`.
async fn handle_list_doctors(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<ListDoctorsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListDoctorsResponse = handlers::list_doctors(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ========================================================================
// Dashboard & Activity
// ========================================================================

/// Handler for GET `/dashboard/stats`.
async fn handle_dashboard_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<DashboardStatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DashboardStatsResponse = handlers::dashboard_stats(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/activity`.
async fn handle_recent_activity(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<ActivityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ActivityResponse = handlers::recent_activity(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ========================================================================
// Operator Management
// ========================================================================

/// Handler for POST `/operators`.
async fn handle_create_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<CreateOperatorRequest>,
) -> Result<Json<CreateOperatorResponse>, HttpError> {
    info!(login_name = %req.login_name, role = %req.role, "Handling create operator request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateOperatorResponse = handlers::create_operator(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("operators"),
    )?;
    drop(persistence);

    info!(operator_id = response.operator_id, "Operator created");
    Ok(Json(response))
}

/// Handler for GET `/operators`.
async fn handle_list_operators(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<ListOperatorsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListOperatorsResponse = handlers::list_operators(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/disable`.
async fn handle_disable_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<DisableOperatorRequest>,
) -> Result<Json<DisableOperatorResponse>, HttpError> {
    info!(operator_id = req.operator_id, "Handling disable operator request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DisableOperatorResponse = handlers::disable_operator(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("operators/disable"),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/enable`.
async fn handle_enable_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<EnableOperatorRequest>,
) -> Result<Json<EnableOperatorResponse>, HttpError> {
    info!(operator_id = req.operator_id, "Handling enable operator request");

    let mut persistence = app_state.persistence.lock().await;
    let response: EnableOperatorResponse = handlers::enable_operator(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("operators/enable"),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/delete`.
async fn handle_delete_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<DeleteOperatorRequest>,
) -> Result<Json<DeleteOperatorResponse>, HttpError> {
    info!(operator_id = req.operator_id, "Handling delete operator request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteOperatorResponse = handlers::delete_operator(
        &mut persistence,
        req,
        &actor,
        &operator,
        http_cause("operators/delete"),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/reset-password`.
async fn handle_reset_password(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, HttpError> {
    info!(operator_id = req.operator_id, "Handling reset password request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ResetPasswordResponse = handlers::reset_password(
        &mut persistence,
        &req,
        &actor,
        &operator,
        http_cause("operators/reset-password"),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route("/auth/change-password", post(handle_change_password))
        .route("/auth/bootstrap/status", get(handle_bootstrap_status))
        .route("/auth/bootstrap/login", post(handle_bootstrap_login))
        .route(
            "/auth/bootstrap/create-admin",
            post(handle_create_first_admin),
        )
        .route("/members/register", post(handle_register_member))
        .route("/members", get(handle_list_members))
        .route("/members/recent", get(handle_recent_members))
        .route("/members/delete", post(handle_delete_member))
        .route("/members/{member_id}/visits", get(handle_member_visits))
        .route("/membership/{membership_id}", get(handle_verify_membership))
        .route("/visits", post(handle_record_visit))
        .route("/partners/register", post(handle_register_partner))
        .route(
            "/partners",
            post(handle_create_partner).get(handle_list_partners),
        )
        .route("/partners/recent", get(handle_recent_partners))
        .route("/partners/pending", get(handle_pending_partners))
        .route("/partners/approve", post(handle_approve_partner))
        .route("/partners/reject", post(handle_reject_partner))
        .route("/partners/delete", post(handle_delete_partner))
        .route("/partners/{partner_id}/stats", get(handle_partner_stats))
        .route(
            "/partners/{partner_id}/activity",
            get(handle_partner_activity),
        )
        .route("/import/members", post(handle_import_members))
        .route("/import/partners", post(handle_import_partners))
        .route("/import/doctors", post(handle_import_doctors))
        .route("/doctors", get(handle_list_doctors))
        .route("/dashboard/stats", get(handle_dashboard_stats))
        .route("/activity", get(handle_recent_activity))
        .route(
            "/operators",
            post(handle_create_operator).get(handle_list_operators),
        )
        .route("/operators/disable", post(handle_disable_operator))
        .route("/operators/enable", post(handle_enable_operator))
        .route("/operators/delete", post(handle_delete_operator))
        .route("/operators/reset-password", post(handle_reset_password))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Memberd Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Clear out sessions that expired while the server was down
    let removed: usize = persistence.delete_expired_sessions()?;
    if removed > 0 {
        info!(removed = removed, "Removed expired sessions");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Builds a JSON request, attaching a bearer token when one is given.
    fn json_request(method: &str, uri: &str, token: Option<&str>, body: String) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body)).expect("valid request")
    }

    /// Creates the first admin through the bootstrap flow and logs in,
    /// returning the session token.
    async fn create_admin_and_login(app: &Router) -> String {
        let create_body = serde_json::to_string(&CreateFirstAdminRequest {
            login_name: String::from("rootadmin"),
            display_name: String::from("Root Admin"),
            password: String::from("Root#Pass12"),
            password_confirmation: String::from("Root#Pass12"),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/bootstrap/create-admin",
                None,
                create_body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        login_token(app, "rootadmin", "Root#Pass12").await
    }

    /// Logs in and returns the session token.
    async fn login_token(app: &Router, login_name: &str, password: &str) -> String {
        let body = serde_json::to_string(&LoginRequest {
            login_name: String::from(login_name),
            password: String::from(password),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/auth/login", None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let login: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        login.session_token
    }

    #[tokio::test]
    async fn test_bootstrap_flow_creates_admin_and_logs_in() {
        let app: Router = build_router(create_test_app_state());

        // Fresh store starts in bootstrap mode
        let status_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/auth/bootstrap/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(status_response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(status_response.into_body(), usize::MAX)
            .await
            .unwrap();
        let status: BootstrapAuthStatusResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(status.is_bootstrap_mode);

        let token = create_admin_and_login(&app).await;
        assert!(token.starts_with("session_"));

        // Bootstrap mode ends once the first admin exists
        let status_response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/auth/bootstrap/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(status_response.into_body(), usize::MAX)
            .await
            .unwrap();
        let status: BootstrapAuthStatusResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!status.is_bootstrap_mode);
    }

    #[tokio::test]
    async fn test_requests_without_token_are_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/members")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_login_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());
        create_admin_and_login(&app).await;

        let body = serde_json::to_string(&LoginRequest {
            login_name: String::from("rootadmin"),
            password: String::from("Wrong#Pass1"),
        })
        .unwrap();
        let response = app
            .oneshot(json_request("POST", "/auth/login", None, body))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_member_registration_and_verification() {
        let app: Router = build_router(create_test_app_state());
        let token = create_admin_and_login(&app).await;

        // Self-service registration needs no session
        let register_body = serde_json::to_string(&RegisterMemberRequest {
            name: String::from("Asha Verma"),
            email: Some(String::from("asha@example.com")),
            phone: Some(String::from("9876543210")),
            password: Some(String::from("Secret#123")),
            plan: None,
            family_member_count: None,
            family_details: None,
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/members/register", None, register_body))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let registered: RegisterMemberResponse = serde_json::from_slice(&bytes).unwrap();
        let membership_id = registered.membership_id.expect("identifier assigned");

        // Verification requires a session
        let verify_response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/membership/{membership_id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(verify_response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(verify_response.into_body(), usize::MAX)
            .await
            .unwrap();
        let verified: VerifyMembershipResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(verified.name, "Asha Verma");
        assert_eq!(verified.discount, "10%");
    }

    #[tokio::test]
    async fn test_unknown_membership_returns_not_found() {
        let app: Router = build_router(create_test_app_state());
        let token = create_admin_and_login(&app).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/membership/MCS-FFFFFF")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_member_registration_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());

        let body = serde_json::to_string(&RegisterMemberRequest {
            name: String::from("Asha Verma"),
            email: None,
            phone: Some(String::from("9876543210")),
            password: Some(String::from("Secret#123")),
            plan: None,
            family_member_count: None,
            family_details: None,
        })
        .unwrap();
        let first = app
            .clone()
            .oneshot(json_request("POST", "/members/register", None, body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), HttpStatusCode::OK);

        let second = app
            .oneshot(json_request("POST", "/members/register", None, body))
            .await
            .unwrap();
        assert_eq!(second.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(second.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(error.error);
        assert!(error.message.contains("already exists"));
    }

    #[tokio::test]
    async fn test_partner_operator_cannot_list_members() {
        let app: Router = build_router(create_test_app_state());
        create_admin_and_login(&app).await;

        // Self-service partner registration creates a Partner-role login
        let register_body = serde_json::to_string(&RegisterPartnerRequest {
            name: String::from("City Care Clinic"),
            partner_type: Some(String::from("clinic")),
            login_email: String::from("clinic@example.com"),
            contact_email: String::from("clinic@example.com"),
            contact_phone: Some(String::from("9123456780")),
            address: None,
            city: Some(String::from("Pune")),
            district: None,
            state: None,
            pincode: None,
            website: None,
            specialization: None,
            responsible_name: String::from("Dr. Rao"),
            responsible_designation: None,
            discount_amount: Some(String::from("15%")),
            discount_items: None,
            password: String::from("Clinic#123"),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/partners/register",
                None,
                register_body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let partner_token = login_token(&app, "clinic@example.com", "Clinic#123").await;

        let list_response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/members")
                    .header("Authorization", format!("Bearer {partner_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(list_response.status(), HttpStatusCode::FORBIDDEN);
    }
}
