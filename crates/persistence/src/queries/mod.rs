// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only persistence queries.
//!
//! Like the mutations, each query is written once inside `backend_fn!`
//! and emitted as `_sqlite` and `_mysql` monomorphic variants; the
//! `Persistence` adapter picks one per call. Queries never write, so
//! none of them open transactions.

pub mod audit;
pub mod doctors;
pub mod members;
pub mod operators;
pub mod partners;
pub mod stats;

// Generated per-backend variants, consumed by the adapter's dispatch
pub use audit::{
    get_audit_event_mysql, get_audit_event_sqlite, partner_activity_mysql, partner_activity_sqlite,
    recent_activity_mysql, recent_activity_sqlite,
};
pub use doctors::{count_doctors_mysql, count_doctors_sqlite, list_doctors_mysql, list_doctors_sqlite};
pub use members::{
    count_members_mysql, count_members_sqlite, get_member_by_membership_id_mysql,
    get_member_by_membership_id_sqlite, get_member_mysql, get_member_sqlite, list_members_mysql,
    list_members_sqlite, member_identity_exists_mysql, member_identity_exists_sqlite,
    member_visits_mysql, member_visits_sqlite, recent_members_mysql, recent_members_sqlite,
};
pub use operators::{
    count_active_admin_operators_mysql, count_active_admin_operators_sqlite, count_operators_mysql,
    count_operators_sqlite, get_operator_by_id_mysql, get_operator_by_id_sqlite,
    get_operator_by_login_mysql, get_operator_by_login_sqlite, get_session_by_token_mysql,
    get_session_by_token_sqlite, is_operator_referenced_mysql, is_operator_referenced_sqlite,
    list_operators_mysql, list_operators_sqlite, verify_password,
};
pub use partners::{
    count_active_partners_mysql, count_active_partners_sqlite, get_partner_mysql,
    get_partner_sqlite, get_pending_partner_mysql, get_pending_partner_sqlite, list_partners_mysql,
    list_partners_sqlite, list_pending_partners_mysql, list_pending_partners_sqlite,
    partner_identity_exists_mysql, partner_identity_exists_sqlite, recent_partners_mysql,
    recent_partners_sqlite,
};
pub use stats::{partner_stats_mysql, partner_stats_sqlite};
