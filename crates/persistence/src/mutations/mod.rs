// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing persistence operations.
//!
//! Every mutation is written once inside `backend_fn!` and compiled
//! per backend. Bodies stick to Diesel DSL; the only backend-specific
//! reach-through is the `PersistenceBackend` trait, mainly for
//! insert-id retrieval.
//!
//! Writes that must stay consistent with their audit event (deletes,
//! visits, lifecycle transitions) run inside a single transaction in
//! the module that owns them.

pub mod audit;
pub mod doctors;
pub mod members;
pub mod operators;
pub mod partners;

// Generated per-backend variants, consumed by the adapter's dispatch
pub use audit::{persist_audit_event_mysql, persist_audit_event_sqlite};
pub use doctors::{create_doctor_mysql, create_doctor_sqlite};
pub use members::{
    assign_membership_id_mysql, assign_membership_id_sqlite, create_member_mysql,
    create_member_sqlite, delete_member_mysql, delete_member_sqlite, record_visit_mysql,
    record_visit_sqlite,
};
pub use operators::{
    create_operator_mysql, create_operator_sqlite, create_session_mysql, create_session_sqlite,
    delete_expired_sessions_mysql, delete_expired_sessions_sqlite, delete_operator_mysql,
    delete_operator_sqlite, delete_session_mysql, delete_session_sqlite,
    delete_sessions_for_operator_mysql, delete_sessions_for_operator_sqlite,
    disable_operator_mysql, disable_operator_sqlite, enable_operator_mysql, enable_operator_sqlite,
    update_last_login_mysql, update_last_login_sqlite, update_password_mysql,
    update_password_sqlite, update_session_activity_mysql, update_session_activity_sqlite,
};
pub use partners::{
    create_partner_mysql, create_partner_sqlite, create_pending_partner_mysql,
    create_pending_partner_sqlite, delete_partner_mysql, delete_partner_sqlite,
    promote_partner_mysql, promote_partner_sqlite, reject_partner_mysql, reject_partner_sqlite,
};
