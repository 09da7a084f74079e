// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use memberd_audit::Cause;
use memberd_persistence::{OperatorData, Persistence};

use crate::auth::{AuthenticatedActor, Role};
use crate::handlers::{register_member, register_partner};
use crate::{
    RegisterMemberRequest, RegisterMemberResponse, RegisterPartnerRequest, RegisterPartnerResponse,
};

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// An actor carrying the Partner role without any backing store row.
///
/// Enough for authorization-gate tests; flows that persist audit events
/// need a real operator from `setup_admin` or `setup_partner`.
pub fn create_partner_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("CLINIC@EXAMPLE.COM"), Role::Partner)
}

/// Creates a real admin operator row and returns its actor and data.
pub fn setup_admin(persistence: &mut Persistence) -> (AuthenticatedActor, OperatorData) {
    let operator_id = persistence
        .create_operator("testadmin", "Test Admin", "Admin#Pass1", "Admin")
        .unwrap();
    let operator = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    let actor = AuthenticatedActor::new(operator.login_name.clone(), Role::Admin);
    (actor, operator)
}

/// Registers an active partner and returns its id together with the
/// operator account created alongside it.
pub fn setup_partner(
    persistence: &mut Persistence,
    name: &str,
    login_email: &str,
    contact_phone: &str,
) -> (i64, AuthenticatedActor, OperatorData) {
    let response: RegisterPartnerResponse = register_partner(
        persistence,
        partner_registration(name, login_email, contact_phone),
    )
    .unwrap();
    let partner_id = response.partner_id;

    let operator = persistence
        .list_operators()
        .unwrap()
        .into_iter()
        .find(|op| op.partner_id == Some(partner_id))
        .expect("partner registration creates an operator account");
    let actor = AuthenticatedActor::new(operator.login_name.clone(), Role::Partner);
    (partner_id, actor, operator)
}

pub fn partner_registration(
    name: &str,
    login_email: &str,
    contact_phone: &str,
) -> RegisterPartnerRequest {
    RegisterPartnerRequest {
        name: String::from(name),
        partner_type: Some(String::from("clinic")),
        login_email: String::from(login_email),
        contact_email: String::from(login_email),
        contact_phone: Some(String::from(contact_phone)),
        address: Some(String::from("12 MG Road")),
        city: Some(String::from("Pune")),
        district: None,
        state: Some(String::from("Maharashtra")),
        pincode: Some(String::from("411001")),
        website: None,
        specialization: Some(String::from("General Medicine")),
        responsible_name: String::from("Dr. Rao"),
        responsible_designation: Some(String::from("Director")),
        discount_amount: Some(String::from("15%")),
        discount_items: Some(vec![String::from("Consultation")]),
        password: String::from("Clinic#123"),
    }
}

pub fn member_registration(
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> RegisterMemberRequest {
    RegisterMemberRequest {
        name: String::from(name),
        email: email.map(String::from),
        phone: phone.map(String::from),
        password: Some(String::from("Secret#123")),
        plan: None,
        family_member_count: None,
        family_details: None,
    }
}

/// Registers a member and returns the full registration response.
pub fn register_test_member(
    persistence: &mut Persistence,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> RegisterMemberResponse {
    register_member(persistence, member_registration(name, email, phone)).unwrap()
}
