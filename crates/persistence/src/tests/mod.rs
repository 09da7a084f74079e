// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod initialization_tests;
mod member_tests;
mod operator_tests;
mod partner_tests;

use memberd_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use memberd_domain::{
    Doctor, Member, Partner, PartnerLocation, PartnerStatus, Provenance, Responsible,
};
use time::Date;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Creates a minimal audit event for mutations that persist one.
pub fn create_test_event(action_name: &str) -> AuditEvent {
    AuditEvent::new(
        create_test_actor(),
        create_test_cause(),
        Action::new(String::from(action_name), None),
        StateSnapshot::empty(),
        StateSnapshot::empty(),
        None,
    )
}

/// Creates a membership validity date for member tests.
///
/// Returns January 4, 2027 as a valid test expiry date.
pub fn create_test_valid_until() -> Date {
    Date::from_calendar_date(2027, time::Month::January, 4).expect("Valid test date")
}

pub fn create_test_member(name: &str, email: Option<&str>, phone: Option<&str>) -> Member {
    Member::new(
        String::from(name),
        email.map(String::from),
        phone.map(String::from),
        String::from("Individual"),
        0,
        Vec::new(),
        create_test_valid_until(),
        Provenance::AdminEntry,
    )
}

pub fn create_test_partner(name: &str, login_email: &str, contact_phone: Option<&str>) -> Partner {
    Partner::new(
        String::from(name),
        String::from("Hospital"),
        String::from(login_email),
        None,
        contact_phone.map(String::from),
        PartnerLocation {
            address: Some(String::from("12 Ring Road")),
            city: Some(String::from("Pune")),
            state: Some(String::from("Maharashtra")),
            ..PartnerLocation::default()
        },
        Some(String::from("Cardiology")),
        Responsible::new(
            Some(String::from("Dr. Rao")),
            Some(String::from("Director")),
        ),
        String::from("10%"),
        vec![String::from("Consultation")],
        PartnerStatus::Active,
        Provenance::AdminEntry,
    )
}

/// Creates a partner record shaped like a pending application.
pub fn create_test_pending_partner(
    name: &str,
    login_email: &str,
    contact_phone: Option<&str>,
) -> Partner {
    let mut partner = create_test_partner(name, login_email, contact_phone);
    partner.status = PartnerStatus::Pending;
    partner.provenance = Provenance::AdminBulk;
    partner
}

pub fn create_test_doctor(name: &str) -> Doctor {
    Doctor::new(
        String::from(name),
        Some(String::from("Mumbai")),
        Some(String::from("Maharashtra")),
        None,
        None,
        None,
        Some(String::from("General Physician")),
        None,
        None,
        None,
        Provenance::AdminUpload,
    )
}
