// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use memberd_audit::{Actor, Cause};
use memberd_domain::{Partner, PartnerLocation, PartnerStatus, Provenance, Responsible};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub fn create_test_pending_partner() -> Partner {
    Partner::new(
        String::from("City Care Clinic"),
        String::from("doctor"),
        String::from("clinic@example.com"),
        Some(String::from("frontdesk@example.com")),
        Some(String::from("0471-2345678")),
        PartnerLocation {
            address: Some(String::from("12 Hospital Road")),
            city: Some(String::from("Kochi")),
            district: None,
            state: Some(String::from("Kerala")),
            pincode: Some(String::from("682001")),
            website: None,
        },
        Some(String::from("Cardiology")),
        Responsible::new(
            Some(String::from("Dr. Iyer")),
            Some(String::from("Director")),
        ),
        String::from("10%"),
        vec![String::from("Consultation")],
        PartnerStatus::Pending,
        Provenance::AdminBulk,
    )
    .with_id(7)
}
