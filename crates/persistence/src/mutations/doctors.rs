// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Doctor directory mutations.
//!
//! Directory entries are informational listings with no credentials and
//! no lifecycle, so a plain insert is all that is needed.

use tracing::debug;

use diesel::prelude::*;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::doctors;
use crate::error::PersistenceError;
use memberd_domain::Doctor;

backend_fn! {
/// Inserts a doctor directory entry.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `doctor` - The directory entry to insert
///
/// # Returns
///
/// The doctor ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_doctor(conn: &mut _, doctor: &Doctor) -> Result<i64, PersistenceError> {
    diesel::insert_into(doctors::table)
        .values((
            doctors::name.eq(&doctor.name),
            doctors::city.eq(doctor.city.as_deref()),
            doctors::state.eq(doctor.state.as_deref()),
            doctors::address.eq(doctor.address.as_deref()),
            doctors::email.eq(doctor.email.as_deref()),
            doctors::phone.eq(doctor.phone.as_deref()),
            doctors::category.eq(doctor.category.as_deref()),
            doctors::designation.eq(doctor.designation.as_deref()),
            doctors::pincode.eq(doctor.pincode.as_deref()),
            doctors::website.eq(doctor.website.as_deref()),
            doctors::provenance.eq(doctor.provenance.as_str()),
        ))
        .execute(conn)?;

    let doctor_id: i64 = conn.get_last_insert_rowid()?;

    debug!(doctor_id, "Inserted doctor directory entry");

    Ok(doctor_id)
}
}
