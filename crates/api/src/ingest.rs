// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk spreadsheet ingestion.
//!
//! Three import profiles share one pipeline: decode the sheet, check its
//! header row against the profile's column policy, map each data row to a
//! candidate record through the header alias tables, resolve duplicates
//! against the live store, synthesize credentials where the profile calls
//! for them, and commit row by row. Rows are processed strictly in sheet
//! order and each row succeeds, is skipped, or fails on its own; committed
//! rows stay committed regardless of what later rows do.

use std::collections::BTreeMap;

use memberd_domain::{
    Doctor, DomainError, Member, MembershipId, Partner, PartnerLocation, PartnerStatus,
    Provenance, Responsible, coerce_count, family_member_count, last_four, membership_valid_until,
    normalize_email, normalize_phone, normalize_plan, parse_sheet_date, validate_doctor_fields,
    validate_member_fields, validate_partner_fields,
};
use memberd_persistence::Persistence;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::error::ApiError;

/// Prefix for passwords synthesized during member imports.
pub const MEMBER_PASSWORD_PREFIX: &str = "MCS@";

/// Prefix for passwords synthesized during partner imports.
pub const PARTNER_PASSWORD_PREFIX: &str = "MED@";

/// Partner type recorded for bulk-imported partner applications.
const BULK_PARTNER_TYPE: &str = "doctor";

/// Message returned with every completed batch outcome.
const BATCH_MESSAGE: &str = "Bulk upload processing complete";

/// Header allow-list for the strict doctor directory profile.
const DOCTOR_ALLOWED_COLUMNS: &[&str] = &[
    "Doctor Name",
    "City",
    "State",
    "Address",
    "E-mail",
    "Phone Number",
    "Category",
    "Designation",
    "pincode",
    "website",
];

// Accepted header spellings per logical field. The first alias that
// matches a sheet header determines the column; matching is
// case-insensitive on trimmed headers.
const NAME_ALIASES: &[&str] = &["Name"];
const EMAIL_ALIASES: &[&str] = &["E-mail", "Email"];
const PHONE_ALIASES: &[&str] = &["Phone"];
const PASSWORD_ALIASES: &[&str] = &["Password"];
const PLAN_ALIASES: &[&str] = &["Plan"];
const FAMILY_MEMBER_ALIASES: &[&str] = &["FamilyMembers", "Family Members"];
const VALID_UNTIL_ALIASES: &[&str] = &["ValidUntil", "Valid Until"];
const CATEGORY_ALIASES: &[&str] = &["Category/ Specialization", "Category", "Specialization"];
const DESIGNATION_ALIASES: &[&str] = &["Designation"];
const CITY_ALIASES: &[&str] = &["City"];
const ADDRESS_ALIASES: &[&str] = &["Address"];
const DOCTOR_NAME_ALIASES: &[&str] = &["Doctor Name"];

/// How an import profile treats headers outside its expected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Every header must be on the profile's allow-list. The first
    /// unrecognized header aborts the import before any row runs.
    Strict,
    /// Unknown headers are ignored.
    Permissive,
}

/// Counters for one import batch.
///
/// `total` always equals `success + skipped + failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchSummary {
    /// Number of data rows in the sheet.
    pub total: usize,
    /// Rows committed to the store.
    pub success: usize,
    /// Rows skipped as duplicates of existing records.
    pub skipped: usize,
    /// Rows that failed validation or persistence.
    pub failure: usize,
}

/// Lightweight descriptor of one committed row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatedRecord {
    /// Store id of the committed record.
    pub record_id: i64,
    /// The record's name.
    pub name: String,
    /// The record's email, if it carried one.
    pub email: Option<String>,
    /// The membership identifier assigned during commit, where the
    /// profile assigns one.
    pub membership_id: Option<String>,
}

/// One row skipped as a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkippedRecord {
    /// 1-based position among the sheet's data rows.
    pub row_number: usize,
    /// The row's populated cells, keyed by header.
    pub row: BTreeMap<String, String>,
    /// Why the row was skipped.
    pub reason: String,
}

/// One row that failed validation or persistence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FailedRecord {
    /// 1-based position among the sheet's data rows.
    pub row_number: usize,
    /// The row's populated cells, keyed by header.
    pub row: BTreeMap<String, String>,
    /// The error that stopped the row.
    pub error: String,
}

/// Outcome of one import batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchOutcome {
    /// Human-readable completion message.
    pub message: String,
    /// Row counters for the batch.
    pub summary: BatchSummary,
    /// Descriptors of committed rows, in sheet order.
    pub created: Vec<CreatedRecord>,
    /// Rows skipped as duplicates, in sheet order.
    pub skipped: Vec<SkippedRecord>,
    /// Rows that failed, in sheet order.
    pub errors: Vec<FailedRecord>,
}

/// A decoded sheet: trimmed headers plus data rows in sheet order.
#[derive(Debug)]
struct Sheet {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

/// What became of one data row.
enum RowOutcome {
    Created(CreatedRecord),
    Skipped(String),
    Failed(String),
}

/// Collects per-row outcomes into a batch result.
struct BatchAccumulator {
    total: usize,
    created: Vec<CreatedRecord>,
    skipped: Vec<SkippedRecord>,
    errors: Vec<FailedRecord>,
}

impl BatchAccumulator {
    fn new(total: usize) -> Self {
        Self {
            total,
            created: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self, message: String) -> BatchOutcome {
        BatchOutcome {
            message,
            summary: BatchSummary {
                total: self.total,
                success: self.created.len(),
                skipped: self.skipped.len(),
                failure: self.errors.len(),
            },
            created: self.created,
            skipped: self.skipped,
            errors: self.errors,
        }
    }
}

/// Decodes a textual sheet into headers and data rows.
///
/// Headers are trimmed but otherwise kept as entered. Ragged rows are
/// tolerated; missing cells read as empty. A sheet with zero data rows
/// is rejected before any column policy runs.
fn decode_sheet(content: &str) -> Result<Sheet, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ApiError::StructuralFailure {
            message: format!("Failed to parse sheet: {e}"),
        })?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::StructuralFailure {
            message: format!("Failed to parse sheet: {e}"),
        })?;

    if records.is_empty() {
        return Err(ApiError::StructuralFailure {
            message: String::from("Sheet is empty"),
        });
    }

    Ok(Sheet { headers, records })
}

/// Checks the header row against the profile's column policy.
///
/// Under [`ColumnPolicy::Strict`], the first header not on the allow-list
/// aborts the import with a message naming the offending header and the
/// allowed set. [`ColumnPolicy::Permissive`] accepts any header row.
fn validate_columns(
    headers: &[String],
    policy: ColumnPolicy,
    allowed: &[&str],
) -> Result<(), ApiError> {
    if policy == ColumnPolicy::Permissive {
        return Ok(());
    }
    for header in headers {
        if !allowed
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(header))
        {
            return Err(ApiError::StructuralFailure {
                message: format!(
                    "Upload rejected. Invalid column: \"{header}\". Allowed columns: {}",
                    allowed.join(", ")
                ),
            });
        }
    }
    Ok(())
}

/// Looks up a logical field in a row by its header aliases.
///
/// The first alias matching a header determines the column. The cell is
/// trimmed; an empty or absent cell yields `None`.
fn field_value(headers: &[String], record: &csv::StringRecord, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|header| header.eq_ignore_ascii_case(alias)))
        .and_then(|index| record.get(index))
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
}

/// Echoes a row's populated cells for skip and error reports.
fn row_payload(headers: &[String], record: &csv::StringRecord) -> BTreeMap<String, String> {
    let mut payload = BTreeMap::new();
    for (index, header) in headers.iter().enumerate() {
        if let Some(cell) = record.get(index) {
            let cell = cell.trim();
            if !cell.is_empty() {
                payload.insert(header.clone(), cell.to_string());
            }
        }
    }
    payload
}

/// Synthesizes a password for a row that did not carry one.
///
/// With a phone on the row the password is the prefix followed by the
/// phone's last four characters; otherwise the prefix followed by four
/// random digits in 1000..=9999.
#[must_use]
pub fn synthesize_password(prefix: &str, phone: Option<&str>) -> String {
    match phone.and_then(last_four) {
        Some(digits) => format!("{prefix}{digits}"),
        None => format!("{prefix}{}", rand::random_range(1000..=9999)),
    }
}

/// Runs every data row through the profile's row handler, in sheet order.
fn process_rows<F>(sheet: &Sheet, mut handle_row: F) -> BatchAccumulator
where
    F: FnMut(&csv::StringRecord) -> RowOutcome,
{
    let mut accumulator = BatchAccumulator::new(sheet.records.len());
    for (index, record) in sheet.records.iter().enumerate() {
        let row_number = index + 1;
        match handle_row(record) {
            RowOutcome::Created(created) => accumulator.created.push(created),
            RowOutcome::Skipped(reason) => accumulator.skipped.push(SkippedRecord {
                row_number,
                row: row_payload(&sheet.headers, record),
                reason,
            }),
            RowOutcome::Failed(error) => accumulator.errors.push(FailedRecord {
                row_number,
                row: row_payload(&sheet.headers, record),
                error,
            }),
        }
    }
    accumulator
}

fn member_row(
    persistence: &mut Persistence,
    headers: &[String],
    record: &csv::StringRecord,
    today: Date,
) -> RowOutcome {
    let name = field_value(headers, record, NAME_ALIASES).unwrap_or_default();
    let email = field_value(headers, record, EMAIL_ALIASES).and_then(|raw| normalize_email(&raw));
    let phone = field_value(headers, record, PHONE_ALIASES).and_then(|raw| normalize_phone(&raw));

    // Duplicate check runs against the live store before every write;
    // a row with neither identifier skips the check entirely.
    if email.is_some() || phone.is_some() {
        match persistence.member_identity_exists(email.as_deref(), phone.as_deref()) {
            Ok(true) => {
                return RowOutcome::Skipped(
                    DomainError::DuplicateMemberIdentity { email, phone }.to_string(),
                );
            }
            Ok(false) => {}
            Err(e) => return RowOutcome::Failed(format!("Failed to check for duplicates: {e}")),
        }
    }

    let plan = normalize_plan(field_value(headers, record, PLAN_ALIASES).as_deref().unwrap_or(""));
    let explicit_count = coerce_count(
        field_value(headers, record, FAMILY_MEMBER_ALIASES)
            .as_deref()
            .unwrap_or(""),
    );

    // An explicit validity date on the row overrides the default
    // one-year window. Spreadsheet editors often store these cells as
    // serial day counts, which parse_sheet_date recognizes.
    let valid_until = match field_value(headers, record, VALID_UNTIL_ALIASES) {
        Some(raw) => match parse_sheet_date(&raw) {
            Ok(date) => date,
            Err(e) => return RowOutcome::Failed(e.to_string()),
        },
        None => match membership_valid_until(today) {
            Ok(date) => date,
            Err(e) => return RowOutcome::Failed(e.to_string()),
        },
    };

    let candidate = Member::new(
        name,
        email,
        phone,
        plan,
        family_member_count(explicit_count, 0),
        Vec::new(),
        valid_until,
        Provenance::AdminBulk,
    );
    if let Err(e) = validate_member_fields(&candidate) {
        return RowOutcome::Failed(e.to_string());
    }
    if candidate.identity_is_blank() {
        return RowOutcome::Failed(
            DomainError::MissingRequiredField {
                field: String::from("email or phone"),
            }
            .to_string(),
        );
    }

    let password = field_value(headers, record, PASSWORD_ALIASES)
        .unwrap_or_else(|| synthesize_password(MEMBER_PASSWORD_PREFIX, candidate.phone.as_deref()));

    let member_id = match persistence.create_member(&candidate, &password) {
        Ok(id) => id,
        Err(e) => return RowOutcome::Failed(format!("Failed to create member: {e}")),
    };

    let membership_id = MembershipId::derive(today.year(), member_id);
    if let Err(e) = persistence.assign_membership_id(member_id, &membership_id) {
        return RowOutcome::Failed(format!("Failed to assign membership id: {e}"));
    }

    RowOutcome::Created(CreatedRecord {
        record_id: member_id,
        name: candidate.name,
        email: candidate.email,
        membership_id: Some(membership_id.value().to_string()),
    })
}

fn partner_row(
    persistence: &mut Persistence,
    headers: &[String],
    record: &csv::StringRecord,
) -> RowOutcome {
    let name = field_value(headers, record, NAME_ALIASES).unwrap_or_default();
    let email = field_value(headers, record, EMAIL_ALIASES).and_then(|raw| normalize_email(&raw));
    let phone = field_value(headers, record, PHONE_ALIASES).and_then(|raw| normalize_phone(&raw));

    if email.is_some() || phone.is_some() {
        match persistence.partner_identity_exists(email.as_deref(), phone.as_deref()) {
            Ok(true) => {
                return RowOutcome::Skipped(
                    DomainError::DuplicatePartnerIdentity { email, phone }.to_string(),
                );
            }
            Ok(false) => {}
            Err(e) => return RowOutcome::Failed(format!("Failed to check for duplicates: {e}")),
        }
    }

    let specialization = field_value(headers, record, CATEGORY_ALIASES);
    let designation = field_value(headers, record, DESIGNATION_ALIASES);
    // The row's name doubles as the responsible contact's name.
    let responsible = Responsible::new(Some(name.clone()), designation);

    let candidate = Partner::new(
        name,
        String::from(BULK_PARTNER_TYPE),
        email.clone().unwrap_or_default(),
        email,
        phone,
        PartnerLocation {
            address: field_value(headers, record, ADDRESS_ALIASES),
            city: field_value(headers, record, CITY_ALIASES),
            ..PartnerLocation::default()
        },
        specialization,
        responsible,
        String::from("0%"),
        Vec::new(),
        PartnerStatus::Pending,
        Provenance::AdminBulk,
    );
    if let Err(e) = validate_partner_fields(&candidate) {
        return RowOutcome::Failed(e.to_string());
    }

    let password = field_value(headers, record, PASSWORD_ALIASES).unwrap_or_else(|| {
        synthesize_password(PARTNER_PASSWORD_PREFIX, candidate.contact_phone.as_deref())
    });

    let pending_id = match persistence.create_pending_partner(&candidate, &password) {
        Ok(id) => id,
        Err(e) => return RowOutcome::Failed(format!("Failed to create partner application: {e}")),
    };

    RowOutcome::Created(CreatedRecord {
        record_id: pending_id,
        name: candidate.name,
        email: Some(candidate.login_email),
        membership_id: None,
    })
}

fn doctor_row(
    persistence: &mut Persistence,
    headers: &[String],
    record: &csv::StringRecord,
) -> RowOutcome {
    let candidate = Doctor::new(
        field_value(headers, record, DOCTOR_NAME_ALIASES).unwrap_or_default(),
        field_value(headers, record, CITY_ALIASES),
        field_value(headers, record, &["State"]),
        field_value(headers, record, ADDRESS_ALIASES),
        field_value(headers, record, EMAIL_ALIASES).and_then(|raw| normalize_email(&raw)),
        field_value(headers, record, &["Phone Number"]).and_then(|raw| normalize_phone(&raw)),
        field_value(headers, record, &["Category"]),
        field_value(headers, record, DESIGNATION_ALIASES),
        field_value(headers, record, &["pincode"]),
        field_value(headers, record, &["website"]),
        Provenance::AdminUpload,
    );
    if let Err(e) = validate_doctor_fields(&candidate) {
        return RowOutcome::Failed(e.to_string());
    }

    let doctor_id = match persistence.create_doctor(&candidate) {
        Ok(id) => id,
        Err(e) => return RowOutcome::Failed(format!("Failed to create directory entry: {e}")),
    };

    RowOutcome::Created(CreatedRecord {
        record_id: doctor_id,
        name: candidate.name,
        email: candidate.email,
        membership_id: None,
    })
}

/// Imports members from a sheet under the permissive column policy.
///
/// Each committed member is assigned a membership identifier before its
/// success descriptor is composed. Rows without a password get one
/// synthesized from [`MEMBER_PASSWORD_PREFIX`]; rows without a
/// `ValidUntil` date default to one year from the import date.
///
/// # Errors
///
/// Returns [`ApiError::StructuralFailure`] if the sheet cannot be parsed
/// or holds no data rows. Row-level problems never abort the batch; they
/// are reported in the outcome.
pub fn import_members(
    persistence: &mut Persistence,
    content: &str,
) -> Result<BatchOutcome, ApiError> {
    let sheet = decode_sheet(content)?;
    validate_columns(&sheet.headers, ColumnPolicy::Permissive, &[])?;

    let today = OffsetDateTime::now_utc().date();
    let accumulator = process_rows(&sheet, |record| {
        member_row(persistence, &sheet.headers, record, today)
    });

    let outcome = accumulator.finish(String::from(BATCH_MESSAGE));
    info!(
        total = outcome.summary.total,
        success = outcome.summary.success,
        skipped = outcome.summary.skipped,
        failure = outcome.summary.failure,
        "Member import completed"
    );
    Ok(outcome)
}

/// Imports partner applications from a sheet under the permissive column
/// policy.
///
/// Every committed row lands in the pending queue with status `Pending`
/// for later review; nothing goes straight to the active roster. Rows
/// without a password get one synthesized from
/// [`PARTNER_PASSWORD_PREFIX`].
///
/// # Errors
///
/// Returns [`ApiError::StructuralFailure`] if the sheet cannot be parsed
/// or holds no data rows. Row-level problems never abort the batch; they
/// are reported in the outcome.
pub fn import_partners(
    persistence: &mut Persistence,
    content: &str,
) -> Result<BatchOutcome, ApiError> {
    let sheet = decode_sheet(content)?;
    validate_columns(&sheet.headers, ColumnPolicy::Permissive, &[])?;

    let accumulator = process_rows(&sheet, |record| {
        partner_row(persistence, &sheet.headers, record)
    });

    let outcome = accumulator.finish(String::from(BATCH_MESSAGE));
    info!(
        total = outcome.summary.total,
        success = outcome.summary.success,
        skipped = outcome.summary.skipped,
        failure = outcome.summary.failure,
        "Partner import completed"
    );
    Ok(outcome)
}

/// Imports doctor directory entries from a sheet under the strict column
/// policy.
///
/// Directory entries carry no credentials and no duplicate check. Rows
/// with a blank name are reported as failures and never committed; a
/// sheet where every row lacks a name is rejected outright.
///
/// # Errors
///
/// Returns [`ApiError::StructuralFailure`] if the sheet cannot be parsed,
/// holds no data rows, carries a header outside
/// [`DOCTOR_ALLOWED_COLUMNS`], or has no row with a doctor name.
pub fn import_doctors(
    persistence: &mut Persistence,
    content: &str,
) -> Result<BatchOutcome, ApiError> {
    let sheet = decode_sheet(content)?;
    validate_columns(&sheet.headers, ColumnPolicy::Strict, DOCTOR_ALLOWED_COLUMNS)?;

    let has_named_row = sheet
        .records
        .iter()
        .any(|record| field_value(&sheet.headers, record, DOCTOR_NAME_ALIASES).is_some());
    if !has_named_row {
        return Err(ApiError::StructuralFailure {
            message: String::from(
                "No valid doctor records found. 'Doctor Name' column is required.",
            ),
        });
    }

    let accumulator = process_rows(&sheet, |record| {
        doctor_row(persistence, &sheet.headers, record)
    });

    let outcome = accumulator.finish(String::from(BATCH_MESSAGE));
    info!(
        total = outcome.summary.total,
        success = outcome.summary.success,
        skipped = outcome.summary.skipped,
        failure = outcome.summary.failure,
        "Doctor import completed"
    );
    Ok(outcome)
}
