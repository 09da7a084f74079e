// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, MembershipId};

#[test]
fn test_derive_pads_short_record_ids() {
    // Record id 42 is 00000000002a in twelve hex digits
    let id: MembershipId = MembershipId::derive(2026, 42);
    assert_eq!(id.value(), "MCS-2026-00002A");
}

#[test]
fn test_derive_takes_last_six_hex_digits() {
    // 0x1234567890ab renders as 1234567890ab; the suffix is the tail
    let id: MembershipId = MembershipId::derive(2026, 0x1234_5678_90ab);
    assert_eq!(id.value(), "MCS-2026-7890AB");
}

#[test]
fn test_derive_uppercases_suffix() {
    let id: MembershipId = MembershipId::derive(2025, 0xabcdef);
    assert_eq!(id.value(), "MCS-2025-ABCDEF");
}

#[test]
fn test_derive_carries_issue_year() {
    let id: MembershipId = MembershipId::derive(2031, 1);
    assert!(id.value().starts_with("MCS-2031-"));
}

#[test]
fn test_new_accepts_stored_value() {
    let id: MembershipId = MembershipId::new("MCS-2026-00002A").unwrap();
    assert_eq!(id.value(), "MCS-2026-00002A");
}

#[test]
fn test_new_rejects_empty_value() {
    let result: Result<MembershipId, DomainError> = MembershipId::new("   ");
    assert!(matches!(result, Err(DomainError::InvalidMembershipId(_))));
}

#[test]
fn test_display_matches_value() {
    let id: MembershipId = MembershipId::derive(2026, 42);
    assert_eq!(format!("{id}"), id.value());
}
