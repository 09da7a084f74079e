// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A command represents admin intent for a pending partner application
/// as data only.
///
/// Commands are the only way to resolve an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Promote a pending application onto the active partner roster.
    ApprovePartnerApplication {
        /// The pending application identifier.
        pending_id: i64,
    },
    /// Reject a pending application and discard it.
    RejectPartnerApplication {
        /// The pending application identifier.
        pending_id: i64,
    },
}
