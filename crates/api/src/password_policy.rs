// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for every credential the platform accepts.
//!
//! One policy covers operator accounts, member registration, and
//! partner applications alike, so a password that clears registration
//! will also clear any later credential flow built on it.

use thiserror::Error;

/// Ways a candidate password can fail the policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password is too long.
    #[error("Password must be at most {max_length} characters long")]
    TooLong { max_length: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Length bounds for accepted passwords.
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    /// Validates a candidate password.
    ///
    /// Checks run in a fixed order: confirmation match, then length
    /// bounds, then the forbidden-value comparison against
    /// `login_name`. The first failure wins.
    ///
    /// # Errors
    ///
    /// Returns the first `PasswordPolicyError` the candidate trips.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.len() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if password.len() > self.max_length {
            return Err(PasswordPolicyError::TooLong {
                max_length: self.max_length,
            });
        }

        // Case-insensitive; login names are stored uppercase
        if password.to_lowercase() == login_name.to_lowercase() {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("login_name"),
            });
        }

        Ok(())
    }
}
