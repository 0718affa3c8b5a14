// ABOUTME: Pseudonymous user identity models
// ABOUTME: PseudonymousId newtype and the UserIdentity profile with level and points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use crate::constants::identity::{DEFAULT_AVATAR_TAG, PSEUDONYMOUS_ID_HEX_LEN};
use crate::constants::level::STARTING_LEVEL;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable, non-reversible user key derived from an external auth identity
///
/// Always a 64 character lowercase hex string (a SHA-256 digest). Deserialization
/// validates the format, so a stored value can never smuggle in a raw auth id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PseudonymousId(String);

impl PseudonymousId {
    /// Validate and wrap a lowercase hex digest
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` if the value is not 64 lowercase hex characters
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let well_formed = value.len() == PSEUDONYMOUS_ID_HEX_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(AppError::invalid_identity(format!(
                "pseudonymous id must be {PSEUDONYMOUS_ID_HEX_LEN} lowercase hex characters"
            )))
        }
    }

    /// Borrow the hex digest
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for PseudonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PseudonymousId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PseudonymousId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PseudonymousId> for String {
    fn from(id: PseudonymousId) -> Self {
        id.0
    }
}

impl AsRef<str> for PseudonymousId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered user as the core sees them
///
/// Holds no external auth id and only a masked email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Pseudonymous key; also the owner key of the user's daily metrics
    pub pseudonymous_id: PseudonymousId,
    /// Name shown in the app
    pub display_name: String,
    /// Email after privacy-by-masking
    pub masked_email: String,
    /// Current level (always >= 1)
    pub level: u32,
    /// Cumulative points (never decreases)
    pub points: u64,
    /// Avatar label
    pub avatar_tag: String,
    /// Registration time
    pub created_at: DateTime<Utc>,
    /// Last profile change
    pub updated_at: DateTime<Utc>,
}

impl UserIdentity {
    /// Create a fresh identity at level 1 with zero points
    #[must_use]
    pub fn new(
        pseudonymous_id: PseudonymousId,
        display_name: impl Into<String>,
        masked_email: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            pseudonymous_id,
            display_name: display_name.into(),
            masked_email: masked_email.into(),
            level: STARTING_LEVEL,
            points: 0,
            avatar_tag: DEFAULT_AVATAR_TAG.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}
