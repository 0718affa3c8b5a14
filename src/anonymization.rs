// ABOUTME: One-way pseudonymous identifiers and email masking for stored identities
// ABOUTME: SHA-256 hex keys replace external auth ids; emails are privacy-by-masking, not encryption
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Identity anonymization
//!
//! Two unrelated transforms live here:
//!
//! - [`IdentityAnonymizer::derive_pseudonymous_id`] hashes an external auth id with
//!   SHA-256. The result is the only user key the core ever stores.
//! - [`IdentityAnonymizer::mask_email`] hides most of an email's local part for
//!   display. Masking is lossy but weak: short local parts and the full domain stay
//!   visible, so it must never be treated as a substitute for hashing.

use crate::auth::ExternalAuthId;
use crate::constants::identity::{EMAIL_MIN_MASK_CHARS, EMAIL_VISIBLE_PREFIX_CHARS};
use crate::errors::{AppError, AppResult};
use crate::models::PseudonymousId;
use sha2::{Digest, Sha256};

/// Hashes external identities and masks emails
///
/// Stateless; constructed once by the composition root and shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAnonymizer;

#[allow(clippy::unused_self)]
impl IdentityAnonymizer {
    /// Create an anonymizer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Derive the pseudonymous user key for an external auth id
    ///
    /// Deterministic: the same input always yields the same 64-character lowercase
    /// hex digest.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` if `external_auth_id` is empty
    pub fn derive_pseudonymous_id(&self, external_auth_id: &str) -> AppResult<PseudonymousId> {
        if external_auth_id.is_empty() {
            return Err(AppError::invalid_identity(
                "external auth id must not be empty",
            ));
        }

        let digest = Sha256::digest(external_auth_id.as_bytes());
        PseudonymousId::parse(hex::encode(digest))
    }

    /// Derive the pseudonymous key for an id handed over by the auth provider
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` if the id is empty
    pub fn pseudonymize(&self, external: &ExternalAuthId) -> AppResult<PseudonymousId> {
        self.derive_pseudonymous_id(external.expose())
    }

    /// Mask an email for storage and display
    ///
    /// Splits on the first `@`, keeps the first two characters of the local part,
    /// and replaces the rest with at least three asterisks. Input with no `@`, an
    /// empty local part, or an empty domain is returned unchanged.
    #[must_use]
    pub fn mask_email(&self, email: &str) -> String {
        let Some((local, domain)) = email.split_once('@') else {
            return email.to_owned();
        };
        if local.is_empty() || domain.is_empty() {
            return email.to_owned();
        }

        let visible: String = local.chars().take(EMAIL_VISIBLE_PREFIX_CHARS).collect();
        let hidden = local
            .chars()
            .count()
            .saturating_sub(EMAIL_VISIBLE_PREFIX_CHARS)
            .max(EMAIL_MIN_MASK_CHARS);

        format!("{visible}{}@{domain}", "*".repeat(hidden))
    }
}
