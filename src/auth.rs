// ABOUTME: Authentication collaborator contract and an in-memory credential store
// ABOUTME: External auth ids stay opaque and are never serialized or logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Authentication Collaborator
//!
//! Credential verification is owned by an external identity service. The core only
//! needs three things from it: who is signed in, verify a credential, and sign out.
//! [`AuthProvider`] captures that contract; [`InMemoryAuthProvider`] implements it
//! for development and tests.

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

/// Opaque identity handed out by the authentication service
///
/// Deliberately not `Serialize`: the only thing the core stores is its hash.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExternalAuthId(String);

impl ExternalAuthId {
    /// Wrap a raw id
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw id, for hashing only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExternalAuthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExternalAuthId(<redacted>)")
    }
}

/// Email and password pair
#[derive(Clone)]
pub struct Credential {
    /// Sign-in email
    pub email: String,
    /// Plain-text password; dropped after verification
    pub password: String,
}

impl Credential {
    /// Build a credential
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Contract the core consumes from the authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Identity of the signed-in user, if any
    async fn current_identity(&self) -> AppResult<Option<ExternalAuthId>>;

    /// Verify a credential and make its owner the signed-in user
    async fn authenticate(&self, credential: &Credential) -> AppResult<ExternalAuthId>;

    /// End the current session; a no-op when nobody is signed in
    async fn sign_out(&self) -> AppResult<()>;
}

struct StoredCredential {
    auth_id: ExternalAuthId,
    password_digest: [u8; 32],
}

/// Process-local credential store with a single active session
#[derive(Default)]
pub struct InMemoryAuthProvider {
    accounts: DashMap<String, StoredCredential>,
    session: Mutex<Option<ExternalAuthId>>,
}

impl InMemoryAuthProvider {
    /// Empty store with nobody signed in
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account and return its freshly minted auth id
    ///
    /// The new account is not signed in.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty email or password and
    /// `ResourceAlreadyExists` if the email is taken
    pub fn create_account(&self, credential: &Credential) -> AppResult<ExternalAuthId> {
        let email = normalize_email(&credential.email);
        if email.is_empty() || credential.password.is_empty() {
            return Err(AppError::invalid_input(
                "email and password must not be empty",
            ));
        }

        match self.accounts.entry(email) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(AppError::already_exists("account for this email"))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let auth_id = ExternalAuthId::new(Uuid::new_v4().to_string());
                slot.insert(StoredCredential {
                    auth_id: auth_id.clone(),
                    password_digest: password_digest(&credential.password),
                });
                debug!("Created in-memory auth account");
                Ok(auth_id)
            }
        }
    }

    fn set_session(&self, value: Option<ExternalAuthId>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl fmt::Debug for InMemoryAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryAuthProvider")
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn current_identity(&self) -> AppResult<Option<ExternalAuthId>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn authenticate(&self, credential: &Credential) -> AppResult<ExternalAuthId> {
        let email = normalize_email(&credential.email);
        let auth_id = {
            let Some(stored) = self.accounts.get(&email) else {
                return Err(AppError::auth_invalid("unknown email or wrong password"));
            };
            let candidate = password_digest(&credential.password);
            if !bool::from(stored.password_digest.as_slice().ct_eq(candidate.as_slice())) {
                return Err(AppError::auth_invalid("unknown email or wrong password"));
            }
            stored.auth_id.clone()
        };

        self.set_session(Some(auth_id.clone()));
        Ok(auth_id)
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.set_session(None);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn password_digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}
