// ABOUTME: Account flows tying the auth collaborator to pseudonymous identities
// ABOUTME: Registration stores only hashed ids and masked emails, then seeds today's aggregate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use std::sync::Arc;

use tracing::warn;

use crate::anonymization::IdentityAnonymizer;
use crate::auth::{AuthProvider, Credential, ExternalAuthId};
use crate::calendar::Clock;
use crate::database_plugins::{factory::Database, DatabaseProvider};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{PseudonymousId, UserIdentity};
use crate::services::daily_metrics::DailyMetricService;

/// Registration, sign-in, and session lookups
#[derive(Clone)]
pub struct AccountService {
    database: Arc<Database>,
    auth: Arc<dyn AuthProvider>,
    anonymizer: IdentityAnonymizer,
    daily_metrics: DailyMetricService,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Create an account service
    #[must_use]
    pub fn new(
        database: Arc<Database>,
        auth: Arc<dyn AuthProvider>,
        anonymizer: IdentityAnonymizer,
        daily_metrics: DailyMetricService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            database,
            auth,
            anonymizer,
            daily_metrics,
            clock,
        }
    }

    /// Register the profile for a freshly authenticated identity
    ///
    /// Ensures today's aggregate exists, then creates the identity at level 1 with
    /// zero points. The aggregate step is idempotent and leaves an existing
    /// aggregate untouched, so a failure at either step can be retried. The
    /// external id and the raw email are not stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` for an empty auth id, `InvalidInput` for a blank
    /// display name, or `ResourceAlreadyExists` if the identity is registered
    pub async fn register(
        &self,
        external: &ExternalAuthId,
        display_name: &str,
        email: &str,
    ) -> AppResult<UserIdentity> {
        let owner = self.anonymizer.pseudonymize(external)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::invalid_input("display name must not be empty"));
        }

        let identity = UserIdentity::new(
            owner.clone(),
            display_name,
            self.anonymizer.mask_email(email),
            self.clock.now(),
        );
        self.daily_metrics.ensure_today(&owner).await?;
        if let Err(e) = self.database.create_user(&identity).await {
            AppLogger::log_account_event(&owner, "register", false);
            return Err(e);
        }

        AppLogger::log_account_event(&owner, "register", true);
        Ok(identity)
    }

    /// Authenticate and load the signed-in user's profile
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for a rejected credential and `ResourceNotFound` if the
    /// authenticated identity never registered a profile
    pub async fn sign_in(&self, credential: &Credential) -> AppResult<UserIdentity> {
        let external = self.auth.authenticate(credential).await?;
        let owner = self.anonymizer.pseudonymize(&external)?;
        let identity = self.identity(&owner).await?;
        AppLogger::log_account_event(&owner, "sign_in", true);
        Ok(identity)
    }

    /// Profile of whoever is signed in, or `None`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the session belongs to an identity without a
    /// profile
    pub async fn current_user(&self) -> AppResult<Option<UserIdentity>> {
        let Some(external) = self.auth.current_identity().await? else {
            return Ok(None);
        };
        let owner = self.anonymizer.pseudonymize(&external)?;
        self.identity(&owner).await.map(Some)
    }

    /// End the current session
    ///
    /// # Errors
    ///
    /// Returns the auth provider's error unchanged
    pub async fn sign_out(&self) -> AppResult<()> {
        if let Some(external) = self.auth.current_identity().await? {
            match self.anonymizer.pseudonymize(&external) {
                Ok(owner) => AppLogger::log_account_event(&owner, "sign_out", true),
                Err(e) => warn!("Signed-in identity could not be pseudonymized: {e}"),
            }
        }
        self.auth.sign_out().await
    }

    /// Load a profile by pseudonymous id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no profile exists
    pub async fn identity(&self, owner: &PseudonymousId) -> AppResult<UserIdentity> {
        self.database
            .get_user(owner)
            .await?
            .ok_or_else(|| AppError::not_found("user identity").with_owner_key(owner.short()))
    }
}
