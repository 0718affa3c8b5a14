// ABOUTME: Integration tests for account registration, sign-in, and session handling
// ABOUTME: Exercises the in-memory auth provider together with pseudonymous profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use body_echo::{
    anonymization::IdentityAnonymizer,
    auth::{AuthProvider, Credential, ExternalAuthId, InMemoryAuthProvider},
    calendar::FixedClock,
    config::environment::{AppConfig, DatabaseUrl},
    constants::identity::DEFAULT_AVATAR_TAG,
    errors::ErrorCode,
    models::MetricUpdate,
    resources::AppResources,
};

async fn resources_with_auth() -> (AppResources, Arc<InMemoryAuthProvider>) {
    let auth = Arc::new(InMemoryAuthProvider::new());
    let database = common::create_test_database(&DatabaseUrl::Memory)
        .await
        .unwrap();
    let resources = AppResources::builder()
        .with_config(AppConfig::for_testing())
        .with_database(database)
        .with_clock(Arc::new(FixedClock::new(common::instant(
            "2025-03-01T09:00:00Z",
        ))))
        .with_auth_provider(auth.clone())
        .build()
        .unwrap();
    (resources, auth)
}

#[tokio::test]
async fn test_register_creates_level_one_profile_and_todays_aggregate() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();
    let external = ExternalAuthId::new("uid-registration");

    let identity = resources
        .accounts()
        .register(&external, "  Deniz  ", "deniz@example.com")
        .await
        .unwrap();

    let expected_id = IdentityAnonymizer::new()
        .derive_pseudonymous_id("uid-registration")
        .unwrap();
    assert_eq!(identity.pseudonymous_id, expected_id);
    assert_eq!(identity.display_name, "Deniz");
    assert_eq!(identity.masked_email, "de***@example.com");
    assert_eq!(identity.level, 1);
    assert_eq!(identity.points, 0);
    assert_eq!(identity.avatar_tag, DEFAULT_AVATAR_TAG);

    let today = resources
        .daily_metrics()
        .today_metric(&expected_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(today.values.steps, 0);
}

#[tokio::test]
async fn test_register_keeps_aggregate_logged_before_profile() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();
        let external = ExternalAuthId::new("uid-early-steps");
        let owner = IdentityAnonymizer::new().pseudonymize(&external).unwrap();
        resources
            .daily_metrics()
            .upsert_today(&owner, &MetricUpdate::new().steps(1_234))
            .await
            .unwrap();

        let identity = resources
            .accounts()
            .register(&external, "Early", "early@example.com")
            .await
            .unwrap();
        assert_eq!(identity.pseudonymous_id, owner, "{url}");

        let today = resources
            .daily_metrics()
            .today_metric(&owner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(today.values.steps, 1_234, "{url}");
    }
}

#[tokio::test]
async fn test_identity_of_unregistered_owner_is_not_found() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();
    let stranger = IdentityAnonymizer::new()
        .derive_pseudonymous_id("never-signed-up")
        .unwrap();

    let err = resources.accounts().identity(&stranger).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();
        let external = ExternalAuthId::new("uid-twice");
        resources
            .accounts()
            .register(&external, "First", "first@example.com")
            .await
            .unwrap();

        let err = resources
            .accounts()
            .register(&external, "Second", "second@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceAlreadyExists, "{url}");

        let stored = resources
            .accounts()
            .identity(&IdentityAnonymizer::new().pseudonymize(&external).unwrap())
            .await
            .unwrap();
        assert_eq!(stored.display_name, "First");
    }
}

#[tokio::test]
async fn test_register_validates_inputs() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();

    let err = resources
        .accounts()
        .register(&ExternalAuthId::new(""), "Name", "a@b.c")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidIdentity);

    let err = resources
        .accounts()
        .register(&ExternalAuthId::new("uid"), "   ", "a@b.c")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_sign_in_and_out_round_trip() {
    let (resources, auth) = resources_with_auth().await;
    let credential = Credential::new("Mert@Example.com", "correct horse");
    let external = auth.create_account(&credential).unwrap();
    resources
        .accounts()
        .register(&external, "Mert", "mert@example.com")
        .await
        .unwrap();

    assert!(resources.accounts().current_user().await.unwrap().is_none());

    // Email lookup is case-insensitive
    let signed_in = resources
        .accounts()
        .sign_in(&Credential::new("mert@example.com", "correct horse"))
        .await
        .unwrap();
    assert_eq!(signed_in.display_name, "Mert");

    let current = resources.accounts().current_user().await.unwrap().unwrap();
    assert_eq!(current.pseudonymous_id, signed_in.pseudonymous_id);

    resources.accounts().sign_out().await.unwrap();
    assert!(resources.accounts().current_user().await.unwrap().is_none());
    assert!(auth.current_identity().await.unwrap().is_none());
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let (resources, auth) = resources_with_auth().await;
    auth.create_account(&Credential::new("ela@example.com", "secret"))
        .unwrap();

    let err = resources
        .accounts()
        .sign_in(&Credential::new("ela@example.com", "guess"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let err = resources
        .accounts()
        .sign_in(&Credential::new("nobody@example.com", "secret"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_sign_in_without_profile_is_not_found() {
    let (resources, auth) = resources_with_auth().await;
    auth.create_account(&Credential::new("new@example.com", "pw"))
        .unwrap();

    let err = resources
        .accounts()
        .sign_in(&Credential::new("new@example.com", "pw"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_duplicate_auth_account_rejected() {
    let auth = InMemoryAuthProvider::new();
    auth.create_account(&Credential::new("dup@example.com", "pw"))
        .unwrap();
    let err = auth
        .create_account(&Credential::new(" DUP@example.com ", "other"))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}
