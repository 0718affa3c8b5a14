// ABOUTME: Core types and constants for the Body Echo health tracking core
// ABOUTME: Foundation crate with error handling, domain models, goal configuration, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

#![deny(unsafe_code)]

//! # Body Echo Core
//!
//! Foundation crate providing shared types and constants for the Body Echo health
//! tracking core. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Goal defaults, level system, insight thresholds, activity energy costs
//! - **models**: Identity, daily metric aggregate, activity, and insight event types
//! - **config**: Goal thresholds consumed by the progress and insight engines

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (identity, daily metrics, activities, insights)
pub mod models;

/// Goal threshold configuration
pub mod config;
