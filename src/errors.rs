// ABOUTME: Error types re-exported from body-echo-core for crate-local import paths
// ABOUTME: Every service returns AppResult; store failures propagate unchanged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Unified Error Handling System
//!
//! The canonical definitions live in `body_echo_core::errors` so the intelligence
//! crate and this crate share one taxonomy. See [`ErrorCode`] for the full list.

pub use body_echo_core::errors::{AppError, AppResult, ErrorCode, ErrorContext};
