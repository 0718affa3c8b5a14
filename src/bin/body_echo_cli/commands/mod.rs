// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors
// ABOUTME: Re-exports command modules for the body-echo CLI
// ABOUTME: Provides access to profile, daily metric, and activity commands

pub mod activity;
pub mod metrics;
pub mod user;
