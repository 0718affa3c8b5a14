// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors
// ABOUTME: Re-exports helper modules for the body-echo CLI
// ABOUTME: Provides access to output formatting utilities

pub mod display;
