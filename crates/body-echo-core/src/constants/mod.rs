// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Goal defaults, level system, insight thresholds and activity energy costs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Constants module
//!
//! Pure data constants grouped by domain. Values that users may tune at runtime
//! (goals, points per active minute) are only defaults here; the root crate's
//! configuration layer overrides them from the environment.

/// Default daily goals
pub mod goals {
    /// Default daily step goal
    pub const DEFAULT_STEPS_GOAL: u32 = 10_000;
    /// Default daily water intake goal in liters
    pub const DEFAULT_WATER_GOAL_LITERS: f64 = 2.5;
    /// Default daily calorie goal (kcal)
    pub const DEFAULT_CALORIE_GOAL: u32 = 2_500;
    /// Default sleep quality goal (percent)
    pub const DEFAULT_SLEEP_QUALITY_GOAL: u8 = 80;
}

/// Level and points progression
pub mod level {
    /// Points required to advance one level
    pub const POINTS_PER_LEVEL: u64 = 500;
    /// Level assigned to a brand new account
    pub const STARTING_LEVEL: u32 = 1;
    /// Default points awarded per logged active minute
    pub const DEFAULT_POINTS_PER_ACTIVE_MINUTE: u32 = 1;
}

/// Thresholds used by the built-in coaching rules
pub mod insight_thresholds {
    /// Sleep quality (percent) below which a sleep suggestion fires
    pub const SLEEP_QUALITY_SUGGESTION_BELOW: u8 = 70;
    /// Step count below which a low-activity warning fires
    pub const LOW_ACTIVITY_STEPS_BELOW: u32 = 5_000;
}

/// Validation bounds for metric values
pub mod metrics {
    /// Upper bound for sleep quality percent
    pub const MAX_SLEEP_QUALITY_PERCENT: u8 = 100;
}

/// Estimated energy expenditure per activity minute (kcal/min)
pub mod activity_energy {
    /// Walking
    pub const WALKING_KCAL_PER_MINUTE: f64 = 4.0;
    /// Running
    pub const RUNNING_KCAL_PER_MINUTE: f64 = 10.0;
    /// Cycling
    pub const CYCLING_KCAL_PER_MINUTE: f64 = 8.0;
}

/// Identity and privacy-by-masking parameters
pub mod identity {
    /// Length of a pseudonymous identifier (hex-encoded SHA-256)
    pub const PSEUDONYMOUS_ID_HEX_LEN: usize = 64;
    /// Leading local-part characters left visible by email masking
    pub const EMAIL_VISIBLE_PREFIX_CHARS: usize = 2;
    /// Minimum number of asterisks emitted by email masking
    pub const EMAIL_MIN_MASK_CHARS: usize = 3;
    /// Avatar assigned to newly registered accounts
    pub const DEFAULT_AVATAR_TAG: &str = "bunny_pink";
}
