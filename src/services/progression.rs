// ABOUTME: Point award orchestration with level recomputation after every award
// ABOUTME: Rejects non-positive deltas; reports level changes as an explicit return value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::calendar::Clock;
use crate::database_plugins::{factory::Database, DatabaseProvider};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{LevelChange, LevelEngine, LevelStatus};
use crate::logging::AppLogger;
use crate::models::{PseudonymousId, UserIdentity};

/// Result of a points award
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsAward {
    /// Identity after the award
    pub identity: UserIdentity,
    /// Present when the award moved the user to a new level
    pub level_change: Option<LevelChange>,
}

/// Awards points and keeps the stored level in step with them
#[derive(Clone)]
pub struct ProgressionService {
    database: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl ProgressionService {
    /// Create a progression service
    #[must_use]
    pub fn new(database: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { database, clock }
    }

    /// Apply an award to an in-hand identity without touching storage
    ///
    /// # Errors
    ///
    /// Returns `InvalidPointsDelta` if `delta` is zero or negative
    pub fn award_points(
        identity: &UserIdentity,
        delta: i64,
        now: DateTime<Utc>,
    ) -> AppResult<PointsAward> {
        let increment = positive_delta(delta)?;

        let mut updated = identity.clone();
        updated.points = identity.points.saturating_add(increment);
        updated.level = LevelEngine::level_for_points(updated.points);
        updated.updated_at = now;

        let level_change = (updated.level != identity.level).then_some(LevelChange {
            from: identity.level,
            to: updated.level,
        });

        Ok(PointsAward {
            identity: updated,
            level_change,
        })
    }

    /// Award points to a stored identity
    ///
    /// Points are added with the store's atomic increment; the level is rewritten
    /// only when the new total crosses a level boundary.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPointsDelta` for a non-positive delta, `ResourceNotFound` if
    /// the identity does not exist, or the store's error unchanged
    pub async fn award(&self, owner: &PseudonymousId, delta: i64) -> AppResult<PointsAward> {
        let increment = positive_delta(delta)?;
        let now = self.clock.now();

        let incremented = self.database.increment_points(owner, increment, now).await?;
        let new_level = LevelEngine::level_for_points(incremented.points);

        let award = if new_level == incremented.level {
            PointsAward {
                identity: incremented,
                level_change: None,
            }
        } else {
            let previous_level = incremented.level;
            let identity = self.database.update_level(owner, new_level, now).await?;
            info!(
                user.key = %owner.short(),
                from = previous_level,
                to = new_level,
                "Level changed"
            );
            PointsAward {
                identity,
                level_change: Some(LevelChange {
                    from: previous_level,
                    to: new_level,
                }),
            }
        };

        AppLogger::log_points_award(owner, delta, award.identity.points, award.identity.level);
        Ok(award)
    }

    /// Current level snapshot for a stored identity
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the identity does not exist
    pub async fn status(&self, owner: &PseudonymousId) -> AppResult<LevelStatus> {
        let identity = self
            .database
            .get_user(owner)
            .await?
            .ok_or_else(|| AppError::not_found("user identity").with_owner_key(owner.short()))?;
        Ok(LevelEngine::status(identity.points))
    }
}

fn positive_delta(delta: i64) -> AppResult<u64> {
    u64::try_from(delta)
        .ok()
        .filter(|increment| *increment > 0)
        .ok_or_else(|| AppError::invalid_points_delta(delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use chrono::TimeZone;

    fn identity(points: u64, level: u32) -> UserIdentity {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        let mut identity = UserIdentity::new(
            PseudonymousId::parse("b".repeat(64)).unwrap(),
            "Ada",
            "ad***@example.com",
            now,
        );
        identity.points = points;
        identity.level = level;
        identity
    }

    #[test]
    fn test_award_within_level_reports_no_change() {
        let now = Utc::now();
        let award = ProgressionService::award_points(&identity(100, 1), 50, now).unwrap();
        assert_eq!(award.identity.points, 150);
        assert_eq!(award.identity.level, 1);
        assert!(award.level_change.is_none());
        assert_eq!(award.identity.updated_at, now);
    }

    #[test]
    fn test_award_crossing_boundary_reports_change() {
        let award = ProgressionService::award_points(&identity(450, 1), 50, Utc::now()).unwrap();
        assert_eq!(award.identity.points, 500);
        assert_eq!(award.identity.level, 2);
        assert_eq!(award.level_change, Some(LevelChange { from: 1, to: 2 }));
    }

    #[test]
    fn test_large_award_can_skip_levels() {
        let award = ProgressionService::award_points(&identity(0, 1), 1_250, Utc::now()).unwrap();
        assert_eq!(award.identity.level, 3);
        assert_eq!(award.level_change.map(|c| c.levels_gained()), Some(2));
    }

    #[test]
    fn test_non_positive_delta_rejected() {
        for delta in [0, -1, i64::MIN] {
            let err = ProgressionService::award_points(&identity(10, 1), delta, Utc::now())
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidPointsDelta);
        }
    }
}
