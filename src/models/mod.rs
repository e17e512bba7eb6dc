// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod athlete;
pub mod daily_log;
pub mod relationship;
pub mod sport;
pub mod summary;
pub mod user;

pub use athlete::{AthleteProfile, RiskLevel};
pub use daily_log::DailyLog;
pub use relationship::CoachAthleteRelationship;
pub use sport::SportsCategory;
pub use summary::WeeklySummary;
pub use user::{Role, User};
