// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod access;
pub mod athletes;
pub mod daily_logs;
pub mod password;
pub mod relationships;
pub mod sports;
pub mod users;

pub use access::AccessPolicy;
pub use athletes::AthleteService;
pub use daily_logs::DailyLogService;
pub use relationships::RelationshipService;
pub use sports::SportService;
pub use users::UserService;
