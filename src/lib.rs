// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AthleteX: athlete health and training monitoring API
//!
//! Coaches are assigned athletes; athletes record one daily health log per
//! day. Access to an athlete's data is limited to the athlete and their
//! assigned coaches.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{
    AccessPolicy, AthleteService, DailyLogService, RelationshipService, SportService, UserService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub access: AccessPolicy,
    pub users: UserService,
    pub athletes: AthleteService,
    pub sports: SportService,
    pub relationships: RelationshipService,
    pub daily_logs: DailyLogService,
}

impl AppState {
    /// Wire every service to the same storage handle.
    pub fn new(config: Config, db: Database) -> Self {
        let access = AccessPolicy::new(db.clone());
        let relationships = RelationshipService::new(db.clone());
        let daily_logs = DailyLogService::new(db.clone(), access.clone());
        let users = UserService::new(
            db.clone(),
            access.clone(),
            relationships.clone(),
            daily_logs.clone(),
            config.jwt_signing_key.clone(),
            config.jwt_ttl_hours,
        );
        let athletes = AthleteService::new(db.clone(), access.clone(), users.clone());
        let sports = SportService::new(db.clone());

        Self {
            config,
            db,
            access,
            users,
            athletes,
            sports,
            relationships,
            daily_logs,
        }
    }
}
