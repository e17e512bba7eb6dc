//! Sports category model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sport an athlete profile can be tagged with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SportsCategory {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Reference to a sport embedded in other responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SportRef {
    pub id: String,
    pub name: String,
}

impl From<&SportsCategory> for SportRef {
    fn from(sport: &SportsCategory) -> Self {
        Self {
            id: sport.id.clone(),
            name: sport.name.clone(),
        }
    }
}
