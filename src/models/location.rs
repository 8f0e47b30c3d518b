//! Location model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Location {
    pub id: i32,
    /// Unique human code
    pub code: String,
    pub site: String,
    pub building: String,
    pub floor: String,
    pub room: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request, also used as a patch on update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LocationDraft {
    #[serde(default, alias = "identificacion")]
    #[validate(length(max = 60, message = "must be at most 60 characters"))]
    pub code: Option<String>,
    #[serde(default, alias = "sede")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub site: Option<String>,
    #[serde(default, alias = "edificio")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub building: Option<String>,
    #[serde(default, alias = "piso")]
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub floor: Option<String>,
    #[serde(default, alias = "sala")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub room: Option<String>,
}

impl LocationDraft {
    pub fn from_existing(l: &Location) -> Self {
        Self {
            code: Some(l.code.clone()),
            site: Some(l.site.clone()),
            building: Some(l.building.clone()),
            floor: Some(l.floor.clone()),
            room: Some(l.room.clone()),
        }
    }

    pub fn apply(self, patch: LocationDraft) -> Self {
        Self {
            code: patch.code.or(self.code),
            site: patch.site.or(self.site),
            building: patch.building.or(self.building),
            floor: patch.floor.or(self.floor),
            room: patch.room.or(self.room),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub code: String,
    pub site: String,
    pub building: String,
    pub floor: String,
    pub room: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LocationQuery {
    /// Substring over code, site, building, floor and room
    pub q: Option<String>,
}
