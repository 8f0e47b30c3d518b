//! Custodian (responsible area) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Custodian {
    pub id: i32,
    pub area_code: String,
    pub area_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CustodianDraft {
    #[serde(default, alias = "id_area")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub area_code: Option<String>,
    #[serde(default, alias = "nombre_area")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub area_name: Option<String>,
}

impl CustodianDraft {
    pub fn from_existing(c: &Custodian) -> Self {
        Self {
            area_code: Some(c.area_code.clone()),
            area_name: Some(c.area_name.clone()),
        }
    }

    pub fn apply(self, patch: CustodianDraft) -> Self {
        Self {
            area_code: patch.area_code.or(self.area_code),
            area_name: patch.area_name.or(self.area_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustodian {
    pub area_code: String,
    pub area_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CustodianQuery {
    /// Substring over area code and name
    pub q: Option<String>,
}
