//! Position (job role category) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::enums::PositionKind;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Position {
    pub id: i32,
    pub name: String,
    pub kind: PositionKind,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PositionDraft {
    #[serde(default, alias = "nombre")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub name: Option<String>,
    #[serde(default, alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default, alias = "descripcion")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub description: Option<String>,
}

/// Update request; `description: null` clears the description
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PositionPatch {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default, alias = "descripcion", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl PositionDraft {
    pub fn from_existing(p: &Position) -> Self {
        Self {
            name: Some(p.name.clone()),
            kind: Some(p.kind.to_string()),
            description: p.description.clone(),
        }
    }

    pub fn apply(self, patch: PositionPatch) -> Self {
        Self {
            name: patch.name.or(self.name),
            kind: patch.kind.or(self.kind),
            description: match patch.description {
                Some(value) => value,
                None => self.description,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosition {
    pub name: String,
    pub kind: PositionKind,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PositionQuery {
    /// Substring over name and description
    pub q: Option<String>,
    #[serde(alias = "tipo")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_description_clears_and_absent_keeps() {
        let base = PositionDraft {
            name: Some("Technician".into()),
            kind: Some("internal".into()),
            description: Some("On site".into()),
        };

        let keep: PositionPatch = serde_json::from_str(r#"{"name": "Senior technician"}"#).unwrap();
        let kept = base.clone().apply(keep);
        assert_eq!(kept.name.as_deref(), Some("Senior technician"));
        assert_eq!(kept.description.as_deref(), Some("On site"));

        let clear: PositionPatch = serde_json::from_str(r#"{"descripcion": null}"#).unwrap();
        assert_eq!(base.apply(clear).description, None);
    }
}
