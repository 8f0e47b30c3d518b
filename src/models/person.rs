//! Maintenance person model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{lenient_id, lenient_id_patch, Identified};

/// Person who can be responsible for maintenance, with their position name
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MaintenancePerson {
    pub id: i32,
    pub national_id: String,
    pub given_names: String,
    pub family_names: String,
    pub position_id: Option<i32>,
    pub position_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenancePerson {
    /// Picker label, e.g. `1020 — Pérez Gómez, Ana María`
    pub fn label(&self) -> String {
        format!("{} — {}, {}", self.national_id, self.family_names, self.given_names)
    }
}

impl Identified for MaintenancePerson {
    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PersonDraft {
    #[serde(default, alias = "identificacion")]
    #[validate(length(max = 40, message = "must be at most 40 characters"))]
    pub national_id: Option<String>,
    #[serde(default, alias = "nombres")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub given_names: Option<String>,
    #[serde(default, alias = "apellidos")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub family_names: Option<String>,
    #[serde(default, alias = "cargoId", deserialize_with = "lenient_id")]
    pub position_id: Option<i32>,
    #[serde(default, alias = "correo")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default, alias = "telefono")]
    #[validate(length(max = 40, message = "must be at most 40 characters"))]
    pub phone: Option<String>,
}

/// Update request; `null` clears the optional fields
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PersonPatch {
    #[serde(default, alias = "identificacion")]
    pub national_id: Option<String>,
    #[serde(default, alias = "nombres")]
    pub given_names: Option<String>,
    #[serde(default, alias = "apellidos")]
    pub family_names: Option<String>,
    #[serde(default, alias = "cargoId", deserialize_with = "lenient_id_patch")]
    #[schema(value_type = Option<i32>)]
    pub position_id: Option<Option<i32>>,
    #[serde(default, alias = "correo", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, alias = "telefono", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

impl PersonDraft {
    pub fn from_existing(p: &MaintenancePerson) -> Self {
        Self {
            national_id: Some(p.national_id.clone()),
            given_names: Some(p.given_names.clone()),
            family_names: Some(p.family_names.clone()),
            position_id: p.position_id,
            email: p.email.clone(),
            phone: p.phone.clone(),
        }
    }

    pub fn apply(self, patch: PersonPatch) -> Self {
        Self {
            national_id: patch.national_id.or(self.national_id),
            given_names: patch.given_names.or(self.given_names),
            family_names: patch.family_names.or(self.family_names),
            position_id: patch.position_id.unwrap_or(self.position_id),
            email: patch.email.unwrap_or(self.email),
            phone: patch.phone.unwrap_or(self.phone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub national_id: String,
    pub given_names: String,
    pub family_names: String,
    pub position_id: Option<i32>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PersonQuery {
    /// Substring over national id, names, email and phone
    pub q: Option<String>,
    #[serde(default, alias = "cargoId", deserialize_with = "lenient_id")]
    pub position_id: Option<i32>,
}

/// Free-text person lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct ResolveLabelQuery {
    pub label: String,
}

/// Typeahead request for one picker field
#[derive(Debug, Deserialize, IntoParams)]
pub struct SuggestQuery {
    /// Picker field issuing the search; a newer search on the same field supersedes older ones
    #[serde(default = "default_suggest_field")]
    pub field: String,
    #[serde(default)]
    pub q: String,
}

fn default_suggest_field() -> String {
    "person".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn person() -> MaintenancePerson {
        MaintenancePerson {
            id: 4,
            national_id: "1020".into(),
            given_names: "Ana María".into(),
            family_names: "Pérez Gómez".into(),
            position_id: Some(2),
            position_name: Some("Technician".into()),
            email: Some("ana@example.org".into()),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn label_puts_identifier_first() {
        assert_eq!(person().label(), "1020 — Pérez Gómez, Ana María");
    }

    #[test]
    fn patch_can_clear_position_and_email() {
        let patch: PersonPatch =
            serde_json::from_str(r#"{"cargoId": null, "email": null, "phone": "555"}"#).unwrap();
        let merged = PersonDraft::from_existing(&person()).apply(patch);
        assert_eq!(merged.position_id, None);
        assert_eq!(merged.email, None);
        assert_eq!(merged.phone.as_deref(), Some("555"));
        assert_eq!(merged.national_id.as_deref(), Some("1020"));
    }
}
