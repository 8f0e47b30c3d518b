//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{lenient_id, Identified};
use crate::models::enums::{EquipmentState, EquipmentType};

/// Equipment record, joined with the codes of its location and custodian
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub inventory_code: String,
    pub serial: String,
    pub brand: String,
    pub model: String,
    pub equipment_type: EquipmentType,
    pub state: EquipmentState,
    pub location_id: i32,
    pub custodian_id: i32,
    pub location_code: Option<String>,
    pub custodian_area: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal catalog entry used to resolve inventory codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct EquipmentCode {
    pub id: i32,
    pub inventory_code: String,
    pub brand: String,
    pub model: String,
}

impl Identified for EquipmentCode {
    fn id(&self) -> i32 {
        self.id
    }
}

/// Create request, also used as a patch on update (absent fields are kept)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct EquipmentDraft {
    #[serde(default, alias = "codigo_inventario")]
    #[validate(length(min = 2, max = 60, message = "must be between 2 and 60 characters"))]
    pub inventory_code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub serial: Option<String>,
    #[serde(default, alias = "marca")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub brand: Option<String>,
    #[serde(default, alias = "modelo")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub model: Option<String>,
    #[serde(default, alias = "tipo")]
    pub equipment_type: Option<String>,
    #[serde(default, alias = "estado")]
    pub state: Option<String>,
    #[serde(default, alias = "ubicacionId", deserialize_with = "lenient_id")]
    pub location_id: Option<i32>,
    #[serde(default, alias = "responsableId", deserialize_with = "lenient_id")]
    pub custodian_id: Option<i32>,
}

impl EquipmentDraft {
    pub fn from_existing(e: &Equipment) -> Self {
        Self {
            inventory_code: Some(e.inventory_code.clone()),
            serial: Some(e.serial.clone()),
            brand: Some(e.brand.clone()),
            model: Some(e.model.clone()),
            equipment_type: Some(e.equipment_type.to_string()),
            state: Some(e.state.to_string()),
            location_id: Some(e.location_id),
            custodian_id: Some(e.custodian_id),
        }
    }

    /// Overlay the fields present in `patch`
    pub fn apply(self, patch: EquipmentDraft) -> Self {
        Self {
            inventory_code: patch.inventory_code.or(self.inventory_code),
            serial: patch.serial.or(self.serial),
            brand: patch.brand.or(self.brand),
            model: patch.model.or(self.model),
            equipment_type: patch.equipment_type.or(self.equipment_type),
            state: patch.state.or(self.state),
            location_id: patch.location_id.or(self.location_id),
            custodian_id: patch.custodian_id.or(self.custodian_id),
        }
    }
}

/// Validated equipment, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEquipment {
    pub inventory_code: String,
    pub serial: String,
    pub brand: String,
    pub model: String,
    pub equipment_type: EquipmentType,
    pub state: EquipmentState,
    pub location_id: i32,
    pub custodian_id: i32,
}

/// Equipment list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EquipmentQuery {
    /// Substring over inventory code, serial, brand and model
    pub q: Option<String>,
    #[serde(alias = "tipo")]
    pub equipment_type: Option<String>,
    #[serde(alias = "estado")]
    pub state: Option<String>,
    #[serde(default, alias = "ubicacionId", deserialize_with = "lenient_id")]
    pub location_id: Option<i32>,
    #[serde(default, alias = "responsableId", deserialize_with = "lenient_id")]
    pub custodian_id: Option<i32>,
}

/// Inventory code lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct ResolveCodeQuery {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_accepts_spanish_aliases() {
        let draft: EquipmentDraft = serde_json::from_str(
            r#"{"codigo_inventario": "EQ-0001", "tipo": "laptop", "ubicacionId": "3", "responsableId": 5}"#,
        )
        .unwrap();
        assert_eq!(draft.inventory_code.as_deref(), Some("EQ-0001"));
        assert_eq!(draft.equipment_type.as_deref(), Some("laptop"));
        assert_eq!(draft.location_id, Some(3));
        assert_eq!(draft.custodian_id, Some(5));
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let existing = EquipmentDraft {
            inventory_code: Some("EQ-1".into()),
            serial: Some("SN-1".into()),
            state: Some("operational".into()),
            ..Default::default()
        };
        let patch = EquipmentDraft {
            state: Some("decommissioned".into()),
            ..Default::default()
        };
        let merged = existing.apply(patch);
        assert_eq!(merged.inventory_code.as_deref(), Some("EQ-1"));
        assert_eq!(merged.serial.as_deref(), Some("SN-1"));
        assert_eq!(merged.state.as_deref(), Some("decommissioned"));
    }
}
