//! Maintenance record model

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{lenient_id, lenient_id_patch};
use crate::{
    dates,
    error::{AppError, AppResult},
    models::enums::{MaintenanceKind, MaintenancePriority, MaintenanceResult},
    validation::Violation,
};

/// Stored maintenance record, joined with equipment and person display fields
#[derive(Debug, Clone, FromRow)]
pub struct Maintenance {
    pub id: i32,
    pub equipment_id: i32,
    pub person_id: i32,
    pub kind: MaintenanceKind,
    pub priority: MaintenancePriority,
    pub result: Option<MaintenanceResult>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inventory_code: Option<String>,
    pub equipment_brand: Option<String>,
    pub equipment_model: Option<String>,
    pub person_national_id: Option<String>,
    pub person_given_names: Option<String>,
    pub person_family_names: Option<String>,
}

/// Maintenance record as shown to clients and in reports
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceView {
    pub id: i32,
    pub equipment_id: i32,
    pub inventory_code: Option<String>,
    pub equipment: Option<String>,
    pub person_id: i32,
    pub person: Option<String>,
    pub kind: MaintenanceKind,
    pub priority: MaintenancePriority,
    pub result: Option<MaintenanceResult>,
    /// Date-time in the reporting offset
    pub scheduled_at: Option<String>,
    /// Date-time in the reporting offset
    pub executed_at: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub next_due: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Maintenance {
    pub fn view(&self, offset: FixedOffset) -> MaintenanceView {
        let equipment = match (&self.equipment_brand, &self.equipment_model) {
            (Some(brand), Some(model)) => Some(format!("{} {}", brand, model)),
            _ => None,
        };
        let person = match (
            &self.person_national_id,
            &self.person_family_names,
            &self.person_given_names,
        ) {
            (Some(id), Some(family), Some(given)) => Some(format!("{} — {}, {}", id, family, given)),
            _ => None,
        };

        MaintenanceView {
            id: self.id,
            equipment_id: self.equipment_id,
            inventory_code: self.inventory_code.clone(),
            equipment,
            person_id: self.person_id,
            person,
            kind: self.kind,
            priority: self.priority,
            result: self.result,
            scheduled_at: self.scheduled_at.as_ref().map(|d| dates::format_instant(d, offset)),
            executed_at: self.executed_at.as_ref().map(|d| dates::format_instant(d, offset)),
            next_due: self.next_due.as_ref().map(dates::format_calendar_date),
            description: self.description.clone(),
            notes: self.notes.clone(),
            attachment_url: self.attachment_url.clone(),
            created_at: dates::format_audit(&self.created_at, offset),
            updated_at: dates::format_audit(&self.updated_at, offset),
        }
    }
}

/// Create request. The equipment may be given by id or by inventory code.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct MaintenanceDraft {
    #[serde(default, alias = "equipoId", deserialize_with = "lenient_id")]
    pub equipment_id: Option<i32>,
    #[serde(default, alias = "codigo_inventario")]
    pub inventory_code: Option<String>,
    #[serde(default, alias = "responsableId", deserialize_with = "lenient_id")]
    pub person_id: Option<i32>,
    #[serde(default, alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default, alias = "prioridad")]
    pub priority: Option<String>,
    #[serde(default, alias = "resultado")]
    pub result: Option<String>,
    #[serde(default, alias = "fecha_programada")]
    pub scheduled_at: Option<String>,
    #[serde(default, alias = "fecha_ejecucion")]
    pub executed_at: Option<String>,
    #[serde(default, alias = "proximo_vencimiento")]
    pub next_due: Option<String>,
    #[serde(default, alias = "descripcion")]
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default, alias = "observaciones")]
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
    #[serde(default, alias = "adjunto_url")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub attachment_url: Option<String>,
}

/// Update request; `null` clears a nullable field, absent keeps it
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MaintenancePatch {
    #[serde(default, alias = "equipoId", deserialize_with = "lenient_id")]
    pub equipment_id: Option<i32>,
    #[serde(default, alias = "codigo_inventario")]
    pub inventory_code: Option<String>,
    #[serde(default, alias = "responsableId", deserialize_with = "lenient_id")]
    pub person_id: Option<i32>,
    #[serde(default, alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default, alias = "prioridad")]
    pub priority: Option<String>,
    #[serde(default, alias = "resultado", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub result: Option<Option<String>>,
    #[serde(default, alias = "fecha_programada", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub scheduled_at: Option<Option<String>>,
    #[serde(default, alias = "fecha_ejecucion", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub executed_at: Option<Option<String>>,
    #[serde(default, alias = "proximo_vencimiento", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub next_due: Option<Option<String>>,
    #[serde(default, alias = "descripcion", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, alias = "observaciones", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, alias = "adjunto_url", with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub attachment_url: Option<Option<String>>,
}

impl MaintenanceDraft {
    /// Draft reproducing a stored record, so a patch can be validated as a whole
    pub fn from_existing(m: &Maintenance) -> Self {
        Self {
            equipment_id: Some(m.equipment_id),
            inventory_code: None,
            person_id: Some(m.person_id),
            kind: Some(m.kind.to_string()),
            priority: Some(m.priority.to_string()),
            result: m.result.map(|r| r.to_string()),
            scheduled_at: m.scheduled_at.map(|d| d.to_rfc3339()),
            executed_at: m.executed_at.map(|d| d.to_rfc3339()),
            next_due: m.next_due.as_ref().map(dates::format_calendar_date),
            description: m.description.clone(),
            notes: m.notes.clone(),
            attachment_url: m.attachment_url.clone(),
        }
    }

    /// Overlay a patch. A new inventory code replaces the stored equipment id
    /// unless an explicit id is also supplied.
    pub fn apply(self, patch: MaintenancePatch) -> Self {
        let (equipment_id, inventory_code) = match (patch.equipment_id, patch.inventory_code) {
            (Some(id), code) => (Some(id), code),
            (None, Some(code)) if !code.trim().is_empty() => (None, Some(code)),
            (None, _) => (self.equipment_id, None),
        };
        Self {
            equipment_id,
            inventory_code,
            person_id: patch.person_id.or(self.person_id),
            kind: patch.kind.or(self.kind),
            priority: patch.priority.or(self.priority),
            result: patch.result.unwrap_or(self.result),
            scheduled_at: patch.scheduled_at.unwrap_or(self.scheduled_at),
            executed_at: patch.executed_at.unwrap_or(self.executed_at),
            next_due: patch.next_due.unwrap_or(self.next_due),
            description: patch.description.unwrap_or(self.description),
            notes: patch.notes.unwrap_or(self.notes),
            attachment_url: patch.attachment_url.unwrap_or(self.attachment_url),
        }
    }
}

/// Validated maintenance record, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaintenance {
    pub equipment_id: i32,
    pub person_id: i32,
    pub kind: MaintenanceKind,
    pub priority: MaintenancePriority,
    pub result: Option<MaintenanceResult>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
}

/// Maintenance list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MaintenanceQuery {
    #[serde(default, alias = "equipoId", deserialize_with = "lenient_id")]
    pub equipment_id: Option<i32>,
    #[serde(default, alias = "responsableId", deserialize_with = "lenient_id")]
    pub person_id: Option<i32>,
    #[serde(alias = "tipo")]
    pub kind: Option<String>,
    #[serde(alias = "prioridad")]
    pub priority: Option<String>,
    #[serde(alias = "resultado")]
    pub result: Option<String>,
    /// Scheduled on or after this date
    #[serde(alias = "desde")]
    pub from: Option<String>,
    /// Scheduled on or before the end of this date
    #[serde(alias = "hasta")]
    pub to: Option<String>,
    /// Substring over description, notes and inventory code
    pub q: Option<String>,
}

/// Maintenance filters with parsed date bounds
#[derive(Debug, Clone, Default)]
pub struct MaintenanceFilter {
    pub equipment_id: Option<i32>,
    pub person_id: Option<i32>,
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub result: Option<String>,
    /// Inclusive lower bound on the scheduled date
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the scheduled date
    pub until: Option<DateTime<Utc>>,
    pub q: Option<String>,
}

impl MaintenanceQuery {
    /// Parse the date range. A bare `to` date includes that whole day.
    pub fn to_filter(&self) -> AppResult<MaintenanceFilter> {
        let mut violations = Vec::new();
        let mut bound = |field: &str, raw: &Option<String>| {
            let raw = raw.as_deref().map(str::trim).filter(|r| !r.is_empty())?;
            let parsed = dates::parse_datetime(raw);
            if parsed.is_none() {
                violations.push(Violation::InvalidDate { field: field.to_string() });
            }
            parsed.map(|at| (at, NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()))
        };
        let from = bound("from", &self.from).map(|(at, _)| at);
        let to = bound("to", &self.to);
        let until = match to {
            Some((at, whole_day)) => {
                let step = if whole_day { Duration::days(1) } else { Duration::microseconds(1) };
                let end = at.checked_add_signed(step);
                if end.is_none() {
                    violations.push(Violation::InvalidDate { field: "to".to_string() });
                }
                end
            }
            None => None,
        };
        if !violations.is_empty() {
            return Err(AppError::Invalid(violations));
        }

        Ok(MaintenanceFilter {
            equipment_id: self.equipment_id,
            person_id: self.person_id,
            kind: self.kind.clone(),
            priority: self.priority.clone(),
            result: self.result.clone(),
            from,
            until,
            q: self.q.clone(),
        })
    }
}

/// Enumerated values offered by the maintenance form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceOptions {
    pub kinds: Vec<&'static str>,
    pub priorities: Vec<&'static str>,
    pub results: Vec<&'static str>,
    pub default_priority: &'static str,
}

impl Default for MaintenanceOptions {
    fn default() -> Self {
        Self {
            kinds: MaintenanceKind::VALUES.to_vec(),
            priorities: MaintenancePriority::VALUES.to_vec(),
            results: MaintenanceResult::VALUES.to_vec(),
            default_priority: MaintenancePriority::Medium.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored() -> Maintenance {
        Maintenance {
            id: 1,
            equipment_id: 7,
            person_id: 4,
            kind: MaintenanceKind::Preventive,
            priority: MaintenancePriority::High,
            result: None,
            scheduled_at: Some(Utc.with_ymd_and_hms(2025, 2, 28, 15, 0, 0).unwrap()),
            executed_at: None,
            next_due: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            description: Some("Cleaning".into()),
            notes: None,
            attachment_url: None,
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 2, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 2, 1, 2, 30, 0).unwrap(),
            inventory_code: Some("EQ-0001".into()),
            equipment_brand: Some("Dell".into()),
            equipment_model: Some("Latitude".into()),
            person_national_id: Some("1020".into()),
            person_given_names: Some("Ana".into()),
            person_family_names: Some("Pérez".into()),
        }
    }

    #[test]
    fn next_due_is_not_shifted_by_reporting_offset() {
        for hours in [-12, -5, 0, 5, 14] {
            let offset = FixedOffset::east_opt(hours * 3600).unwrap();
            assert_eq!(stored().view(offset).next_due.as_deref(), Some("2025-03-01"));
        }
    }

    #[test]
    fn view_converts_instants_and_builds_labels() {
        let view = stored().view(FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(view.scheduled_at.as_deref(), Some("2025-02-28T10:00:00-05:00"));
        assert_eq!(view.created_at, "2025-01-31 21:30");
        assert_eq!(view.equipment.as_deref(), Some("Dell Latitude"));
        assert_eq!(view.person.as_deref(), Some("1020 — Pérez, Ana"));
    }

    #[test]
    fn patch_with_code_drops_stored_equipment_id() {
        let patch: MaintenancePatch =
            serde_json::from_str(r#"{"codigo_inventario": "EQ-0002", "resultado": null}"#).unwrap();
        let mut base = MaintenanceDraft::from_existing(&stored());
        base.result = Some("failed".into());
        let merged = base.apply(patch);
        assert_eq!(merged.equipment_id, None);
        assert_eq!(merged.inventory_code.as_deref(), Some("EQ-0002"));
        assert_eq!(merged.result, None);
        assert_eq!(merged.person_id, Some(4));
        assert_eq!(merged.next_due.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn bare_to_date_covers_whole_day() {
        let query = MaintenanceQuery {
            from: Some("2025-03-01".into()),
            to: Some("2025-03-31".into()),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.from, Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(filter.until, Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn malformed_range_reports_both_bounds() {
        let query = MaintenanceQuery {
            from: Some("March".into()),
            to: Some("soon".into()),
            ..Default::default()
        };
        match query.to_filter() {
            Err(AppError::Invalid(v)) => assert_eq!(v.len(), 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_to_date_is_rejected() {
        let query = MaintenanceQuery {
            to: Some("+262142-12-31".into()),
            ..Default::default()
        };
        match query.to_filter() {
            Err(AppError::Invalid(v)) => {
                assert_eq!(v, vec![Violation::InvalidDate { field: "to".into() }]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let merged = MaintenanceDraft::from_existing(&stored()).apply(MaintenancePatch::default());
        assert_eq!(merged.equipment_id, Some(7));
        assert_eq!(merged.kind.as_deref(), Some("preventive"));
        assert_eq!(merged.description.as_deref(), Some("Cleaning"));
    }
}
