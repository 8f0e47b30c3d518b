//! Validators for each kind of record
//!
//! Each validator trims the submitted strings, runs every rule for the
//! entity and returns the typed record only when nothing was violated.

use super::{incomplete, trimmed, Checker, Mode, RefTable, UniqueKey};
use crate::{
    error::AppResult,
    models::{
        account::{AccountDraft, NewAccount},
        custodian::{CustodianDraft, NewCustodian},
        enums::EnumField,
        equipment::{EquipmentDraft, NewEquipment},
        location::{LocationDraft, NewLocation},
        maintenance::{MaintenanceDraft, NewMaintenance},
        person::{NewPerson, PersonDraft},
        position::{NewPosition, PositionDraft},
    },
    repository::lookup::ReferenceLookup,
    resolve::{EntityResolver, Target},
};

pub async fn validate_equipment<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: EquipmentDraft,
    mode: Mode,
) -> AppResult<NewEquipment> {
    let draft = EquipmentDraft {
        inventory_code: trimmed(draft.inventory_code),
        serial: trimmed(draft.serial),
        brand: trimmed(draft.brand),
        model: trimmed(draft.model),
        equipment_type: trimmed(draft.equipment_type),
        state: trimmed(draft.state),
        ..draft
    };
    let mut checker = Checker::new(lookup);

    let inventory_code = checker.required("inventory_code", draft.inventory_code.clone());
    let serial = checker.required("serial", draft.serial.clone());
    let brand = checker.required("brand", draft.brand.clone());
    let model = checker.required("model", draft.model.clone());
    let equipment_type = checker.required_member(EnumField::EquipmentType, draft.equipment_type.as_deref());
    let state = checker.required_member(EnumField::EquipmentState, draft.state.as_deref());
    let location_id = checker.required_reference("location_id", draft.location_id);
    let custodian_id = checker.required_reference("custodian_id", draft.custodian_id);
    checker.rules(&draft);

    checker.exists("location_id", RefTable::Location, location_id).await?;
    checker.exists("custodian_id", RefTable::Custodian, custodian_id).await?;
    checker.unique(UniqueKey::InventoryCode, inventory_code.as_deref(), mode).await?;
    checker.unique(UniqueKey::Serial, serial.as_deref(), mode).await?;
    checker.finish()?;

    let (
        Some(inventory_code),
        Some(serial),
        Some(brand),
        Some(model),
        Some(equipment_type),
        Some(state),
        Some(location_id),
        Some(custodian_id),
    ) = (inventory_code, serial, brand, model, equipment_type, state, location_id, custodian_id)
    else {
        return Err(incomplete("equipment"));
    };

    Ok(NewEquipment {
        inventory_code,
        serial,
        brand,
        model,
        equipment_type,
        state,
        location_id,
        custodian_id,
    })
}

pub async fn validate_location<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: LocationDraft,
    mode: Mode,
) -> AppResult<NewLocation> {
    let draft = LocationDraft {
        code: trimmed(draft.code),
        site: trimmed(draft.site),
        building: trimmed(draft.building),
        floor: trimmed(draft.floor),
        room: trimmed(draft.room),
    };
    let mut checker = Checker::new(lookup);

    let code = checker.required("code", draft.code.clone());
    let site = checker.required("site", draft.site.clone());
    let building = checker.required("building", draft.building.clone());
    let floor = checker.required("floor", draft.floor.clone());
    let room = checker.required("room", draft.room.clone());
    checker.rules(&draft);
    checker.unique(UniqueKey::LocationCode, code.as_deref(), mode).await?;
    checker.finish()?;

    let (Some(code), Some(site), Some(building), Some(floor), Some(room)) = (code, site, building, floor, room)
    else {
        return Err(incomplete("location"));
    };
    Ok(NewLocation {
        code,
        site,
        building,
        floor,
        room,
    })
}

pub async fn validate_custodian<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: CustodianDraft,
    mode: Mode,
) -> AppResult<NewCustodian> {
    let draft = CustodianDraft {
        area_code: trimmed(draft.area_code),
        area_name: trimmed(draft.area_name),
    };
    let mut checker = Checker::new(lookup);

    let area_code = checker.required("area_code", draft.area_code.clone());
    let area_name = checker.required("area_name", draft.area_name.clone());
    checker.rules(&draft);
    checker.unique(UniqueKey::AreaCode, area_code.as_deref(), mode).await?;
    checker.finish()?;

    let (Some(area_code), Some(area_name)) = (area_code, area_name) else {
        return Err(incomplete("custodian"));
    };
    Ok(NewCustodian { area_code, area_name })
}

pub async fn validate_position<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: PositionDraft,
    mode: Mode,
) -> AppResult<NewPosition> {
    let draft = PositionDraft {
        name: trimmed(draft.name),
        kind: trimmed(draft.kind),
        description: trimmed(draft.description),
    };
    let mut checker = Checker::new(lookup);

    let name = checker.required("name", draft.name.clone());
    let kind = checker.member_or_default(EnumField::PositionKind, draft.kind.as_deref());
    checker.rules(&draft);
    checker.unique(UniqueKey::PositionName, name.as_deref(), mode).await?;
    checker.finish()?;

    let (Some(name), Some(kind)) = (name, kind) else {
        return Err(incomplete("position"));
    };
    Ok(NewPosition {
        name,
        kind,
        description: draft.description,
    })
}

pub async fn validate_person<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: PersonDraft,
    mode: Mode,
) -> AppResult<NewPerson> {
    let draft = PersonDraft {
        national_id: trimmed(draft.national_id),
        given_names: trimmed(draft.given_names),
        family_names: trimmed(draft.family_names),
        position_id: draft.position_id,
        email: trimmed(draft.email),
        phone: trimmed(draft.phone),
    };
    let mut checker = Checker::new(lookup);

    let national_id = checker.required("national_id", draft.national_id.clone());
    let given_names = checker.required("given_names", draft.given_names.clone());
    let family_names = checker.required("family_names", draft.family_names.clone());
    checker.rules(&draft);
    checker.exists("position_id", RefTable::Position, draft.position_id).await?;
    checker.unique(UniqueKey::NationalId, national_id.as_deref(), mode).await?;
    checker.finish()?;

    let (Some(national_id), Some(given_names), Some(family_names)) = (national_id, given_names, family_names)
    else {
        return Err(incomplete("maintenance person"));
    };
    Ok(NewPerson {
        national_id,
        given_names,
        family_names,
        position_id: draft.position_id,
        email: draft.email,
        phone: draft.phone,
    })
}

/// Validate a maintenance record. When no equipment id is given, the
/// inventory code is resolved first and a failed resolution is reported with
/// the other violations.
pub async fn validate_maintenance<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: MaintenanceDraft,
) -> AppResult<NewMaintenance> {
    let draft = MaintenanceDraft {
        inventory_code: trimmed(draft.inventory_code),
        kind: trimmed(draft.kind),
        priority: trimmed(draft.priority),
        result: trimmed(draft.result),
        scheduled_at: trimmed(draft.scheduled_at),
        executed_at: trimmed(draft.executed_at),
        next_due: trimmed(draft.next_due),
        description: trimmed(draft.description),
        notes: trimmed(draft.notes),
        attachment_url: trimmed(draft.attachment_url),
        ..draft
    };
    let mut checker = Checker::new(lookup);

    let equipment_id = match (draft.equipment_id, draft.inventory_code.as_deref()) {
        (Some(id), _) => {
            checker.exists("equipment_id", RefTable::Equipment, Some(id)).await?;
            Some(id)
        }
        (None, Some(code)) => {
            let resolved = EntityResolver::new(lookup)
                .resolve("inventory_code", code, Target::Equipment)
                .await;
            checker.absorb(resolved)?
        }
        (None, None) => checker.required_reference("equipment_id", None),
    };
    let person_id = checker.required_reference("person_id", draft.person_id);
    checker.exists("person_id", RefTable::Person, person_id).await?;

    let kind = checker.required_member(EnumField::MaintenanceKind, draft.kind.as_deref());
    let priority = checker.member_or_default(EnumField::MaintenancePriority, draft.priority.as_deref());
    let result = checker.member(EnumField::MaintenanceResult, draft.result.as_deref());
    let scheduled_at = checker.datetime("scheduled_at", draft.scheduled_at.as_deref());
    let executed_at = checker.datetime("executed_at", draft.executed_at.as_deref());
    let next_due = checker.calendar_date("next_due", draft.next_due.as_deref());
    checker.rules(&draft);
    checker.finish()?;

    let (Some(equipment_id), Some(person_id), Some(kind), Some(priority)) = (equipment_id, person_id, kind, priority)
    else {
        return Err(incomplete("maintenance record"));
    };
    Ok(NewMaintenance {
        equipment_id,
        person_id,
        kind,
        priority,
        result,
        scheduled_at,
        executed_at,
        next_due,
        description: draft.description,
        notes: draft.notes,
        attachment_url: draft.attachment_url,
    })
}

/// Validate account fields. A password is required when creating and
/// optional (kept unchanged) when updating.
pub async fn validate_account<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    draft: AccountDraft,
    mode: Mode,
) -> AppResult<NewAccount> {
    let draft = AccountDraft {
        username: trimmed(draft.username),
        password: draft.password.filter(|p| !p.is_empty()),
        role: trimmed(draft.role),
    };
    let mut checker = Checker::new(lookup);

    let username = checker.required("username", draft.username.clone());
    if mode == Mode::Create {
        checker.required("password", draft.password.as_deref());
    }
    let role = checker.member_or_default(EnumField::AccountRole, draft.role.as_deref());
    checker.rules(&draft);
    checker.unique(UniqueKey::Username, username.as_deref(), mode).await?;
    checker.finish()?;

    let (Some(username), Some(role)) = (username, role) else {
        return Err(incomplete("account"));
    };
    Ok(NewAccount {
        username,
        password: draft.password,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{
            enums::{EquipmentState, EquipmentType, MaintenanceKind, MaintenancePriority, Role},
            EquipmentCode,
        },
        repository::lookup::MockReferenceLookup,
        validation::Violation,
    };
    use chrono::{TimeZone, Utc};

    fn permissive() -> MockReferenceLookup {
        let mut lookup = MockReferenceLookup::new();
        lookup.expect_exists().returning(|_, _| Ok(true));
        lookup.expect_is_taken().returning(|_, _, _| Ok(false));
        lookup
    }

    fn violations<T: std::fmt::Debug>(result: AppResult<T>) -> Vec<Violation> {
        match result {
            Err(AppError::Invalid(v)) => v,
            other => panic!("expected violations, got {other:?}"),
        }
    }

    fn equipment_draft() -> EquipmentDraft {
        EquipmentDraft {
            inventory_code: Some(" EQ-0001 ".into()),
            serial: Some("SN-12345".into()),
            brand: Some("Dell".into()),
            model: Some("Latitude 5420".into()),
            equipment_type: Some("laptop".into()),
            state: Some("operational".into()),
            location_id: Some(1),
            custodian_id: Some(2),
        }
    }

    #[tokio::test]
    async fn valid_equipment_is_trimmed_and_typed() {
        let lookup = permissive();
        let record = validate_equipment(&lookup, equipment_draft(), Mode::Create).await.unwrap();
        assert_eq!(record.inventory_code, "EQ-0001");
        assert_eq!(record.equipment_type, EquipmentType::Laptop);
        assert_eq!(record.state, EquipmentState::Operational);
    }

    #[tokio::test]
    async fn each_missing_field_is_reported_once() {
        let lookup = permissive();
        let draft = EquipmentDraft {
            serial: Some("   ".into()),
            brand: None,
            state: None,
            ..equipment_draft()
        };
        let fields: Vec<String> = violations(validate_equipment(&lookup, draft, Mode::Create).await)
            .iter()
            .map(|v| v.field().to_string())
            .collect();
        assert_eq!(fields, vec!["serial", "brand", "state"]);
    }

    #[tokio::test]
    async fn every_kind_of_violation_is_aggregated() {
        let mut lookup = MockReferenceLookup::new();
        lookup
            .expect_exists()
            .returning(|table, _| Ok(table != RefTable::Custodian));
        lookup
            .expect_is_taken()
            .returning(|key, _, _| Ok(key == UniqueKey::Serial));

        let draft = EquipmentDraft {
            inventory_code: Some("E".into()),
            equipment_type: Some("tablet".into()),
            ..equipment_draft()
        };
        let found = violations(validate_equipment(&lookup, draft, Mode::Create).await);
        assert!(found.contains(&Violation::InvalidEnum {
            field: "equipment_type".into(),
            allowed: EquipmentType::VALUES.to_vec(),
        }));
        assert!(found.contains(&Violation::DanglingReference { field: "custodian_id".into() }));
        assert!(found.contains(&Violation::DuplicateValue { field: "serial".into() }));
        assert!(found
            .iter()
            .any(|v| matches!(v, Violation::InvalidValue { field, .. } if field == "inventory_code")));
        assert_eq!(found.len(), 4);
    }

    #[tokio::test]
    async fn update_mode_excludes_own_row_from_uniqueness() {
        let mut lookup = MockReferenceLookup::new();
        lookup.expect_exists().returning(|_, _| Ok(true));
        lookup
            .expect_is_taken()
            .withf(|_, _, exclude| *exclude == Some(11))
            .returning(|_, _, _| Ok(false));
        assert!(validate_equipment(&lookup, equipment_draft(), Mode::Update(11)).await.is_ok());
    }

    fn maintenance_draft() -> MaintenanceDraft {
        MaintenanceDraft {
            equipment_id: None,
            inventory_code: Some("EQ-0001".into()),
            person_id: Some(4),
            kind: Some("preventive".into()),
            next_due: Some("2025-03-01".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn inventory_code_resolves_before_validation() {
        let mut lookup = permissive();
        lookup.expect_equipment_codes().returning(|| {
            Ok(vec![EquipmentCode {
                id: 7,
                inventory_code: "EQ-0001".into(),
                brand: "Dell".into(),
                model: "Latitude".into(),
            }])
        });

        let record = validate_maintenance(&lookup, maintenance_draft()).await.unwrap();
        assert_eq!(record.equipment_id, 7);
        assert_eq!(record.kind, MaintenanceKind::Preventive);
        assert_eq!(record.priority, MaintenancePriority::Medium);
        assert_eq!(record.result, None);
        assert_eq!(record.next_due, Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
    }

    #[tokio::test]
    async fn unresolved_code_joins_other_violations() {
        let mut lookup = permissive();
        lookup.expect_equipment_codes().returning(|| Ok(Vec::new()));

        let draft = MaintenanceDraft {
            person_id: None,
            kind: Some("urgent".into()),
            scheduled_at: Some("tomorrow".into()),
            ..maintenance_draft()
        };
        let found = violations(validate_maintenance(&lookup, draft).await);
        assert_eq!(
            found,
            vec![
                Violation::UnknownReference {
                    field: "inventory_code".into(),
                    token: "EQ-0001".into(),
                },
                Violation::MissingReference { field: "person_id".into() },
                Violation::InvalidEnum {
                    field: "kind".into(),
                    allowed: vec!["preventive", "corrective"],
                },
                Violation::InvalidDate { field: "scheduled_at".into() },
            ]
        );
    }

    #[tokio::test]
    async fn maintenance_without_equipment_reference_is_missing() {
        let lookup = permissive();
        let draft = MaintenanceDraft {
            inventory_code: Some("  ".into()),
            ..maintenance_draft()
        };
        assert_eq!(
            violations(validate_maintenance(&lookup, draft).await),
            vec![Violation::MissingReference { field: "equipment_id".into() }]
        );
    }

    #[tokio::test]
    async fn dangling_person_is_reported() {
        let mut lookup = MockReferenceLookup::new();
        lookup
            .expect_exists()
            .returning(|table, _| Ok(table != RefTable::Person));
        let draft = MaintenanceDraft {
            equipment_id: Some(7),
            inventory_code: None,
            ..maintenance_draft()
        };
        assert_eq!(
            violations(validate_maintenance(&lookup, draft).await),
            vec![Violation::DanglingReference { field: "person_id".into() }]
        );
    }

    #[tokio::test]
    async fn position_kind_defaults_to_internal() {
        let lookup = permissive();
        let draft = PositionDraft {
            name: Some("Technician".into()),
            kind: None,
            description: Some("  ".into()),
        };
        let record = validate_position(&lookup, draft, Mode::Create).await.unwrap();
        assert_eq!(record.kind, crate::models::enums::PositionKind::Internal);
        assert_eq!(record.description, None);
    }

    #[tokio::test]
    async fn person_email_format_is_checked() {
        let lookup = permissive();
        let draft = PersonDraft {
            national_id: Some("1020".into()),
            given_names: Some("Ana".into()),
            family_names: Some("Pérez".into()),
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let found = violations(validate_person(&lookup, draft, Mode::Create).await);
        assert!(matches!(found.as_slice(), [Violation::InvalidValue { field, .. }] if field == "email"));
    }

    #[tokio::test]
    async fn account_password_rules_depend_on_mode() {
        let lookup = permissive();
        let draft = AccountDraft {
            username: Some("officer1".into()),
            password: None,
            role: Some("officer".into()),
        };
        let found = violations(validate_account(&lookup, draft.clone(), Mode::Create).await);
        assert_eq!(found, vec![Violation::MissingValue { field: "password".into() }]);

        let record = validate_account(&lookup, draft, Mode::Update(2)).await.unwrap();
        assert_eq!(record.role, Role::Officer);
        assert_eq!(record.password, None);

        let short = AccountDraft {
            username: Some("officer1".into()),
            password: Some("abc".into()),
            role: None,
        };
        let found = violations(validate_account(&lookup, short, Mode::Create).await);
        assert!(matches!(found.as_slice(), [Violation::InvalidValue { field, .. }] if field == "password"));
    }
}
