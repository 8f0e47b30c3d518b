//! Record validation
//!
//! Validators never stop at the first problem: every rule is evaluated and
//! all violations are returned together as [`AppError::Invalid`], so a client
//! can fix a submission in one round trip.

pub mod records;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use validator::Validate;

use crate::{
    dates,
    error::{AppError, AppResult},
    models::enums::EnumField,
    repository::lookup::ReferenceLookup,
};

pub use records::*;

/// A single broken rule, displayed as the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{field} is required")]
    MissingValue { field: String },

    #[error("{field} is required")]
    MissingReference { field: String },

    #[error("{field}: nothing matches '{token}'")]
    UnknownReference { field: String, token: String },

    #[error("{field}: '{token}' matches more than one record")]
    AmbiguousReference { field: String, token: String },

    #[error("{field} must be one of: {}", .allowed.join(", "))]
    InvalidEnum { field: String, allowed: Vec<&'static str> },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{field} refers to a record that does not exist")]
    DanglingReference { field: String },

    #[error("{field} already exists")]
    DuplicateValue { field: String },

    #[error("{field} is not a valid date")]
    InvalidDate { field: String },
}

impl Violation {
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingValue { field }
            | Violation::MissingReference { field }
            | Violation::UnknownReference { field, .. }
            | Violation::AmbiguousReference { field, .. }
            | Violation::InvalidEnum { field, .. }
            | Violation::InvalidValue { field, .. }
            | Violation::DanglingReference { field }
            | Violation::DuplicateValue { field }
            | Violation::InvalidDate { field } => field,
        }
    }
}

/// Whether a record is being created or replaces the row with the given id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update(i32),
}

impl Mode {
    pub fn exclude_id(&self) -> Option<i32> {
        match self {
            Mode::Create => None,
            Mode::Update(id) => Some(*id),
        }
    }
}

/// Tables that can be the target of a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTable {
    Location,
    Custodian,
    Equipment,
    Person,
    Position,
}

impl RefTable {
    pub fn table(&self) -> &'static str {
        match self {
            RefTable::Location => "locations",
            RefTable::Custodian => "custodians",
            RefTable::Equipment => "equipment",
            RefTable::Person => "maintenance_people",
            RefTable::Position => "positions",
        }
    }
}

/// Columns carrying a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    InventoryCode,
    Serial,
    LocationCode,
    AreaCode,
    PositionName,
    NationalId,
    Username,
}

impl UniqueKey {
    const ALL: [UniqueKey; 7] = [
        UniqueKey::InventoryCode,
        UniqueKey::Serial,
        UniqueKey::LocationCode,
        UniqueKey::AreaCode,
        UniqueKey::PositionName,
        UniqueKey::NationalId,
        UniqueKey::Username,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            UniqueKey::InventoryCode | UniqueKey::Serial => "equipment",
            UniqueKey::LocationCode => "locations",
            UniqueKey::AreaCode => "custodians",
            UniqueKey::PositionName => "positions",
            UniqueKey::NationalId => "maintenance_people",
            UniqueKey::Username => "accounts",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            UniqueKey::InventoryCode => "inventory_code",
            UniqueKey::Serial => "serial",
            UniqueKey::LocationCode => "code",
            UniqueKey::AreaCode => "area_code",
            UniqueKey::PositionName => "name",
            UniqueKey::NationalId => "national_id",
            UniqueKey::Username => "username",
        }
    }

    /// Request field reported in violations
    pub fn field(&self) -> &'static str {
        self.column()
    }

    /// Name of the database constraint enforcing this key
    pub fn constraint(&self) -> String {
        format!("{}_{}_key", self.table(), self.column())
    }

    pub fn from_constraint(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.constraint() == name)
    }
}

/// Trim a submitted string, treating blank input as absent
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Collects violations for one record
pub struct Checker<'a, L: ?Sized> {
    lookup: &'a L,
    violations: Vec<Violation>,
}

impl<'a, L: ReferenceLookup + ?Sized> Checker<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Record violations carried by a rejected sub-step (e.g. reference resolution)
    pub fn absorb<T>(&mut self, result: AppResult<T>) -> AppResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(AppError::Invalid(violations)) => {
                self.violations.extend(violations);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Length, format and email rules declared with `validator` derives
    pub fn rules<T: Validate>(&mut self, value: &T) {
        let Err(errors) = value.validate() else {
            return;
        };
        let mut found: Vec<Violation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| Violation::InvalidValue {
                    field: field.to_string(),
                    reason: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        found.sort_by(|a, b| a.field().cmp(b.field()));
        self.violations.extend(found);
    }

    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(Violation::MissingValue { field: field.to_string() });
        }
        value
    }

    pub fn required_reference(&mut self, field: &str, id: Option<i32>) -> Option<i32> {
        if id.is_none() {
            self.push(Violation::MissingReference { field: field.to_string() });
        }
        id
    }

    /// Parse an enumerated value; absent values pass through as `None`
    pub fn member<T: FromStr>(&mut self, field: EnumField, value: Option<&str>) -> Option<T> {
        let value = value.filter(|v| !v.is_empty())?;
        if field.is_member(Some(value)) {
            if let Ok(parsed) = value.parse() {
                return Some(parsed);
            }
        }
        self.push(Violation::InvalidEnum {
            field: field.field_name().to_string(),
            allowed: field.values().to_vec(),
        });
        None
    }

    /// Required enumerated value: absence is one `MissingValue`, a bad value one `InvalidEnum`
    pub fn required_member<T: FromStr>(&mut self, field: EnumField, value: Option<&str>) -> Option<T> {
        if value.map_or(true, str::is_empty) {
            self.push(Violation::MissingValue { field: field.field_name().to_string() });
            return None;
        }
        self.member(field, value)
    }

    /// Enumerated value falling back to the registry default when absent
    pub fn member_or_default<T: FromStr>(&mut self, field: EnumField, value: Option<&str>) -> Option<T> {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => self.member(field, Some(v)),
            None => field.default_value().and_then(|d| d.parse().ok()),
        }
    }

    pub async fn exists(&mut self, field: &str, table: RefTable, id: Option<i32>) -> AppResult<()> {
        if let Some(id) = id {
            if !self.lookup.exists(table, id).await? {
                self.push(Violation::DanglingReference { field: field.to_string() });
            }
        }
        Ok(())
    }

    pub async fn unique(&mut self, key: UniqueKey, value: Option<&str>, mode: Mode) -> AppResult<()> {
        if let Some(value) = value {
            if self.lookup.is_taken(key, value, mode.exclude_id()).await? {
                self.push(Violation::DuplicateValue { field: key.field().to_string() });
            }
        }
        Ok(())
    }

    pub fn datetime(&mut self, field: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
        let value = value.filter(|v| !v.trim().is_empty())?;
        let parsed = dates::parse_datetime(value);
        if parsed.is_none() {
            self.push(Violation::InvalidDate { field: field.to_string() });
        }
        parsed
    }

    pub fn calendar_date(&mut self, field: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
        let value = value.filter(|v| !v.trim().is_empty())?;
        let parsed = dates::parse_calendar_date(value);
        if parsed.is_none() {
            self.push(Violation::InvalidDate { field: field.to_string() });
        }
        parsed
    }

    /// Fail with every collected violation, if any
    pub fn finish(self) -> AppResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::Invalid(self.violations))
        }
    }
}

/// Internal error for a record that passed validation but is missing a field
pub(crate) fn incomplete(entity: &str) -> AppError {
    AppError::Internal(format!("validated {} is incomplete", entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::lookup::MockReferenceLookup;

    #[test]
    fn constraint_names_round_trip() {
        for key in UniqueKey::ALL {
            assert_eq!(UniqueKey::from_constraint(&key.constraint()), Some(key));
        }
        assert_eq!(UniqueKey::InventoryCode.constraint(), "equipment_inventory_code_key");
        assert_eq!(UniqueKey::from_constraint("unrelated_key"), None);
    }

    #[test]
    fn trimmed_drops_blank_input() {
        assert_eq!(trimmed(Some("  EQ-1 ".into())), Some("EQ-1".into()));
        assert_eq!(trimmed(Some("   ".into())), None);
        assert_eq!(trimmed(None), None);
    }

    #[test]
    fn member_reports_allowed_values() {
        let lookup = MockReferenceLookup::new();
        let mut checker = Checker::new(&lookup);
        let parsed: Option<crate::models::enums::MaintenanceKind> =
            checker.member(EnumField::MaintenanceKind, Some("urgent"));
        assert!(parsed.is_none());
        assert_eq!(
            checker.violations(),
            &[Violation::InvalidEnum {
                field: "kind".into(),
                allowed: vec!["preventive", "corrective"],
            }]
        );
        assert_eq!(
            checker.violations()[0].to_string(),
            "kind must be one of: preventive, corrective"
        );
    }

    #[tokio::test]
    async fn unique_excludes_updated_row() {
        let mut lookup = MockReferenceLookup::new();
        lookup
            .expect_is_taken()
            .returning(|key, value, exclude| {
                assert_eq!(key, UniqueKey::Serial);
                assert_eq!(value, "SN-1");
                Ok(exclude != Some(3))
            });

        let mut checker = Checker::new(&lookup);
        checker.unique(UniqueKey::Serial, Some("SN-1"), Mode::Update(3)).await.unwrap();
        assert!(checker.violations().is_empty());

        checker.unique(UniqueKey::Serial, Some("SN-1"), Mode::Create).await.unwrap();
        assert_eq!(
            checker.violations(),
            &[Violation::DuplicateValue { field: "serial".into() }]
        );
    }

    #[tokio::test]
    async fn absent_references_skip_lookup() {
        let lookup = MockReferenceLookup::new();
        let mut checker = Checker::new(&lookup);
        checker.exists("position_id", RefTable::Position, None).await.unwrap();
        assert!(checker.finish().is_ok());
    }

    #[test]
    fn bad_dates_are_reported_per_field() {
        let lookup = MockReferenceLookup::new();
        let mut checker = Checker::new(&lookup);
        assert!(checker.datetime("scheduled_at", Some("yesterday")).is_none());
        assert!(checker.datetime("executed_at", Some("")).is_none());
        assert!(checker.calendar_date("next_due", Some("2025-02-30")).is_none());
        let fields: Vec<&str> = checker.violations().iter().map(Violation::field).collect();
        assert_eq!(fields, vec!["scheduled_at", "next_due"]);
    }
}
