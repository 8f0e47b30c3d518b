//! Closed value sets for enumerated fields (the enumeration registry)
//!
//! Every enumerated column is stored as TEXT. Requests carry these fields as
//! raw strings so that an unknown value is reported alongside every other
//! violation instead of failing deserialization; validated records hold the
//! typed enums below.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

string_enum! {
    /// Kind of equipment
    EquipmentType {
        Laptop => "laptop",
        Desktop => "desktop",
        Printer => "printer",
        Switch => "switch",
        Router => "router",
        Server => "server",
        Other => "other",
    }
}

string_enum! {
    /// Operational state of a piece of equipment
    EquipmentState {
        Operational => "operational",
        UnderMaintenance => "under_maintenance",
        Decommissioned => "decommissioned",
    }
}

string_enum! {
    MaintenanceKind {
        Preventive => "preventive",
        Corrective => "corrective",
    }
}

string_enum! {
    MaintenancePriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

string_enum! {
    /// Outcome of a performed maintenance; absent while pending
    MaintenanceResult {
        Successful => "successful",
        Partial => "partial",
        Failed => "failed",
    }
}

string_enum! {
    /// Account role, from most to least privileged
    Role {
        Admin => "admin",
        Officer => "officer",
        User => "user",
    }
}

string_enum! {
    /// Whether a position is staffed internally or by a provider
    PositionKind {
        Internal => "internal",
        External => "external",
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Enumerated fields known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnumField {
    EquipmentType,
    EquipmentState,
    MaintenanceKind,
    MaintenancePriority,
    MaintenanceResult,
    AccountRole,
    PositionKind,
}

impl EnumField {
    pub const ALL: &'static [EnumField] = &[
        EnumField::EquipmentType,
        EnumField::EquipmentState,
        EnumField::MaintenanceKind,
        EnumField::MaintenancePriority,
        EnumField::MaintenanceResult,
        EnumField::AccountRole,
        EnumField::PositionKind,
    ];

    /// Name of the request field carrying this value
    pub fn field_name(&self) -> &'static str {
        match self {
            EnumField::EquipmentType => "equipment_type",
            EnumField::EquipmentState => "state",
            EnumField::MaintenanceKind => "kind",
            EnumField::MaintenancePriority => "priority",
            EnumField::MaintenanceResult => "result",
            EnumField::AccountRole => "role",
            EnumField::PositionKind => "kind",
        }
    }

    pub fn values(&self) -> &'static [&'static str] {
        match self {
            EnumField::EquipmentType => EquipmentType::VALUES,
            EnumField::EquipmentState => EquipmentState::VALUES,
            EnumField::MaintenanceKind => MaintenanceKind::VALUES,
            EnumField::MaintenancePriority => MaintenancePriority::VALUES,
            EnumField::MaintenanceResult => MaintenanceResult::VALUES,
            EnumField::AccountRole => Role::VALUES,
            EnumField::PositionKind => PositionKind::VALUES,
        }
    }

    /// Value applied when the field is omitted, if the field has one
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            EnumField::MaintenancePriority => Some(MaintenancePriority::Medium.as_str()),
            EnumField::AccountRole => Some(Role::User.as_str()),
            EnumField::PositionKind => Some(PositionKind::Internal.as_str()),
            _ => None,
        }
    }

    /// Null and empty values count as members: optionality is checked separately.
    pub fn is_member(&self, value: Option<&str>) -> bool {
        match value {
            None | Some("") => true,
            Some(v) => self.values().contains(&v),
        }
    }
}

/// One registry entry, as exposed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistryEntry {
    pub field: EnumField,
    pub values: Vec<&'static str>,
    pub default: Option<&'static str>,
}

/// Full registry listing
pub fn registry() -> Vec<RegistryEntry> {
    EnumField::ALL
        .iter()
        .map(|field| RegistryEntry {
            field: *field,
            values: field.values().to_vec(),
            default: field.default_value(),
        })
        .collect()
}
