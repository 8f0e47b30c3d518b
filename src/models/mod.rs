//! Data models for Custodia

pub mod account;
pub mod custodian;
pub mod enums;
pub mod equipment;
pub mod location;
pub mod maintenance;
pub mod person;
pub mod position;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// Re-export commonly used types
pub use account::{Account, AccountRow};
pub use custodian::Custodian;
pub use equipment::{Equipment, EquipmentCode};
pub use location::Location;
pub use maintenance::{Maintenance, MaintenanceView};
pub use person::MaintenancePerson;
pub use position::Position;

/// Anything addressable by a numeric identifier
pub trait Identified {
    fn id(&self) -> i32;
}

/// `{ id, label }` pair used by pickers and suggestion lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Choice {
    pub id: i32,
    pub label: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn coerce_id<E: serde::de::Error>(raw: Option<RawId>) -> Result<Option<i32>, E> {
    match raw {
        None => Ok(None),
        Some(RawId::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| E::custom(format!("identifier out of range: {}", n))),
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawId::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid identifier: {}", s))),
    }
}

/// Foreign key sent as a number or a numeric string; blank means absent
pub fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    coerce_id(Option::<RawId>::deserialize(deserializer)?)
}

/// Patch variant of [`lenient_id`]: present-but-null (or blank) clears the value
pub fn lenient_id_patch<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<i32>>, D::Error> {
    coerce_id(Option::<RawId>::deserialize(deserializer)?).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_id")]
        id: Option<i32>,
        #[serde(default, deserialize_with = "lenient_id_patch")]
        parent: Option<Option<i32>>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        assert_eq!(probe(r#"{"id": 7}"#).id, Some(7));
        assert_eq!(probe(r#"{"id": " 12 "}"#).id, Some(12));
        assert_eq!(probe(r#"{"id": ""}"#).id, None);
        assert_eq!(probe(r#"{"id": null}"#).id, None);
        assert!(serde_json::from_str::<Probe>(r#"{"id": "abc"}"#).is_err());
    }

    #[test]
    fn patch_ids_distinguish_absent_from_cleared() {
        assert_eq!(probe("{}").parent, None);
        assert_eq!(probe(r#"{"parent": null}"#).parent, Some(None));
        assert_eq!(probe(r#"{"parent": 4}"#).parent, Some(Some(4)));
    }
}
