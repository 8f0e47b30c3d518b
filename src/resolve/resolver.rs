//! Entity resolution from user-facing tokens

use super::catalog::{CatalogIndex, Lookup};
use crate::{
    error::{AppError, AppResult},
    repository::lookup::ReferenceLookup,
    validation::Violation,
};

/// What a token should resolve to
#[derive(Debug, Clone, Copy)]
pub enum Target<'c> {
    /// Equipment, keyed by exact inventory code
    Equipment,
    /// Maintenance person, keyed by picker label within the given catalog
    Person(&'c CatalogIndex),
}

pub struct EntityResolver<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L: ReferenceLookup + ?Sized> EntityResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Resolve `token` to an identifier. Failures are reported as a single
    /// violation on `field`.
    pub async fn resolve(&self, field: &str, token: &str, target: Target<'_>) -> AppResult<i32> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::violation(Violation::MissingReference {
                field: field.to_string(),
            }));
        }

        match target {
            Target::Equipment => self.resolve_equipment(field, token).await,
            Target::Person(catalog) => self.resolve_person(field, token, catalog).await,
        }
    }

    async fn resolve_equipment(&self, field: &str, code: &str) -> AppResult<i32> {
        let catalog = self.lookup.equipment_codes().await?;
        catalog
            .iter()
            .find(|e| e.inventory_code == code)
            .map(|e| e.id)
            .ok_or_else(|| unknown(field, code))
    }

    async fn resolve_person(&self, field: &str, label: &str, catalog: &CatalogIndex) -> AppResult<i32> {
        match catalog.lookup_exact(label) {
            Lookup::Found(id) => return Ok(id),
            Lookup::Ambiguous(ids) => {
                tracing::debug!(field, label, ?ids, "person label is ambiguous");
                return Err(AppError::violation(Violation::AmbiguousReference {
                    field: field.to_string(),
                    token: label.to_string(),
                }));
            }
            Lookup::NotFound => {}
        }

        let probable = probable_identifier(label);
        if probable.is_empty() {
            return Err(unknown(field, label));
        }

        let candidates = self.lookup.search_people(probable).await?;
        if let Some(exact) = candidates.iter().find(|p| p.national_id == probable) {
            return Ok(exact.id);
        }
        // Best effort: a lone search hit is accepted to tolerate partial typing
        if let [only] = candidates.as_slice() {
            tracing::debug!(field, label, id = only.id, "accepting single search candidate");
            return Ok(only.id);
        }
        Err(unknown(field, label))
    }
}

/// Text before the first em dash or hyphen, trimmed
pub fn probable_identifier(label: &str) -> &str {
    let head = label.split('\u{2014}').next().unwrap_or(label);
    head.split('-').next().unwrap_or(head).trim()
}

fn unknown(field: &str, token: &str) -> AppError {
    AppError::violation(Violation::UnknownReference {
        field: field.to_string(),
        token: token.to_string(),
    })
}
