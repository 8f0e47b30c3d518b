//! Locations service

use crate::{
    error::AppResult,
    models::{
        account::RequestContext,
        location::{Location, LocationDraft, LocationQuery},
    },
    repository::Repository,
    validation::{validate_location, Mode},
};

#[derive(Clone)]
pub struct LocationsService {
    repository: Repository,
}

impl LocationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &LocationQuery) -> AppResult<Vec<Location>> {
        self.repository.locations_list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Location> {
        self.repository.locations_get_by_id(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, draft: LocationDraft) -> AppResult<Location> {
        ctx.require_admin()?;
        let record = validate_location(&self.repository, draft, Mode::Create).await?;
        let created = self.repository.locations_create(&record).await?;
        tracing::info!(user = %ctx.username, id = created.id, code = %created.code, "location created");
        Ok(created)
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, patch: LocationDraft) -> AppResult<Location> {
        ctx.require_admin()?;
        let existing = self.repository.locations_get_by_id(id).await?;
        let draft = LocationDraft::from_existing(&existing).apply(patch);
        let record = validate_location(&self.repository, draft, Mode::Update(id)).await?;
        let updated = self.repository.locations_update(id, &record).await?;
        tracing::info!(user = %ctx.username, id, "location updated");
        Ok(updated)
    }

    /// Delete a location that no equipment is placed at
    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        let location = self.repository.locations_get_by_id(id).await?;
        let dependents = self.repository.locations_count_equipment(id).await?;
        super::ensure_unreferenced(dependents, |n| {
            format!("Location {} still has {} equipment item(s)", location.code, n)
        })?;
        self.repository.locations_delete(id).await?;
        tracing::info!(user = %ctx.username, id, "location deleted");
        Ok(())
    }
}
