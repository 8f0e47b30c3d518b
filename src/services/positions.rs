//! Positions service

use crate::{
    error::AppResult,
    models::{
        account::RequestContext,
        position::{Position, PositionDraft, PositionPatch, PositionQuery},
    },
    repository::Repository,
    validation::{validate_position, Mode},
};

#[derive(Clone)]
pub struct PositionsService {
    repository: Repository,
}

impl PositionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &PositionQuery) -> AppResult<Vec<Position>> {
        self.repository.positions_list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Position> {
        self.repository.positions_get_by_id(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, draft: PositionDraft) -> AppResult<Position> {
        ctx.require_admin()?;
        let record = validate_position(&self.repository, draft, Mode::Create).await?;
        let created = self.repository.positions_create(&record).await?;
        tracing::info!(user = %ctx.username, id = created.id, name = %created.name, "position created");
        Ok(created)
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, patch: PositionPatch) -> AppResult<Position> {
        ctx.require_admin()?;
        let existing = self.repository.positions_get_by_id(id).await?;
        let draft = PositionDraft::from_existing(&existing).apply(patch);
        let record = validate_position(&self.repository, draft, Mode::Update(id)).await?;
        let updated = self.repository.positions_update(id, &record).await?;
        tracing::info!(user = %ctx.username, id, "position updated");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        let position = self.repository.positions_get_by_id(id).await?;
        let dependents = self.repository.positions_count_people(id).await?;
        super::ensure_unreferenced(dependents, |n| {
            format!("Position {} is still held by {} person(s)", position.name, n)
        })?;
        self.repository.positions_delete(id).await?;
        tracing::info!(user = %ctx.username, id, "position deleted");
        Ok(())
    }
}
