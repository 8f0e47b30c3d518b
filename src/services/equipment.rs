//! Equipment service

use crate::{
    error::AppResult,
    models::{
        account::RequestContext,
        equipment::{Equipment, EquipmentCode, EquipmentDraft, EquipmentQuery},
    },
    repository::Repository,
    resolve::{EntityResolver, Target},
    validation::{validate_equipment, Mode},
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment_list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment_get_by_id(id).await
    }

    /// Minimal catalog for pickers
    pub async fn minimal(&self) -> AppResult<Vec<EquipmentCode>> {
        self.repository.equipment_min().await
    }

    /// Equipment whose inventory code is exactly `code`
    pub async fn resolve_code(&self, code: &str) -> AppResult<Equipment> {
        let id = EntityResolver::new(&self.repository)
            .resolve("code", code, Target::Equipment)
            .await?;
        self.repository.equipment_get_by_id(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, draft: EquipmentDraft) -> AppResult<Equipment> {
        ctx.require_admin()?;
        let record = validate_equipment(&self.repository, draft, Mode::Create).await?;
        let created = self.repository.equipment_create(&record).await?;
        tracing::info!(user = %ctx.username, id = created.id, code = %created.inventory_code, "equipment created");
        Ok(created)
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, patch: EquipmentDraft) -> AppResult<Equipment> {
        ctx.require_admin()?;
        let existing = self.repository.equipment_get_by_id(id).await?;
        let draft = EquipmentDraft::from_existing(&existing).apply(patch);
        let record = validate_equipment(&self.repository, draft, Mode::Update(id)).await?;
        let updated = self.repository.equipment_update(id, &record).await?;
        tracing::info!(user = %ctx.username, id, "equipment updated");
        Ok(updated)
    }

    /// Delete equipment together with its maintenance history
    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        self.repository.equipment_delete(id).await?;
        tracing::info!(user = %ctx.username, id, "equipment deleted");
        Ok(())
    }
}
