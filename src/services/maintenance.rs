//! Maintenance record service
//!
//! Records are validated as a whole on every write: an update overlays the
//! patch on the stored record and validates the result, so omitted fields are
//! left untouched. Reads return display views in the reporting offset.

use chrono::FixedOffset;

use crate::{
    error::AppResult,
    models::{
        account::RequestContext,
        maintenance::{
            MaintenanceDraft, MaintenanceOptions, MaintenancePatch, MaintenanceQuery, MaintenanceView,
        },
    },
    repository::Repository,
    validation::validate_maintenance,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    offset: FixedOffset,
}

impl MaintenanceService {
    pub fn new(repository: Repository, offset: FixedOffset) -> Self {
        Self { repository, offset }
    }

    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceView>> {
        let filter = query.to_filter()?;
        let rows = self.repository.maintenance_list(&filter).await?;
        Ok(rows.iter().map(|m| m.view(self.offset)).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceView> {
        let record = self.repository.maintenance_get_by_id(id).await?;
        Ok(record.view(self.offset))
    }

    pub fn options(&self) -> MaintenanceOptions {
        MaintenanceOptions::default()
    }

    pub async fn create(&self, ctx: &RequestContext, draft: MaintenanceDraft) -> AppResult<MaintenanceView> {
        ctx.require_admin()?;
        let record = validate_maintenance(&self.repository, draft).await?;
        let created = self.repository.maintenance_create(&record).await?;
        tracing::info!(
            user = %ctx.username,
            id = created.id,
            equipment_id = created.equipment_id,
            person_id = created.person_id,
            "maintenance record created"
        );
        Ok(created.view(self.offset))
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, patch: MaintenancePatch) -> AppResult<MaintenanceView> {
        ctx.require_admin()?;
        let existing = self.repository.maintenance_get_by_id(id).await?;
        let draft = MaintenanceDraft::from_existing(&existing).apply(patch);
        let record = validate_maintenance(&self.repository, draft).await?;
        let updated = self.repository.maintenance_update(id, &record).await?;
        tracing::info!(user = %ctx.username, id, "maintenance record updated");
        Ok(updated.view(self.offset))
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        self.repository.maintenance_delete(id).await?;
        tracing::info!(user = %ctx.username, id, "maintenance record deleted");
        Ok(())
    }
}
