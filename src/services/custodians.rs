//! Custodians service

use crate::{
    error::AppResult,
    models::{
        account::RequestContext,
        custodian::{Custodian, CustodianDraft, CustodianQuery},
    },
    repository::Repository,
    validation::{validate_custodian, Mode},
};

#[derive(Clone)]
pub struct CustodiansService {
    repository: Repository,
}

impl CustodiansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &CustodianQuery) -> AppResult<Vec<Custodian>> {
        self.repository.custodians_list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Custodian> {
        self.repository.custodians_get_by_id(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, draft: CustodianDraft) -> AppResult<Custodian> {
        ctx.require_admin()?;
        let record = validate_custodian(&self.repository, draft, Mode::Create).await?;
        let created = self.repository.custodians_create(&record).await?;
        tracing::info!(user = %ctx.username, id = created.id, area = %created.area_code, "custodian created");
        Ok(created)
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, patch: CustodianDraft) -> AppResult<Custodian> {
        ctx.require_admin()?;
        let existing = self.repository.custodians_get_by_id(id).await?;
        let draft = CustodianDraft::from_existing(&existing).apply(patch);
        let record = validate_custodian(&self.repository, draft, Mode::Update(id)).await?;
        let updated = self.repository.custodians_update(id, &record).await?;
        tracing::info!(user = %ctx.username, id, "custodian updated");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        let custodian = self.repository.custodians_get_by_id(id).await?;
        let dependents = self.repository.custodians_count_equipment(id).await?;
        super::ensure_unreferenced(dependents, |n| {
            format!("Custodian {} is still responsible for {} equipment item(s)", custodian.area_code, n)
        })?;
        self.repository.custodians_delete(id).await?;
        tracing::info!(user = %ctx.username, id, "custodian deleted");
        Ok(())
    }
}
