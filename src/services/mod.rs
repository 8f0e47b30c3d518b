//! Business logic services

pub mod accounts;
pub mod custodians;
pub mod equipment;
pub mod locations;
pub mod maintenance;
pub mod people;
pub mod positions;
pub mod reports;
pub mod uploads;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Refuse a delete while `dependents` rows still reference the record
pub(crate) fn ensure_unreferenced(dependents: i64, describe: impl FnOnce(i64) -> String) -> AppResult<()> {
    if dependents > 0 {
        return Err(AppError::HasDependents(describe(dependents)));
    }
    Ok(())
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub accounts: accounts::AccountsService,
    pub custodians: custodians::CustodiansService,
    pub equipment: equipment::EquipmentService,
    pub locations: locations::LocationsService,
    pub maintenance: maintenance::MaintenanceService,
    pub people: people::PeopleService,
    pub positions: positions::PositionsService,
    pub reports: reports::ReportsService,
    pub uploads: uploads::UploadsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let offset = config.display.offset();
        Self {
            accounts: accounts::AccountsService::new(repository.clone(), config.auth.clone()),
            custodians: custodians::CustodiansService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            locations: locations::LocationsService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone(), offset),
            people: people::PeopleService::new(repository.clone()),
            positions: positions::PositionsService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone(), offset),
            uploads: uploads::UploadsService::new(config.uploads.clone()),
            repository,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_record_cannot_be_deleted() {
        let err = ensure_unreferenced(2, |n| format!("Location L-1 still has {} equipment item(s)", n)).unwrap_err();
        match err {
            AppError::HasDependents(msg) => assert_eq!(msg, "Location L-1 still has 2 equipment item(s)"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unreferenced_record_can_be_deleted() {
        // e.g. once the last equipment item was moved to another location
        assert!(ensure_unreferenced(0, |_| unreachable!()).is_ok());
    }
}
